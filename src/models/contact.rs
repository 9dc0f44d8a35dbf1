use serde::{Deserialize, Serialize};

/// One row of the contact directory. Names are unique case-insensitively,
/// emails are unique outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub name: String,
    pub email: String,
}

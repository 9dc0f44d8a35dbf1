use rusqlite::{params, Connection, OptionalExtension};

use crate::models::ContactEntry;

// ── Contacts ──

/// Case-insensitive exact lookup of a contact's email by name. The `name`
/// column carries COLLATE NOCASE, so plain equality matches "Vini" = "vini".
pub fn lookup_contact(conn: &Connection, name: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT email FROM contacts WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )
    .optional()
}

/// Insert a contact, or overwrite the email when the name already exists.
/// A UNIQUE violation on the email column still surfaces as an error; the
/// caller decides how to present it.
pub fn upsert_contact(
    conn: &Connection,
    name: &str,
    email: &str,
) -> rusqlite::Result<ContactEntry> {
    conn.execute(
        "INSERT INTO contacts (name, email) VALUES (?1, ?2)
         ON CONFLICT(name) DO UPDATE SET email = excluded.email",
        params![name, email],
    )?;

    Ok(ContactEntry {
        name: name.to_string(),
        email: email.to_string(),
    })
}

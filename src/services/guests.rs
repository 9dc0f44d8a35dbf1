use std::collections::BTreeSet;

use rusqlite::Connection;

use crate::db::queries;

/// Outcome of resolving one turn's guest tokens. `resolved` is a set (order
/// never matters downstream); `unresolved` keeps input order so diagnostics
/// read the way the user typed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestResolution {
    pub resolved: BTreeSet<String>,
    pub unresolved: Vec<String>,
}

/// Map guest tokens to email addresses. Tokens that already look like an
/// email (contain `@`) pass through without a directory lookup; everything
/// else is matched case-insensitively by contact name. Misses land in
/// `unresolved`. Never writes the directory.
pub fn resolve(conn: &Connection, tokens: &[String]) -> rusqlite::Result<GuestResolution> {
    let mut resolution = GuestResolution::default();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if token.contains('@') {
            resolution.resolved.insert(token.to_string());
            continue;
        }

        match queries::lookup_contact(conn, token)? {
            Some(email) => {
                resolution.resolved.insert(email);
            }
            None => resolution.unresolved.push(token.to_string()),
        }
    }

    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_known_name_and_raw_email_resolve() {
        let conn = setup_db();
        queries::upsert_contact(&conn, "vini", "v@z.com").unwrap();

        let resolution = resolve(&conn, &tokens(&["vini", "x@y.com"])).unwrap();
        assert_eq!(
            resolution.resolved,
            ["v@z.com".to_string(), "x@y.com".to_string()]
                .into_iter()
                .collect()
        );
        assert!(resolution.unresolved.is_empty());
    }

    #[test]
    fn test_unknown_name_lands_in_unresolved() {
        let conn = setup_db();
        let resolution = resolve(&conn, &tokens(&["unknownname"])).unwrap();
        assert!(resolution.resolved.is_empty());
        assert_eq!(resolution.unresolved, vec!["unknownname".to_string()]);
    }

    #[test]
    fn test_unresolved_keeps_input_order() {
        let conn = setup_db();
        queries::upsert_contact(&conn, "ana", "ana@z.com").unwrap();

        let resolution = resolve(&conn, &tokens(&["zeca", "ana", "beto"])).unwrap();
        assert_eq!(
            resolution.unresolved,
            vec!["zeca".to_string(), "beto".to_string()]
        );
    }

    #[test]
    fn test_duplicate_tokens_collapse_in_resolved_set() {
        let conn = setup_db();
        queries::upsert_contact(&conn, "vini", "v@z.com").unwrap();

        let resolution = resolve(&conn, &tokens(&["vini", "Vini", "v@z.com"])).unwrap();
        assert_eq!(resolution.resolved.len(), 1);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let conn = setup_db();
        queries::upsert_contact(&conn, "Vini", "v@z.com").unwrap();

        let resolution = resolve(&conn, &tokens(&["VINI"])).unwrap();
        assert!(resolution.resolved.contains("v@z.com"));
    }

    #[test]
    fn test_blank_tokens_are_ignored() {
        let conn = setup_db();
        let resolution = resolve(&conn, &tokens(&["  ", ""])).unwrap();
        assert!(resolution.resolved.is_empty());
        assert!(resolution.unresolved.is_empty());
    }
}

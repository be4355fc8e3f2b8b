//! Driver error classification.
//!
//! SQLite failures are classified on their extended result code. The text
//! markers cover MySQL-formatted errors, which only carry the information in
//! their message.

use std::error::Error;
use std::fmt::Display;

use rusqlite::ffi;

/// Message marker of a MySQL unique-key violation.
pub const DUPLICATE_ENTRY: &str = "Error 1062: Duplicate entry";

/// Message marker of a connection the driver has given up on.
pub const INVALID_CONNECTION: &str = "invalid connection";

/// Whether `err` is a uniqueness-constraint violation. `None` is not.
pub fn is_duplicate_entry(err: Option<&(dyn Error + 'static)>) -> bool {
    let Some(err) = err else {
        return false;
    };
    std::iter::successors(Some(err), |&e| e.source()).any(|e| {
        if let Some(rusqlite::Error::SqliteFailure(failure, _)) = e.downcast_ref::<rusqlite::Error>() {
            if matches!(
                failure.extended_code,
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            ) {
                return true;
            }
        }
        e.to_string().contains(DUPLICATE_ENTRY)
    })
}

/// Whether `err` reports a dead connection, where a rollback cannot succeed.
pub fn is_invalid_connection<E: Display + ?Sized>(err: &E) -> bool {
    err.to_string().contains(INVALID_CONNECTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[derive(Debug)]
    struct Text(&'static str);

    impl Display for Text {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    impl Error for Text {}

    #[test]
    fn none_is_not_duplicate() {
        assert!(!is_duplicate_entry(None));
    }

    #[test]
    fn mysql_duplicate_text_matches() {
        let err = Text("Error 1062: Duplicate entry 'a@b.c' for key 'email'");
        assert!(is_duplicate_entry(Some(&err)));
    }

    #[test]
    fn other_mysql_errors_do_not_match() {
        assert!(!is_duplicate_entry(Some(&Text("Error 1064: You have an error in your SQL syntax"))));
        // marker is case-sensitive
        assert!(!is_duplicate_entry(Some(&Text("error 1062: duplicate entry"))));
    }

    #[test]
    fn sqlite_unique_violation_matches_on_code() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err();
        assert!(is_duplicate_entry(Some(&err)));
    }

    #[test]
    fn sqlite_primary_key_violation_matches() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY); INSERT INTO t VALUES (1);")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES (1)", []).unwrap_err();
        assert!(is_duplicate_entry(Some(&err)));
    }

    #[test]
    fn sqlite_not_null_violation_does_not_match() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k TEXT NOT NULL)").unwrap();
        let err = conn.execute("INSERT INTO t VALUES (NULL)", []).unwrap_err();
        assert!(!is_duplicate_entry(Some(&err)));
    }

    #[test]
    fn wrapped_duplicate_found_in_source_chain() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();
        let err: crate::Error = conn.execute("INSERT INTO t VALUES ('a')", []).unwrap_err().into();
        assert!(is_duplicate_entry(Some(&err)));
    }

    #[test]
    fn invalid_connection_marker() {
        assert!(is_invalid_connection("driver: bad connection: invalid connection"));
        assert!(!is_invalid_connection("connection refused"));
    }
}

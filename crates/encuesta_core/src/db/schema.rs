//! `kv_store` schema, versioned through `PRAGMA user_version`.

use super::{DbError, DbResult};
use rusqlite::Connection;
use std::cmp::Ordering;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

const KV_STORE_DDL: &str = include_str!("kv_store.sql");

/// Creates the `kv_store` table on a fresh file and stamps the version.
///
/// A file already at [`SCHEMA_VERSION`] is left untouched; a newer one is
/// refused so its slots are never read with the wrong layout.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    match found.cmp(&SCHEMA_VERSION) {
        Ordering::Equal => Ok(()),
        Ordering::Greater => Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        }),
        Ordering::Less => {
            let tx = conn.transaction()?;
            tx.execute_batch(KV_STORE_DDL)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;
            Ok(())
        }
    }
}

/// Version stamped on the open database, `0` for a file never bootstrapped.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, stored_version, SCHEMA_VERSION};
    use rusqlite::Connection;

    #[test]
    fn bare_connection_is_stamped_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(stored_version(&conn).unwrap(), 0);

        ensure_schema(&mut conn).unwrap();
        ensure_schema(&mut conn).unwrap();
        assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}

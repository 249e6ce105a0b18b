//! Persisted sign-in state.
//!
//! The token and user are kept in a small SQLite key/value table under the
//! keys `token` and `user` (JSON), loaded at startup and cleared on logout.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use crate::models::{Session, User};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

pub struct SessionStore {
  conn: Mutex<Connection>,
}

impl SessionStore {
  /// Open or create the store at the default location
  pub fn open_default() -> Result<Self> {
    Self::open(&crate::config::data_dir()?.join("session.db"))
  }

  pub fn open(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create session directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open session store at {}: {}", path.display(), e))?;
    conn
      .execute_batch(SCHEMA)
      .map_err(|e| eyre!("Failed to run session migrations: {}", e))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn
      .query_row(
        "SELECT value FROM local_storage WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read {}: {}", key, e))
  }

  /// The stored session, if both token and user are present.
  ///
  /// A user entry that no longer parses is treated as signed out.
  pub fn load(&self) -> Result<Option<Session>> {
    let conn = self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    let (Some(token), Some(user)) = (Self::get(&conn, TOKEN_KEY)?, Self::get(&conn, USER_KEY)?)
    else {
      return Ok(None);
    };

    match serde_json::from_str::<User>(&user) {
      Ok(user) => Ok(Some(Session { token, user })),
      Err(e) => {
        tracing::warn!(error = %e, "discarding unreadable stored user");
        Ok(None)
      }
    }
  }

  pub fn save(&self, session: &Session) -> Result<()> {
    let user = serde_json::to_string(&session.user)?;
    let mut conn = self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    let tx = conn.transaction()?;
    for (key, value) in [(TOKEN_KEY, session.token.as_str()), (USER_KEY, user.as_str())] {
      tx.execute(
        "INSERT OR REPLACE INTO local_storage (key, value) VALUES (?, ?)",
        params![key, value],
      )
      .map_err(|e| eyre!("Failed to store {}: {}", key, e))?;
    }
    tx.commit()?;
    Ok(())
  }

  pub fn clear(&self) -> Result<()> {
    let conn = self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    conn
      .execute(
        "DELETE FROM local_storage WHERE key IN (?, ?)",
        params![TOKEN_KEY, USER_KEY],
      )
      .map_err(|e| eyre!("Failed to clear session: {}", e))?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn session() -> Session {
    Session {
      token: "tok-123".to_string(),
      user: User {
        id: "vet-1".to_string(),
        user_name: "mdemir".to_string(),
      },
    }
  }

  #[test]
  fn test_empty_store_has_no_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::open(&dir.path().join("session.db")).unwrap();
    assert_eq!(store.load().unwrap(), None);
  }

  #[test]
  fn test_save_load_clear() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.db");

    SessionStore::open(&path).unwrap().save(&session()).unwrap();

    let store = SessionStore::open(&path).unwrap();
    assert_eq!(store.load().unwrap(), Some(session()));

    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), None);
  }

  #[test]
  fn test_token_without_user_is_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::open(&dir.path().join("session.db")).unwrap();
    store
      .conn
      .lock()
      .unwrap()
      .execute(
        "INSERT INTO local_storage (key, value) VALUES ('token', 'abc')",
        [],
      )
      .unwrap();
    assert_eq!(store.load().unwrap(), None);
  }
}

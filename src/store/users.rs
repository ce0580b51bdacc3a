// SPDX-License-Identifier: MPL-2.0

use crate::api::User;
use crate::store::{ArchiveDb, StoreError};
use rusqlite::params;

/// Persistence of the participant cache
pub struct UserStore<'a> {
    db: &'a ArchiveDb,
}

impl<'a> UserStore<'a> {
    pub fn new(db: &'a ArchiveDb) -> Self {
        Self { db }
    }

    /// Store users not yet present in a transaction; returns how many were new
    pub fn persist_all<'u>(
        &self,
        users: impl IntoIterator<Item = &'u User>,
    ) -> Result<usize, StoreError> {
        let tx = self.db.conn().unchecked_transaction()?;
        let mut inserted = 0;

        for user in users {
            inserted += tx.execute(
                r#"
                INSERT INTO users (id, first_name, last_name)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(id) DO NOTHING
                "#,
                params![user.id, user.first_name, user.last_name],
            )?;
        }

        tx.commit()?;
        Ok(inserted)
    }

    /// Get user by id
    pub fn get(&self, id: i64) -> Result<Option<User>, StoreError> {
        let mut stmt = self
            .db
            .conn()
            .prepare("SELECT id, first_name, last_name FROM users WHERE id = ?")?;

        let user = stmt
            .query_row([id], |row| {
                Ok(User {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                })
            })
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(StoreError::Database(other)),
            })?;

        Ok(user)
    }
}

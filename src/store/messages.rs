// SPDX-License-Identifier: MPL-2.0

use crate::api::Message;
use crate::store::attachments::store_attachment;
use crate::store::db::IdBases;
use crate::store::{ArchiveDb, StoreError};
use rusqlite::{Connection, params};

/// Persistence of decoded message trees.
///
/// One store serves one run: synthesized link and call ids are offset by the
/// bases read when it is created, matching counters that start at zero with
/// the run.
pub struct MessageStore<'a> {
    db: &'a ArchiveDb,
    bases: IdBases,
}

impl<'a> MessageStore<'a> {
    pub fn new(db: &'a ArchiveDb) -> Result<Self, StoreError> {
        Ok(Self {
            db,
            bases: db.next_id_bases()?,
        })
    }

    /// Whether a message with this sender and conversation id is stored
    pub fn contains(&self, from_id: i64, conversation_message_id: i64) -> Result<bool, StoreError> {
        message_exists(self.db.conn(), from_id, conversation_message_id)
    }

    /// Store a message with its attachments and forwarded messages.
    ///
    /// A message that is already stored is skipped together with its whole
    /// subtree. Returns whether anything was written. The tree is written in a
    /// single transaction.
    pub fn persist(&self, message: &Message) -> Result<bool, StoreError> {
        let tx = self.db.conn().unchecked_transaction()?;
        let inserted = insert_tree(&tx, message, self.bases)?;
        tx.commit()?;
        Ok(inserted)
    }
}

fn message_exists(
    conn: &Connection,
    from_id: i64,
    conversation_message_id: i64,
) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM messages WHERE from_id = ?1 AND conversation_message_id = ?2",
    )?;
    Ok(stmt.exists(params![from_id, conversation_message_id])?)
}

fn insert_tree(conn: &Connection, message: &Message, bases: IdBases) -> Result<bool, StoreError> {
    let (from_id, cmid) = message.key();
    if message_exists(conn, from_id, cmid)? {
        return Ok(false);
    }

    conn.execute(
        r#"
        INSERT INTO messages (
            from_id, conversation_message_id, id, date, important, text,
            reply_conversation_message_id, original_json
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            from_id,
            cmid,
            message.id,
            message.date,
            message.important,
            message.text,
            message.reply_conversation_message_id,
            message.original_json,
        ],
    )?;

    for (sequence, attachment) in message.attachments.iter().enumerate() {
        let attachment_id = store_attachment(conn, attachment, bases)?;
        conn.execute(
            r#"
            INSERT INTO message_attachments (
                message_from_id, message_conversation_message_id, sequence_number,
                attachment_id, attachment_type
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                from_id,
                cmid,
                sequence as i64,
                attachment_id,
                attachment.kind().as_str()
            ],
        )?;
    }

    for (sequence, forwarded) in message.fwd_messages.iter().enumerate() {
        // An already stored copy is still linked from this parent
        insert_tree(conn, forwarded, bases)?;
        let (fwd_from_id, fwd_cmid) = forwarded.key();
        conn.execute(
            r#"
            INSERT INTO forwarded_messages (
                message_from_id, message_conversation_message_id,
                forwarded_from_id, forwarded_conversation_message_id, sequence_number
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![from_id, cmid, fwd_from_id, fwd_cmid, sequence as i64],
        )?;
    }

    Ok(true)
}

// SPDX-License-Identifier: MPL-2.0

//! One insert per attachment kind. Inserts keyed by a source id are
//! conditional (`ON CONFLICT DO NOTHING`), so a row seen before is left
//! untouched. Links and calls carry synthesized ids that are new by
//! construction, so a clash there is an error rather than a skip.

use crate::api::{Attachment, Audio, AudioPlaylist};
use crate::store::StoreError;
use crate::store::db::IdBases;
use rusqlite::{Connection, params};

/// Store the kind row for `attachment` unless it is already present.
///
/// Returns the id the attachment is stored under, which is what
/// `message_attachments.attachment_id` refers to.
pub(crate) fn store_attachment(
    conn: &Connection,
    attachment: &Attachment,
    bases: IdBases,
) -> Result<i64, StoreError> {
    let id = match attachment {
        Attachment::Photo(a) => {
            conn.execute(
                "INSERT INTO photos (id, owner_id, date) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO NOTHING",
                params![a.id, a.owner_id, a.date],
            )?;
            a.id
        }
        Attachment::Video(a) => {
            conn.execute(
                "INSERT INTO videos (id, owner_id, date, title, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO NOTHING",
                params![a.id, a.owner_id, a.date, a.title, a.description],
            )?;
            a.id
        }
        Attachment::Audio(a) => {
            store_audio(conn, a)?;
            a.id
        }
        Attachment::Document(a) => {
            conn.execute(
                "INSERT INTO documents (id, owner_id, date, title, ext)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO NOTHING",
                params![a.id, a.owner_id, a.date, a.title, a.ext],
            )?;
            a.id
        }
        Attachment::Link(a) => {
            let id = bases.link + a.id;
            conn.execute(
                "INSERT INTO links (id, url, title, caption, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, a.url, a.title, a.caption, a.description],
            )?;
            id
        }
        Attachment::Product(a) => {
            conn.execute(
                "INSERT INTO products (id, owner_id, title, description, price, currency,
                                       category_name, category_section)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(id) DO NOTHING",
                params![
                    a.id,
                    a.owner_id,
                    a.title,
                    a.description,
                    a.price,
                    a.currency,
                    a.category_name,
                    a.category_section,
                ],
            )?;
            a.id
        }
        Attachment::ProductAlbum(a) => {
            conn.execute(
                "INSERT INTO product_albums (id, owner_id, title, is_main, is_hidden)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO NOTHING",
                params![a.id, a.owner_id, a.title, a.is_main, a.is_hidden],
            )?;
            a.id
        }
        Attachment::WallPost(a) => {
            conn.execute(
                "INSERT INTO posts (id, owner_id, from_id, date, text)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO NOTHING",
                params![a.id, a.owner_id, a.from_id, a.date, a.text],
            )?;
            a.id
        }
        Attachment::WallComment(a) => {
            conn.execute(
                "INSERT INTO comments (id, from_id, date, text)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO NOTHING",
                params![a.id, a.from_id, a.date, a.text],
            )?;
            a.id
        }
        Attachment::Sticker(a) => {
            conn.execute(
                "INSERT INTO stickers (id) VALUES (?1) ON CONFLICT(id) DO NOTHING",
                [a.id],
            )?;
            a.id
        }
        Attachment::Gift(a) => {
            conn.execute(
                "INSERT INTO gifts (id) VALUES (?1) ON CONFLICT(id) DO NOTHING",
                [a.id],
            )?;
            a.id
        }
        Attachment::Call(a) => {
            let id = bases.call + a.id;
            conn.execute(
                "INSERT INTO calls (id, initiator_id, receiver_id, state, time, duration, video)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    a.initiator_id,
                    a.receiver_id,
                    a.state,
                    a.time,
                    a.duration,
                    a.video,
                ],
            )?;
            id
        }
        Attachment::VoiceMessage(a) => {
            let waveform: Vec<u8> = a.waveform.iter().flat_map(|s| s.to_le_bytes()).collect();
            conn.execute(
                "INSERT INTO audio_messages (id, owner_id, duration, waveform)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO NOTHING",
                params![a.id, a.owner_id, a.duration, waveform],
            )?;
            a.id
        }
        Attachment::AudioPlaylist(a) => {
            store_playlist(conn, a)?;
            a.id
        }
        Attachment::Graffiti(a) => {
            conn.execute(
                "INSERT INTO graffitis (id, owner_id) VALUES (?1, ?2)
                 ON CONFLICT(id) DO NOTHING",
                params![a.id, a.owner_id],
            )?;
            a.id
        }
        Attachment::MoneyRequest(a) => {
            conn.execute(
                "INSERT INTO money_requests (id, from_id, to_id, amount, currency)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO NOTHING",
                params![a.id, a.from_id, a.to_id, a.amount, a.currency],
            )?;
            a.id
        }
        Attachment::Story(a) => {
            conn.execute(
                "INSERT INTO stories (id, owner_id, date, expires_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO NOTHING",
                params![a.id, a.owner_id, a.date, a.expires_at],
            )?;
            a.id
        }
    };

    Ok(id)
}

fn store_audio(conn: &Connection, audio: &Audio) -> Result<bool, StoreError> {
    let inserted = conn.execute(
        "INSERT INTO audios (id, owner_id, artist, title, duration)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO NOTHING",
        params![
            audio.id,
            audio.owner_id,
            audio.artist,
            audio.title,
            audio.duration
        ],
    )?;
    Ok(inserted > 0)
}

/// Nested audios and their playlist links are written only together with a
/// new playlist row, so re-seen playlists add nothing.
fn store_playlist(conn: &Connection, playlist: &AudioPlaylist) -> Result<bool, StoreError> {
    let inserted = conn.execute(
        "INSERT INTO audio_playlists (id, owner_id, create_time, update_time, year, title,
                                      description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO NOTHING",
        params![
            playlist.id,
            playlist.owner_id,
            playlist.create_time,
            playlist.update_time,
            playlist.year,
            playlist.title,
            playlist.description,
        ],
    )?;
    if inserted == 0 {
        return Ok(false);
    }

    for (sequence, audio) in playlist.audios.iter().enumerate() {
        store_audio(conn, audio)?;
        conn.execute(
            "INSERT INTO audio_playlist_audios (audio_playlist_id, audio_id, sequence_number)
             VALUES (?1, ?2, ?3)",
            params![playlist.id, audio.id, sequence as i64],
        )?;
    }
    Ok(true)
}

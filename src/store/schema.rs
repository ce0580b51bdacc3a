// SPDX-License-Identifier: MPL-2.0

/// SQL schema for the archive database
pub const SCHEMA: &str = r#"
PRAGMA user_version = 1;

-- messages: top-level and forwarded copies alike, keyed by sender + conversation id
CREATE TABLE IF NOT EXISTS messages (
    from_id INTEGER NOT NULL,
    conversation_message_id INTEGER NOT NULL,
    id INTEGER,
    date INTEGER NOT NULL,
    important INTEGER NOT NULL,
    text TEXT NOT NULL,
    reply_conversation_message_id INTEGER,
    original_json TEXT NOT NULL,
    PRIMARY KEY (from_id, conversation_message_id)
);

CREATE INDEX IF NOT EXISTS idx_messages_from_id_date ON messages(from_id, date);

-- forwarded_messages: parent message -> forwarded copy, in forwarding order
CREATE TABLE IF NOT EXISTS forwarded_messages (
    message_from_id INTEGER NOT NULL,
    message_conversation_message_id INTEGER NOT NULL,
    forwarded_from_id INTEGER NOT NULL,
    forwarded_conversation_message_id INTEGER NOT NULL,
    sequence_number INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_forwarded_messages_message
    ON forwarded_messages(message_from_id, message_conversation_message_id);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER NOT NULL PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS photos (
    id INTEGER NOT NULL PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    date INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS videos (
    id INTEGER NOT NULL PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    date INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS audios (
    id INTEGER NOT NULL PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    artist TEXT NOT NULL,
    title TEXT NOT NULL,
    duration INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS documents (
    id INTEGER NOT NULL PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    date INTEGER NOT NULL,
    title TEXT NOT NULL,
    ext TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS links (
    id INTEGER NOT NULL PRIMARY KEY,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    caption TEXT,
    description TEXT
);

CREATE TABLE IF NOT EXISTS products (
    id INTEGER NOT NULL PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    price TEXT NOT NULL,
    currency TEXT NOT NULL,
    category_name TEXT,
    category_section TEXT
);

CREATE TABLE IF NOT EXISTS product_albums (
    id INTEGER NOT NULL PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    is_main INTEGER NOT NULL,
    is_hidden INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS posts (
    id INTEGER NOT NULL PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    from_id INTEGER NOT NULL,
    date INTEGER NOT NULL,
    text TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER NOT NULL PRIMARY KEY,
    from_id INTEGER NOT NULL,
    date INTEGER NOT NULL,
    text TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS stickers (
    id INTEGER NOT NULL PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS gifts (
    id INTEGER NOT NULL PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS calls (
    id INTEGER NOT NULL PRIMARY KEY,
    initiator_id INTEGER NOT NULL,
    receiver_id INTEGER NOT NULL,
    state TEXT NOT NULL,
    time INTEGER NOT NULL,
    duration INTEGER NOT NULL,
    video INTEGER NOT NULL
);

-- waveform: little-endian u16 samples
CREATE TABLE IF NOT EXISTS audio_messages (
    id INTEGER NOT NULL PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    duration INTEGER NOT NULL,
    waveform BLOB NOT NULL
);

CREATE TABLE IF NOT EXISTS audio_playlists (
    id INTEGER NOT NULL PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL,
    year INTEGER,
    title TEXT NOT NULL,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS audio_playlist_audios (
    audio_playlist_id INTEGER NOT NULL,
    audio_id INTEGER NOT NULL,
    sequence_number INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_audio_playlist_audios_playlist
    ON audio_playlist_audios(audio_playlist_id);

CREATE TABLE IF NOT EXISTS graffitis (
    id INTEGER NOT NULL PRIMARY KEY,
    owner_id INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS money_requests (
    id INTEGER NOT NULL PRIMARY KEY,
    from_id INTEGER NOT NULL,
    to_id INTEGER NOT NULL,
    amount TEXT NOT NULL,
    currency TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS stories (
    id INTEGER NOT NULL PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    date INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
);

-- message_attachments: message -> attachment row, in attachment order
CREATE TABLE IF NOT EXISTS message_attachments (
    message_from_id INTEGER NOT NULL,
    message_conversation_message_id INTEGER NOT NULL,
    sequence_number INTEGER NOT NULL,
    attachment_id INTEGER NOT NULL,
    attachment_type TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_message_attachments_message
    ON message_attachments(message_from_id, message_conversation_message_id);
"#;

/// Every table created by [`SCHEMA`]
pub const TABLES: [&str; 22] = [
    "messages",
    "forwarded_messages",
    "users",
    "photos",
    "videos",
    "audios",
    "documents",
    "links",
    "products",
    "product_albums",
    "posts",
    "comments",
    "stickers",
    "gifts",
    "calls",
    "audio_messages",
    "audio_playlists",
    "audio_playlist_audios",
    "graffitis",
    "money_requests",
    "stories",
    "message_attachments",
];

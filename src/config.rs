// SPDX-License-Identifier: MPL-2.0

use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "vkexport";

pub const API_HOST: &str = "api.vk.com";
pub const API_VERSION: &str = "5.199";

/// Number of messages requested per `messages.getHistory` page (the API maximum).
pub const PAGE_SIZE: u32 = 200;

pub const DATABASE_FILE: &str = "messages.db";

/// Validated settings for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub access_token: String,
    pub peer_id: i64,
    /// Root directory receiving the database and the media folders
    pub destination: PathBuf,
    pub show_progress: bool,
    pub api_host: String,
}

impl ExportConfig {
    pub fn new(access_token: impl Into<String>, peer_id: i64, destination: impl Into<PathBuf>) -> Self {
        Self {
            access_token: access_token.into(),
            peer_id,
            destination: destination.into(),
            show_progress: false,
            api_host: API_HOST.to_string(),
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    pub fn database_path(&self) -> PathBuf {
        self.destination.join(DATABASE_FILE)
    }

    /// Default destination: ~/.local/share/vkexport/{peer_id}
    pub fn default_destination(peer_id: i64) -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_NAME).join(peer_id.to_string()))
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

// SPDX-License-Identifier: MPL-2.0

mod download;
mod links;

pub use download::{DownloadSummary, MediaDownloader};
pub use links::{DocumentLink, MediaLinks};

use crate::api::ApiError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} exists and is not a directory")]
    NotADirectory(PathBuf),
    #[error("download failed: {0}")]
    Fetch(#[from] ApiError),
}

// SPDX-License-Identifier: MPL-2.0

//! Sequential media download into a per-kind directory layout.
//!
//! Every collected map is written to its own directory under the export
//! root as `<id>.<ext>`. Existing files are overwritten, so a re-run
//! refreshes media rather than skipping it.

use crate::api::Transport;
use crate::media::{MediaError, MediaLinks};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Files written per media directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub per_kind: BTreeMap<&'static str, usize>,
}

impl DownloadSummary {
    pub fn total(&self) -> usize {
        self.per_kind.values().sum()
    }
}

/// One file to fetch: target name inside the kind directory and its source.
struct Job<'l> {
    file_name: String,
    url: &'l str,
}

pub struct MediaDownloader<'a, T: Transport + ?Sized> {
    transport: &'a T,
    root: PathBuf,
    show_progress: bool,
}

impl<'a, T: Transport + ?Sized> MediaDownloader<'a, T> {
    pub fn new(transport: &'a T, root: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            root: root.into(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Download every collected link. The first failure aborts the pass.
    pub fn download_all(&self, links: &MediaLinks) -> Result<DownloadSummary, MediaError> {
        let mut summary = DownloadSummary::default();

        let passes: [(&'static str, Vec<Job<'_>>); 8] = [
            ("photos", png_jobs(&links.photos)),
            ("video_images", png_jobs(&links.video_images)),
            (
                "documents",
                links
                    .documents
                    .iter()
                    .map(|(id, doc)| Job {
                        file_name: document_file_name(*id, &doc.ext),
                        url: &doc.url,
                    })
                    .collect(),
            ),
            ("product_thumbs", png_jobs(&links.product_thumbs)),
            ("stickers", png_jobs(&links.stickers)),
            ("gifts", png_jobs(&links.gifts)),
            (
                "audio_messages",
                links
                    .audio_messages
                    .iter()
                    .map(|(id, url)| Job {
                        file_name: format!("{}.mp3", id),
                        url,
                    })
                    .collect(),
            ),
            ("graffitis", png_jobs(&links.graffitis)),
        ];

        for (kind, jobs) in passes {
            let written = self.run_pass(kind, &jobs)?;
            summary.per_kind.insert(kind, written);
        }

        info!("Downloaded {} media files", summary.total());
        Ok(summary)
    }

    fn run_pass(&self, kind: &str, jobs: &[Job<'_>]) -> Result<usize, MediaError> {
        let dir = self.root.join(kind);
        ensure_dir(&dir)?;

        let total = jobs.len();
        for (done, job) in jobs.iter().enumerate() {
            let data = self.transport.download(job.url)?;
            let path = dir.join(&job.file_name);
            fs::write(&path, &data).map_err(|source| MediaError::Io {
                path: path.clone(),
                source,
            })?;
            debug!("wrote {} ({} bytes)", path.display(), data.len());

            if self.show_progress {
                let n = done + 1;
                info!(
                    "Downloaded {}/{} {} ({}%)",
                    n,
                    total,
                    kind,
                    n * 100 / total
                );
            }
        }

        Ok(total)
    }
}

fn png_jobs(map: &BTreeMap<i64, String>) -> Vec<Job<'_>> {
    map.iter()
        .map(|(id, url)| Job {
            file_name: format!("{}.png", id),
            url,
        })
        .collect()
}

/// `<id>.<ext>`, or a bare `<id>` when the extension is empty or anything
/// but ASCII letters and digits.
fn document_file_name(id: i64, ext: &str) -> String {
    if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        format!("{}.{}", id, ext)
    } else {
        warn!("document {} has unusable extension {:?}, saving without one", id, ext);
        id.to_string()
    }
}

fn ensure_dir(dir: &Path) -> Result<(), MediaError> {
    if dir.exists() && !dir.is_dir() {
        return Err(MediaError::NotADirectory(dir.to_path_buf()));
    }
    fs::create_dir_all(dir).map_err(|source| MediaError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

// SPDX-License-Identifier: MPL-2.0

pub mod api;
pub mod config;
pub mod export;
pub mod media;
mod runtime;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ExportConfig;
pub use export::{ExportError, ExportSummary, Exporter};

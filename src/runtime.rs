// SPDX-License-Identifier: MPL-2.0

//! Shared async runtime for the blocking export pipeline.
//!
//! The HTTP client is async, while the pipeline itself is strictly sequential.
//! Every request is driven to completion on one shared Tokio runtime instead of
//! building a runtime per call.

use once_cell::sync::Lazy;
use std::future::Future;
use tokio::runtime::Runtime;

/// One worker is enough: at most one request is in flight at any time.
static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .thread_name("vkexport-io")
        .build()
        .expect("failed to create async runtime")
});

/// Execute a future on the shared runtime, blocking until completion.
pub fn block_on<F: Future>(future: F) -> F::Output {
    RUNTIME.block_on(future)
}

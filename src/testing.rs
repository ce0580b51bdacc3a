// SPDX-License-Identifier: MPL-2.0

//! Scripted transport used by unit tests.

use crate::api::{ApiError, Params, Transport};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// Replays queued API responses in order and serves downloads from a map.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<String>>,
    files: HashMap<String, Vec<u8>>,
    calls: RefCell<Vec<(String, Params)>>,
    downloads: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: impl Into<String>) -> Self {
        self.responses.borrow_mut().push_back(body.into());
        self
    }

    pub fn serve(mut self, url: &str, data: &[u8]) -> Self {
        self.files.insert(url.to_string(), data.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<(String, Params)> {
        self.calls.borrow().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.downloads.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn call(&self, method: &str, params: &Params) -> Result<Vec<u8>, ApiError> {
        self.calls
            .borrow_mut()
            .push((method.to_string(), params.clone()));
        self.responses
            .borrow_mut()
            .pop_front()
            .map(String::into_bytes)
            .ok_or_else(|| ApiError::Network {
                url: method.to_string(),
                message: "no scripted response left".to_string(),
            })
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.downloads.borrow_mut().push(url.to_string());
        self.files.get(url).cloned().ok_or_else(|| ApiError::Network {
            url: url.to_string(),
            message: "404 Not Found".to_string(),
        })
    }
}

// SPDX-License-Identifier: MPL-2.0

//! Path-tracking view over a parsed JSON tree.
//!
//! Every accessor that fails reports the full field path it was looking at
//! (for example `items[3].attachments[0].photo.orig_photo.url`), so a broken
//! page can be traced back to the offending value.

use crate::api::ApiError;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    pub fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: String::new(),
        }
    }

    pub fn with_path(value: &'a Value, path: impl Into<String>) -> Self {
        Self {
            value,
            path: path.into(),
        }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn invalid(&self, expected: &'static str) -> ApiError {
        ApiError::InvalidField {
            path: self.path.clone(),
            expected,
        }
    }

    /// Whether the object has a non-null value under `key`
    pub fn has(&self, key: &str) -> bool {
        self.value.get(key).is_some_and(|v| !v.is_null())
    }

    pub fn field(&self, key: &str) -> Result<Node<'a>, ApiError> {
        self.opt_field(key).ok_or_else(|| ApiError::MissingField {
            path: self.child_path(key),
        })
    }

    /// Optional member; `null` counts as absent
    pub fn opt_field(&self, key: &str) -> Option<Node<'a>> {
        match self.value.get(key) {
            Some(Value::Null) | None => None,
            Some(value) => Some(Node {
                value,
                path: self.child_path(key),
            }),
        }
    }

    /// Elements of an array, each carrying its indexed path
    pub fn items(&self) -> Result<Vec<Node<'a>>, ApiError> {
        let array = self.value.as_array().ok_or_else(|| self.invalid("array"))?;
        Ok(array
            .iter()
            .enumerate()
            .map(|(i, value)| Node {
                value,
                path: format!("{}[{}]", self.path, i),
            })
            .collect())
    }

    pub fn is_object(&self) -> bool {
        self.value.is_object()
    }

    pub fn as_i64(&self) -> Result<i64, ApiError> {
        self.value.as_i64().ok_or_else(|| self.invalid("integer"))
    }

    pub fn as_u16(&self) -> Result<u16, ApiError> {
        self.value
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .ok_or_else(|| self.invalid("integer in 0..=65535"))
    }

    pub fn as_str(&self) -> Result<&'a str, ApiError> {
        self.value.as_str().ok_or_else(|| self.invalid("string"))
    }

    /// Booleans arrive both as JSON booleans and as 0/1 integers
    pub fn as_bool(&self) -> Result<bool, ApiError> {
        match self.value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(self.invalid("boolean")),
            },
            _ => Err(self.invalid("boolean")),
        }
    }

    /// A string, or a number rendered as text (amounts use both shapes)
    pub fn as_text(&self) -> Result<String, ApiError> {
        match self.value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(self.invalid("string or number")),
        }
    }

    pub fn i64(&self, key: &str) -> Result<i64, ApiError> {
        self.field(key)?.as_i64()
    }

    pub fn string(&self, key: &str) -> Result<String, ApiError> {
        Ok(self.field(key)?.as_str()?.to_string())
    }

    pub fn bool(&self, key: &str) -> Result<bool, ApiError> {
        self.field(key)?.as_bool()
    }

    pub fn opt_i64(&self, key: &str) -> Result<Option<i64>, ApiError> {
        self.opt_field(key).map(|n| n.as_i64()).transpose()
    }

    pub fn opt_string(&self, key: &str) -> Result<Option<String>, ApiError> {
        self.opt_field(key)
            .map(|n| n.as_str().map(str::to_string))
            .transpose()
    }
}

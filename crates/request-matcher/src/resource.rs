//! Bundled fixture resources.
//!
//! Resources are files below a fixtures root directory, addressed by a
//! relative logical name such as `body.json` or `images/screenshot.png`.
//! Payloads are returned byte-for-byte; the content type is inferred from
//! the file extension.

use crate::error::ResourceError;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Content type used for any extension missing from [`CONTENT_TYPES`].
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Extension (lower-cased, without dot) to content type.
pub const CONTENT_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("pdf", "application/pdf"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
];

/// Infer a content type from a resource name.
pub fn content_type_for(name: &str) -> &'static str {
    let Some(extension) = Path::new(name).extension().and_then(|e| e.to_str()) else {
        return DEFAULT_CONTENT_TYPE;
    };
    let extension = extension.to_ascii_lowercase();

    CONTENT_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Replace `${key}` placeholders with the given values.
///
/// Placeholders without a value are left untouched.
pub fn render_template(text: &str, values: &BTreeMap<String, String>) -> String {
    let mut rendered = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match values.get(key) {
                    Some(value) => rendered.push_str(value),
                    None => rendered.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                rendered.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    rendered.push_str(rest);
    rendered
}

/// A resolved resource payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub bytes: Bytes,
    pub content_type: &'static str,
}

/// Resolves logical resource names below a fixtures root.
#[derive(Debug, Clone)]
pub struct FixtureResources {
    root: PathBuf,
}

impl FixtureResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a logical name to its file path, rejecting names that would
    /// escape the root.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, ResourceError> {
        let relative = Path::new(name);
        let is_plain = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !is_plain {
            return Err(ResourceError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Fail early when a resource does not exist.
    pub fn ensure_exists(&self, name: &str) -> Result<(), ResourceError> {
        let path = self.path_for(name)?;
        if path.is_file() {
            Ok(())
        } else {
            Err(ResourceError::NotFound {
                name: name.to_string(),
                path,
            })
        }
    }

    /// Read a resource's raw bytes.
    pub fn read_binary(&self, name: &str) -> Result<Vec<u8>, ResourceError> {
        let path = self.path_for(name)?;
        std::fs::read(&path).map_err(|source| Self::io_error(name, path, source))
    }

    /// Read a resource and infer its content type.
    pub fn resolve(&self, name: &str) -> Result<Resource, ResourceError> {
        let bytes = self.read_binary(name)?;
        Ok(Resource {
            bytes: Bytes::from(bytes),
            content_type: content_type_for(name),
        })
    }

    /// Async variant of [`resolve`](Self::resolve) used while serving requests.
    pub async fn resolve_async(&self, name: &str) -> Result<Resource, ResourceError> {
        let path = self.path_for(name)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| Self::io_error(name, path, source))?;
        Ok(Resource {
            bytes: Bytes::from(bytes),
            content_type: content_type_for(name),
        })
    }

    fn io_error(name: &str, path: PathBuf, source: std::io::Error) -> ResourceError {
        if source.kind() == std::io::ErrorKind::NotFound {
            ResourceError::NotFound {
                name: name.to_string(),
                path,
            }
        } else {
            ResourceError::Io {
                name: name.to_string(),
                source,
            }
        }
    }
}

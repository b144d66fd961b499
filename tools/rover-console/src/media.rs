//! Decoded image storage.
//!
//! The terminal cannot paint raster images, so map and snapshot payloads are
//! decoded and written to a media directory where an image viewer can open them.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rover_telemetry::log_event;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Invalid image payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Empty image payload")]
    Empty,

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Snapshot,
    Map,
}

impl ImageKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ImageKind::Snapshot => "snapshot.jpg",
            ImageKind::Map => "map.png",
        }
    }
}

/// A decoded image on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, kind: ImageKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Decode `payload` and overwrite the file for `kind`.
    pub async fn save(&self, kind: ImageKind, payload: &str) -> Result<SavedImage, MediaError> {
        let bytes = decode_payload(payload)?;
        let path = self.path_for(kind);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| MediaError::Write {
                path: self.dir.clone(),
                source,
            })?;
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| MediaError::Write {
                path: path.clone(),
                source,
            })?;

        log_event!(debug, "panels", "Image saved", path = %path.display(), bytes = bytes.len());
        Ok(SavedImage {
            path,
            bytes: bytes.len(),
        })
    }
}

/// Plain base64, optionally wrapped in a `data:` URL.
fn decode_payload(payload: &str) -> Result<Vec<u8>, MediaError> {
    let data = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };
    let data = data.trim();
    if data.is_empty() {
        return Err(MediaError::Empty);
    }
    Ok(STANDARD.decode(data)?)
}

//! Local storage for uploaded product images.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use actix_multipart::form::tempfile::TempFile;
use thiserror::Error;
use uuid::Uuid;

/// URL prefix under which stored images are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Errors raised while storing an uploaded image.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("`{0}` is not an image")]
    NotAnImage(String),
    #[error("failed to store upload: {0}")]
    Io(#[from] io::Error),
}

/// Copies uploaded images into a directory served under [`UPLOADS_URL_PREFIX`].
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Use `dir` for stored images, creating it when missing.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Store an uploaded file and return its public URL.
    ///
    /// Empty parts (a file input left blank) yield `Ok(None)`.
    pub fn save(&self, upload: &TempFile) -> Result<Option<String>, StorageError> {
        if upload.size == 0 {
            return Ok(None);
        }

        let original_name = upload.file_name.clone().unwrap_or_default();
        let is_image = upload
            .content_type
            .as_ref()
            .is_none_or(|content_type| content_type.type_().as_str() == "image");
        if !is_image {
            return Err(StorageError::NotAnImage(original_name));
        }

        let extension = image_extension(&original_name);
        let file_name = format!("{}.{extension}", Uuid::new_v4());
        fs::copy(upload.file.path(), self.dir.join(&file_name))?;

        log::info!("Stored upload `{original_name}` as {file_name}");

        Ok(Some(format!("{UPLOADS_URL_PREFIX}/{file_name}")))
    }

    /// Store every upload in order, skipping empty parts.
    pub fn save_all(&self, uploads: &[TempFile]) -> Result<Vec<String>, StorageError> {
        let mut urls = Vec::with_capacity(uploads.len());
        for upload in uploads {
            if let Some(url) = self.save(upload)? {
                urls.push(url);
            }
        }
        Ok(urls)
    }
}

fn image_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|ch| ch.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| "img".to_string())
}

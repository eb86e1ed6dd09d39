//! Where receipt payloads come from.
//!
//! The real producer is an image upload to the extraction service, which
//! lives outside this workspace. Anything that can eventually hand back a
//! [`ReceiptData`] (or fail) implements [`ReceiptSource`].

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::data::ReceiptData;
use crate::error::ReceiptError;

pub trait ReceiptSource {
    /// Produce one receipt payload.
    fn fetch(&mut self) -> Result<ReceiptData, ReceiptError>;
}

/// Reads a JSON payload previously saved from the extraction service.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReceiptSource for JsonFileSource {
    fn fetch(&mut self) -> Result<ReceiptData, ReceiptError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| ReceiptError::Io {
            path: self.path.clone(),
            source,
        })?;
        let data = ReceiptData::from_json_str(&raw)?;
        tracing::info!(
            path = %self.path.display(),
            products = data.products.len(),
            "receipt loaded"
        );
        Ok(data)
    }
}

/// Reads a JSON payload from any reader (stdin, a socket, a buffer).
///
/// The reader is consumed by the first fetch; later fetches fail.
#[derive(Debug)]
pub struct JsonReaderSource<R> {
    reader: Option<R>,
}

impl<R: Read> JsonReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
        }
    }
}

impl<R: Read> ReceiptSource for JsonReaderSource<R> {
    fn fetch(&mut self) -> Result<ReceiptData, ReceiptError> {
        let reader = self
            .reader
            .take()
            .ok_or_else(|| ReceiptError::Unavailable("reader already consumed".to_string()))?;
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Hands out a fixed payload; an empty receipt by default.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    data: ReceiptData,
}

impl StaticSource {
    pub fn new(data: ReceiptData) -> Self {
        Self { data }
    }
}

impl ReceiptSource for StaticSource {
    fn fetch(&mut self) -> Result<ReceiptData, ReceiptError> {
        Ok(self.data.clone())
    }
}

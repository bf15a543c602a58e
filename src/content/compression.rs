//! Compression format detection and transparent decompression.
//!
//! Compressed inputs are detected by magic number (falling back to the file
//! extension) and decompressed up front: small archives into memory, large ones
//! into a temporary file that is then memory mapped.

use crate::content::{Content, MappedContent, MemoryContent};
use crate::error::{PagerError, Result};
use async_compression::tokio::bufread::{BzDecoder, GzipDecoder, XzDecoder, ZstdDecoder};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};

/// Compressed archives at or above this size are decompressed to disk.
const MEMORY_THRESHOLD: u64 = 10_000_000;

/// Supported compression formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// No compression - plain text file
    None,
    /// Gzip compression (.gz files)
    Gzip,
    /// Bzip2 compression (.bz2 files)
    Bzip2,
    /// XZ compression (.xz files)
    Xz,
    /// Zstandard compression (.zst, .zstd files)
    Zstd,
}

impl CompressionType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    pub fn is_compressed(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Detect compression type from magic numbers, then from the extension.
///
/// - Gzip: `1f 8b`
/// - Bzip2: `42 5a 68` ("BZh")
/// - XZ: `fd 37 7a 58 5a 00`
/// - Zstd: `28 b5 2f fd`
pub async fn detect_compression(path: &Path) -> Result<CompressionType> {
    if let Ok(mut file) = File::open(path).await {
        let mut buffer = [0u8; 8];
        let bytes_read = file.read(&mut buffer).await.unwrap_or(0);

        if let Some(format) = detect_by_magic(&buffer[..bytes_read]) {
            return Ok(format);
        }
    }

    Ok(detect_by_extension(path).unwrap_or(CompressionType::None))
}

fn detect_by_magic(magic: &[u8]) -> Option<CompressionType> {
    if magic.starts_with(&[0x1f, 0x8b]) {
        Some(CompressionType::Gzip)
    } else if magic.starts_with(&[0x42, 0x5a, 0x68]) {
        Some(CompressionType::Bzip2)
    } else if magic.starts_with(&[0x28, 0xb5, 0x2f, 0xfd]) {
        Some(CompressionType::Zstd)
    } else if magic.starts_with(&[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00]) {
        Some(CompressionType::Xz)
    } else {
        None
    }
}

fn detect_by_extension(path: &Path) -> Option<CompressionType> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "gz" => Some(CompressionType::Gzip),
        "bz2" => Some(CompressionType::Bzip2),
        "xz" => Some(CompressionType::Xz),
        "zst" | "zstd" => Some(CompressionType::Zstd),
        _ => None,
    }
}

/// Decompress `path` into a content source.
pub async fn decompress(path: &Path, compression: CompressionType) -> Result<Arc<dyn Content>> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unnamed>")
        .to_string();

    let compressed_size = tokio::fs::metadata(path)
        .await
        .map_err(|e| PagerError::file_error("Failed to read compressed file metadata", e))?
        .len();

    if compressed_size < MEMORY_THRESHOLD {
        let data = decompress_to_memory(path, compression).await?;
        Ok(Arc::new(MemoryContent::named(data, name)))
    } else {
        let temp_file = decompress_to_temp_file(path, compression).await?;
        Ok(Arc::new(MappedContent::from_temp_file(temp_file, name)?))
    }
}

async fn open_decoder(
    path: &Path,
    compression: CompressionType,
) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
    let file = File::open(path)
        .await
        .map_err(|e| PagerError::file_error("Failed to open compressed file", e))?;
    let file = BufReader::new(file);

    let decoder: Box<dyn AsyncRead + Unpin + Send> = match compression {
        CompressionType::Gzip => Box::new(GzipDecoder::new(file)),
        CompressionType::Bzip2 => Box::new(BzDecoder::new(file)),
        CompressionType::Xz => Box::new(XzDecoder::new(file)),
        CompressionType::Zstd => Box::new(ZstdDecoder::new(file)),
        CompressionType::None => {
            return Err(PagerError::compression(format!(
                "{} is not compressed",
                path.display()
            )))
        }
    };
    Ok(decoder)
}

async fn decompress_to_memory(path: &Path, compression: CompressionType) -> Result<Vec<u8>> {
    let mut decoder = open_decoder(path, compression).await?;
    let mut data = Vec::new();
    decoder
        .read_to_end(&mut data)
        .await
        .map_err(|e| PagerError::file_error("Failed to decompress file", e))?;
    Ok(data)
}

async fn decompress_to_temp_file(
    path: &Path,
    compression: CompressionType,
) -> Result<NamedTempFile> {
    let mut decoder = open_decoder(path, compression).await?;

    let temp_file =
        NamedTempFile::new().map_err(|e| PagerError::file_error("Failed to create temp file", e))?;
    let handle = tokio::fs::File::create(temp_file.path())
        .await
        .map_err(|e| PagerError::file_error("Failed to open temp file for writing", e))?;
    let mut writer = BufWriter::new(handle);

    tokio::io::copy(&mut decoder, &mut writer)
        .await
        .map_err(|e| PagerError::file_error("Failed to decompress file", e))?;
    writer
        .flush()
        .await
        .map_err(|e| PagerError::file_error("Failed to flush temp file", e))?;

    Ok(temp_file)
}

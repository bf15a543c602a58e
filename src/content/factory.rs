//! Content construction from a command-line path or standard input.

use crate::content::compression::decompress;
use crate::content::validation::validate_file_path;
use crate::content::{detect_compression, Content, FileContent, StreamContent};
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// Open `path` as a content source.
///
/// Plain files are read in place so growth is visible; compressed files are
/// decompressed first and therefore static.
pub async fn open_content(path: &Path) -> Result<Arc<dyn Content>> {
    validate_file_path(path)?;

    let compression = detect_compression(path).await?;
    if compression.is_compressed() {
        return decompress(path, compression).await;
    }

    Ok(Arc::new(FileContent::open(path)?))
}

/// Start collecting standard input into a growing buffer.
pub fn open_stdin() -> Arc<dyn Content> {
    let content = StreamContent::new();
    // The collector runs until the pipe closes; nothing waits for it.
    let _collector = content.spawn_collector(std::io::stdin());
    Arc::new(content)
}

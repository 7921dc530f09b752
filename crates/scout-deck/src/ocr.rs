//! OCR of slide screenshots via an external binary (spec §4.4 CONTENT/ITERATE).
//!
//! Grounded on `docsend_client.py`'s `_perform_ocr_on_image`, which shells
//! out to `pytesseract` (itself a wrapper over the `tesseract` binary).
//! Rather than bind a native OCR crate, the original's externally-invoked
//! binary shape is kept directly: the binary path comes from `OCR_BINARY`
//! (default `tesseract`), invoked against a temp PNG with stdout-to-stdout
//! mode (`tesseract <file> stdout`).

use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

fn ocr_binary() -> String {
    std::env::var("OCR_BINARY").unwrap_or_else(|_| "tesseract".to_string())
}

/// Run OCR on a PNG screenshot, returning the extracted, trimmed text.
/// An empty string (not an error) on non-fatal OCR failures mirrors the
/// original's "log and return empty" behavior; process-spawn failures do
/// propagate, since those indicate a missing OCR toolchain rather than an
/// unreadable image.
pub async fn ocr_png(png_bytes: &[u8]) -> Result<String, std::io::Error> {
    let dir = tempfile::tempdir()?;
    let image_path = dir.path().join("slide.png");
    write_temp_png(&image_path, png_bytes).await?;

    let output = Command::new(ocr_binary()).arg(&image_path).arg("stdout").output().await?;

    if !output.status.success() {
        tracing::warn!(status = ?output.status, "OCR binary exited non-zero");
        return Ok(String::new());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

async fn write_temp_png(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await
}

use std::path::Path;
use std::path::PathBuf;

use tokio::fs;
use tracing::info;
use tracing::warn;

use crate::exception::Exception;
use crate::exception::Result;
use crate::request::OutputFormat;
use crate::synthesize::SynthesisResult;

/// `base` is the file name without extension, the extension follows the format.
pub fn output_path(base: &Path, format: OutputFormat) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(".");
    path.push(format.extension());
    PathBuf::from(path)
}

pub async fn write(result: &SynthesisResult, base: &Path, format: OutputFormat) -> Result<PathBuf> {
    if result.format != format {
        warn!("audio format differs from requested, audio={}, requested={format}", result.format);
    }

    let path = output_path(base, format);
    fs::write(&path, &result.audio)
        .await
        .map_err(|err| Exception::Io(format!("failed to write audio, path={}, error={err}", path.to_string_lossy())))?;
    info!("write audio file, path={}, bytes={}", path.to_string_lossy(), result.audio.len());
    Ok(path)
}

//! Sequential grayscale video copy over ffmpeg pipes.
//!
//! The source is probed first, then decoded frame by frame, converted to
//! single-channel intensity and re-encoded as H.264 at the source geometry
//! and frame rate.

pub mod frames;
pub mod gray;
pub mod probe;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use frames::{FrameReader, FrameWriter};

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("could not open video {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },
    #[error("could not write video {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
    #[error("{0}")]
    Unexpected(String),
}

/// Writes a single-channel copy of `src` next to it and returns its path.
///
/// Frame count, order, geometry and frame rate are preserved; only pixel
/// intensity changes. An existing output with the same name is overwritten.
/// The probe runs before the encoder is spawned, so a source that cannot be
/// opened never leaves an output file behind.
pub fn grayscale_copy(src: &Path) -> Result<PathBuf, TranscodeError> {
    let meta = probe::video_meta(src)?;
    let out = processed_path(src);
    debug!(
        "Transcoding {} ({}x{} @ {}) to {}",
        src.display(),
        meta.width,
        meta.height,
        meta.fps,
        out.display()
    );

    let mut reader = FrameReader::spawn(src)?;
    let mut writer = FrameWriter::spawn(&out, &meta)?;
    let mut bgr = vec![0u8; meta.frame_len_bgr()];
    let mut gray = vec![0u8; meta.frame_len_gray()];

    while reader.next_frame(&mut bgr)? {
        gray::gray_frame(&bgr, &mut gray);
        writer.write_frame(&gray)?;
    }

    reader.finish()?;
    writer.finish()?;
    Ok(out)
}

/// Output name: source stem plus `_processed.mp4`, in the source's directory.
pub fn processed_path(src: &Path) -> PathBuf {
    let stem = src
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    src.with_file_name(format!("{stem}_processed.mp4"))
}

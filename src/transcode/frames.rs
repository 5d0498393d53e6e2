use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use super::TranscodeError;
use super::probe::VideoMeta;

/// Streams decoded BGR frames out of an ffmpeg child process.
pub struct FrameReader {
    child: Child,
    stdout: Option<ChildStdout>,
    src: PathBuf,
}

impl FrameReader {
    pub fn spawn(src: &Path) -> Result<Self, TranscodeError> {
        let mut child = Command::new("ffmpeg")
            .arg("-v")
            .arg("error")
            .arg("-i")
            .arg(src)
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("bgr24")
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| TranscodeError::Open {
                path: src.to_path_buf(),
                reason: format!("ffmpeg: {e}"),
            })?;

        let stdout = child.stdout.take();
        Ok(Self {
            child,
            stdout,
            src: src.to_path_buf(),
        })
    }

    /// Fills `frame` with the next frame. Returns `Ok(false)` on a clean end
    /// of stream; a partially delivered frame is an error.
    pub fn next_frame(&mut self, frame: &mut [u8]) -> Result<bool, TranscodeError> {
        let stdout = self.stdout.as_mut().ok_or_else(|| {
            TranscodeError::Unexpected(format!(
                "decoder output unavailable for {}",
                self.src.display()
            ))
        })?;

        let mut filled = 0;
        while filled < frame.len() {
            let n = stdout.read(&mut frame[filled..]).map_err(|e| {
                TranscodeError::Unexpected(format!(
                    "reading decoded frame from {}: {e}",
                    self.src.display()
                ))
            })?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        match filled {
            0 => Ok(false),
            n if n == frame.len() => Ok(true),
            n => Err(TranscodeError::Unexpected(format!(
                "truncated frame from {}: {n} of {} bytes",
                self.src.display(),
                frame.len()
            ))),
        }
    }

    /// Reaps the decoder after the stream has been drained.
    pub fn finish(mut self) -> Result<(), TranscodeError> {
        drop(self.stdout.take());
        let status = self.child.wait().map_err(|e| {
            TranscodeError::Unexpected(format!("waiting on decoder for {}: {e}", self.src.display()))
        })?;
        if !status.success() {
            return Err(TranscodeError::Unexpected(format!(
                "decoder exited with {status} for {}",
                self.src.display()
            )));
        }
        Ok(())
    }
}

impl Drop for FrameReader {
    fn drop(&mut self) {
        drop(self.stdout.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Feeds single-channel frames into an ffmpeg H.264 encoder.
pub struct FrameWriter {
    child: Child,
    stdin: Option<ChildStdin>,
    out: PathBuf,
}

impl FrameWriter {
    pub fn spawn(out: &Path, meta: &VideoMeta) -> Result<Self, TranscodeError> {
        let mut child = Command::new("ffmpeg")
            .arg("-v")
            .arg("error")
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("gray")
            .arg("-video_size")
            .arg(format!("{}x{}", meta.width, meta.height))
            .arg("-framerate")
            .arg(meta.fps.to_string())
            .arg("-i")
            .arg("-")
            .arg("-c:v")
            .arg("libx264")
            .arg("-pix_fmt")
            .arg("gray")
            .arg("-y")
            .arg(out)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| TranscodeError::Write {
                path: out.to_path_buf(),
                reason: format!("ffmpeg: {e}"),
            })?;

        let stdin = child.stdin.take();
        Ok(Self {
            child,
            stdin,
            out: out.to_path_buf(),
        })
    }

    pub fn write_frame(&mut self, frame: &[u8]) -> Result<(), TranscodeError> {
        let stdin = self.stdin.as_mut().ok_or_else(|| TranscodeError::Write {
            path: self.out.clone(),
            reason: "encoder input closed".to_string(),
        })?;
        stdin.write_all(frame).map_err(|e| TranscodeError::Write {
            path: self.out.clone(),
            reason: e.to_string(),
        })
    }

    /// Closes the encoder's input so it can flush, then reaps it.
    pub fn finish(mut self) -> Result<(), TranscodeError> {
        drop(self.stdin.take());
        let status = self.child.wait().map_err(|e| TranscodeError::Write {
            path: self.out.clone(),
            reason: format!("waiting on encoder: {e}"),
        })?;
        if !status.success() {
            return Err(TranscodeError::Write {
                path: self.out.clone(),
                reason: format!("encoder exited with {status}"),
            });
        }
        Ok(())
    }
}

impl Drop for FrameWriter {
    fn drop(&mut self) {
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

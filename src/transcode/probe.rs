use std::fmt;
use std::path::Path;
use std::process::Command;

use super::TranscodeError;

/// Geometry and frame rate of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoMeta {
    pub width: u32,
    pub height: u32,
    pub fps: Rate,
}

impl VideoMeta {
    pub fn frame_len_bgr(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    pub fn frame_len_gray(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Frame rate kept exact as reported by the container, e.g. 30000/1001.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    pub num: u32,
    pub den: u32,
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Probes `path` with ffprobe. Any failure here means the source cannot be
/// opened as a video.
pub fn video_meta(path: &Path) -> Result<VideoMeta, TranscodeError> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("v:0")
        .arg("-show_entries")
        .arg("stream=width,height,r_frame_rate")
        .arg("-of")
        .arg("csv=p=0")
        .arg(path)
        .output()
        .map_err(|e| TranscodeError::Open {
            path: path.to_path_buf(),
            reason: format!("ffprobe: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = match stderr.trim() {
            "" => format!("ffprobe exited with {}", output.status),
            err => err.to_string(),
        };
        return Err(TranscodeError::Open {
            path: path.to_path_buf(),
            reason,
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_meta(&stdout).ok_or_else(|| TranscodeError::Open {
        path: path.to_path_buf(),
        reason: format!("no usable video stream properties in {:?}", stdout.trim()),
    })
}

fn parse_meta(line: &str) -> Option<VideoMeta> {
    let mut parts = line.trim().split(',');
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    let fps = parse_rate(parts.next()?)?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(VideoMeta { width, height, fps })
}

fn parse_rate(raw: &str) -> Option<Rate> {
    let raw = raw.trim();
    let (num, den) = match raw.split_once('/') {
        Some((num, den)) => (num.parse().ok()?, den.parse().ok()?),
        None => (raw.parse().ok()?, 1),
    };
    if num == 0 || den == 0 {
        return None;
    }
    Some(Rate { num, den })
}

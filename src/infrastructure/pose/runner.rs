use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::config::settings::PoseConfig;

const OUTPUT_NAME: &str = "openpose_output.avi";

#[derive(Debug, Error)]
pub enum PoseError {
    #[error("could not launch {bin}: {reason}")]
    Launch { bin: String, reason: String },
    #[error("{bin} exited with {status}")]
    Failed {
        bin: String,
        status: std::process::ExitStatus,
    },
}

/// Runs the external pose-estimation binary over a stored video. The outcome
/// is logged by the caller and never reaches the HTTP response.
#[derive(Clone)]
pub struct PoseRunner {
    config: PoseConfig,
}

impl PoseRunner {
    pub fn new(config: PoseConfig) -> Self {
        Self { config }
    }

    pub fn output_path(&self) -> PathBuf {
        self.config.output_dir.join(OUTPUT_NAME)
    }

    /// Blocks until the binary exits; non-zero exit is an error.
    pub fn annotate(&self, video: &Path) -> Result<PathBuf, PoseError> {
        let output = self.output_path();
        let bin = self.config.binary.display().to_string();

        let status = Command::new(&self.config.binary)
            .args(command_args(video, &output))
            .status()
            .map_err(|e| PoseError::Launch {
                bin: bin.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(PoseError::Failed { bin, status });
        }
        Ok(output)
    }
}

fn command_args(video: &Path, output: &Path) -> Vec<OsString> {
    vec![
        OsString::from("--video"),
        video.as_os_str().to_os_string(),
        OsString::from("--write_video"),
        output.as_os_str().to_os_string(),
    ]
}

use std::path::PathBuf;

use serde::Deserialize;

use crate::config::env::{self, EnvKey};

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub upload_dir: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub log_file: PathBuf,
    pub pose: Option<PoseConfig>,
}

/// External pose-estimation binary; the step only runs when `OPENPOSE_BIN`
/// is set.
#[derive(Clone, Debug, Deserialize)]
pub struct PoseConfig {
    pub binary: PathBuf,
    pub output_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            upload_dir: env::get_or(EnvKey::UploadDir, "uploads").into(),
            allowed_extensions: parse_extensions(&env::get_or(
                EnvKey::AllowedExtensions,
                "mp4,avi,mov",
            )),
            log_file: env::get_or(EnvKey::LogFile, "app.log").into(),
            pose: env::get(EnvKey::PoseBinary).ok().map(|bin| PoseConfig {
                binary: bin.into(),
                output_dir: env::get_or(EnvKey::PoseOutputDir, "openpose_output").into(),
            }),
        }
    }

    /// Checks the substring after the last `.` against the allow-list,
    /// case-insensitively.
    pub fn allows_extension(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .map(|(_, ext)| {
                self.allowed_extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

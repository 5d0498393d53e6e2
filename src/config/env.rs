use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    UploadDir,
    AllowedExtensions,
    LogFile,
    PoseBinary,
    PoseOutputDir,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::UploadDir => "UPLOAD_DIR",
            EnvKey::AllowedExtensions => "ALLOWED_EXTENSIONS",
            EnvKey::LogFile => "LOG_FILE",
            EnvKey::PoseBinary => "OPENPOSE_BIN",
            EnvKey::PoseOutputDir => "OPENPOSE_OUTPUT_DIR",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

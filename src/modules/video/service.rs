use std::path::PathBuf;

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::{error, info};

use crate::infrastructure::pose::runner::PoseRunner;
use crate::state::AppState;
use crate::transcode::{self, TranscodeError};

pub struct VideoService;

/// What ingestion left on disk: the stored original and the result of the
/// grayscale pass over it.
pub struct IngestOutcome {
    pub source: PathBuf,
    pub processed: Result<PathBuf, TranscodeError>,
}

impl VideoService {
    /// Persists the upload, runs the grayscale pass over it and, when
    /// configured, hands the stored file to the pose binary. The whole
    /// pipeline is blocking and runs in one piece off the async runtime, so
    /// the request stays strictly sequential.
    pub async fn ingest(state: AppState, file_name: String, data: Bytes) -> Result<IngestOutcome> {
        let storage = state.storage.clone();
        let pose = state.config.pose.clone().map(PoseRunner::new);

        tokio::task::spawn_blocking(move || {
            let source = storage.store(&file_name, &data)?;
            info!("Stored upload at {}", source.display());

            let processed = transcode::grayscale_copy(&source);

            if let Some(runner) = pose {
                match runner.annotate(&source) {
                    Ok(path) => info!("Pose annotation written to {}", path.display()),
                    Err(e) => error!("Error processing video with OpenPose: {}", e),
                }
            }

            Ok(IngestOutcome { source, processed })
        })
        .await
        .context("ingest task panicked")?
    }
}

use crate::error::{ApiError, ProcessError};
use crate::services::image_codec::{decode_image, encode_png};
use photo_restore::{PixelBuffer, RestoreOptions, Restorer};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinError;

/// A processed image ready to send or store.
#[derive(Debug, Clone)]
pub struct Restored {
    /// Encoded PNG
    pub png: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// Runs decode, restoration and PNG encoding off the async runtime.
pub struct RestoreService {
    restorer: Arc<Restorer>,
}

impl RestoreService {
    pub fn new(options: RestoreOptions) -> Result<Self, ProcessError> {
        Ok(Self {
            restorer: Arc::new(Restorer::with_options(options)?),
        })
    }

    pub fn options(&self) -> &RestoreOptions {
        self.restorer.options()
    }

    /// Decode `bytes`, restore with `mode` and encode the result as PNG.
    ///
    /// Uses spawn_blocking so the CPU-heavy filters never stall the runtime.
    pub async fn restore_bytes(&self, bytes: Vec<u8>, mode: String) -> Result<Restored, ApiError> {
        let restorer = self.restorer.clone();

        let restored = tokio::task::spawn_blocking(move || {
            let buffer = decode_image(&bytes)?;
            restore_buffer(&restorer, &buffer, &mode)
        })
        .await
        .map_err(task_failed)??;

        Ok(restored)
    }
}

fn task_failed(e: JoinError) -> ApiError {
    tracing::error!(error = %e, "Restore task did not complete");
    ApiError::Internal(format!("Task error: {e}"))
}

/// Restore an already decoded buffer and encode it.
pub fn restore_buffer(
    restorer: &Restorer,
    buffer: &PixelBuffer,
    mode: &str,
) -> Result<Restored, ProcessError> {
    let started = Instant::now();
    let output = restorer.process(buffer, mode)?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let (width, height) = output.dimensions();
    tracing::info!(
        mode,
        input_width = buffer.width(),
        input_height = buffer.height(),
        width,
        height,
        elapsed_ms,
        "Image restored"
    );

    Ok(Restored {
        png: encode_png(&output)?,
        width,
        height,
    })
}

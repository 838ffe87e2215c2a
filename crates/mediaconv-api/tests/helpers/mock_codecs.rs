//! Audio transcoder fakes standing in for ffmpeg.

use async_trait::async_trait;
use mediaconv_core::AudioFormat;
use mediaconv_processing::{AudioTranscoder, ConversionError};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Copies input to output unchanged
pub struct CopyTranscoder;

#[async_trait]
impl AudioTranscoder for CopyTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        _target: AudioFormat,
    ) -> Result<(), ConversionError> {
        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}

/// Counts calls and parks each one until `release` is notified.
///
/// `entered` fires once a call is inside the transcoder, so a test can
/// fire a second request only after the first holds the conversion slot.
#[derive(Default)]
pub struct GatedTranscoder {
    pub calls: AtomicUsize,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedTranscoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioTranscoder for GatedTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        _target: AudioFormat,
    ) -> Result<(), ConversionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}

/// Always fails like a non-zero ffmpeg exit
#[derive(Default)]
pub struct FailingTranscoder {
    pub calls: AtomicUsize,
}

#[async_trait]
impl AudioTranscoder for FailingTranscoder {
    async fn transcode(
        &self,
        _input: &Path,
        _output: &Path,
        _target: AudioFormat,
    ) -> Result<(), ConversionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ConversionError::Transcode(
            "ffmpeg exited with status 1: Invalid data found when processing input".to_string(),
        ))
    }
}

/// Panics mid-conversion
pub struct PanickingTranscoder;

#[async_trait]
impl AudioTranscoder for PanickingTranscoder {
    async fn transcode(
        &self,
        _input: &Path,
        _output: &Path,
        _target: AudioFormat,
    ) -> Result<(), ConversionError> {
        panic!("transcoder blew up");
    }
}

//! Temp-file-scoped audio conversion
//!
//! Source bytes go to a uniquely named file in the work directory, the
//! transcoder writes a second one, and both are removed when their
//! `NamedTempFile` handles drop, on every exit path including cancellation.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use mediaconv_core::{AudioConversionRequest, ConversionResult};
use tempfile::{Builder, NamedTempFile};

use crate::error::ConversionError;
use crate::traits::AudioTranscoder;

#[derive(Clone)]
pub struct AudioConverter {
    transcoder: Arc<dyn AudioTranscoder>,
    work_dir: PathBuf,
}

impl AudioConverter {
    pub fn new(transcoder: Arc<dyn AudioTranscoder>, work_dir: PathBuf) -> Self {
        Self {
            transcoder,
            work_dir,
        }
    }

    fn scratch_file(&self, extension: &str) -> Result<NamedTempFile, ConversionError> {
        let suffix = format!(".{}", extension);
        Ok(Builder::new()
            .prefix("mediaconv-")
            .suffix(&suffix)
            .tempfile_in(&self.work_dir)?)
    }

    pub async fn convert(
        &self,
        request: &AudioConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        let input = self.scratch_file(request.source().extension())?;
        tokio::fs::write(input.path(), request.data()).await?;

        let output = self.scratch_file(request.target().extension())?;

        tracing::debug!(
            source = %request.source(),
            target = %request.target(),
            input = %input.path().display(),
            output = %output.path().display(),
            "Transcoding audio"
        );

        self.transcoder
            .transcode(input.path(), output.path(), request.target())
            .await?;

        let data = tokio::fs::read(output.path()).await?;
        if data.is_empty() {
            return Err(ConversionError::Transcode(
                "transcoder produced no output".to_string(),
            ));
        }

        Ok(ConversionResult {
            bytes: Bytes::from(data),
            content_type: request.target().to_mime_type(),
            suggested_filename: Some(request.suggested_filename()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mediaconv_core::AudioFormat;
    use std::path::Path;

    /// Copies input to output, tagging it with the target extension
    struct CopyTranscoder;

    #[async_trait]
    impl AudioTranscoder for CopyTranscoder {
        async fn transcode(
            &self,
            input: &Path,
            output: &Path,
            target: AudioFormat,
        ) -> Result<(), ConversionError> {
            let mut data = tokio::fs::read(input).await?;
            data.extend_from_slice(target.extension().as_bytes());
            tokio::fs::write(output, data).await?;
            Ok(())
        }
    }

    struct FailingTranscoder;

    #[async_trait]
    impl AudioTranscoder for FailingTranscoder {
        async fn transcode(
            &self,
            _input: &Path,
            _output: &Path,
            _target: AudioFormat,
        ) -> Result<(), ConversionError> {
            Err(ConversionError::Transcode("boom".to_string()))
        }
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_convert_success_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let converter = AudioConverter::new(Arc::new(CopyTranscoder), dir.path().to_path_buf());
        let request =
            AudioConversionRequest::new(Bytes::from_static(b"abc"), "input.mp3", "ogg").unwrap();

        let result = converter.convert(&request).await.unwrap();

        assert_eq!(&result.bytes[..], b"abcogg");
        assert_eq!(result.content_type, "audio/ogg");
        assert_eq!(result.suggested_filename.as_deref(), Some("input.ogg"));
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_convert_failure_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let converter =
            AudioConverter::new(Arc::new(FailingTranscoder), dir.path().to_path_buf());
        let request =
            AudioConversionRequest::new(Bytes::from_static(b"abc"), "song.ogg", "mp3").unwrap();

        let err = converter.convert(&request).await.unwrap_err();

        assert!(matches!(err, ConversionError::Transcode(_)));
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_missing_work_dir_is_io_error() {
        let converter = AudioConverter::new(
            Arc::new(CopyTranscoder),
            PathBuf::from("/definitely/not/a/real/dir"),
        );
        let request =
            AudioConversionRequest::new(Bytes::from_static(b"abc"), "input.mp3", "oga").unwrap();

        assert!(matches!(
            converter.convert(&request).await,
            Err(ConversionError::Io(_))
        ));
    }
}

//! ffmpeg-backed transcoder

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use mediaconv_core::AudioFormat;
use tokio::process::Command;

use crate::error::ConversionError;
use crate::traits::AudioTranscoder;

pub struct FfmpegTranscoder {
    ffmpeg_path: String,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// (codec, container) passed to ffmpeg for a target format
    fn codec_args(target: AudioFormat) -> Result<(&'static str, &'static str), ConversionError> {
        match target {
            AudioFormat::Mp3 => Ok(("libmp3lame", "mp3")),
            AudioFormat::Ogg | AudioFormat::Oga => Ok(("libvorbis", "ogg")),
            AudioFormat::M4a => Err(ConversionError::Transcode(
                "m4a is not a supported output format".to_string(),
            )),
        }
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        target: AudioFormat,
    ) -> Result<(), ConversionError> {
        let (codec, container) = Self::codec_args(target)?;

        let args = [
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-vn".to_string(),
            "-acodec".to_string(),
            codec.to_string(),
            "-f".to_string(),
            container.to_string(),
            "-y".to_string(),
            output.to_string_lossy().to_string(),
        ];

        tracing::debug!(ffmpeg = %self.ffmpeg_path, ?args, "Spawning ffmpeg");

        // Dropping the request future must not leave ffmpeg running
        let result = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ConversionError::Transcode(format!("Failed to execute ffmpeg: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ConversionError::Transcode(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

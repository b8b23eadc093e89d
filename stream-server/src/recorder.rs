//! Writes finished calls to disk as a pair of WAV files

use crate::config::RecordingConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;
use telefilter::Recording;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordingPaths {
    pub unfiltered: PathBuf,
    pub filtered: PathBuf,
}

/// Keep stream identifiers safe to embed in a file name
fn sanitize(stream_sid: &str) -> String {
    stream_sid
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// `<dir>/<prefix>[_<streamSid>]_unfiltered.wav` and `..._filtered.wav`
pub fn recording_paths(config: &RecordingConfig, stream_sid: Option<&str>) -> RecordingPaths {
    let stem = match stream_sid.map(sanitize) {
        Some(sid) if !sid.is_empty() => format!("{}_{}", config.file_prefix, sid),
        _ => config.file_prefix.clone(),
    };

    RecordingPaths {
        unfiltered: config.output_dir.join(format!("{}_unfiltered.wav", stem)),
        filtered: config.output_dir.join(format!("{}_filtered.wav", stem)),
    }
}

/// Write both WAV files, creating the output directory if needed
pub async fn save_recording(
    config: &RecordingConfig,
    stream_sid: Option<&str>,
    recording: &Recording,
) -> Result<RecordingPaths> {
    fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let paths = recording_paths(config, stream_sid);

    let raw = recording.raw_wav().context("Failed to encode unfiltered WAV")?;
    fs::write(&paths.unfiltered, raw)
        .await
        .with_context(|| format!("Failed to write {}", paths.unfiltered.display()))?;
    info!("Wrote unfiltered WAV file: {}", paths.unfiltered.display());

    let filtered = recording.filtered_wav().context("Failed to encode filtered WAV")?;
    fs::write(&paths.filtered, filtered)
        .await
        .with_context(|| format!("Failed to write {}", paths.filtered.display()))?;
    info!("Wrote filtered WAV file: {}", paths.filtered.display());

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: PathBuf) -> RecordingConfig {
        RecordingConfig {
            enabled: true,
            output_dir: dir,
            file_prefix: "twilio_call".to_string(),
        }
    }

    #[test]
    fn test_paths() {
        let config = config_in(PathBuf::from("out"));

        let paths = recording_paths(&config, Some("MZ12/../ab"));
        assert_eq!(paths.unfiltered, PathBuf::from("out/twilio_call_MZ12ab_unfiltered.wav"));
        assert_eq!(paths.filtered, PathBuf::from("out/twilio_call_MZ12ab_filtered.wav"));

        let paths = recording_paths(&config, None);
        assert_eq!(paths.unfiltered, PathBuf::from("out/twilio_call_unfiltered.wav"));
    }

    #[tokio::test]
    async fn test_save_recording() {
        let dir = std::env::temp_dir().join(format!("telefilter-recorder-{}", std::process::id()));
        let config = config_in(dir.join("nested"));

        let recording = Recording {
            sample_rate: 8000,
            raw: vec![100, -100, 200],
            filtered: vec![50, -50, 100],
        };

        let paths = save_recording(&config, Some("MZ1"), &recording).await.unwrap();

        let raw = fs::read(&paths.unfiltered).await.unwrap();
        let filtered = fs::read(&paths.filtered).await.unwrap();
        assert_eq!(raw, recording.raw_wav().unwrap());
        assert_eq!(filtered, recording.filtered_wav().unwrap());
        assert_eq!(raw.len(), 44 + 6);

        fs::remove_dir_all(&dir).await.unwrap();
    }
}

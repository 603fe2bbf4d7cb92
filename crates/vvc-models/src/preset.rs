//! Quality presets and encoder settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Video codec for all outputs (H.264).
pub const VIDEO_CODEC: &str = "libx264";
/// Audio codec for all outputs.
pub const AUDIO_CODEC: &str = "aac";
/// Audio sample rate in Hz.
pub const AUDIO_SAMPLE_RATE: u32 = 48_000;
/// Rate control buffer size.
pub const BUFSIZE: &str = "10M";
/// Pixel format for player compatibility.
pub const PIX_FMT: &str = "yuv420p";
/// H.264 profile.
pub const H264_PROFILE: &str = "high";
/// H.264 level.
pub const H264_LEVEL: &str = "4.2";

/// Errors from preset name parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresetError {
    #[error("unknown quality preset: {0}")]
    Unknown(String),
}

/// Abstract output quality level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    #[default]
    High,
    Medium,
    Low,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::High => "high",
            QualityPreset::Medium => "medium",
            QualityPreset::Low => "low",
        }
    }

    /// Map the preset to concrete encoder settings.
    ///
    /// The mapping is total over the enum; an unknown preset is only
    /// representable as an unparsed string (see [`FromStr`]).
    pub fn settings(self) -> EncoderSettings {
        match self {
            QualityPreset::High => EncoderSettings {
                codec: VIDEO_CODEC.to_string(),
                preset: "slow".to_string(),
                crf: 18,
                video_bitrate: "5M".to_string(),
                audio_codec: AUDIO_CODEC.to_string(),
                audio_bitrate: "320k".to_string(),
                scale_flags: "lanczos".to_string(),
            },
            QualityPreset::Medium => EncoderSettings {
                codec: VIDEO_CODEC.to_string(),
                preset: "medium".to_string(),
                crf: 23,
                video_bitrate: "2M".to_string(),
                audio_codec: AUDIO_CODEC.to_string(),
                audio_bitrate: "192k".to_string(),
                scale_flags: "bicubic".to_string(),
            },
            QualityPreset::Low => EncoderSettings {
                codec: VIDEO_CODEC.to_string(),
                preset: "faster".to_string(),
                crf: 28,
                video_bitrate: "1M".to_string(),
                audio_codec: AUDIO_CODEC.to_string(),
                audio_bitrate: "128k".to_string(),
                scale_flags: "bilinear".to_string(),
            },
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QualityPreset {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(QualityPreset::High),
            "medium" => Ok(QualityPreset::Medium),
            "low" => Ok(QualityPreset::Low),
            other => Err(PresetError::Unknown(other.to_string())),
        }
    }
}

/// Concrete encoder parameters for one quality level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderSettings {
    /// Video codec (always libx264 today)
    pub codec: String,
    /// libx264 speed preset (e.g. "slow", "medium", "faster")
    pub preset: String,
    /// Constant Rate Factor (0-51, lower is better)
    pub crf: u8,
    /// Rate cap passed as -maxrate
    pub video_bitrate: String,
    /// Audio codec
    pub audio_codec: String,
    /// Audio bitrate
    pub audio_bitrate: String,
    /// Scaler algorithm for the scale filter (e.g. "lanczos")
    pub scale_flags: String,
}

impl EncoderSettings {
    /// Convert to FFmpeg output arguments (everything after the inputs,
    /// excluding filters and stream mapping).
    pub fn to_output_args(&self) -> Vec<String> {
        vec![
            "-c:v".to_string(),
            self.codec.clone(),
            "-preset".to_string(),
            self.preset.clone(),
            "-crf".to_string(),
            self.crf.to_string(),
            "-maxrate".to_string(),
            self.video_bitrate.clone(),
            "-bufsize".to_string(),
            BUFSIZE.to_string(),
            "-pix_fmt".to_string(),
            PIX_FMT.to_string(),
            "-profile:v".to_string(),
            H264_PROFILE.to_string(),
            "-level".to_string(),
            H264_LEVEL.to_string(),
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-b:a".to_string(),
            self.audio_bitrate.clone(),
            "-ar".to_string(),
            AUDIO_SAMPLE_RATE.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_mapping() {
        let high = QualityPreset::High.settings();
        assert_eq!(high.preset, "slow");
        assert_eq!(high.crf, 18);
        assert_eq!(high.video_bitrate, "5M");
        assert_eq!(high.audio_bitrate, "320k");

        let low = QualityPreset::Low.settings();
        assert_eq!(low.preset, "faster");
        assert_eq!(low.crf, 28);
        assert_eq!(low.scale_flags, "bilinear");
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("high".parse::<QualityPreset>().unwrap(), QualityPreset::High);
        assert_eq!("MEDIUM".parse::<QualityPreset>().unwrap(), QualityPreset::Medium);
        assert_eq!(" low ".parse::<QualityPreset>().unwrap(), QualityPreset::Low);
        assert!(matches!(
            "ultra".parse::<QualityPreset>(),
            Err(PresetError::Unknown(_))
        ));
    }

    #[test]
    fn test_output_args() {
        let args = QualityPreset::Medium.settings().to_output_args();
        assert!(args.contains(&"-c:v".to_string()));
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"-crf".to_string()));
        assert!(args.contains(&"23".to_string()));
        assert!(args.contains(&"yuv420p".to_string()));
        assert!(args.contains(&"48000".to_string()));
    }
}

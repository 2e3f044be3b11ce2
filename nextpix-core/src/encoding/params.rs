// ============================================================================
// nextpix-core/src/encoding/params.rs
// ============================================================================
//
// ENCODER PARAMETERS: Per-Encoder Option Sets and Their Valid Ranges
//
// Each external encoder accepts a different set of options. This module holds
// one plain struct per encoder, the small enumerations they use, default
// values, and the range validation that the presentation layer runs before a
// batch starts. The command builder and the batch worker never re-validate.

use crate::error::{CoreResult, invalid_parameter};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Default avifenc quality (0-100, higher is better).
pub const DEFAULT_AVIF_QUALITY: u8 = 60;

/// Default avifenc speed (0-10, lower is slower/better compression).
pub const DEFAULT_AVIF_SPEED: u8 = 6;

/// Default ffmpeg libaom CRF for still images (0-63, lower is better).
pub const DEFAULT_FFMPEG_CRF: u8 = 30;

/// Default heif-enc quality (0-100).
pub const DEFAULT_HEIF_QUALITY: u8 = 50;

/// Default JPEG-XL butteraugli distance. 1.0 is visually lossless.
pub const DEFAULT_JXL_DISTANCE: f32 = 1.0;

/// Default cjxl effort (1-10).
pub const DEFAULT_JXL_EFFORT: u8 = 7;

/// Default cjxl brotli effort (0-11).
pub const DEFAULT_JXL_BROTLI_EFFORT: u8 = 9;

pub const MAX_AVIF_SPEED: u8 = 10;
pub const MAX_FFMPEG_CRF: u8 = 63;
pub const MAX_JXL_DISTANCE: f32 = 25.0;
pub const MIN_JXL_EFFORT: u8 = 1;
pub const MAX_JXL_EFFORT: u8 = 10;
pub const MAX_JXL_BROTLI_EFFORT: u8 = 11;

fn check_max(name: &'static str, value: u8, max: u8) -> CoreResult<()> {
    if value > max {
        return Err(invalid_parameter(
            name,
            format!("must be between 0 and {max}, got {value}"),
        ));
    }
    Ok(())
}

// ============================================================================
// SHARED ENUMERATIONS
// ============================================================================

/// Chroma subsampling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromaSubsampling {
    #[serde(rename = "420")]
    Yuv420,
    #[serde(rename = "422")]
    Yuv422,
    #[serde(rename = "444")]
    Yuv444,
    /// Monochrome. Only avifenc supports it.
    #[serde(rename = "400")]
    Yuv400,
}

impl ChromaSubsampling {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yuv420 => "420",
            Self::Yuv422 => "422",
            Self::Yuv444 => "444",
            Self::Yuv400 => "400",
        }
    }
}

impl fmt::Display for ChromaSubsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChromaSubsampling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().trim_start_matches("yuv") {
            "420" => Ok(Self::Yuv420),
            "422" => Ok(Self::Yuv422),
            "444" => Ok(Self::Yuv444),
            "400" => Ok(Self::Yuv400),
            other => Err(format!(
                "unknown chroma subsampling '{other}' (expected 420, 422, 444 or 400)"
            )),
        }
    }
}

/// Tuning metric for avifenc's libaom backend, passed as `-a tune=<value>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvifTune {
    Ssim,
    Psnr,
    /// Image-quality tuning available in recent libaom releases.
    Iq,
}

impl AvifTune {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ssim => "ssim",
            Self::Psnr => "psnr",
            Self::Iq => "iq",
        }
    }
}

impl fmt::Display for AvifTune {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AvifTune {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssim" => Ok(Self::Ssim),
            "psnr" => Ok(Self::Psnr),
            "iq" => Ok(Self::Iq),
            other => Err(format!("unknown tune '{other}' (expected ssim, psnr or iq)")),
        }
    }
}

/// Named speed preset for ffmpeg's libaom-av1 encoder.
///
/// Each preset maps onto libaom's `cpu-used` (0 slowest - 8 fastest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FfmpegSpeedPreset {
    Placebo,
    VerySlow,
    Slower,
    Slow,
    Medium,
    Fast,
    Faster,
    VeryFast,
    UltraFast,
}

impl FfmpegSpeedPreset {
    pub fn cpu_used(self) -> u8 {
        match self {
            Self::Placebo => 0,
            Self::VerySlow => 1,
            Self::Slower => 2,
            Self::Slow => 3,
            Self::Medium => 4,
            Self::Fast => 5,
            Self::Faster => 6,
            Self::VeryFast => 7,
            Self::UltraFast => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placebo => "placebo",
            Self::VerySlow => "veryslow",
            Self::Slower => "slower",
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Fast => "fast",
            Self::Faster => "faster",
            Self::VeryFast => "veryfast",
            Self::UltraFast => "ultrafast",
        }
    }
}

impl fmt::Display for FfmpegSpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FfmpegSpeedPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placebo" => Ok(Self::Placebo),
            "veryslow" => Ok(Self::VerySlow),
            "slower" => Ok(Self::Slower),
            "slow" => Ok(Self::Slow),
            "medium" => Ok(Self::Medium),
            "fast" => Ok(Self::Fast),
            "faster" => Ok(Self::Faster),
            "veryfast" => Ok(Self::VeryFast),
            "ultrafast" => Ok(Self::UltraFast),
            other => Err(format!("unknown speed preset '{other}'")),
        }
    }
}

/// Pixel format passed to ffmpeg via `-pix_fmt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Yuv420p,
    Yuv422p,
    Yuv444p,
    Yuv420p10le,
    Yuv422p10le,
    Yuv444p10le,
}

impl PixelFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yuv420p => "yuv420p",
            Self::Yuv422p => "yuv422p",
            Self::Yuv444p => "yuv444p",
            Self::Yuv420p10le => "yuv420p10le",
            Self::Yuv422p10le => "yuv422p10le",
            Self::Yuv444p10le => "yuv444p10le",
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yuv420p" => Ok(Self::Yuv420p),
            "yuv422p" => Ok(Self::Yuv422p),
            "yuv444p" => Ok(Self::Yuv444p),
            "yuv420p10le" => Ok(Self::Yuv420p10le),
            "yuv422p10le" => Ok(Self::Yuv422p10le),
            "yuv444p10le" => Ok(Self::Yuv444p10le),
            other => Err(format!("unsupported pixel format '{other}'")),
        }
    }
}

/// x265 preset used by heif-enc, passed as `-p preset=<value>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum X265Preset {
    UltraFast,
    SuperFast,
    VeryFast,
    Faster,
    Fast,
    Medium,
    Slow,
    Slower,
    VerySlow,
    Placebo,
}

impl X265Preset {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UltraFast => "ultrafast",
            Self::SuperFast => "superfast",
            Self::VeryFast => "veryfast",
            Self::Faster => "faster",
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
            Self::Slower => "slower",
            Self::VerySlow => "veryslow",
            Self::Placebo => "placebo",
        }
    }
}

impl fmt::Display for X265Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for X265Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ultrafast" => Ok(Self::UltraFast),
            "superfast" => Ok(Self::SuperFast),
            "veryfast" => Ok(Self::VeryFast),
            "faster" => Ok(Self::Faster),
            "fast" => Ok(Self::Fast),
            "medium" => Ok(Self::Medium),
            "slow" => Ok(Self::Slow),
            "slower" => Ok(Self::Slower),
            "veryslow" => Ok(Self::VerySlow),
            "placebo" => Ok(Self::Placebo),
            other => Err(format!("unknown x265 preset '{other}'")),
        }
    }
}

// ============================================================================
// PER-ENCODER PARAMETER SETS
// ============================================================================

/// Options for AVIF encoding through `avifenc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvifencParams {
    /// Quality, 0-100 (100 is lossless)
    pub quality: u8,
    /// Encoder speed, 0-10 (0 is slowest)
    pub speed: u8,
    pub chroma: ChromaSubsampling,
    pub tune: AvifTune,
}

impl Default for AvifencParams {
    fn default() -> Self {
        Self {
            quality: DEFAULT_AVIF_QUALITY,
            speed: DEFAULT_AVIF_SPEED,
            chroma: ChromaSubsampling::Yuv444,
            tune: AvifTune::Ssim,
        }
    }
}

impl AvifencParams {
    pub fn validate(&self) -> CoreResult<()> {
        check_max("quality", self.quality, 100)?;
        check_max("speed", self.speed, MAX_AVIF_SPEED)
    }
}

/// Options for AVIF encoding through `ffmpeg` with libaom-av1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FfmpegAvifParams {
    /// Constant rate factor, 0-63 (lower is better)
    pub crf: u8,
    pub speed_preset: FfmpegSpeedPreset,
    pub pixel_format: PixelFormat,
}

impl Default for FfmpegAvifParams {
    fn default() -> Self {
        Self {
            crf: DEFAULT_FFMPEG_CRF,
            speed_preset: FfmpegSpeedPreset::Medium,
            pixel_format: PixelFormat::Yuv420p,
        }
    }
}

impl FfmpegAvifParams {
    pub fn validate(&self) -> CoreResult<()> {
        check_max("crf", self.crf, MAX_FFMPEG_CRF)
    }
}

/// Options for HEIF encoding through `heif-enc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeifEncParams {
    /// When set, every other quality-related option is ignored.
    pub lossless: bool,
    pub quality: u8,
    pub preset: X265Preset,
    pub chroma: ChromaSubsampling,
}

impl Default for HeifEncParams {
    fn default() -> Self {
        Self {
            lossless: false,
            quality: DEFAULT_HEIF_QUALITY,
            preset: X265Preset::Medium,
            chroma: ChromaSubsampling::Yuv420,
        }
    }
}

impl HeifEncParams {
    pub fn validate(&self) -> CoreResult<()> {
        if self.lossless {
            return Ok(());
        }
        check_max("quality", self.quality, 100)?;
        if self.chroma == ChromaSubsampling::Yuv400 {
            return Err(invalid_parameter(
                "chroma",
                "heif-enc supports 420, 422 and 444 only",
            ));
        }
        Ok(())
    }
}

/// Options for JPEG-XL encoding through `cjxl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CjxlParams {
    /// Butteraugli distance, 0.0-25.0 (0.0 is mathematically lossless)
    pub distance: f32,
    /// Encoder effort, 1-10
    pub effort: u8,
    /// Brotli effort for metadata/JPEG reconstruction data, 0-11
    pub brotli_effort: u8,
    /// Photon noise synthesis ISO. 0 disables it.
    pub photon_noise_iso: u32,
}

impl Default for CjxlParams {
    fn default() -> Self {
        Self {
            distance: DEFAULT_JXL_DISTANCE,
            effort: DEFAULT_JXL_EFFORT,
            brotli_effort: DEFAULT_JXL_BROTLI_EFFORT,
            photon_noise_iso: 0,
        }
    }
}

impl CjxlParams {
    pub fn validate(&self) -> CoreResult<()> {
        if !self.distance.is_finite() || !(0.0..=MAX_JXL_DISTANCE).contains(&self.distance) {
            return Err(invalid_parameter(
                "distance",
                format!(
                    "must be between 0.0 and {MAX_JXL_DISTANCE:.1}, got {}",
                    self.distance
                ),
            ));
        }
        if !(MIN_JXL_EFFORT..=MAX_JXL_EFFORT).contains(&self.effort) {
            return Err(invalid_parameter(
                "effort",
                format!(
                    "must be between {MIN_JXL_EFFORT} and {MAX_JXL_EFFORT}, got {}",
                    self.effort
                ),
            ));
        }
        check_max("brotli_effort", self.brotli_effort, MAX_JXL_BROTLI_EFFORT)
    }
}

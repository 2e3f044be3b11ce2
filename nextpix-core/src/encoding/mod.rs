//! Encoder identities, parameter sets and command building.
//!
//! A batch is always run against exactly one [`ParameterSet`]. The variant
//! of the set decides which external encoder is invoked and which file
//! extension the outputs receive.

pub mod command;
pub mod params;

pub use command::{EncodeCommand, build_command, output_path_for};
pub use params::{
    AvifTune, AvifencParams, ChromaSubsampling, CjxlParams, FfmpegAvifParams, FfmpegSpeedPreset,
    HeifEncParams, PixelFormat, X265Preset,
};

use crate::error::CoreResult;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The external encoder a batch is run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderKind {
    /// AVIF through libavif's `avifenc`
    Avifenc,
    /// AVIF through `ffmpeg` with libaom-av1
    FfmpegAvif,
    /// HEIF through libheif's `heif-enc`
    HeifEnc,
    /// JPEG-XL through libjxl's `cjxl`
    Cjxl,
}

impl EncoderKind {
    pub const ALL: [EncoderKind; 4] = [
        EncoderKind::Avifenc,
        EncoderKind::FfmpegAvif,
        EncoderKind::HeifEnc,
        EncoderKind::Cjxl,
    ];

    /// Extension (without dot) given to converted files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Avifenc | Self::FfmpegAvif => "avif",
            Self::HeifEnc => "heic",
            Self::Cjxl => "jxl",
        }
    }

    /// Executable name looked up on `PATH` when no explicit path is given.
    pub fn default_program(self) -> &'static str {
        match self {
            Self::Avifenc => "avifenc",
            Self::FfmpegAvif => "ffmpeg",
            Self::HeifEnc => "heif-enc",
            Self::Cjxl => "cjxl",
        }
    }

    /// Environment variable that overrides the executable path.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Avifenc => "NEXTPIX_AVIFENC",
            Self::FfmpegAvif => "NEXTPIX_FFMPEG",
            Self::HeifEnc => "NEXTPIX_HEIF_ENC",
            Self::Cjxl => "NEXTPIX_CJXL",
        }
    }

    /// Argument that makes the tool print its version and exit 0.
    pub fn version_arg(self) -> &'static str {
        match self {
            Self::FfmpegAvif => "-version",
            _ => "--version",
        }
    }
}

impl fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Avifenc => "AVIF (avifenc)",
            Self::FfmpegAvif => "AVIF (ffmpeg/libaom)",
            Self::HeifEnc => "HEIF (heif-enc)",
            Self::Cjxl => "JPEG-XL (cjxl)",
        };
        f.write_str(name)
    }
}

/// A validated, encoder-specific set of conversion options for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoder", rename_all = "snake_case")]
pub enum ParameterSet {
    Avifenc(AvifencParams),
    FfmpegAvif(FfmpegAvifParams),
    HeifEnc(HeifEncParams),
    Cjxl(CjxlParams),
}

impl ParameterSet {
    pub fn kind(&self) -> EncoderKind {
        match self {
            Self::Avifenc(_) => EncoderKind::Avifenc,
            Self::FfmpegAvif(_) => EncoderKind::FfmpegAvif,
            Self::HeifEnc(_) => EncoderKind::HeifEnc,
            Self::Cjxl(_) => EncoderKind::Cjxl,
        }
    }

    /// Checks every field against its encoder-defined range.
    ///
    /// Front ends call this before starting a batch; the worker assumes a
    /// validated set and does not call it again.
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            Self::Avifenc(p) => p.validate(),
            Self::FfmpegAvif(p) => p.validate(),
            Self::HeifEnc(p) => p.validate(),
            Self::Cjxl(p) => p.validate(),
        }
    }
}

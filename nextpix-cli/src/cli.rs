// nextpix-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use nextpix_core::config::METADATA_TOOL_ENV;
use nextpix_core::encoding::params::{
    DEFAULT_AVIF_QUALITY, DEFAULT_AVIF_SPEED, DEFAULT_FFMPEG_CRF, DEFAULT_HEIF_QUALITY,
    DEFAULT_JXL_BROTLI_EFFORT, DEFAULT_JXL_DISTANCE, DEFAULT_JXL_EFFORT,
};
use nextpix_core::encoding::{
    AvifTune, AvifencParams, ChromaSubsampling, CjxlParams, EncoderKind, FfmpegAvifParams,
    FfmpegSpeedPreset, HeifEncParams, ParameterSet, PixelFormat, X265Preset,
};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "nextpix: batch image converter",
    long_about = "Converts images to AVIF, HEIF or JPEG-XL using avifenc, ffmpeg, heif-enc or cjxl, \
                  copying metadata with exiftool when available."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert images to AVIF with avifenc
    Avif(AvifArgs),

    /// Convert images to AVIF with ffmpeg and libaom-av1
    #[command(name = "avif-ffmpeg")]
    AvifFfmpeg(FfmpegAvifArgs),

    /// Convert images to HEIF with heif-enc
    Heif(HeifArgs),

    /// Convert images to JPEG-XL with cjxl
    Jxl(JxlArgs),

    /// Check which external tools can be launched
    Check(CheckArgs),
}

/// Options shared by every conversion subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Input images and/or directories (directories are scanned non-recursively)
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Path to the encoder executable (defaults to NEXTPIX_<ENCODER> or PATH lookup)
    #[arg(long, value_name = "PATH")]
    pub encoder_path: Option<PathBuf>,

    /// Path to exiftool used to copy metadata onto converted files
    #[arg(long, value_name = "PATH", env = METADATA_TOOL_ENV)]
    pub exiftool: Option<PathBuf>,

    /// Do not copy metadata onto converted files
    #[arg(long)]
    pub no_metadata: bool,

    /// Emit one JSON object per event on stdout instead of a progress bar
    #[arg(long)]
    pub json: bool,

    /// Optional: Directory for a log file of this run
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AvifArgs {
    #[command(flatten)]
    pub common: ConvertArgs,

    /// Quality, 0-100 (100 is lossless)
    #[arg(short, long, default_value_t = DEFAULT_AVIF_QUALITY)]
    pub quality: u8,

    /// Encoder speed, 0-10 (lower is slower and smaller)
    #[arg(short, long, default_value_t = DEFAULT_AVIF_SPEED)]
    pub speed: u8,

    /// Chroma subsampling: 420, 422, 444 or 400
    #[arg(long, default_value = "444")]
    pub chroma: ChromaSubsampling,

    /// Tuning metric: ssim, psnr or iq
    #[arg(long, default_value = "ssim")]
    pub tune: AvifTune,
}

#[derive(Args, Debug)]
pub struct FfmpegAvifArgs {
    #[command(flatten)]
    pub common: ConvertArgs,

    /// Constant rate factor, 0-63 (lower is better)
    #[arg(long, default_value_t = DEFAULT_FFMPEG_CRF)]
    pub crf: u8,

    /// Speed preset: placebo, veryslow, slower, slow, medium, fast, faster, veryfast, ultrafast
    #[arg(long, default_value = "medium")]
    pub speed: FfmpegSpeedPreset,

    /// Output pixel format, e.g. yuv420p or yuv444p10le
    #[arg(long, default_value = "yuv420p")]
    pub pix_fmt: PixelFormat,
}

#[derive(Args, Debug)]
pub struct HeifArgs {
    #[command(flatten)]
    pub common: ConvertArgs,

    /// Lossless mode; quality, preset and chroma are ignored
    #[arg(long)]
    pub lossless: bool,

    /// Quality, 0-100
    #[arg(short, long, default_value_t = DEFAULT_HEIF_QUALITY)]
    pub quality: u8,

    /// x265 preset, e.g. slow or medium
    #[arg(long, default_value = "medium")]
    pub preset: X265Preset,

    /// Chroma subsampling: 420, 422 or 444
    #[arg(long, default_value = "420")]
    pub chroma: ChromaSubsampling,
}

#[derive(Args, Debug)]
pub struct JxlArgs {
    #[command(flatten)]
    pub common: ConvertArgs,

    /// Butteraugli distance, 0.0-25.0 (0.0 is lossless)
    #[arg(short, long, default_value_t = DEFAULT_JXL_DISTANCE)]
    pub distance: f32,

    /// Encoder effort, 1-10
    #[arg(short, long, default_value_t = DEFAULT_JXL_EFFORT)]
    pub effort: u8,

    /// Brotli effort, 0-11
    #[arg(long, default_value_t = DEFAULT_JXL_BROTLI_EFFORT)]
    pub brotli_effort: u8,

    /// Photon noise ISO to synthesize (0 disables)
    #[arg(long, default_value_t = 0)]
    pub photon_noise_iso: u32,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to exiftool to check
    #[arg(long, value_name = "PATH", env = METADATA_TOOL_ENV)]
    pub exiftool: Option<PathBuf>,
}

/// A conversion request resolved from one of the conversion subcommands.
#[derive(Debug)]
pub struct ConvertRequest {
    pub common: ConvertArgs,
    pub params: ParameterSet,
}

impl ConvertRequest {
    pub fn kind(&self) -> EncoderKind {
        self.params.kind()
    }
}

impl From<AvifArgs> for ConvertRequest {
    fn from(args: AvifArgs) -> Self {
        Self {
            common: args.common,
            params: ParameterSet::Avifenc(AvifencParams {
                quality: args.quality,
                speed: args.speed,
                chroma: args.chroma,
                tune: args.tune,
            }),
        }
    }
}

impl From<FfmpegAvifArgs> for ConvertRequest {
    fn from(args: FfmpegAvifArgs) -> Self {
        Self {
            common: args.common,
            params: ParameterSet::FfmpegAvif(FfmpegAvifParams {
                crf: args.crf,
                speed_preset: args.speed,
                pixel_format: args.pix_fmt,
            }),
        }
    }
}

impl From<HeifArgs> for ConvertRequest {
    fn from(args: HeifArgs) -> Self {
        Self {
            common: args.common,
            params: ParameterSet::HeifEnc(HeifEncParams {
                lossless: args.lossless,
                quality: args.quality,
                preset: args.preset,
                chroma: args.chroma,
            }),
        }
    }
}

impl From<JxlArgs> for ConvertRequest {
    fn from(args: JxlArgs) -> Self {
        Self {
            common: args.common,
            params: ParameterSet::Cjxl(CjxlParams {
                distance: args.distance,
                effort: args.effort,
                brotli_effort: args.brotli_effort,
                photon_noise_iso: args.photon_noise_iso,
            }),
        }
    }
}

//! Encoder command builder.
//!
//! Maps an input path and a [`ParameterSet`] onto the exact argument vector
//! for the selected encoder and the output path it will write. Nothing here
//! touches the file system: the same inputs always produce the same command,
//! so every rule can be tested without spawning a process.

use super::params::{AvifencParams, CjxlParams, FfmpegAvifParams, HeifEncParams};
use super::{EncoderKind, ParameterSet};

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Arguments for one encoder invocation plus the file it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeCommand {
    pub args: Vec<OsString>,
    pub output_path: PathBuf,
}

impl EncodeCommand {
    /// Arguments as display strings, for logging and assertions.
    #[must_use]
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// True if any argument equals `arg` exactly.
    #[must_use]
    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// Returns the argument following `flag`, if present.
    #[must_use]
    pub fn value_of(&self, flag: &str) -> Option<String> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(|v| v.to_string_lossy().into_owned())
    }
}

/// Small argument accumulator in the style of the encoder param builders.
#[derive(Default)]
struct ArgList {
    args: Vec<OsString>,
}

impl ArgList {
    fn flag(mut self, flag: &str) -> Self {
        self.args.push(flag.into());
        self
    }

    fn opt(mut self, flag: &str, value: impl ToString) -> Self {
        self.args.push(flag.into());
        self.args.push(value.to_string().into());
        self
    }

    fn path(mut self, path: &Path) -> Self {
        self.args.push(path.as_os_str().to_os_string());
        self
    }

    fn build(self) -> Vec<OsString> {
        self.args
    }
}

/// Output path for `input` when converted by `kind`: same directory, same
/// stem, the encoder's target extension.
#[must_use]
pub fn output_path_for(input: &Path, kind: EncoderKind) -> PathBuf {
    input.with_extension(kind.extension())
}

/// Builds the encoder command for one input file.
///
/// The parameter set must already be validated.
#[must_use]
pub fn build_command(input: &Path, params: &ParameterSet) -> EncodeCommand {
    let output_path = output_path_for(input, params.kind());
    let args = match params {
        ParameterSet::Avifenc(p) => avifenc_args(input, &output_path, p),
        ParameterSet::FfmpegAvif(p) => ffmpeg_avif_args(input, &output_path, p),
        ParameterSet::HeifEnc(p) => heif_enc_args(input, &output_path, p),
        ParameterSet::Cjxl(p) => cjxl_args(input, &output_path, p),
    };
    log::trace!("Built {} command for {}", params.kind(), input.display());
    EncodeCommand { args, output_path }
}

fn avifenc_args(input: &Path, output: &Path, p: &AvifencParams) -> Vec<OsString> {
    ArgList::default()
        .opt("-j", "all")
        .opt("-q", p.quality)
        .opt("-s", p.speed)
        .opt("-y", p.chroma)
        .opt("-a", format!("tune={}", p.tune))
        .path(input)
        .path(output)
        .build()
}

fn ffmpeg_avif_args(input: &Path, output: &Path, p: &FfmpegAvifParams) -> Vec<OsString> {
    ArgList::default()
        .flag("-hide_banner")
        .flag("-y")
        .flag("-i")
        .path(input)
        .opt("-c:v", "libaom-av1")
        .opt("-still-picture", 1)
        .opt("-crf", p.crf)
        .opt("-cpu-used", p.speed_preset.cpu_used())
        .opt("-pix_fmt", p.pixel_format)
        .opt("-row-mt", 1)
        .path(output)
        .build()
}

fn heif_enc_args(input: &Path, output: &Path, p: &HeifEncParams) -> Vec<OsString> {
    let list = if p.lossless {
        ArgList::default().flag("-L")
    } else {
        ArgList::default()
            .opt("-q", p.quality)
            .opt("-p", format!("preset={}", p.preset))
            .opt("-p", format!("chroma={}", p.chroma))
    };
    list.flag("-o").path(output).path(input).build()
}

fn cjxl_args(input: &Path, output: &Path, p: &CjxlParams) -> Vec<OsString> {
    let mut list = ArgList::default()
        .path(input)
        .path(output)
        .opt("-d", format_distance(p.distance))
        .opt("-e", p.effort)
        .flag(&format!("--brotli_effort={}", p.brotli_effort));

    if p.photon_noise_iso > 0 {
        list = list.flag(&format!("--photon_noise_iso={}", p.photon_noise_iso));
    }

    // cjxl recompresses JPEG input losslessly unless told otherwise, which
    // would ignore the requested distance.
    if p.distance > 0.0 && is_jpeg(input) {
        list = list.flag("--lossless_jpeg=0");
    }

    list.build()
}

/// Renders a distance with at least one decimal place ("0.0", "1.0", "1.25")
/// and never in exponent notation.
fn format_distance(distance: f32) -> String {
    let plain = distance.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

/// True for `.jpg` / `.jpeg` sources, case-insensitive.
#[must_use]
pub fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

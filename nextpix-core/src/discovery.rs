//! File discovery module for finding images to convert.
//!
//! Directories are scanned at the top level only. Extensions are matched
//! case-insensitively. Results are sorted so that batches run in a stable
//! order regardless of directory iteration order.

use crate::encoding::EncoderKind;
use crate::error::{CoreError, CoreResult};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Raster formats the supported encoders accept as input.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "bmp", "tif", "tiff", "gif", "heic", "heif", "avif", "jxl",
];

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// Checks if the path is an existing file with a supported image extension.
#[must_use]
pub fn is_processable_image(path: &Path) -> bool {
    path.is_file() && SUPPORTED_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
}

/// Finds image files eligible for conversion in the specified directory.
///
/// # Errors
///
/// * `CoreError::Io` if the directory cannot be read
/// * `CoreError::NoFilesFound` if it contains no supported images
///
/// # Examples
///
/// ```rust,no_run
/// use nextpix_core::find_processable_files;
/// use std::path::Path;
///
/// let files = find_processable_files(Path::new("/path/to/photos"))?;
/// for file in &files {
///     println!("{}", file.display());
/// }
/// # Ok::<(), nextpix_core::CoreError>(())
/// ```
pub fn find_processable_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_processable_image(path))
        .collect();

    if files.is_empty() {
        return Err(CoreError::NoFilesFound(input_dir.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

/// Expands a mix of files and directories into the ordered input list for a
/// batch.
///
/// Directories contribute their processable files; explicit files are kept
/// as given (a missing file is left for the worker to report). Files that
/// already carry `kind`'s target extension are skipped, and duplicates are
/// dropped keeping the first occurrence.
pub fn collect_inputs(paths: &[PathBuf], kind: EncoderKind) -> CoreResult<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut inputs = Vec::new();

    for path in paths {
        let candidates = if path.is_dir() {
            match find_processable_files(path) {
                Ok(files) => files,
                Err(CoreError::NoFilesFound(dir)) => {
                    log::warn!("No processable images in {}", dir.display());
                    Vec::new()
                }
                Err(e) => return Err(e),
            }
        } else {
            vec![path.clone()]
        };

        for candidate in candidates {
            if has_extension(&candidate, kind.extension()) {
                log::debug!(
                    "Skipping {} (already .{})",
                    candidate.display(),
                    kind.extension()
                );
                continue;
            }
            if seen.insert(candidate.clone()) {
                inputs.push(candidate);
            }
        }
    }

    Ok(inputs)
}

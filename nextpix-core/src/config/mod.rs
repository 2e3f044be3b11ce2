//! Configuration structures for the nextpix-core library.
//!
//! The batch worker needs very little configuration: where the encoder
//! lives, where the optional metadata tool lives, and whether metadata should
//! be copied at all. Encoder options themselves are carried by
//! [`ParameterSet`](crate::encoding::ParameterSet), not by this module.

mod builder;
pub mod utils;

use crate::encoding::EncoderKind;

use std::path::{Path, PathBuf};

pub use builder::CoreConfigBuilder;

/// Default executable name of the metadata tool.
pub const DEFAULT_METADATA_TOOL: &str = "exiftool";

/// Environment variable that overrides the metadata tool path.
pub const METADATA_TOOL_ENV: &str = "NEXTPIX_EXIFTOOL";

/// Executable paths used by one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Encoder executable. A bare name is resolved through `PATH`.
    pub encoder: PathBuf,

    /// Metadata tool executable. `None` or an empty path disables metadata
    /// copying without producing warnings.
    pub metadata_tool: Option<PathBuf>,
}

impl ToolPaths {
    /// Resolves tool paths for `kind` from the environment, falling back to
    /// the default executable names. The metadata tool is only set when
    /// `NEXTPIX_EXIFTOOL` is present.
    pub fn from_env(kind: EncoderKind) -> Self {
        Self {
            encoder: utils::get_env_path(kind.env_var(), PathBuf::from(kind.default_program())),
            metadata_tool: utils::get_env_opt_path(METADATA_TOOL_ENV),
        }
    }

    /// Returns the metadata tool path only if it is configured and non-empty.
    pub fn metadata_tool(&self) -> Option<&Path> {
        self.metadata_tool
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Main configuration structure for a batch run.
///
/// # Examples
///
/// ```rust
/// use nextpix_core::config::CoreConfigBuilder;
/// use nextpix_core::encoding::EncoderKind;
///
/// let config = CoreConfigBuilder::new(EncoderKind::Cjxl)
///     .encoder_path("/opt/libjxl/bin/cjxl")
///     .metadata_tool("/usr/bin/exiftool")
///     .build();
/// assert!(config.copy_metadata);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub tools: ToolPaths,

    /// Whether to copy EXIF/XMP/ICC tags onto each converted file.
    /// Has no effect when no metadata tool is configured.
    pub copy_metadata: bool,
}

impl CoreConfig {
    pub fn new(tools: ToolPaths) -> Self {
        Self {
            tools,
            copy_metadata: true,
        }
    }

    /// The metadata tool to run for each job, if copying is enabled and a
    /// tool is configured.
    pub fn effective_metadata_tool(&self) -> Option<&Path> {
        if self.copy_metadata {
            self.tools.metadata_tool()
        } else {
            None
        }
    }
}

// ============================================================================
// nextpix-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// This module implements the builder pattern for the CoreConfig structure,
// providing a fluent API for creating CoreConfig instances. Values not set
// explicitly fall back to the environment (NEXTPIX_* variables) and then to
// the default executable names.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::{CoreConfig, ToolPaths};
use crate::encoding::EncoderKind;

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use nextpix_core::config::CoreConfigBuilder;
/// use nextpix_core::encoding::EncoderKind;
///
/// let config = CoreConfigBuilder::new(EncoderKind::HeifEnc)
///     .encoder_path("/usr/local/bin/heif-enc")
///     .copy_metadata(false)
///     .build();
/// assert!(config.effective_metadata_tool().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    kind: EncoderKind,
    encoder_path: Option<PathBuf>,
    metadata_tool: Option<PathBuf>,
    copy_metadata: bool,
}

impl CoreConfigBuilder {
    /// Creates a new builder for a batch run with the given encoder.
    pub fn new(kind: EncoderKind) -> Self {
        Self {
            kind,
            encoder_path: None,
            metadata_tool: None,
            copy_metadata: true,
        }
    }

    /// Sets the encoder executable path.
    pub fn encoder_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.encoder_path = Some(path.into());
        self
    }

    /// Sets the metadata tool executable path.
    pub fn metadata_tool(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_tool = Some(path.into());
        self
    }

    /// Sets whether metadata should be copied onto converted files.
    pub fn copy_metadata(mut self, enable: bool) -> Self {
        self.copy_metadata = enable;
        self
    }

    /// Builds the CoreConfig, resolving unset paths from the environment.
    pub fn build(self) -> CoreConfig {
        let env_tools = ToolPaths::from_env(self.kind);
        CoreConfig {
            tools: ToolPaths {
                encoder: self.encoder_path.unwrap_or(env_tools.encoder),
                metadata_tool: self.metadata_tool.or(env_tools.metadata_tool),
            },
            copy_metadata: self.copy_metadata,
        }
    }
}

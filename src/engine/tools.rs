//! External tool detection.
//!
//! The [`ToolRegistry`] discovers and caches the locations of the CLI tools
//! the engine shells out to (ffmpeg, ffprobe). Tools that are not found are
//! silently omitted at discovery time; [`ToolRegistry::require`] turns a
//! missing tool into an error at the point of use.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Tools the engine depends on.
const KNOWN_TOOLS: &[&str] = &["ffmpeg", "ffprobe"];

/// Resolved configuration for a single external tool.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
}

/// Registry holding discovered tool locations.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Discover known tools by searching `PATH`.
    pub fn discover() -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            if let Ok(path) = which::which(name) {
                tracing::debug!("found {name} at {}", path.display());
                tools.insert(
                    name.to_string(),
                    ToolConfig {
                        name: name.to_string(),
                        path,
                    },
                );
            }
        }

        Self { tools }
    }

    /// Build a registry from explicit paths (for tests).
    #[cfg(test)]
    pub fn with_tools(entries: &[(&str, &str)]) -> Self {
        let tools = entries
            .iter()
            .map(|&(name, path)| {
                (
                    name.to_string(),
                    ToolConfig {
                        name: name.to_string(),
                        path: PathBuf::from(path),
                    },
                )
            })
            .collect();
        Self { tools }
    }

    /// Return the [`ToolConfig`] for the given tool, or [`Error::Tool`] if it
    /// was not found during discovery.
    pub fn require(&self, name: &str) -> Result<&ToolConfig> {
        self.tools.get(name).ok_or_else(|| Error::Tool {
            tool: name.to_string(),
            message: format!("{name} not found; is it installed and in PATH?"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_does_not_panic() {
        // ffmpeg may or may not be installed in CI; the call itself must work.
        let registry = ToolRegistry::discover();
        let _ = registry.require("ffmpeg");
    }

    #[test]
    fn require_missing_tool_returns_error() {
        let registry = ToolRegistry::with_tools(&[]);
        let result = registry.require("ffmpeg");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("ffmpeg"));
    }

    #[test]
    fn require_known_tool() {
        let registry = ToolRegistry::with_tools(&[("ffmpeg", "/usr/bin/ffmpeg")]);
        let cfg = registry.require("ffmpeg").unwrap();
        assert_eq!(cfg.path, PathBuf::from("/usr/bin/ffmpeg"));
    }
}

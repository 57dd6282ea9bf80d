//! Outline configuration persistence
//!
//! Stores preferences in `~/.config/structure-outline/config.yaml`

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::language::{LanguageAllowlist, LanguagePolicy};
use crate::outline::{ClassifyOptions, DroppedChildren};
use crate::provider::NativeKind;

/// Outline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Built-in language set (minimal or extended)
    pub language_policy: LanguagePolicy,
    /// Language identifiers extracted in addition to the policy's set
    pub extra_languages: Vec<String>,
    /// Native kinds removed from the base classification mapping
    pub excluded_kinds: Vec<NativeKind>,
    /// Fate of children under a dropped symbol
    pub dropped_children: DroppedChildren,
    pub max_depth: usize,
    pub component_marker: String,
    pub hook_marker: String,
    /// Scan comments for TODO/FIXME/NOTE annotations
    pub annotations: bool,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        let classify = ClassifyOptions::default();
        Self {
            language_policy: LanguagePolicy::default(),
            extra_languages: Vec::new(),
            excluded_kinds: Vec::new(),
            dropped_children: classify.dropped_children,
            max_depth: classify.max_depth,
            component_marker: classify.component_marker,
            hook_marker: classify.hook_marker,
            annotations: true,
        }
    }
}

impl OutlineConfig {
    /// Load config from the default location, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = crate::config_paths::config_file().context("No config directory available")?;
        self.save_to(&path)
    }

    /// Save config to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn allowlist(&self) -> LanguageAllowlist {
        LanguageAllowlist::new(self.language_policy, self.extra_languages.iter().cloned())
    }

    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            excluded: self.excluded_kinds.iter().copied().collect::<HashSet<_>>(),
            dropped_children: self.dropped_children,
            max_depth: self.max_depth,
            component_marker: self.component_marker.clone(),
            hook_marker: self.hook_marker.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: OutlineConfig = serde_yaml::from_str(
            "language_policy: minimal\nexcluded_kinds: [function, enumMember]\n",
        )
        .unwrap();

        assert_eq!(config.language_policy, LanguagePolicy::Minimal);
        assert_eq!(
            config.excluded_kinds,
            vec![NativeKind::Function, NativeKind::EnumMember]
        );
        assert_eq!(config.max_depth, 64);
        assert!(config.annotations);
        assert_eq!(config.hook_marker, "(hook)");
    }

    #[test]
    fn test_classify_options() {
        let config = OutlineConfig {
            excluded_kinds: vec![NativeKind::Variable],
            dropped_children: DroppedChildren::Promote,
            component_marker: "[C]".to_string(),
            ..OutlineConfig::default()
        };
        let options = config.classify_options();
        assert!(options.excluded.contains(&NativeKind::Variable));
        assert_eq!(options.dropped_children, DroppedChildren::Promote);
        assert_eq!(options.component_marker, "[C]");
    }

    #[test]
    fn test_allowlist() {
        let config = OutlineConfig {
            language_policy: LanguagePolicy::Minimal,
            extra_languages: vec!["lua".to_string()],
            ..OutlineConfig::default()
        };
        let allow = config.allowlist();
        assert!(allow.is_supported("lua"));
        assert!(!allow.is_supported("rust"));
    }
}

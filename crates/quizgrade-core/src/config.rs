//! Configuration and the section catalog.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Number of tabs a section gets when its slot names are not configured.
pub const DEFAULT_SLOT_COUNT: usize = 13;

/// A top-level topic grouping of quiz slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Display name, also written into reports.
    pub name: String,
    /// One-line description shown next to the name.
    #[serde(default)]
    pub description: String,
    /// File-name prefix of the section's quiz files.
    pub prefix: String,
    /// Tab names, one per slot; slot numbers are 1-based positions.
    #[serde(default)]
    pub slots: Vec<String>,
}

impl SectionConfig {
    /// Tab names, falling back to numbered placeholders.
    pub fn slot_names(&self) -> Vec<String> {
        if self.slots.is_empty() {
            (1..=DEFAULT_SLOT_COUNT)
                .map(|i| format!("{i}. Section {i}"))
                .collect()
        } else {
            self.slots.clone()
        }
    }

    /// Name of a 1-based slot, if the section has it.
    pub fn slot_name(&self, slot: usize) -> Option<String> {
        slot.checked_sub(1)
            .and_then(|i| self.slot_names().into_iter().nth(i))
    }
}

/// Top-level quizgrade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizgradeConfig {
    /// Directory holding the quiz JSON files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory report exports are written to.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    /// Section selected when none is given.
    #[serde(default)]
    pub default_section: Option<String>,
    /// The section catalog, in display order.
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("quiz_data")
}
fn default_results_dir() -> PathBuf {
    PathBuf::from("./quizgrade-results")
}

impl Default for QuizgradeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            results_dir: default_results_dir(),
            default_section: None,
            sections: Vec::new(),
        }
    }
}

impl QuizgradeConfig {
    /// Find a section by display name or file prefix.
    pub fn section(&self, name: &str) -> Option<&SectionConfig> {
        self.sections
            .iter()
            .find(|s| s.name == name || s.prefix == name)
    }

    /// The configured default section, or else the first one.
    pub fn default_section(&self) -> Option<&SectionConfig> {
        self.default_section
            .as_deref()
            .and_then(|name| self.section(name))
            .or_else(|| self.sections.first())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizgrade.toml` in the current directory
/// 2. `~/.config/quizgrade/config.toml`
///
/// Environment variable override: `QUIZGRADE_DATA_DIR`.
pub fn load_config() -> Result<QuizgradeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizgradeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizgrade.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => parse_config_file(path)?,
        None => QuizgradeConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZGRADE_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    tracing::debug!(
        "config from {}: data_dir={}, {} section(s)",
        config_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".into()),
        config.data_dir.display(),
        config.sections.len()
    );

    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<QuizgradeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let mut config = toml::from_str::<QuizgradeConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    config.data_dir = resolve_path(&config.data_dir);
    config.results_dir = resolve_path(&config.results_dir);

    // Relative data paths are relative to the config file
    if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if config.data_dir.is_relative() {
            config.data_dir = base.join(&config.data_dir);
        }
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizgrade"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
data_dir = "quiz_data"
default_section = "Theory DS - 1.1"

[[sections]]
name = "Theory DS - 0"
description = "Fundamentals and prerequisites"
prefix = "theory_ds_0"

[[sections]]
name = "Theory DS - 1.1"
description = "Classic supervised algorithms"
prefix = "theory_ds_1.1"
slots = ["1. Basic understanding", "2. Linear models", "3. Decision Trees"]
"#;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZGRADE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZGRADE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZGRADE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_QUIZGRADE_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_QUIZGRADE_SELF_REF", "${_QUIZGRADE_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a/${_QUIZGRADE_SELF_REF}/b"),
            "a/${_QUIZGRADE_SELF_REF}/b"
        );
        std::env::remove_var("_QUIZGRADE_SELF_REF");
    }

    #[test]
    fn resolve_env_vars_unterminated_is_kept() {
        assert_eq!(resolve_env_vars("data/${UNTERMINATED"), "data/${UNTERMINATED");
        assert_eq!(resolve_env_vars("${_QUIZGRADE_UNSET_VAR}x"), "x");
    }

    #[test]
    fn default_config() {
        let config = QuizgradeConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("quiz_data"));
        assert!(config.sections.is_empty());
        assert!(config.default_section().is_none());
    }

    #[test]
    fn parse_section_catalog() {
        let config: QuizgradeConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.sections.len(), 2);
        assert_eq!(config.default_section().unwrap().prefix, "theory_ds_1.1");
        assert_eq!(config.section("theory_ds_0").unwrap().name, "Theory DS - 0");
        assert!(config.section("Theory DS - 9").is_none());
    }

    #[test]
    fn slot_names_fall_back_to_placeholders() {
        let config: QuizgradeConfig = toml::from_str(SAMPLE).unwrap();
        let fundamentals = &config.sections[0];
        assert_eq!(fundamentals.slot_names().len(), DEFAULT_SLOT_COUNT);
        assert_eq!(fundamentals.slot_name(13).as_deref(), Some("13. Section 13"));

        let supervised = &config.sections[1];
        assert_eq!(supervised.slot_name(2).as_deref(), Some("2. Linear models"));
        assert_eq!(supervised.slot_name(0), None);
        assert_eq!(supervised.slot_name(4), None);
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn data_dir_is_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizgrade.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = parse_config_file(&path).unwrap();
        assert_eq!(config.data_dir, dir.path().join("quiz_data"));
    }

    #[test]
    fn env_vars_expand_before_relative_join() {
        std::env::set_var("_QUIZGRADE_QUIZ_HOME", "/srv/quizzes");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.toml");
        std::fs::write(&path, "data_dir = \"${_QUIZGRADE_QUIZ_HOME}/data\"\n").unwrap();

        let config = parse_config_file(&path).unwrap();
        std::env::remove_var("_QUIZGRADE_QUIZ_HOME");
        assert_eq!(config.data_dir, PathBuf::from("/srv/quizzes/data"));
    }
}

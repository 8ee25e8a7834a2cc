use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::theme::{apply_overrides, Theme, ThemeOverrides};

#[derive(Debug, Clone)]
pub struct MdcompareConfig {
    pub theme: Theme,
    pub unified: Option<bool>,
    pub diff_only: Option<bool>,
    pub context_lines: Option<usize>,
    pub char_diff_limit: Option<usize>,
    pub edge_gaps: Option<bool>,
    /// Refuse line-level comparisons needing more DP cells than this.
    pub max_line_cells: Option<usize>,
}

impl Default for MdcompareConfig {
    fn default() -> Self {
        Self {
            theme: Theme::from_name("one-dark"),
            unified: None,
            diff_only: None,
            context_lines: None,
            char_diff_limit: None,
            edge_gaps: None,
            max_line_cells: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    colors: Option<ThemeOverrides>,
    #[serde(default)]
    unified: Option<bool>,
    #[serde(default)]
    diff_only: Option<bool>,
    #[serde(default)]
    context_lines: Option<usize>,
    #[serde(default)]
    char_diff_limit: Option<usize>,
    #[serde(default)]
    edge_gaps: Option<bool>,
    #[serde(default)]
    max_line_cells: Option<usize>,
}

fn config_path() -> PathBuf {
    let mut path = dirs_home().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("mdcompare");
    path.push("config.toml");
    path
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Load config from `~/.config/mdcompare/config.toml`, falling back to defaults.
pub fn load_config() -> MdcompareConfig {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> MdcompareConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => {
            debug!(path = %path.display(), "no config file, using defaults");
            return MdcompareConfig::default();
        }
    };
    parse_config(&contents).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
        MdcompareConfig::default()
    })
}

fn parse_config(contents: &str) -> Result<MdcompareConfig, toml::de::Error> {
    let file: ConfigFile = toml::from_str(contents)?;

    // Load theme by name, apply color overrides
    let theme_name = file.theme.as_deref().unwrap_or("one-dark");
    let mut theme = Theme::from_name(theme_name);
    if let Some(ref overrides) = file.colors {
        apply_overrides(&mut theme, overrides);
    }

    Ok(MdcompareConfig {
        theme,
        unified: file.unified,
        diff_only: file.diff_only,
        context_lines: file.context_lines,
        char_diff_limit: file.char_diff_limit,
        edge_gaps: file.edge_gaps,
        max_line_cells: file.max_line_cells,
    })
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewModeArg {
    Edit,
    Split,
    Preview,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub sync: bool,
    pub no_sync: bool,
    pub outline: bool,
    pub no_outline: bool,
    pub no_autosave: bool,
    pub view: Option<ViewModeArg>,
    pub word_goal: Option<usize>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            sync: self.sync || other.sync,
            no_sync: self.no_sync || other.no_sync,
            outline: self.outline || other.outline,
            no_outline: self.no_outline || other.no_outline,
            no_autosave: self.no_autosave || other.no_autosave,
            view: other.view.or(self.view),
            word_goal: other.word_goal.or(self.word_goal),
        }
    }

    /// Scroll sync preference: on unless explicitly disabled.
    pub const fn scroll_lock_enabled(&self) -> bool {
        !self.no_sync
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("tandem").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("tandem")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("tandem").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("tandem").join("config");
        }
    }

    PathBuf::from(".tandemrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".tandemrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# tandem defaults (saved with --save)".to_string());
    if flags.sync {
        lines.push("--sync".to_string());
    }
    if flags.no_sync {
        lines.push("--no-sync".to_string());
    }
    if flags.outline {
        lines.push("--outline".to_string());
    }
    if flags.no_outline {
        lines.push("--no-outline".to_string());
    }
    if flags.no_autosave {
        lines.push("--no-autosave".to_string());
    }
    if let Some(view) = flags.view {
        let view_str = match view {
            ViewModeArg::Edit => "edit",
            ViewModeArg::Split => "split",
            ViewModeArg::Preview => "preview",
        };
        lines.push(format!("--view {view_str}"));
    }
    if let Some(goal) = flags.word_goal {
        lines.push(format!("--word-goal {goal}"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--sync" {
            flags.sync = true;
        } else if token == "--no-sync" {
            flags.no_sync = true;
        } else if token == "--outline" {
            flags.outline = true;
        } else if token == "--no-outline" {
            flags.no_outline = true;
        } else if token == "--no-autosave" {
            flags.no_autosave = true;
        } else if token == "--view" {
            if let Some(next) = tokens.get(i + 1) {
                flags.view = parse_view(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--view=") {
            flags.view = parse_view(value);
        } else if token == "--word-goal" {
            if let Some(next) = tokens.get(i + 1) {
                flags.word_goal = next.parse().ok();
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--word-goal=") {
            flags.word_goal = value.parse().ok();
        }
        i += 1;
    }
    flags
}

fn parse_view(s: &str) -> Option<ViewModeArg> {
    match s {
        "edit" => Some(ViewModeArg::Edit),
        "split" => Some(ViewModeArg::Split),
        "preview" => Some(ViewModeArg::Preview),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "tandem".to_string(),
            "--no-sync".to_string(),
            "--outline".to_string(),
            "--view".to_string(),
            "split".to_string(),
            "--word-goal=500".to_string(),
            "notes.md".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.no_sync);
        assert!(flags.outline);
        assert_eq!(flags.view, Some(ViewModeArg::Split));
        assert_eq!(flags.word_goal, Some(500));
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            outline: true,
            view: Some(ViewModeArg::Edit),
            word_goal: Some(250),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            no_sync: true,
            view: Some(ViewModeArg::Split),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.outline);
        assert!(merged.no_sync);
        assert_eq!(merged.view, Some(ViewModeArg::Split));
        assert_eq!(merged.word_goal, Some(250));
    }

    #[test]
    fn test_scroll_lock_defaults_on() {
        assert!(ConfigFlags::default().scroll_lock_enabled());
        let flags = ConfigFlags {
            no_sync: true,
            ..ConfigFlags::default()
        };
        assert!(!flags.scroll_lock_enabled());
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".tandemrc");
        let flags = ConfigFlags {
            sync: true,
            no_outline: true,
            no_autosave: true,
            view: Some(ViewModeArg::Preview),
            word_goal: Some(1000),
            ..ConfigFlags::default()
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }
}

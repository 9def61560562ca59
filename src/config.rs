use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::eval::Block;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// User overlay location, before tilde expansion.
const OVERLAY_PATH: &str = "~/.config/portfolio-term/config.toml";

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub restricted: RestrictedConfig,
    #[serde(default)]
    pub bonsai: BonsaiConfig,
    #[serde(default)]
    pub fortune: FortuneConfig,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub panels: Panels,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub prompt: String,
    /// Reported by `pwd`.
    #[serde(default)]
    pub home: String,
    #[serde(default)]
    pub history_limit: usize,
    #[serde(default)]
    pub log_level: String,
    /// May start with `~`; see [`Settings::log_path`].
    #[serde(default)]
    pub log_file: String,
}

impl Settings {
    /// Log file path with `~` and `$VARS` expanded. `None` when unset.
    pub fn log_path(&self) -> Option<PathBuf> {
        if self.log_file.trim().is_empty() {
            return None;
        }
        let expanded = shellexpand::full(&self.log_file)
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| shellexpand::tilde(&self.log_file).into_owned());
        Some(PathBuf::from(expanded))
    }
}

/// Commands answered with a joke refusal instead of running.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct RestrictedConfig {
    #[serde(default)]
    pub commands: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct BonsaiConfig {
    #[serde(default)]
    pub frames: u32,
    #[serde(default)]
    pub frame_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct FortuneConfig {
    #[serde(default)]
    pub quotes: Vec<String>,
}

/// A file in the virtual home directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// Content for the panel commands.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Panels {
    #[serde(default)]
    pub skills: Vec<Block>,
    #[serde(default)]
    pub projects: Vec<Block>,
    #[serde(default)]
    pub experience: Vec<Block>,
    #[serde(default)]
    pub contact: Vec<Block>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    restricted: RestrictedOverlay,
    #[serde(default)]
    bonsai: BonsaiOverlay,
    #[serde(default)]
    fortune: FortuneOverlay,
    /// Upserted by name.
    #[serde(default)]
    files: Vec<FileEntry>,
    #[serde(default)]
    remove_files: Vec<String>,
    #[serde(default)]
    panels: PanelsOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    prompt: Option<String>,
    home: Option<String>,
    history_limit: Option<usize>,
    log_level: Option<String>,
    log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RestrictedOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    commands: Vec<String>,
    #[serde(default)]
    remove_commands: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct BonsaiOverlay {
    frames: Option<u32>,
    frame_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct FortuneOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    quotes: Vec<String>,
    #[serde(default)]
    remove_quotes: Vec<String>,
}

/// Each present panel replaces the default one entirely.
#[derive(Debug, Deserialize, Default)]
struct PanelsOverlay {
    skills: Option<Vec<Block>>,
    projects: Option<Vec<Block>>,
    experience: Option<Vec<Block>>,
    contact: Option<Vec<Block>>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/portfolio-term/config.toml (if exists)
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    fn load_overlay() -> Option<ConfigOverlay> {
        let path = PathBuf::from(shellexpand::tilde(OVERLAY_PATH).into_owned());
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                // Logger is not up yet; it is configured from this file.
                eprintln!("portfolio-term: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        override_with(&mut self.settings.prompt, s.prompt);
        override_with(&mut self.settings.home, s.home);
        override_with(&mut self.settings.history_limit, s.history_limit);
        override_with(&mut self.settings.log_level, s.log_level);
        override_with(&mut self.settings.log_file, s.log_file);

        let r = overlay.restricted;
        let add: Vec<String> = r.commands.iter().map(|c| c.to_lowercase()).collect();
        merge_list(
            &mut self.restricted.commands,
            add,
            &r.remove_commands,
            r.replace,
        );

        override_with(&mut self.bonsai.frames, overlay.bonsai.frames);
        override_with(&mut self.bonsai.frame_ms, overlay.bonsai.frame_ms);

        let f = overlay.fortune;
        merge_list(&mut self.fortune.quotes, f.quotes, &f.remove_quotes, f.replace);

        self.files.retain(|file| !overlay.remove_files.contains(&file.name));
        for file in overlay.files {
            match self.files.iter_mut().find(|f| f.name == file.name) {
                Some(existing) => *existing = file,
                None => self.files.push(file),
            }
        }

        let p = overlay.panels;
        override_with(&mut self.panels.skills, p.skills);
        override_with(&mut self.panels.projects, p.projects);
        override_with(&mut self.panels.experience, p.experience);
        override_with(&mut self.panels.contact, p.contact);
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

use std::fs::OpenOptions;

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use crate::config::Settings;

/// Parse a level name; unknown names fall back to `Info`.
pub fn level_from_str(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Install a file logger appending to `settings.log_file`.
///
/// Best-effort: if the file cannot be opened or a logger is already set,
/// the terminal runs without logging. Returns whether a logger was installed.
pub fn init(settings: &Settings) -> bool {
    let level = level_from_str(&settings.log_level);
    if level == LevelFilter::Off {
        return false;
    }
    let Some(path) = settings.log_path() else {
        return false;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return false;
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();
    WriteLogger::init(level, config, file).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!(level_from_str("debug"), LevelFilter::Debug);
        assert_eq!(level_from_str(" WARN "), LevelFilter::Warn);
        assert_eq!(level_from_str("off"), LevelFilter::Off);
        assert_eq!(level_from_str("loud"), LevelFilter::Info);
    }

    #[test]
    fn off_installs_nothing() {
        let settings = Settings {
            log_level: "off".into(),
            log_file: "/nonexistent/dir/x.log".into(),
            ..Default::default()
        };
        assert!(!init(&settings));
    }

    #[test]
    fn unset_path_installs_nothing() {
        let settings = Settings {
            log_level: "info".into(),
            ..Default::default()
        };
        assert!(!init(&settings));
    }
}

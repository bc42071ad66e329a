use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_TITLE: &str = "Save Sven From Water Sheep!";
pub const DEFAULT_WIDTH: u32 = 1600;
pub const DEFAULT_HEIGHT: u32 = 1200;
pub const DEFAULT_ASSET_DIR: &str = "resources/textures";

pub const ASSETS_VAR: &str = "WATERSHEEP_ASSETS";
pub const WINDOW_VAR: &str = "WATERSHEEP_WINDOW";

/// Window and asset settings for the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub asset_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` finds. Bad values are logged and skipped.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup(ASSETS_VAR).filter(|d| !d.trim().is_empty()) {
            config.asset_dir = PathBuf::from(dir);
        }

        if let Some(size) = lookup(WINDOW_VAR) {
            match parse_window_size(&size) {
                Some((width, height)) => {
                    config.width = width;
                    config.height = height;
                }
                None => warn!(value = %size, var = WINDOW_VAR, "ignoring malformed window size"),
            }
        }

        config
    }
}

/// Parse `"<width>x<height>"`; both sides must be non-zero.
pub fn parse_window_size(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let width = w.trim().parse().ok().filter(|&w: &u32| w > 0)?;
    let height = h.trim().parse().ok().filter(|&h: &u32| h > 0)?;
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = GameConfig::from_lookup(|_| None);
        assert_eq!(config, GameConfig::default());
        assert_eq!((config.width, config.height), (1600, 1200));
        assert_eq!(config.title, "Save Sven From Water Sheep!");
        assert_eq!(config.asset_dir, PathBuf::from("resources/textures"));
    }

    #[test]
    fn overrides_apply() {
        let config = GameConfig::from_lookup(lookup_from(&[
            (ASSETS_VAR, "/tmp/tex"),
            (WINDOW_VAR, "800x600"),
        ]));
        assert_eq!(config.asset_dir, PathBuf::from("/tmp/tex"));
        assert_eq!((config.width, config.height), (800, 600));
    }

    #[test]
    fn malformed_window_is_ignored() {
        let config = GameConfig::from_lookup(lookup_from(&[(WINDOW_VAR, "huge")]));
        assert_eq!((config.width, config.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn window_size_parsing() {
        assert_eq!(parse_window_size("1024x768"), Some((1024, 768)));
        assert_eq!(parse_window_size(" 640 X 480 "), Some((640, 480)));
        assert_eq!(parse_window_size("0x480"), None);
        assert_eq!(parse_window_size("640x"), None);
        assert_eq!(parse_window_size("640*480"), None);
    }
}

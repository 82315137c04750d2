mod types;

pub use types::*;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// Returns the config directory: <platform config dir>/orient-cam/
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("orient-cam");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns the config file path: <platform config dir>/orient-cam/config.toml
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Parse a config from TOML text. Missing sections and keys take defaults.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    Ok(toml::from_str(contents)?)
}

/// Load config from disk, or return default if not found.
pub fn load_config() -> Result<AppConfig> {
    let path = config_path()?;
    if path.exists() {
        let contents = std::fs::read_to_string(&path)?;
        let config = parse_config(&contents)?;
        info!(?path, "Loaded config");
        Ok(config)
    } else {
        info!("No config found, using defaults");
        Ok(AppConfig::default())
    }
}

/// Save config to disk.
pub fn save_config(config: &AppConfig) -> Result<()> {
    let path = config_path()?;
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(&path, contents)?;
    info!(?path, "Saved config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [tracker]
            alpha_offset = 1.5

            [simulation]
            frame_rate_hz = 30
            permission = "deny"
            "#,
        )
        .unwrap();

        assert_eq!(config.tracker.alpha_offset, 1.5);
        assert_eq!(config.simulation.frame_rate_hz, 30);
        assert_eq!(config.simulation.permission, PermissionMode::Deny);
        assert_eq!(config.simulation.sensor_rate_hz, 50);
    }

    #[test]
    fn written_config_parses_back() {
        let mut config = AppConfig::default();
        config.simulation.screen_angle_deg = 90.0;
        config.simulation.permission = PermissionMode::Grant;
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(parse_config(&text).unwrap(), config);
    }

    #[test]
    fn unknown_permission_mode_is_rejected() {
        assert!(parse_config("[simulation]\npermission = \"maybe\"").is_err());
    }
}

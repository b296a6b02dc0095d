/// Configuration module for the Project Carousel launcher.
///
/// This module provides functionality for managing launcher configuration,
/// including:
/// - Locating the projects directory (defaults to `Jogos` next to the executable)
/// - The default icon shown for projects without an `icon.png`
/// - Poll interval and the optional forced-termination escape hatches
/// - Persisting configuration to disk as JSON
///
/// The configuration is loaded from a `launcher.json` file located in the
/// platform-specific config directory (%APPDATA%/ProjectCarousel/ on Windows).
/// A missing or unreadable file yields the defaults.
///
/// # Example
///
/// ```rust,no_run
/// use project_carousel::config::{load_config, save_config};
///
/// let mut config = load_config();
/// config.fullscreen = true;
/// save_config(&config).expect("Failed to save config");
/// ```
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the projects folder looked up next to the launcher executable
pub const DEFAULT_PROJECTS_FOLDER: &str = "Jogos";

const CONFIG_FILE: &str = "launcher.json";

/// Launcher configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LauncherConfig {
    /// Root folder holding one subfolder per project (None = `<exe dir>/Jogos`)
    pub projects_dir: Option<PathBuf>,
    /// Image shown for projects without an `icon.png`
    pub default_icon: Option<PathBuf>,
    /// Sort projects by folder name instead of directory listing order
    pub sort_projects: bool,
    /// Interval between exit checks while a project is running
    pub poll_interval_ms: u64,
    /// Kill a launched project after this many seconds (None = wait forever)
    pub max_run_secs: Option<u64>,
    /// Honor the force-stop key combination while a project is running
    pub allow_force_stop: bool,
    pub fullscreen: bool,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        LauncherConfig {
            projects_dir: None,
            default_icon: None,
            sort_projects: false,
            poll_interval_ms: 100,
            max_run_secs: None,
            allow_force_stop: false,
            fullscreen: false,
            window_width: 1280.0,
            window_height: 720.0,
        }
    }
}

impl LauncherConfig {
    /// Resolve the projects directory, falling back to `Jogos` beside the executable
    pub fn resolve_projects_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.projects_dir {
            return dir.clone();
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join(DEFAULT_PROJECTS_FOLDER)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECTS_FOLDER))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }

    pub fn max_run_time(&self) -> Option<Duration> {
        self.max_run_secs.map(Duration::from_secs)
    }

    /// Apply command line overrides on top of the file configuration
    ///
    /// Recognized flags: `--projects <dir>`, `--default-icon <png>`,
    /// `--fullscreen`, `--sort`. Unknown arguments are ignored.
    pub fn apply_args<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--projects" => {
                    let dir = args
                        .next()
                        .ok_or_else(|| anyhow!("--projects requires a directory"))?;
                    self.projects_dir = Some(PathBuf::from(dir));
                }
                "--default-icon" => {
                    let icon = args
                        .next()
                        .ok_or_else(|| anyhow!("--default-icon requires a file path"))?;
                    self.default_icon = Some(PathBuf::from(icon));
                }
                "--fullscreen" => self.fullscreen = true,
                "--sort" => self.sort_projects = true,
                other => tracing::debug!("Ignoring unknown argument: {}", other),
            }
        }

        Ok(())
    }
}

/// Get the launcher's config directory
/// Returns %APPDATA%/ProjectCarousel/ on Windows
pub fn get_config_directory() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "ProjectCarousel")
        .ok_or_else(|| anyhow!("Failed to determine user config directory"))?;

    Ok(project_dirs.config_dir().to_path_buf())
}

/// Load launcher configuration from launcher.json
/// Returns default config if file doesn't exist or on error
pub fn load_config() -> LauncherConfig {
    let Ok(config_dir) = get_config_directory() else {
        return LauncherConfig::default();
    };

    match load_config_from(&config_dir.join(CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Using default configuration: {:#}", e);
            LauncherConfig::default()
        }
    }
}

/// Load configuration from an explicit file path
///
/// A missing file is not an error and yields the defaults.
pub fn load_config_from(path: &Path) -> Result<LauncherConfig> {
    if !path.exists() {
        return Ok(LauncherConfig::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Save launcher configuration to launcher.json
pub fn save_config(config: &LauncherConfig) -> Result<()> {
    let config_dir = get_config_directory()?;

    fs::create_dir_all(&config_dir)
        .map_err(|e| anyhow!("Failed to create config directory: {}", e))?;

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

    fs::write(config_dir.join(CONFIG_FILE), json)
        .map_err(|e| anyhow!("Failed to write {}: {}", CONFIG_FILE, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LauncherConfig::default();
        assert_eq!(config.projects_dir, None);
        assert_eq!(config.max_run_secs, None);
        assert!(!config.allow_force_stop);
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_default_projects_dir_is_jogos() {
        let config = LauncherConfig::default();
        let dir = config.resolve_projects_dir();
        assert!(dir.ends_with(DEFAULT_PROJECTS_FOLDER));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "projects_dir": "/srv/kiosk", "max_run_secs": 600 }"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.projects_dir, Some(PathBuf::from("/srv/kiosk")));
        assert_eq!(config.max_run_time(), Some(Duration::from_secs(600)));
        assert_eq!(config.poll_interval_ms, 100);
        assert!(!config.fullscreen);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, LauncherConfig::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_args_override() {
        let mut config = LauncherConfig::default();
        config
            .apply_args(["--projects", "/games", "--fullscreen", "--sort", "--bogus"])
            .unwrap();

        assert_eq!(config.projects_dir, Some(PathBuf::from("/games")));
        assert!(config.fullscreen);
        assert!(config.sort_projects);
    }

    #[test]
    fn test_args_missing_value() {
        let mut config = LauncherConfig::default();
        assert!(config.apply_args(["--projects"]).is_err());
    }

    #[test]
    fn test_poll_interval_has_floor() {
        let config = LauncherConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
    }
}

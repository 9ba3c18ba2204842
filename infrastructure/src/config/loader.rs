//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use async_trait::async_trait;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::PathBuf;
use tally_application::{ConfigError, ConfigSource, PollSettings};
use tracing::debug;

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./tally.toml` or `./.tally.toml`
    /// 3. XDG config: `$XDG_CONFIG_HOME/twitch-tally/config.toml`
    /// 4. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().map_err(Box::new)
    }

    /// Load only default configuration (for `--no-config`)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("twitch-tally").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        for filename in &["tally.toml", ".tally.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./tally.toml or ./.tally.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

/// [`ConfigSource`] adapter that re-reads the merged file configuration
/// on every load, so an operator `reload` picks up edits.
pub struct FileConfigSource {
    config_path: Option<PathBuf>,
}

impl FileConfigSource {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }
}

#[async_trait]
impl ConfigSource for FileConfigSource {
    async fn load(&self) -> Result<PollSettings, ConfigError> {
        let config = ConfigLoader::load(self.config_path.as_ref())
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        debug!("loaded configuration: {:?}", config);
        Ok(config.poll_settings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tally_domain::{ChoiceMode, DisplayMode};

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.display.mode, DisplayMode::Scoreboard);
        assert!(!config.vote.single_choice);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("twitch-tally"));
    }

    #[test]
    fn test_explicit_path_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[display]\nmode = \"chat\"\nresults_display_secs = 10\n\n[vote]\nsingle_choice = true"
        )
        .unwrap();

        let config = ConfigLoader::load(Some(&path)).unwrap();
        assert_eq!(config.display.mode, DisplayMode::Chat);
        assert_eq!(config.display.results_display_secs, 10);
        // untouched keys keep their defaults
        assert_eq!(config.display.refresh_secs, 5);

        let settings = config.poll_settings();
        assert_eq!(settings.choice_mode, ChoiceMode::Single);
    }

    #[tokio::test]
    async fn test_file_config_source_maps_to_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(&path, "[display]\nmode = \"chat\"\n").unwrap();

        let source = FileConfigSource::new(Some(path));
        let settings = source.load().await.unwrap();
        assert_eq!(settings.display_mode, DisplayMode::Chat);
    }
}

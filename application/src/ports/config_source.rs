//! Configuration source port
//!
//! Settings are read once at startup and again on an explicit `reload`
//! command — never mid-poll.

use crate::config::PollSettings;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(String),
}

/// Source of [`PollSettings`]
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load(&self) -> Result<PollSettings, ConfigError>;
}

/// Config source that always returns a fixed settings value.
///
/// Used for `--no-config` runs and in tests.
pub struct StaticConfigSource(PollSettings);

impl StaticConfigSource {
    pub fn new(settings: PollSettings) -> Self {
        Self(settings)
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn load(&self) -> Result<PollSettings, ConfigError> {
        Ok(self.0.clone())
    }
}

use crate::error::AgentError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub table_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { table_size: 4 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub memory_slots: usize,
    pub steps: usize,
    pub training_rounds: usize,
    pub discount_rate: f64,
    pub batch_size: usize,
    pub learning_rate: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            memory_slots: 1000,
            steps: 50,
            training_rounds: 10,
            discount_rate: 0.95,
            batch_size: 32,
            learning_rate: 1e-3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub no_delay: bool,
    /// Inter-step pacing delay in milliseconds.
    pub training_delay: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            no_delay: false,
            training_delay: 50,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub ai: AiConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Loads the configuration from a JSON file, falling back to the
    /// defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AgentError> {
        if !path.as_ref().exists() {
            return Ok(AppConfig::default());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AgentError> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::gate::DEFAULT_INTERVAL_MS;

// NOT 게이트가 입력을 읽는 면
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotInput {
    // 왼쪽 면
    #[default]
    Default,
    // 출력 반대쪽 면
    Opposite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // 켜면 매 틱 갱신, 아니면 두 틱마다
    pub fast_mode: bool,
    pub not_gate_input: NotInput,
    // 켜면 방향이 맞는 가루, 중계기, 비교기만 입력으로 인정
    pub redstone_compatibility: bool,
    pub tick_millis: u64,
    pub default_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fast_mode: false,
            not_gate_input: NotInput::Default,
            redstone_compatibility: false,
            tick_millis: 50,
            default_interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> eyre::Result<Self> {
        if !path.exists() {
            tracing::info!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let config: Self = serde_json::from_str(&fs::read_to_string(path)?)?;
        config.verify()?;

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> eyre::Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn verify(&self) -> eyre::Result<()> {
        eyre::ensure!(self.tick_millis >= 1, "tick_millis must be at least 1");
        eyre::ensure!(
            self.default_interval_ms >= 1,
            "default_interval_ms must be at least 1"
        );
        Ok(())
    }

    pub fn cooldown_ticks(&self) -> u64 {
        if self.fast_mode {
            1
        } else {
            2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unittest_partial_config_uses_defaults() -> eyre::Result<()> {
        let config: EngineConfig =
            serde_json::from_str(r#"{"fast_mode": true, "not_gate_input": "opposite"}"#)?;

        assert!(config.fast_mode);
        assert_eq!(config.not_gate_input, NotInput::Opposite);
        assert_eq!(config.tick_millis, 50);
        assert!(!config.redstone_compatibility);
        assert_eq!(config.cooldown_ticks(), 1);
        assert_eq!(EngineConfig::default().cooldown_ticks(), 2);

        Ok(())
    }

    #[test]
    fn unittest_config_file() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");

        assert_eq!(EngineConfig::load(&path)?, EngineConfig::default());

        let config = EngineConfig {
            tick_millis: 100,
            redstone_compatibility: true,
            ..Default::default()
        };
        config.save(&path)?;
        assert_eq!(EngineConfig::load(&path)?, config);

        std::fs::write(&path, r#"{"tick_millis": 0}"#)?;
        assert!(EngineConfig::load(&path).is_err());

        std::fs::write(&path, "not json")?;
        assert!(EngineConfig::load(&path).is_err());

        Ok(())
    }
}

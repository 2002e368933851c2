/// Difficulty presets and the session parameters a match is built from.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::TICK_MS;
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Impossible,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Impossible,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Impossible => "Impossible",
        }
    }

    // ── Difficulty table ─────────────────────────────────────────────────────

    pub fn params(self) -> SessionParams {
        let (enemy_move_ms, enemy_fire_ms, boss_move_ms, boss_fire_ms, boss_health) = match self {
            Difficulty::Easy => (600, 600, 30, 1000, 20),
            Difficulty::Medium => (550, 400, 30, 750, 25),
            Difficulty::Hard => (500, 200, 20, 400, 30),
            Difficulty::Impossible => (450, 100, 10, 300, 40),
        };
        SessionParams {
            enemy_move_ms,
            enemy_fire_ms,
            boss_move_ms,
            boss_fire_ms,
            boss_health,
        }
    }
}

/// Everything that varies between matches.  Intervals are in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub enemy_move_ms: u32,
    pub enemy_fire_ms: u32,
    pub boss_move_ms: u32,
    pub boss_fire_ms: u32,
    pub boss_health: u32,
}

impl SessionParams {
    /// Read custom parameters from a JSON file and validate them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let params: SessionParams =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("enemy_move_ms", self.enemy_move_ms),
            ("enemy_fire_ms", self.enemy_fire_ms),
            ("boss_move_ms", self.boss_move_ms),
            ("boss_fire_ms", self.boss_fire_ms),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(ConfigError::ZeroInterval { field });
            }
            if value % TICK_MS != 0 {
                return Err(ConfigError::UnalignedInterval {
                    field,
                    value,
                    step: TICK_MS,
                });
            }
        }
        if self.boss_health == 0 {
            return Err(ConfigError::ZeroBossHealth);
        }
        Ok(())
    }
}

impl Default for SessionParams {
    fn default() -> Self {
        Difficulty::Easy.params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn presets_are_valid() {
        for d in Difficulty::ALL {
            d.params().validate().unwrap();
        }
    }

    #[test]
    fn presets_get_harder() {
        let easy = Difficulty::Easy.params();
        let impossible = Difficulty::Impossible.params();
        assert!(impossible.enemy_move_ms < easy.enemy_move_ms);
        assert!(impossible.enemy_fire_ms < easy.enemy_fire_ms);
        assert!(impossible.boss_health > easy.boss_health);
    }

    #[test]
    fn zero_interval_rejected() {
        let params = SessionParams {
            boss_fire_ms: 0,
            ..Difficulty::Hard.params()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::ZeroInterval { field: "boss_fire_ms" })
        ));
    }

    #[test]
    fn unaligned_interval_rejected() {
        let params = SessionParams {
            enemy_move_ms: 333,
            ..Difficulty::Hard.params()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::UnalignedInterval { value: 333, .. })
        ));
    }

    #[test]
    fn zero_boss_health_rejected() {
        let params = SessionParams {
            boss_health: 0,
            ..Difficulty::Easy.params()
        };
        assert!(matches!(params.validate(), Err(ConfigError::ZeroBossHealth)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"enemy_move_ms":400,"enemy_fire_ms":150,"boss_move_ms":15,"boss_fire_ms":250,"boss_health":50}}"#
        )
        .unwrap();
        let params = SessionParams::load(file.path()).unwrap();
        assert_eq!(params.boss_health, 50);
        assert_eq!(params.boss_move_ms, 15);
    }

    #[test]
    fn load_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            SessionParams::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            SessionParams::load(&missing),
            Err(ConfigError::Read { .. })
        ));
    }
}

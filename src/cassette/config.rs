//! Per-port cassette selection for replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Which cassette file serves each port. A port left as `None` is wired to
/// an adapter that panics when called.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Cassette for the `classifier` port.
    pub classifier: Option<PathBuf>,
    /// Cassette for the `schedule` port.
    pub schedule: Option<PathBuf>,
    /// Cassette for the `clock` port.
    pub clock: Option<PathBuf>,
}

/// Loaded replayers, one per configured port.
pub struct PortReplayers {
    /// Replayer for the `classifier` port.
    pub classifier: Option<CassetteReplayer>,
    /// Replayer for the `schedule` port.
    pub schedule: Option<CassetteReplayer>,
    /// Replayer for the `clock` port.
    pub clock: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// A config with no cassettes; every port panics on use.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Points every port at the `<port>.cassette.yaml` files of a
    /// recording directory, skipping files that do not exist.
    #[must_use]
    pub fn from_recording_dir(dir: &Path) -> Self {
        let existing = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self {
            classifier: existing("classifier"),
            schedule: existing("schedule"),
            clock: existing("clock"),
        }
    }

    /// Loads every configured cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        let load = |path: &Option<PathBuf>| {
            path.as_deref().map(|p| Cassette::load(p).map(|c| CassetteReplayer::new(&c))).transpose()
        };
        Ok(PortReplayers {
            classifier: load(&self.classifier)?,
            schedule: load(&self.schedule)?,
            clock: load(&self.clock)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;

    fn write_cassette(path: &Path, port: &str, method: &str, output: serde_json::Value) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: port.into(),
                method: method.into(),
                input: json!({}),
                output,
            }],
        };
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    #[test]
    fn loads_only_configured_ports() {
        let dir = std::env::temp_dir().join("schedb_config_test_ports");
        std::fs::create_dir_all(&dir).unwrap();
        let schedule = dir.join("schedule.cassette.yaml");
        write_cassette(&schedule, "schedule", "find", json!({"Ok": {"items": []}}));

        let config = CassetteConfig { schedule: Some(schedule), ..CassetteConfig::default() };
        let mut replayers = config.load_all().unwrap();

        let interaction = replayers.schedule.as_mut().unwrap().next_interaction("schedule", "find");
        assert_eq!(interaction.output, json!({"Ok": {"items": []}}));
        assert!(replayers.classifier.is_none());
        assert!(replayers.clock.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn recording_dir_picks_up_existing_files() {
        let dir = std::env::temp_dir().join("schedb_config_test_dir");
        std::fs::create_dir_all(&dir).unwrap();
        write_cassette(&dir.join("clock.cassette.yaml"), "clock", "now", json!("2024-01-01T00:00:00Z"));

        let config = CassetteConfig::from_recording_dir(&dir);
        assert!(config.clock.is_some());
        assert!(config.classifier.is_none());
        assert!(config.schedule.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_an_error() {
        let config = CassetteConfig {
            classifier: Some(PathBuf::from("/nonexistent/classifier.cassette.yaml")),
            ..CassetteConfig::default()
        };
        assert!(config.load_all().is_err());
    }
}

//! On-disk cassette structure.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One call made through a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position within the recording, assigned by the recorder.
    pub seq: u64,
    /// Port name: `classifier`, `schedule` or `clock`.
    pub port: String,
    /// Method invoked on the port.
    pub method: String,
    /// Arguments of the call.
    pub input: serde_json::Value,
    /// What the port returned.
    pub output: serde_json::Value,
}

/// A named, timestamped list of interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Source revision at recording time, or `unknown`.
    pub commit: String,
    /// Interactions in call order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads and parses a YAML cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }

    /// Number of interactions recorded for `port`.
    #[must_use]
    pub fn count_for(&self, port: &str) -> usize {
        self.interactions.iter().filter(|i| i.port == port).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lookup_cassette() -> Cassette {
        Cassette {
            name: "lookup-0901".into(),
            recorded_at: Utc::now(),
            commit: "abc123".into(),
            interactions: vec![
                Interaction {
                    seq: 0,
                    port: "schedule".into(),
                    method: "find".into(),
                    input: json!({"hs_code": "0901"}),
                    output: json!({"Ok": {"items": [{"code": "0901", "desc": "Coffee"}]}}),
                },
                Interaction {
                    seq: 1,
                    port: "clock".into(),
                    method: "now".into(),
                    input: json!(null),
                    output: json!("2024-03-01T12:00:00Z"),
                },
            ],
        }
    }

    #[test]
    fn load_reads_what_serde_yaml_wrote() {
        let dir = std::env::temp_dir().join("schedb_format_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("lookup.cassette.yaml");
        let cassette = lookup_cassette();
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        assert_eq!(Cassette::load(&path).unwrap(), cassette);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Cassette::load(Path::new("/nonexistent/schedb.cassette.yaml")).unwrap_err();
        assert!(err.starts_with("Failed to read cassette file"));
    }

    #[test]
    fn counts_interactions_per_port() {
        let cassette = lookup_cassette();
        assert_eq!(cassette.count_for("schedule"), 1);
        assert_eq!(cassette.count_for("classifier"), 0);
    }
}

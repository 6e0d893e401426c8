//! Editor Configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// After a cross-category move, also save the source category's order.
    /// The store already compacts the source, so this is off by default.
    pub persist_source_order_on_transfer: bool,
    /// Reload from the store when a drag ends without a target, instead of
    /// moving the node back locally
    pub refetch_on_abandon: bool,
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid editor config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert!(!config.persist_source_order_on_transfer);
    }

    #[test]
    fn test_reads_flags() {
        let config = EditorConfig::from_json(r#"{"refetch_on_abandon": true}"#).unwrap();
        assert!(config.refetch_on_abandon);
        assert!(EditorConfig::from_json("[]").is_err());
    }
}

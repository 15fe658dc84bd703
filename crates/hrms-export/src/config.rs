use serde::{Deserialize, Serialize};

/// Layout used for exported timestamps unless overridden
pub const DEFAULT_TIMESTAMP_PATTERN: &str = "%Y-%m-%d %H:%M:%S";

/// Knobs for an export run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// chrono strftime pattern for timestamp columns
    pub timestamp_pattern: String,

    /// Whether to prefix the artifact with a UTF-8 byte-order-mark
    pub include_bom: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            timestamp_pattern: DEFAULT_TIMESTAMP_PATTERN.to_string(),
            include_bom: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ExportOptions::default();
        assert_eq!(options.timestamp_pattern, "%Y-%m-%d %H:%M:%S");
        assert!(options.include_bom);
    }

    #[test]
    fn test_partial_options_fill_defaults() {
        let options: ExportOptions =
            serde_json::from_str(r#"{"timestamp_pattern": "%d/%m/%Y"}"#).unwrap();
        assert_eq!(options.timestamp_pattern, "%d/%m/%Y");
        assert!(options.include_bom);
    }
}

//! INI file configuration adapter for limits and scenario files.

use crate::domain::error::RiskGateError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RiskGateError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| RiskGateError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, RiskGateError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| RiskGateError::ConfigParse {
                file: "<string>".into(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn sections(&self) -> Vec<String> {
        let mut names = self.config.sections();
        names.sort();
        names
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[trader]
name = John Trader
jurisdiction = US

[order]
symbol = AAPL
quantity = 1000
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("trader", "name"),
            Some("John Trader".to_string())
        );
        assert_eq!(adapter.get_int("order", "quantity", 0), 1000);
        assert_eq!(adapter.sections(), vec!["order", "trader"]);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[order]\nmax_order_value = 100\n").unwrap();
        assert_eq!(adapter.get_string("order", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[order]\nmax_trades_per_day = abc\n").unwrap();
        assert_eq!(adapter.get_int("order", "max_trades_per_day", 42), 42);
        assert_eq!(adapter.get_int("order", "missing", 7), 7);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[daily_loss]\nmax_daily_loss = 250000.5\n").unwrap();
        assert_eq!(
            adapter.get_double("daily_loss", "max_daily_loss", 0.0),
            250000.5
        );
        assert_eq!(adapter.get_double("daily_loss", "missing", 99.9), 99.9);
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[trader]\na = true\nb = Yes\nc = 1\nd = false\ne = no\nf = 0\ng = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("trader", "a", false));
        assert!(adapter.get_bool("trader", "b", false));
        assert!(adapter.get_bool("trader", "c", false));
        assert!(!adapter.get_bool("trader", "d", true));
        assert!(!adapter.get_bool("trader", "e", true));
        assert!(!adapter.get_bool("trader", "f", true));
        assert!(adapter.get_bool("trader", "g", true));
    }

    #[test]
    fn list_values_are_normalised() {
        let adapter = FileConfigAdapter::from_string(
            "[eligibility]\nrestricted_jurisdictions = restricted, Sanctioned ,,\n",
        )
        .unwrap();
        assert_eq!(
            adapter.get_list("eligibility", "restricted_jurisdictions"),
            Some(vec!["RESTRICTED".to_string(), "SANCTIONED".to_string()])
        );
        assert_eq!(adapter.get_list("eligibility", "missing"), None);
    }

    #[test]
    fn has_key_ignores_blank_values() {
        let adapter = FileConfigAdapter::from_string("[request]\nvenue =\nproduct = DERIVATIVES\n")
            .unwrap();
        assert!(!adapter.has_key("request", "venue"));
        assert!(adapter.has_key("request", "product"));
        assert!(!adapter.has_key("request", "missing"));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[market]\nvix_halt_threshold = 35\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_double("market", "vix_halt_threshold", 0.0), 35.0);
    }

    #[test]
    fn from_file_returns_parse_error_for_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/limits.ini").unwrap_err();
        assert!(
            matches!(err, RiskGateError::ConfigParse { ref file, .. } if file.contains("limits.ini"))
        );
        assert_eq!(err.exit_status(), 2);
    }
}

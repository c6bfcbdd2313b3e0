use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Error;

pub const DEFAULT_KEEP_LAST_N: u32 = 2;

/// Backup list printed by `--example`.
pub const EXAMPLE_CONFIG: &str = r#"
[
	{"path":"./testdata/files", "Filename":"E08",    "suffix":"-FULL.bak",  "Days":2},
	{"path":"./testdata/files", "Filename":"A2",     "suffix":"-FULL.bak",  "Days":10},
	{"path":"./testdata/files", "Filename":"A2",     "suffix":"-differ.dif", "Days":1},
	{"path":"./testdata/files/bases116", "Filename":"dbase1", "suffix":"-FULL.bak",  "Days":5},
	{"path":"./testdata/files/bases116", "Filename":"dbase1", "suffix":"-differ.dif", "Days":1}
]
"#;

/// One line of the backup list: a database whose files named
/// `<database>_<timestamp><suffix>` live in `directory`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigEntry {
    #[serde(rename = "path")]
    pub directory: PathBuf,
    #[serde(rename = "Filename")]
    pub database: String,
    pub suffix: String,
    /// Informational only. Retention is decided by the keep count.
    #[serde(rename = "Days", default)]
    pub retention_days: u32,
}

/// Runtime knobs, layered as defaults < `Pruner.*` file < `PRUNER_*` env.
/// Command line flags are applied on top by the binary.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub keep_last_n: u32,
    pub delete_archived: bool,
    pub dry_run: bool,
    pub log_file: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            keep_last_n: DEFAULT_KEEP_LAST_N,
            delete_archived: false,
            dry_run: false,
            log_file: None,
        }
    }
}

pub fn load_settings() -> Result<AppSettings, ConfigError> {
    Config::builder()
        .set_default("keep_last_n", DEFAULT_KEEP_LAST_N as i64)?
        .set_default("delete_archived", false)?
        .set_default("dry_run", false)?
        .add_source(ConfigFile::with_name("Pruner").required(false))
        .add_source(Environment::with_prefix("PRUNER").try_parsing(true))
        .build()?
        .try_deserialize::<AppSettings>()
}

/// Read and validate the backup list at `path`.
pub fn load_backup_list(path: &Path) -> Result<Vec<ConfigEntry>, Error> {
    let text = fs::read_to_string(path)?;
    parse_backup_list(&text, path)
}

pub fn parse_backup_list(text: &str, source: &Path) -> Result<Vec<ConfigEntry>, Error> {
    let entries: Vec<ConfigEntry> = serde_json::from_str(text)?;
    if entries.is_empty() {
        return Err(Error::EmptyConfig(source.to_path_buf()));
    }

    for (index, entry) in entries.iter().enumerate() {
        let reason = if entry.directory.as_os_str().is_empty() {
            "empty path"
        } else if entry.database.is_empty() {
            "empty Filename"
        } else if entry.suffix.is_empty() {
            "empty suffix"
        } else {
            debug!(
                "{}: {}*{} ({} days)",
                entry.directory.display(),
                entry.database,
                entry.suffix,
                entry.retention_days
            );
            continue;
        };
        return Err(Error::InvalidEntry {
            index,
            reason: reason.to_string(),
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_parses() {
        let entries = parse_backup_list(EXAMPLE_CONFIG, Path::new("example")).unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[2].database, "A2");
        assert_eq!(entries[2].suffix, "-differ.dif");
        assert_eq!(entries[3].directory, PathBuf::from("./testdata/files/bases116"));
        assert_eq!(entries[3].retention_days, 5);
    }

    #[test]
    fn test_days_is_optional() {
        let text = r#"[{"path":"/b","Filename":"db","suffix":"-FULL.bak"}]"#;
        let entries = parse_backup_list(text, Path::new("c.json")).unwrap();
        assert_eq!(entries[0].retention_days, 0);
    }

    #[test]
    fn test_empty_list_is_rejected() {
        let err = parse_backup_list("[]", Path::new("c.json")).unwrap_err();
        assert!(matches!(err, Error::EmptyConfig(_)));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = parse_backup_list("{not json", Path::new("c.json")).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("Config file read error:"));
    }

    #[test]
    fn test_blank_suffix_is_rejected() {
        let text = r#"[
            {"path":"/b","Filename":"db","suffix":"-FULL.bak"},
            {"path":"/b","Filename":"db","suffix":""}
        ]"#;
        match parse_backup_list(text, Path::new("c.json")) {
            Err(Error::InvalidEntry { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidEntry, got {:?}", other),
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.keep_last_n, 2);
        assert!(!settings.delete_archived);
        assert!(!settings.dry_run);
        assert!(settings.log_file.is_none());
    }
}

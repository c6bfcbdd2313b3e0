use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::index::DirectoryConfig;
use crate::scanner::CatalogEntry;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";
const TIMESTAMP_LEN: usize = 19;
const TIMESTAMP_WITH_MILLIS_LEN: usize = 23;

/// Identifies one backup series: files of the same database and suffix
/// living in the same directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub directory: PathBuf,
    pub database: String,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Group(GroupKey),
    Unclassified,
}

/// A directory listing split into backup series and everything else.
#[derive(Debug, Default)]
pub struct Grouping<'a> {
    pub groups: BTreeMap<GroupKey, Vec<&'a CatalogEntry>>,
    pub unclassified: Vec<&'a CatalogEntry>,
}

/// Attribute `entry` to a configured (database, suffix) pair of its directory.
///
/// A backup is named `<database>_<timestamp><suffix>`, the timestamp being
/// `YYYY-MM-DDTHH-MM-SS` with optional `-mmm` milliseconds. Longer database
/// names are tried first, so `buh_log3_...` belongs to `buh_log3` even when
/// `buh` is configured too.
pub fn classify(entry: &CatalogEntry, config: &DirectoryConfig) -> Classification {
    if entry.is_dir {
        return Classification::Unclassified;
    }

    for database in config.databases_longest_first() {
        let Some(rest) = entry
            .name
            .strip_prefix(database.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
        else {
            continue;
        };

        for suffix in config.suffixes_longest_first() {
            if !config.knows(database, suffix) {
                continue;
            }
            match rest.strip_suffix(suffix.as_str()) {
                Some(timestamp) if is_backup_timestamp(timestamp) => {
                    return Classification::Group(GroupKey {
                        directory: entry.directory.clone(),
                        database: database.clone(),
                        suffix: suffix.clone(),
                    });
                }
                _ => continue,
            }
        }
    }

    Classification::Unclassified
}

pub fn group_directory<'a>(entries: &'a [CatalogEntry], config: &DirectoryConfig) -> Grouping<'a> {
    let mut grouping = Grouping::default();

    for entry in entries {
        match classify(entry, config) {
            Classification::Group(key) => grouping.groups.entry(key).or_default().push(entry),
            Classification::Unclassified => grouping.unclassified.push(entry),
        }
    }

    grouping
}

fn is_backup_timestamp(timestamp: &str) -> bool {
    if !timestamp.is_ascii() {
        return false;
    }

    let base = match timestamp.len() {
        TIMESTAMP_LEN => timestamp,
        TIMESTAMP_WITH_MILLIS_LEN => {
            let (base, millis) = timestamp.split_at(TIMESTAMP_LEN);
            let digits = &millis[1..];
            if !millis.starts_with('-') || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return false;
            }
            base
        }
        _ => return false,
    };

    // chrono alone accepts single-digit fields; the shape has to be fixed
    // width for name order to follow time order.
    let shape_ok = base.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 | 13 | 16 => b == b'-',
        10 => b == b'T',
        _ => b.is_ascii_digit(),
    });

    shape_ok && NaiveDateTime::parse_from_str(base, TIMESTAMP_FORMAT).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigEntry;
    use crate::index::ConfigIndex;
    use std::path::Path;

    fn index(pairs: &[(&str, &str)]) -> ConfigIndex {
        let entries: Vec<ConfigEntry> = pairs
            .iter()
            .map(|(db, suffix)| ConfigEntry {
                directory: PathBuf::from("/backups"),
                database: db.to_string(),
                suffix: suffix.to_string(),
                retention_days: 1,
            })
            .collect();
        ConfigIndex::new(&entries)
    }

    fn classify_name(index: &ConfigIndex, name: &str) -> Classification {
        let config = index.directory(Path::new("/backups")).unwrap();
        classify(&CatalogEntry::file("/backups", name, false), config)
    }

    fn key(db: &str, suffix: &str) -> Classification {
        Classification::Group(GroupKey {
            directory: PathBuf::from("/backups"),
            database: db.to_string(),
            suffix: suffix.to_string(),
        })
    }

    #[test]
    fn test_full_and_differential_groups() {
        let index = index(&[("dbase1", "-FULL.rar"), ("dbase1", "-differ.rar")]);
        assert_eq!(
            classify_name(&index, "dbase1_2021-08-01T17-37-00-360-FULL.rar"),
            key("dbase1", "-FULL.rar")
        );
        assert_eq!(
            classify_name(&index, "dbase1_2021-08-09T10-03-00-700-differ.rar"),
            key("dbase1", "-differ.rar")
        );
        assert_eq!(
            classify_name(&index, "dbase1_2021-08-01T12-12-12-FULL.rar"),
            key("dbase1", "-FULL.rar")
        );
    }

    #[test]
    fn test_longest_database_name_wins() {
        let index = index(&[("buh", "-FULL.rar"), ("buh_log3", "-FULL.rar")]);
        assert_eq!(
            classify_name(&index, "buh_log3_2021-08-06T17-40-00-370-FULL.rar"),
            key("buh_log3", "-FULL.rar")
        );
        assert_eq!(
            classify_name(&index, "buh_2021-08-06T17-40-00-370-FULL.rar"),
            key("buh", "-FULL.rar")
        );
    }

    #[test]
    fn test_non_ascii_database_names() {
        let index = index(&[("зап_в_кам", "-differ.rar")]);
        assert_eq!(
            classify_name(&index, "зап_в_кам_2021-08-09T10-04-00-750-differ.rar"),
            key("зап_в_кам", "-differ.rar")
        );
    }

    #[test]
    fn test_suffix_must_be_configured_for_that_database() {
        let index = index(&[("A2", "-FULL.bak"), ("E08", "-differ.dif")]);
        assert_eq!(
            classify_name(&index, "A2_2021-08-01T17-37-00-differ.dif"),
            Classification::Unclassified
        );
    }

    #[test]
    fn test_malformed_names_are_unclassified() {
        let index = index(&[("dbase1", "-FULL.rar")]);
        for name in [
            "dbase1_20210-222-3-FULL.rar",
            "dbase1_2021-13-01T12-12-12-FULL.rar",
            "dbase1_2021-8-1T12-12-12-FULL.rar",
            "dbase1-2021-08-01T12-12-12-FULL.rar",
            "dbase1_2021-08-01T12-12-12-FULL.rar.tmp",
            "dbase1_2021-08-01T12-12-12-36-FULL.rar",
            "unrelated.log",
            "Monitor.7z",
        ] {
            assert_eq!(classify_name(&index, name), Classification::Unclassified, "{name}");
        }
    }

    #[test]
    fn test_directories_are_unclassified() {
        let index = index(&[("dbase1", "-FULL.rar")]);
        let config = index.directory(Path::new("/backups")).unwrap();
        let mut entry = CatalogEntry::file("/backups", "dbase1_2021-08-01T12-12-12-FULL.rar", false);
        entry.is_dir = true;
        assert_eq!(classify(&entry, config), Classification::Unclassified);
    }

    #[test]
    fn test_group_directory_splits_entries() {
        let index = index(&[("dbase1", "-FULL.rar"), ("dbase1", "-differ.rar")]);
        let config = index.directory(Path::new("/backups")).unwrap();
        let entries = vec![
            CatalogEntry::file("/backups", "dbase1_2021-08-01T12-12-12-FULL.rar", false),
            CatalogEntry::file("/backups", "dbase1_2021-08-02T12-12-12-FULL.rar", false),
            CatalogEntry::file("/backups", "dbase1_2021-08-03T12-12-12-differ.rar", false),
            CatalogEntry::file("/backups", "beego.go", false),
        ];

        let grouping = group_directory(&entries, config);

        assert_eq!(grouping.groups.len(), 2);
        assert_eq!(grouping.unclassified.len(), 1);
        assert_eq!(grouping.unclassified[0].name, "beego.go");
    }
}

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{ArcPath, arc_path, log::LogLevel, repository::Latency};

/// Contents of the configuration file.
///
/// Every key is optional: a missing section or key takes its default, so an
/// empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Data {
    pub log: LogSection,
    pub repository: RepositorySection,
}

/// `[log]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub dir: PathBuf,
    /// Lowest level echoed on stderr when the program exits
    pub level: LogLevel,
    /// Days a log file is kept, `0` keeps them forever
    pub max_age: usize,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("/tmp/articles/logs"),
            level: LogLevel::Warning,
            max_age: 0,
        }
    }
}

/// `[repository]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySection {
    /// Article catalog, the bundled one is used when it cannot be read
    pub catalog: PathBuf,
    pub article_delay_ms: u64,
    pub content_delay_ms: u64,
}

impl Default for RepositorySection {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("/tmp/articles/catalog.toml"),
            article_delay_ms: 300,
            content_delay_ms: 1200,
        }
    }
}

impl Data {
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn log_dir(&self) -> ArcPath {
        arc_path(&self.log.dir)
    }

    pub fn catalog_path(&self) -> ArcPath {
        arc_path(&self.repository.catalog)
    }

    /// Delays applied by the repository to the remote sources.
    pub fn latency(&self) -> Latency {
        Latency::from_millis(
            self.repository.article_delay_ms,
            self.repository.content_delay_ms,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let data = Data::parse("").unwrap();
        assert_eq!(data, Data::default());
        assert_eq!(data.log.level, LogLevel::Warning);
        assert_eq!(data.log_dir(), arc_path("/tmp/articles/logs"));
        assert!(data.latency().article < data.latency().content);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let data = Data::parse("[repository]\ncontent_delay_ms = 5\n").unwrap();
        assert_eq!(data.latency().content, Duration::from_millis(5));
        assert_eq!(data.latency().article, Duration::from_millis(300));
        assert_eq!(data.log, LogSection::default());
    }

    #[test]
    fn test_written_file_reads_back() {
        let mut data = Data::default();
        data.log.level = LogLevel::Info;
        data.repository.catalog = PathBuf::from("/srv/catalog.toml");

        let written = data.to_toml().unwrap();
        assert!(written.contains("[repository]"));
        assert_eq!(Data::parse(&written).unwrap(), data);
    }
}

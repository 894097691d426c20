use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ArcPath, fs::Fs};

const SAMPLE_CATALOG: &str = include_str!("../../samples/catalog.toml");

/// Article metadata as served by the remote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleData {
    pub id: String,
    pub title: String,
    pub share_link: String,
    pub category: String,
    #[serde(default)]
    pub category_icon: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
}

/// A renderable block of article content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading {
        text: String,
    },
    Paragraph {
        text: String,
    },
    Quote {
        text: String,
    },
    Image {
        url: String,
        #[serde(default)]
        caption: Option<String>,
    },
}

impl ContentBlock {
    /// The text a reader sees for this block. Images contribute their caption.
    pub fn plain_text(&self) -> &str {
        match self {
            Self::Heading { text } | Self::Paragraph { text } | Self::Quote { text } => text,
            Self::Image { caption, .. } => caption.as_deref().unwrap_or_default(),
        }
    }
}

/// Per-user, per-article flags kept in the local store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePersonalInfo {
    pub is_like: bool,
    pub is_bookmark: bool,
}

/// Display preferences shared by every open article screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub is_dark_mode: bool,
    pub is_big_text: bool,
}

/// Simulated latency of the remote sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latency {
    pub article: Duration,
    pub content: Duration,
}

impl Latency {
    pub fn from_millis(article: u64, content: u64) -> Self {
        Self {
            article: Duration::from_millis(article),
            content: Duration::from_millis(content),
        }
    }
}

/// One article of the catalog: its metadata and its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub article: ArticleData,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// The set of articles the repository can serve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, rename = "article")]
    pub articles: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("Parsing article catalog")
    }

    /// The catalog bundled with the binary.
    pub fn sample() -> anyhow::Result<Self> {
        Self::parse(SAMPLE_CATALOG)
    }

    /// Reads and parses a catalog file.
    pub async fn load(fs: &Fs, path: ArcPath) -> anyhow::Result<Self> {
        let contents = fs
            .read_to_string(path.clone())
            .await
            .with_context(|| format!("Reading article catalog {}", path.display()))?;
        Self::parse(&contents)
    }
}

/// Failures of repository mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("unknown article '{0}'")]
    UnknownArticle(String),
    #[error("the local store is unavailable")]
    Unavailable,
}

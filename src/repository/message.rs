use tokio::sync::{oneshot, watch};

use crate::ArcStr;

use super::data::{AppSettings, ArticleData, ArticlePersonalInfo, ContentBlock, RepositoryError};

/// Messages that can be sent to the repository actor.
///
/// Source requests answer with a `watch` receiver: the current value plus
/// every later emission of that source.
#[derive(Debug)]
pub enum Message {
    /// Subscribe to the metadata of an article
    GetArticle {
        id: ArcStr,
        tx: oneshot::Sender<watch::Receiver<Option<ArticleData>>>,
    },
    /// Subscribe to the content of an article
    LoadArticleContent {
        id: ArcStr,
        tx: oneshot::Sender<watch::Receiver<Option<Vec<ContentBlock>>>>,
    },
    /// Subscribe to the personal info of an article
    LoadArticlePersonalInfo {
        id: ArcStr,
        tx: oneshot::Sender<watch::Receiver<Option<ArticlePersonalInfo>>>,
    },
    /// Subscribe to the shared app settings
    GetAppSettings {
        tx: oneshot::Sender<watch::Receiver<Option<AppSettings>>>,
    },
    /// Replace the personal info of an article
    UpdateArticlePersonalInfo {
        id: ArcStr,
        info: ArticlePersonalInfo,
        tx: oneshot::Sender<Result<(), RepositoryError>>,
    },
    /// Replace the shared app settings
    UpdateSettings {
        settings: AppSettings,
        tx: oneshot::Sender<Result<(), RepositoryError>>,
    },
    /// List the metadata of every article in the catalog
    Articles {
        tx: oneshot::Sender<Vec<ArticleData>>,
    },
}

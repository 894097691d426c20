use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot, watch};

use crate::{ArcStr, log::Log};
use message::Message;

mod core;
mod data;
mod message;
mod mock;
#[cfg(test)]
mod tests;

pub use data::{
    AppSettings, ArticleData, ArticlePersonalInfo, Catalog, CatalogEntry, ContentBlock, Latency,
    RepositoryError,
};
pub use mock::MockData;

/// The repository actor: the data layer behind every article screen.
///
/// Each read returns a `watch` receiver that holds the latest value of that
/// source (`None` while it is not available yet) and is notified of every
/// later emission. Writes replace the stored value and re-emit it through the
/// matching source, so screens learn about their own writes the same way
/// they learn about anyone else's.
///
/// # Examples
/// ```ignore
/// let repository = Repository::spawn(Catalog::sample()?, Latency::default(), log);
/// let mut settings = repository.get_app_settings().await;
/// repository.update_settings(AppSettings { is_dark_mode: true, is_big_text: false }).await?;
/// settings.changed().await?;
/// ```
///
/// # Thread Safety
/// Cloning is cheap and every clone talks to the same stores, which is how
/// several screens share one settings source.
#[derive(Debug, Clone)]
pub enum Repository {
    /// A real repository serving an in-memory catalog
    Actual(Sender<Message>),
    /// A hand-driven mock for tests
    Mock(mock::Mock),
}

impl Repository {
    /// Spawns a repository serving `catalog`, delaying the remote sources by
    /// `latency`.
    pub fn spawn(catalog: Catalog, latency: Latency, log: Log) -> Self {
        let (repository, _) = core::Core::new(catalog, latency, log).spawn();
        repository
    }

    /// Creates a mock repository seeded with `data`.
    pub fn mock(data: MockData) -> Self {
        Self::Mock(mock::Mock::new(data))
    }

    /// Subscribes to the metadata of an article.
    pub async fn get_article(&self, id: ArcStr) -> watch::Receiver<Option<ArticleData>> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::GetArticle { id, tx })
                    .await
                    .context("Requesting article with Repository actor")
                    .expect("Repository actor died");
                rx.await
                    .context("Awaiting article source from Repository actor")
                    .expect("Repository actor died")
            }
            Self::Mock(mock) => mock.get_article(id).await,
        }
    }

    /// Subscribes to the content of an article.
    pub async fn load_article_content(
        &self,
        id: ArcStr,
    ) -> watch::Receiver<Option<Vec<ContentBlock>>> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::LoadArticleContent { id, tx })
                    .await
                    .context("Requesting article content with Repository actor")
                    .expect("Repository actor died");
                rx.await
                    .context("Awaiting content source from Repository actor")
                    .expect("Repository actor died")
            }
            Self::Mock(mock) => mock.load_article_content(id).await,
        }
    }

    /// Subscribes to the personal info (like, bookmark) of an article.
    pub async fn load_article_personal_info(
        &self,
        id: ArcStr,
    ) -> watch::Receiver<Option<ArticlePersonalInfo>> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::LoadArticlePersonalInfo { id, tx })
                    .await
                    .context("Requesting personal info with Repository actor")
                    .expect("Repository actor died");
                rx.await
                    .context("Awaiting personal info source from Repository actor")
                    .expect("Repository actor died")
            }
            Self::Mock(mock) => mock.load_article_personal_info(id).await,
        }
    }

    /// Subscribes to the app settings shared by every screen.
    pub async fn get_app_settings(&self) -> watch::Receiver<Option<AppSettings>> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::GetAppSettings { tx })
                    .await
                    .context("Requesting app settings with Repository actor")
                    .expect("Repository actor died");
                rx.await
                    .context("Awaiting settings source from Repository actor")
                    .expect("Repository actor died")
            }
            Self::Mock(mock) => mock.get_app_settings().await,
        }
    }

    /// Stores the personal info of an article and re-emits it.
    ///
    /// # Errors
    /// Fails with a [`RepositoryError`] when the article is unknown or the
    /// store is unavailable.
    pub async fn update_article_personal_info(
        &self,
        id: ArcStr,
        info: ArticlePersonalInfo,
    ) -> anyhow::Result<()> {
        let result = match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::UpdateArticlePersonalInfo { id, info, tx })
                    .await
                    .context("Updating personal info with Repository actor")
                    .expect("Repository actor died");
                rx.await
                    .context("Awaiting personal info update from Repository actor")
                    .expect("Repository actor died")
            }
            Self::Mock(mock) => mock.update_article_personal_info(id, info).await,
        };
        Ok(result?)
    }

    /// Stores the app settings and re-emits them to every subscriber.
    ///
    /// # Errors
    /// Fails with a [`RepositoryError`] when the store is unavailable.
    pub async fn update_settings(&self, settings: AppSettings) -> anyhow::Result<()> {
        let result = match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::UpdateSettings { settings, tx })
                    .await
                    .context("Updating settings with Repository actor")
                    .expect("Repository actor died");
                rx.await
                    .context("Awaiting settings update from Repository actor")
                    .expect("Repository actor died")
            }
            Self::Mock(mock) => mock.update_settings(settings).await,
        };
        Ok(result?)
    }

    /// Lists the metadata of every known article, ordered by id.
    pub async fn articles(&self) -> Vec<ArticleData> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Articles { tx })
                    .await
                    .context("Listing articles with Repository actor")
                    .expect("Repository actor died");
                rx.await
                    .context("Awaiting article list from Repository actor")
                    .expect("Repository actor died")
            }
            Self::Mock(mock) => mock.articles().await,
        }
    }

    /// Gives access to the mock for driving emissions in tests. `None` for an
    /// actual repository.
    pub fn as_mock(&self) -> Option<&mock::Mock> {
        match self {
            Self::Actual(_) => None,
            Self::Mock(mock) => Some(mock),
        }
    }
}

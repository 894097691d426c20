use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{ArcStr, log::Log};

use super::data::{
    AppSettings, ArticleData, ArticlePersonalInfo, Catalog, CatalogEntry, ContentBlock, Latency,
    RepositoryError,
};
use super::message::Message;

const SCOPE: &str = "repository";

type Source<T> = Arc<watch::Sender<Option<T>>>;

/// Core implementation of the repository actor.
///
/// Owns one `watch` channel per source and article. Remote sources start
/// absent and are filled after the configured latency; local sources are
/// available immediately. The settings channel is unique, so every subscriber
/// sees every settings update regardless of who wrote it.
pub struct Core {
    /// Log actor for logging
    log: Log,
    /// Articles the repository can serve, by id
    catalog: HashMap<ArcStr, CatalogEntry>,
    /// Simulated latency of the remote sources
    latency: Latency,
    /// Article metadata channels
    articles: HashMap<ArcStr, Source<ArticleData>>,
    /// Article content channels
    contents: HashMap<ArcStr, Source<Vec<ContentBlock>>>,
    /// Personal info channels
    personal_info: HashMap<ArcStr, watch::Sender<Option<ArticlePersonalInfo>>>,
    /// The shared settings channel
    settings: watch::Sender<Option<AppSettings>>,
}

impl Core {
    pub fn new(catalog: Catalog, latency: Latency, log: Log) -> Self {
        let catalog = catalog
            .articles
            .into_iter()
            .map(|entry| (ArcStr::from(entry.article.id.as_str()), entry))
            .collect();
        let (settings, _) = watch::channel(Some(AppSettings::default()));

        Self {
            log,
            catalog,
            latency,
            articles: HashMap::new(),
            contents: HashMap::new(),
            personal_info: HashMap::new(),
            settings,
        }
    }

    /// Spawns the actor and returns the public interface and join handle.
    pub fn spawn(mut self) -> (super::Repository, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::GetArticle { id, tx } => {
                        let _ = tx.send(self.get_article(id));
                    }
                    Message::LoadArticleContent { id, tx } => {
                        let _ = tx.send(self.load_article_content(id));
                    }
                    Message::LoadArticlePersonalInfo { id, tx } => {
                        let _ = tx.send(self.load_article_personal_info(id));
                    }
                    Message::GetAppSettings { tx } => {
                        let _ = tx.send(self.settings.subscribe());
                    }
                    Message::UpdateArticlePersonalInfo { id, info, tx } => {
                        let _ = tx.send(self.update_article_personal_info(id, info));
                    }
                    Message::UpdateSettings { settings, tx } => {
                        self.log.info(SCOPE, format!("Updating settings to {settings:?}"));
                        self.settings.send_replace(Some(settings));
                        let _ = tx.send(Ok(()));
                    }
                    Message::Articles { tx } => {
                        let mut articles: Vec<ArticleData> = self
                            .catalog
                            .values()
                            .map(|entry| entry.article.clone())
                            .collect();
                        articles.sort_by(|a, b| a.id.cmp(&b.id));
                        let _ = tx.send(articles);
                    }
                }
            }
        });

        (super::Repository::Actual(tx), handle)
    }

    fn get_article(&mut self, id: ArcStr) -> watch::Receiver<Option<ArticleData>> {
        if let Some(source) = self.articles.get(&id) {
            return source.subscribe();
        }

        let value = self.catalog.get(&id).map(|entry| entry.article.clone());
        if value.is_none() {
            self.log
                .warn(SCOPE, format!("Requested metadata of unknown article '{id}'"));
        }
        let source = self.remote_source(value, self.latency.article);
        let rx = source.subscribe();
        self.articles.insert(id, source);
        rx
    }

    fn load_article_content(&mut self, id: ArcStr) -> watch::Receiver<Option<Vec<ContentBlock>>> {
        if let Some(source) = self.contents.get(&id) {
            return source.subscribe();
        }

        let value = self.catalog.get(&id).map(|entry| entry.content.clone());
        let source = self.remote_source(value, self.latency.content);
        let rx = source.subscribe();
        self.contents.insert(id, source);
        rx
    }

    /// Creates an absent source and publishes `value` into it after `delay`.
    /// Unknown articles stay absent forever.
    fn remote_source<T>(&self, value: Option<T>, delay: Duration) -> Source<T>
    where
        T: Send + Sync + 'static,
    {
        let (tx, _) = watch::channel(None);
        let source = Arc::new(tx);
        if let Some(value) = value {
            let source = Arc::clone(&source);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                source.send_replace(Some(value));
            });
        }
        source
    }

    fn load_article_personal_info(
        &mut self,
        id: ArcStr,
    ) -> watch::Receiver<Option<ArticlePersonalInfo>> {
        let initial = self
            .catalog
            .contains_key(&id)
            .then(ArticlePersonalInfo::default);
        self.personal_info
            .entry(id)
            .or_insert_with(|| watch::channel(initial).0)
            .subscribe()
    }

    fn update_article_personal_info(
        &mut self,
        id: ArcStr,
        info: ArticlePersonalInfo,
    ) -> Result<(), RepositoryError> {
        if !self.catalog.contains_key(&id) {
            self.log.warn(
                SCOPE,
                format!("Refusing to store personal info of unknown article '{id}'"),
            );
            return Err(RepositoryError::UnknownArticle(id.to_string()));
        }

        self.log
            .info(SCOPE, format!("Updating personal info of '{id}' to {info:?}"));
        self.personal_info
            .entry(id)
            .or_insert_with(|| watch::channel(None).0)
            .send_replace(Some(info));
        Ok(())
    }
}

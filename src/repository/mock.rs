use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, watch};

use crate::ArcStr;

use super::data::{AppSettings, ArticleData, ArticlePersonalInfo, ContentBlock, RepositoryError};

/// Seed data and recorded calls of the mock repository.
#[derive(Debug, Clone, Default)]
pub struct MockData {
    /// Initial article metadata, by id
    pub articles: HashMap<String, ArticleData>,
    /// Initial article content, by id
    pub contents: HashMap<String, Vec<ContentBlock>>,
    /// Initial personal info, by id
    pub personal_info: HashMap<String, ArticlePersonalInfo>,
    /// Initial app settings
    pub settings: Option<AppSettings>,
    /// When set, every update fails with [`RepositoryError::Unavailable`]
    pub fail_updates: bool,
    /// Personal info updates received, in order
    pub personal_info_updates: Vec<(String, ArticlePersonalInfo)>,
    /// Settings updates received, in order
    pub settings_updates: Vec<AppSettings>,
}

#[derive(Debug)]
struct State {
    data: MockData,
    articles: HashMap<ArcStr, watch::Sender<Option<ArticleData>>>,
    contents: HashMap<ArcStr, watch::Sender<Option<Vec<ContentBlock>>>>,
    personal_info: HashMap<ArcStr, watch::Sender<Option<ArticlePersonalInfo>>>,
    settings: watch::Sender<Option<AppSettings>>,
}

/// Mock implementation of the repository actor for testing purposes.
///
/// Sources publish synchronously and can be driven by hand with the `emit_*`
/// methods, which lets tests decide the arrival order of every emission.
#[derive(Debug, Clone)]
pub struct Mock {
    state: Arc<Mutex<State>>,
}

impl Mock {
    pub fn new(data: MockData) -> Self {
        let (settings, _) = watch::channel(data.settings);
        Self {
            state: Arc::new(Mutex::new(State {
                data,
                articles: HashMap::new(),
                contents: HashMap::new(),
                personal_info: HashMap::new(),
                settings,
            })),
        }
    }

    pub async fn get_article(&self, id: ArcStr) -> watch::Receiver<Option<ArticleData>> {
        let mut state = self.state.lock().await;
        let initial = state.data.articles.get(id.as_ref()).cloned();
        state
            .articles
            .entry(id)
            .or_insert_with(|| watch::channel(initial).0)
            .subscribe()
    }

    pub async fn load_article_content(
        &self,
        id: ArcStr,
    ) -> watch::Receiver<Option<Vec<ContentBlock>>> {
        let mut state = self.state.lock().await;
        let initial = state.data.contents.get(id.as_ref()).cloned();
        state
            .contents
            .entry(id)
            .or_insert_with(|| watch::channel(initial).0)
            .subscribe()
    }

    pub async fn load_article_personal_info(
        &self,
        id: ArcStr,
    ) -> watch::Receiver<Option<ArticlePersonalInfo>> {
        let mut state = self.state.lock().await;
        let initial = state.data.personal_info.get(id.as_ref()).copied();
        state
            .personal_info
            .entry(id)
            .or_insert_with(|| watch::channel(initial).0)
            .subscribe()
    }

    pub async fn get_app_settings(&self) -> watch::Receiver<Option<AppSettings>> {
        self.state.lock().await.settings.subscribe()
    }

    pub async fn update_article_personal_info(
        &self,
        id: ArcStr,
        info: ArticlePersonalInfo,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if state.data.fail_updates {
            return Err(RepositoryError::Unavailable);
        }
        state
            .data
            .personal_info_updates
            .push((id.to_string(), info));
        state.data.personal_info.insert(id.to_string(), info);
        state
            .personal_info
            .entry(id)
            .or_insert_with(|| watch::channel(None).0)
            .send_replace(Some(info));
        Ok(())
    }

    pub async fn update_settings(&self, settings: AppSettings) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        if state.data.fail_updates {
            return Err(RepositoryError::Unavailable);
        }
        state.data.settings_updates.push(settings);
        state.data.settings = Some(settings);
        state.settings.send_replace(Some(settings));
        Ok(())
    }

    pub async fn articles(&self) -> Vec<ArticleData> {
        let state = self.state.lock().await;
        let mut articles: Vec<ArticleData> = state.data.articles.values().cloned().collect();
        articles.sort_by(|a, b| a.id.cmp(&b.id));
        articles
    }

    /// Publishes a metadata emission, absent or not.
    pub async fn emit_article(&self, id: ArcStr, article: Option<ArticleData>) {
        let mut state = self.state.lock().await;
        state
            .articles
            .entry(id)
            .or_insert_with(|| watch::channel(None).0)
            .send_replace(article);
    }

    /// Publishes a content emission, absent or not.
    pub async fn emit_content(&self, id: ArcStr, content: Option<Vec<ContentBlock>>) {
        let mut state = self.state.lock().await;
        state
            .contents
            .entry(id)
            .or_insert_with(|| watch::channel(None).0)
            .send_replace(content);
    }

    /// Publishes a personal info emission without recording it as an update.
    pub async fn emit_personal_info(&self, id: ArcStr, info: Option<ArticlePersonalInfo>) {
        let mut state = self.state.lock().await;
        state
            .personal_info
            .entry(id)
            .or_insert_with(|| watch::channel(None).0)
            .send_replace(info);
    }

    /// Publishes a settings emission without recording it as an update.
    pub async fn emit_settings(&self, settings: Option<AppSettings>) {
        self.state.lock().await.settings.send_replace(settings);
    }

    /// Makes every later update fail, or succeed again.
    pub async fn set_fail_updates(&self, fail: bool) {
        self.state.lock().await.data.fail_updates = fail;
    }

    /// Returns a copy of the seed data and the recorded calls.
    pub async fn get_data(&self) -> MockData {
        self.state.lock().await.data.clone()
    }
}

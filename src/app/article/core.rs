use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
};

use crate::ArcStr;
use crate::log::Log;
use crate::repository::{AppSettings, ArticleData, ArticlePersonalInfo, ContentBlock, Repository};

use super::data::{
    ArticleState, Intent, Notify, merge_article, merge_content, merge_personal_info,
    merge_settings,
};
use super::message::Message;
use super::search;

const NOTIFICATION_CAPACITY: usize = 16;
const SCOPE: &str = "app.article";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Article,
    Content,
    PersonalInfo,
    Settings,
}

#[derive(Debug, Clone, Copy)]
struct Open {
    article: bool,
    content: bool,
    personal_info: bool,
    settings: bool,
}

/// The four subscriptions of a screen.
struct Sources {
    article: watch::Receiver<Option<ArticleData>>,
    content: watch::Receiver<Option<Vec<ContentBlock>>>,
    personal_info: watch::Receiver<Option<ArticlePersonalInfo>>,
    settings: watch::Receiver<Option<AppSettings>>,
    open: Open,
}

impl Sources {
    /// Waits for the next emission of any source still open. A source whose
    /// sender went away is skipped from then on.
    async fn changed(&mut self) -> Source {
        loop {
            let open = self.open;
            let (source, result) = tokio::select! {
                r = self.article.changed(), if open.article => (Source::Article, r),
                r = self.content.changed(), if open.content => (Source::Content, r),
                r = self.personal_info.changed(), if open.personal_info => {
                    (Source::PersonalInfo, r)
                }
                r = self.settings.changed(), if open.settings => (Source::Settings, r),
                else => std::future::pending().await,
            };
            if result.is_ok() {
                return source;
            }
            match source {
                Source::Article => self.open.article = false,
                Source::Content => self.open.content = false,
                Source::PersonalInfo => self.open.personal_info = false,
                Source::Settings => self.open.settings = false,
            }
        }
    }

    /// Sources with an emission not applied yet.
    fn pending(&self) -> Vec<Source> {
        [
            (Source::Article, self.article.has_changed()),
            (Source::Content, self.content.has_changed()),
            (Source::PersonalInfo, self.personal_info.has_changed()),
            (Source::Settings, self.settings.has_changed()),
        ]
        .into_iter()
        .filter_map(|(source, changed)| matches!(changed, Ok(true)).then_some(source))
        .collect()
    }
}

/// Replaces the state with the reducer's result, if any.
fn reduce<F>(state: &watch::Sender<ArticleState>, reducer: F)
where
    F: FnOnce(&ArticleState) -> Option<ArticleState>,
{
    state.send_if_modified(|current| match reducer(current) {
        Some(next) => {
            *current = next;
            true
        }
        None => false,
    });
}

/// Core implementation of the article screen actor.
///
/// The actor task is the only writer of the state: source emissions and user
/// intents are serialized through one `select!` loop.
pub struct Core {
    /// Article shown by this screen
    article_id: ArcStr,
    /// Data layer, also the owner of the shared settings
    repository: Repository,
    /// Log actor for logging
    log: Log,
    /// Subscriptions to the repository
    sources: Sources,
    /// Current state, observed by the view
    state: watch::Sender<ArticleState>,
    /// One-shot messages for the view
    notifications: broadcast::Sender<Notify>,
}

impl Core {
    /// Subscribes to the four sources of `article_id`.
    pub async fn build(article_id: ArcStr, repository: Repository, log: Log) -> Self {
        let sources = Sources {
            article: repository.get_article(article_id.clone()).await,
            content: repository.load_article_content(article_id.clone()).await,
            personal_info: repository
                .load_article_personal_info(article_id.clone())
                .await,
            settings: repository.get_app_settings().await,
            open: Open {
                article: true,
                content: true,
                personal_info: true,
                settings: true,
            },
        };
        let (state, _) = watch::channel(ArticleState::default());
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        Self {
            article_id,
            repository,
            log,
            sources,
            state,
            notifications,
        }
    }

    /// Spawns the actor and returns the public interface and join handle.
    pub fn spawn(mut self) -> (super::ArticleScreen, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            self.log
                .info(SCOPE, format!("Opened screen of article '{}'", self.article_id));
            for source in [
                Source::Article,
                Source::Content,
                Source::PersonalInfo,
                Source::Settings,
            ] {
                self.apply(source);
            }

            let closed = loop {
                tokio::select! {
                    message = rx.recv() => match message {
                        Some(message) => {
                            if let Some(tx) = self.handle_message(message).await {
                                break Some(tx);
                            }
                        }
                        None => break None,
                    },
                    source = self.sources.changed() => self.apply(source),
                }
            };

            // Must precede the ack: callers flush the logger once close returns
            self.log
                .info(SCOPE, format!("Closed screen of article '{}'", self.article_id));
            if let Some(tx) = closed {
                let _ = tx.send(());
            }
        });

        (super::ArticleScreen::Actual(tx), handle)
    }

    /// Returns the acknowledgement of a close request, which ends the actor.
    async fn handle_message(&mut self, message: Message) -> Option<oneshot::Sender<()>> {
        match message {
            Message::Dispatch { intent, tx } => {
                self.handle_intent(intent).await;
                let _ = tx.send(());
            }
            Message::GetState { tx } => {
                let _ = tx.send(self.current());
            }
            Message::Subscribe { tx } => {
                let _ = tx.send(self.state.subscribe());
            }
            Message::Notifications { tx } => {
                let _ = tx.send(self.notifications.subscribe());
            }
            Message::Close { tx } => return Some(tx),
        }
        None
    }

    fn current(&self) -> ArticleState {
        self.state.borrow().clone()
    }

    /// Runs the merge function of `source` over its latest emission.
    fn apply(&mut self, source: Source) {
        match source {
            Source::Article => {
                let article = self.sources.article.borrow_and_update();
                reduce(&self.state, |state| {
                    merge_article((*article).as_ref(), state)
                });
            }
            Source::Content => {
                let content = self.sources.content.borrow_and_update();
                reduce(&self.state, |state| {
                    merge_content((*content).as_ref(), state)
                });
            }
            Source::PersonalInfo => {
                let info = self.sources.personal_info.borrow_and_update();
                reduce(&self.state, |state| {
                    merge_personal_info((*info).as_ref(), state)
                });
            }
            Source::Settings => {
                let settings = self.sources.settings.borrow_and_update();
                reduce(&self.state, |state| {
                    merge_settings((*settings).as_ref(), state)
                });
            }
        }
    }

    /// Applies the emissions already published, such as the re-emission of
    /// a write this screen just made.
    fn apply_pending(&mut self) {
        for source in self.sources.pending() {
            self.apply(source);
        }
    }

    async fn handle_intent(&mut self, intent: Intent) {
        self.log.info(
            SCOPE,
            format!("Article '{}' received {intent:?}", self.article_id),
        );

        match intent {
            Intent::Like => self.handle_like().await,
            Intent::UndoLike => {
                if let Err(err) = self.toggle_like().await {
                    self.fail(Intent::UndoLike, err);
                }
            }
            Intent::Bookmark => {
                let info = self.current().personal_info();
                let info = ArticlePersonalInfo {
                    is_bookmark: !info.is_bookmark,
                    ..info
                };
                if let Err(err) = self.save_personal_info(info).await {
                    self.fail(Intent::Bookmark, err);
                }
            }
            Intent::Share => self.notify(Notify::Error {
                message: "Share is not implemented".into(),
                label: "OK".into(),
                retry: None,
            }),
            Intent::ToggleMenu => reduce(&self.state, |state| {
                Some(ArticleState {
                    is_show_menu: !state.is_show_menu,
                    ..state.clone()
                })
            }),
            Intent::NightMode => {
                let settings = self.current().app_settings();
                let settings = AppSettings {
                    is_dark_mode: !settings.is_dark_mode,
                    ..settings
                };
                self.save_settings(settings, Intent::NightMode).await;
            }
            Intent::UpText => {
                let settings = AppSettings {
                    is_big_text: true,
                    ..self.current().app_settings()
                };
                self.save_settings(settings, Intent::UpText).await;
            }
            Intent::DownText => {
                let settings = AppSettings {
                    is_big_text: false,
                    ..self.current().app_settings()
                };
                self.save_settings(settings, Intent::DownText).await;
            }
            Intent::SearchMode(is_search) => reduce(&self.state, |state| {
                search::set_search_mode(state, is_search)
            }),
            Intent::Search(query) => {
                reduce(&self.state, |state| search::update_query(state, query))
            }
            Intent::SearchNext => {
                reduce(&self.state, |state| search::move_position(state, true))
            }
            Intent::SearchPrev => {
                reduce(&self.state, |state| search::move_position(state, false))
            }
        }
    }

    /// Liking is acknowledged with a plain message; unliking offers an undo.
    async fn handle_like(&mut self) {
        if let Err(err) = self.toggle_like().await {
            self.fail(Intent::Like, err);
            return;
        }

        let notify = if self.current().is_like {
            Notify::Text {
                message: "Mark is liked".into(),
            }
        } else {
            Notify::Action {
                message: "Don't like it anymore".into(),
                label: "No, still like it".into(),
                action: Intent::UndoLike,
            }
        };
        self.notify(notify);
    }

    async fn toggle_like(&mut self) -> anyhow::Result<()> {
        let info = self.current().personal_info();
        self.save_personal_info(ArticlePersonalInfo {
            is_like: !info.is_like,
            ..info
        })
        .await
    }

    async fn save_personal_info(&mut self, info: ArticlePersonalInfo) -> anyhow::Result<()> {
        self.repository
            .update_article_personal_info(self.article_id.clone(), info)
            .await?;
        self.apply_pending();
        Ok(())
    }

    async fn save_settings(&mut self, settings: AppSettings, intent: Intent) {
        match self.repository.update_settings(settings).await {
            Ok(()) => self.apply_pending(),
            Err(err) => self.fail(intent, err),
        }
    }

    /// Reports a failed write. The state is left untouched since it only
    /// changes through the repository re-emission.
    fn fail(&self, intent: Intent, err: anyhow::Error) {
        self.log.warn(
            SCOPE,
            format!(
                "{intent:?} failed for article '{}': {err:#}",
                self.article_id
            ),
        );
        self.notify(Notify::Error {
            message: format!("Could not save your changes: {err}"),
            label: "OK".into(),
            retry: Some(intent),
        });
    }

    fn notify(&self, notify: Notify) {
        if self.notifications.send(notify).is_err() {
            self.log.info(SCOPE, "Notification dropped, nobody is listening");
        }
    }
}

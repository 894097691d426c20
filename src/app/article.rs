use anyhow::Context;
use tokio::sync::{broadcast, mpsc::Sender, oneshot, watch};

use crate::{ArcStr, log::Log, repository::Repository};
use message::Message;

mod core;
mod data;
mod message;
mod mock;
pub mod search;
#[cfg(test)]
mod tests;

pub use data::{ArticleState, Intent, Notify, format_date};
pub use mock::MockData;

/// The article screen actor: presentation state of one article.
///
/// The screen subscribes to the article metadata, the article content, the
/// personal info of the article and the app settings, and overlays each
/// emission onto a single [`ArticleState`]. User intents read the current
/// state and either change it directly (menu, search) or write back to the
/// repository, whose re-emission then updates the state.
///
/// # Examples
/// ```ignore
/// let screen = ArticleScreen::spawn("0".into(), repository, log).await;
/// let mut notifications = screen.notifications().await;
/// screen.handle_like().await;
/// assert!(screen.current().await.is_like);
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender.
#[derive(Debug, Clone)]
pub enum ArticleScreen {
    /// A real screen driven by its repository
    Actual(Sender<Message>),
    /// A mock that records intents for view tests
    Mock(mock::Mock),
}

impl ArticleScreen {
    /// Opens the screen of `article_id`, subscribing to its sources on
    /// `repository`.
    pub async fn spawn(article_id: ArcStr, repository: Repository, log: Log) -> Self {
        let (screen, _) = core::Core::build(article_id, repository, log)
            .await
            .spawn();
        screen
    }

    /// Creates a mock screen exposing `data.state`.
    pub fn mock(data: MockData) -> Self {
        Self::Mock(mock::Mock::new(data))
    }

    /// Runs an intent. Returns once the state reflects it and its
    /// notification, if any, has been emitted.
    ///
    /// This is also how the view runs the callbacks carried by a [`Notify`].
    pub async fn perform(&self, intent: Intent) {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Dispatch { intent, tx })
                    .await
                    .context("Dispatching intent to ArticleScreen actor")
                    .expect("ArticleScreen actor died");
                rx.await
                    .context("Awaiting intent from ArticleScreen actor")
                    .expect("ArticleScreen actor died")
            }
            Self::Mock(mock) => mock.perform(intent).await,
        }
    }

    /// Toggles the like and reports it: a plain message when liked, an undo
    /// action when unliked.
    pub async fn handle_like(&self) {
        self.perform(Intent::Like).await
    }

    /// Toggles the bookmark without notifying.
    pub async fn handle_bookmark(&self) {
        self.perform(Intent::Bookmark).await
    }

    /// Sharing is not available yet; always notifies an error.
    pub async fn handle_share(&self) {
        self.perform(Intent::Share).await
    }

    /// Shows or hides the bottom menu.
    pub async fn handle_toggle_menu(&self) {
        self.perform(Intent::ToggleMenu).await
    }

    /// Toggles dark mode in the settings shared by every screen.
    pub async fn handle_night_mode(&self) {
        self.perform(Intent::NightMode).await
    }

    /// Switches to the big text size.
    pub async fn handle_up_text(&self) {
        self.perform(Intent::UpText).await
    }

    /// Switches back to the regular text size.
    pub async fn handle_down_text(&self) {
        self.perform(Intent::DownText).await
    }

    /// Enters (`true`) or leaves (`false`) search mode.
    pub async fn handle_search_mode(&self, is_search: bool) {
        self.perform(Intent::SearchMode(is_search)).await
    }

    /// Updates the search query. Ignored outside search mode; `None` clears
    /// the query without leaving search mode.
    pub async fn handle_search(&self, query: Option<String>) {
        self.perform(Intent::Search(query)).await
    }

    /// Highlights the next match, staying on the last one.
    pub async fn handle_search_next(&self) {
        self.perform(Intent::SearchNext).await
    }

    /// Highlights the previous match, staying on the first one.
    pub async fn handle_search_prev(&self) {
        self.perform(Intent::SearchPrev).await
    }

    /// Observes the state. The receiver holds the latest state and is
    /// notified of every replacement.
    pub async fn state(&self) -> watch::Receiver<ArticleState> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Subscribe { tx })
                    .await
                    .context("Subscribing to ArticleScreen actor")
                    .expect("ArticleScreen actor died");
                rx.await
                    .context("Awaiting state from ArticleScreen actor")
                    .expect("ArticleScreen actor died")
            }
            Self::Mock(mock) => mock.state(),
        }
    }

    /// Returns a snapshot of the current state.
    pub async fn current(&self) -> ArticleState {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::GetState { tx })
                    .await
                    .context("Requesting state with ArticleScreen actor")
                    .expect("ArticleScreen actor died");
                rx.await
                    .context("Awaiting state from ArticleScreen actor")
                    .expect("ArticleScreen actor died")
            }
            Self::Mock(mock) => mock.current(),
        }
    }

    /// Observes the notifications emitted from now on.
    pub async fn notifications(&self) -> broadcast::Receiver<Notify> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Notifications { tx })
                    .await
                    .context("Subscribing to notifications of ArticleScreen actor")
                    .expect("ArticleScreen actor died");
                rx.await
                    .context("Awaiting notifications from ArticleScreen actor")
                    .expect("ArticleScreen actor died")
            }
            Self::Mock(mock) => mock.notifications(),
        }
    }

    /// Stops the screen and drops its subscriptions. Closing a screen that
    /// is already stopped does nothing.
    pub async fn close(&self) {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                if sender.send(Message::Close { tx }).await.is_ok() {
                    let _ = rx.await;
                }
            }
            Self::Mock(mock) => mock.close().await,
        }
    }

    /// Gives access to the mock for tests. `None` for an actual screen.
    pub fn as_mock(&self) -> Option<&mock::Mock> {
        match self {
            Self::Actual(_) => None,
            Self::Mock(mock) => Some(mock),
        }
    }
}

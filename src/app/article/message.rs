use tokio::sync::{broadcast, oneshot, watch};

use super::data::{ArticleState, Intent, Notify};

/// Messages that can be sent to the article screen actor.
#[derive(Debug)]
pub enum Message {
    /// Run a user intent; answered once the state reflects it
    Dispatch {
        intent: Intent,
        tx: oneshot::Sender<()>,
    },
    /// Get a snapshot of the current state
    GetState { tx: oneshot::Sender<ArticleState> },
    /// Observe the state
    Subscribe {
        tx: oneshot::Sender<watch::Receiver<ArticleState>>,
    },
    /// Observe the notifications emitted from now on
    Notifications {
        tx: oneshot::Sender<broadcast::Receiver<Notify>>,
    },
    /// Release every subscription and stop the actor
    Close { tx: oneshot::Sender<()> },
}

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, watch};

use super::data::{ArticleState, Intent, Notify};

/// Seed state and recorded calls of the mock screen.
#[derive(Debug, Clone, Default)]
pub struct MockData {
    /// State exposed to observers
    pub state: ArticleState,
    /// Intents received, in order
    pub intents: Vec<Intent>,
    /// Whether the screen was closed
    pub closed: bool,
}

/// Mock implementation of the article screen for view tests.
///
/// Intents are only recorded; the state and the notifications change when a
/// test pushes them with [`Mock::set_state`] and [`Mock::notify`].
#[derive(Debug, Clone)]
pub struct Mock {
    data: Arc<Mutex<MockData>>,
    state: Arc<watch::Sender<ArticleState>>,
    notifications: broadcast::Sender<Notify>,
}

impl Mock {
    pub fn new(data: MockData) -> Self {
        let (state, _) = watch::channel(data.state.clone());
        let (notifications, _) = broadcast::channel(16);
        Self {
            data: Arc::new(Mutex::new(data)),
            state: Arc::new(state),
            notifications,
        }
    }

    pub async fn perform(&self, intent: Intent) {
        self.data.lock().await.intents.push(intent);
    }

    pub fn state(&self) -> watch::Receiver<ArticleState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ArticleState {
        self.state.borrow().clone()
    }

    pub fn notifications(&self) -> broadcast::Receiver<Notify> {
        self.notifications.subscribe()
    }

    pub async fn close(&self) {
        self.data.lock().await.closed = true;
    }

    /// Replaces the state seen by observers.
    pub async fn set_state(&self, state: ArticleState) {
        self.data.lock().await.state = state.clone();
        self.state.send_replace(state);
    }

    /// Emits a notification to current subscribers.
    pub fn notify(&self, notify: Notify) {
        let _ = self.notifications.send(notify);
    }

    /// Returns a copy of the seed state and the recorded calls.
    pub async fn get_data(&self) -> MockData {
        self.data.lock().await.clone()
    }
}

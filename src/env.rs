use std::env::VarError;

use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::ArcStr;
use message::Message;

mod core;
mod message;
mod mock;

/// Read access to the process environment.
///
/// The mock serves a fixed set of variables so tests never depend on the
/// environment they run in.
#[derive(Debug, Clone)]
pub enum Env {
    Actual(Sender<Message>),
    Mock(mock::Mock),
}

impl Env {
    pub fn spawn() -> Self {
        let (env, _) = core::Core.spawn();
        env
    }

    /// Creates a mock exposing only `variables`.
    pub fn mock<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArcStr>,
        V: Into<ArcStr>,
    {
        Self::Mock(mock::Mock::new(variables))
    }

    /// Looks up a variable. Values that are not valid unicode are an error.
    pub async fn var(&self, key: ArcStr) -> Result<ArcStr, VarError> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Var { key, tx })
                    .await
                    .context("Reading variable with Env actor")
                    .expect("Env actor died");
                rx.await
                    .context("Awaiting variable from Env actor")
                    .expect("Env actor died")
            }
            Self::Mock(mock) => mock.var(&key),
        }
    }
}

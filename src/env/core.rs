use tokio::{sync::mpsc, task::JoinHandle};

use crate::ArcStr;

use super::message::Message;

/// The Env actor only reads, so it holds no state.
#[derive(Debug, Default)]
pub struct Core;

impl Core {
    pub fn spawn(self) -> (super::Env, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Var { key, tx } => {
                        let _ = tx.send(std::env::var(key.as_ref()).map(ArcStr::from));
                    }
                }
            }
        });
        (super::Env::Actual(tx), handle)
    }
}

use tokio::sync::oneshot;

use super::data::Data;

/// Requests handled by the configuration actor.
#[derive(Debug)]
pub enum Message {
    /// Replace the current values with the file contents
    Load {
        tx: oneshot::Sender<anyhow::Result<()>>,
    },
    /// Write the current values to the file
    Save {
        tx: oneshot::Sender<anyhow::Result<()>>,
    },
    Get { tx: oneshot::Sender<Data> },
    /// Replace the current values without touching the file
    Set { data: Data },
}

use tokio::sync::oneshot;

use super::data::LogMessage;

/// Messages that can be sent to the log actor.
#[derive(Debug)]
pub enum Message {
    /// Logs a message with the specified level, scope and content
    Log(LogMessage),
    /// Prints buffered messages to stderr and stops the actor
    Flush {
        /// Signals the caller once the buffered messages were printed
        tx: oneshot::Sender<()>,
    },
    /// Runs the log garbage collector to delete old log files
    CollectGarbage,
}

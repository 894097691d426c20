use std::fmt::Display;

use tokio::sync::{mpsc::Sender, mpsc::error::TrySendError, oneshot};

use crate::{ArcPath, fs::Fs};

mod core;
mod data;
mod message;
mod mock;

pub use data::{LogLevel, LogMessage};
use message::Message;

/// The logging actor that provides a thread-safe interface for logging operations.
///
/// This enum represents either a real logging actor or a mock implementation
/// for testing purposes. Every message carries a `scope`, a short dotted name
/// of the component that produced it (e.g. `app.article`).
///
/// # Examples
/// ```ignore
/// let log = Log::spawn(fs, LogLevel::Warning, 7, log_dir).await?;
/// log.info("app", "Application started");
/// ```
///
/// # Thread Safety
/// This type is designed to be safely shared between threads. Cloning is cheap as it only
/// copies the channel sender.
#[derive(Debug, Clone)]
pub enum Log {
    /// A real logging actor that writes to files and stderr
    Actual(Sender<Message>),
    /// A mock implementation for testing that keeps messages in memory
    Mock(mock::Mock),
}

impl Log {
    /// Builds the logger core and spawns its actor.
    ///
    /// # Arguments
    /// * `fs` - Filesystem actor used to write the log files
    /// * `level` - Minimum level of the messages echoed to stderr on [`Log::flush`]
    /// * `max_age` - Age in days after which log files are collected, `0` disables it
    /// * `log_dir` - Directory where log files are stored
    ///
    /// # Errors
    /// Returns an error if the log directory cannot be created.
    pub async fn spawn(
        fs: Fs,
        level: LogLevel,
        max_age: usize,
        log_dir: ArcPath,
    ) -> anyhow::Result<Self> {
        let core = core::Core::build(fs, level, max_age, log_dir).await?;
        let (log, _) = core.spawn();
        Ok(log)
    }

    /// Creates a mock logger that records messages in memory.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::new())
    }

    /// Sends a [`LogMessage`] to the logger without blocking the caller.
    ///
    /// Messages are queued in order; only when the mailbox is full the send is
    /// deferred to a new task.
    ///
    /// # Panics
    /// If the logger was flushed
    fn log(&self, scope: &'static str, message: String, level: LogLevel) {
        let sender = match self {
            Self::Mock(mock) => return mock.log(scope, message, level),
            Self::Actual(sender) => sender,
        };

        let msg = Message::Log(LogMessage::now(level, scope, message));
        match sender.try_send(msg) {
            Ok(()) => {}
            Err(TrySendError::Full(msg)) => {
                let sender = sender.clone();
                tokio::spawn(async move {
                    sender
                        .send(msg)
                        .await
                        .expect("Attempt to use logger after a flush");
                });
            }
            Err(TrySendError::Closed(_)) => panic!("Attempt to use logger after a flush"),
        }
    }

    /// Log a message with the `INFO` level
    pub fn info<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Info);
    }

    /// Log a message with the `WARNING` level
    pub fn warn<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Warning);
    }

    /// Log a message with the `ERROR` level
    pub fn error<M: Display>(&self, scope: &'static str, message: M) {
        self.log(scope, message.to_string(), LogLevel::Error);
    }

    /// Log an info message if the result is an error
    /// and return the result as is
    pub fn info_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Info);
        }
        result
    }

    /// Log a warning message if the result is an error
    /// and return the result as is
    pub fn warn_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Warning);
        }
        result
    }

    /// Log an error message if the result is an error
    /// and return the result as is
    pub fn error_on_error<T, E: Display>(
        &self,
        scope: &'static str,
        result: Result<T, E>,
    ) -> Result<T, E> {
        if let Err(err) = &result {
            self.log(scope, err.to_string(), LogLevel::Error);
        }
        result
    }

    /// Flushes the logger by printing the buffered messages to [`stderr`] and
    /// stopping the actor. Any later attempt to log through an actual logger
    /// panics.
    ///
    /// [`stderr`]: std::io::stderr
    pub async fn flush(self) {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                if sender.send(Message::Flush { tx }).await.is_ok() {
                    let _ = rx.await;
                }
            }
            Self::Mock(mock) => mock.flush().await,
        }
    }

    /// Deletes log files older than the configured maximum age.
    pub async fn collect_garbage(&self) {
        match self {
            Self::Actual(sender) => {
                sender
                    .send(Message::CollectGarbage)
                    .await
                    .expect("Attempt to use logger after a flush");
            }
            Self::Mock(_) => {}
        }
    }

    /// Returns the recorded messages of a mock logger, `None` for an actual one.
    pub async fn get_messages(&self) -> Option<Vec<LogMessage>> {
        match self {
            Self::Actual(_) => None,
            Self::Mock(mock) => Some(mock.get_messages().await),
        }
    }
}

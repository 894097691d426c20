use std::{collections::LinkedList, io};

use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::ArcPath;
use message::Message;

mod core;
mod message;
mod mock;
#[cfg(test)]
mod tests;

/// The filesystem actor that provides a thread-safe interface for file operations.
///
/// This enum represents either a real filesystem actor or a mock implementation
/// rooted in a temporary directory. Both expose the same whole-file operations,
/// which is all the config and log actors need.
///
/// # Examples
/// ```ignore
/// let fs = Fs::spawn();
/// fs.write(path.clone(), "hello".into()).await?;
/// let contents = fs.read_to_string(path).await?;
/// ```
///
/// # Thread Safety
/// Cloning is cheap as it only copies the channel sender (or the mock handle).
#[derive(Debug, Clone)]
pub enum Fs {
    /// A real filesystem actor backed by `tokio::fs`
    Actual(Sender<Message>),
    /// A mock implementation that maps every path into a temporary directory
    Mock(mock::Mock),
}

impl Fs {
    /// Spawns a new filesystem actor.
    pub fn spawn() -> Self {
        let (fs, _) = core::Core::new().spawn();
        fs
    }

    /// Creates a new mock filesystem rooted in a fresh temporary directory.
    pub fn mock() -> Self {
        Self::Mock(mock::Mock::new())
    }

    /// Reads the whole file at `path` into a string.
    pub async fn read_to_string(&self, path: ArcPath) -> io::Result<String> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::ReadToString { tx, path })
                    .await
                    .context("Reading file with Fs actor")
                    .expect("Fs actor died");
                rx.await
                    .context("Awaiting response for file read with Fs actor")
                    .expect("Fs actor died")
            }
            Self::Mock(mock) => mock.read_to_string(path).await,
        }
    }

    /// Replaces the contents of the file at `path`, creating it if needed.
    pub async fn write(&self, path: ArcPath, contents: String) -> io::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Write { tx, path, contents })
                    .await
                    .context("Writing file with Fs actor")
                    .expect("Fs actor died");
                rx.await
                    .context("Awaiting response for file write with Fs actor")
                    .expect("Fs actor died")
            }
            Self::Mock(mock) => mock.write(path, contents).await,
        }
    }

    /// Appends `contents` to the file at `path`, creating it if needed.
    pub async fn append(&self, path: ArcPath, contents: String) -> io::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Append { tx, path, contents })
                    .await
                    .context("Appending to file with Fs actor")
                    .expect("Fs actor died");
                rx.await
                    .context("Awaiting response for file append with Fs actor")
                    .expect("Fs actor died")
            }
            Self::Mock(mock) => mock.append(path, contents).await,
        }
    }

    /// Removes the file at `path`.
    pub async fn remove_file(&self, path: ArcPath) -> io::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::RemoveFile { tx, path })
                    .await
                    .context("Removing file with Fs actor")
                    .expect("Fs actor died");
                rx.await
                    .context("Awaiting response for file removal with Fs actor")
                    .expect("Fs actor died")
            }
            Self::Mock(mock) => mock.remove_file(path).await,
        }
    }

    /// Lists the entries of the directory at `path`.
    pub async fn read_dir(&self, path: ArcPath) -> io::Result<LinkedList<ArcPath>> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::ReadDir { tx, path })
                    .await
                    .context("Reading directory with Fs actor")
                    .expect("Fs actor died");
                rx.await
                    .context("Awaiting response for directory read with Fs actor")
                    .expect("Fs actor died")
            }
            Self::Mock(mock) => mock.read_dir(path).await,
        }
    }

    /// Creates the directory at `path` and all of its parents.
    pub async fn mkdir(&self, path: ArcPath) -> io::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::MkDir { tx, path })
                    .await
                    .context("Creating directory with Fs actor")
                    .expect("Fs actor died");
                rx.await
                    .context("Awaiting response for directory creation with Fs actor")
                    .expect("Fs actor died")
            }
            Self::Mock(mock) => mock.mkdir(path).await,
        }
    }
}

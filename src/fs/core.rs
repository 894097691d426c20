use std::{collections::LinkedList, io, path::Path};

use tokio::{fs::OpenOptions, io::AsyncWriteExt, task::JoinHandle};

use crate::{ArcPath, arc_path};

use super::message::Message;

/// The core of the Fs actor, a thin sequential wrapper over `tokio::fs`.
#[derive(Debug, Default)]
pub struct Core;

impl Core {
    pub fn new() -> Self {
        Self
    }

    /// Transforms the core into an actor ready to receive messages.
    ///
    /// # Returns
    /// A tuple containing the [`super::Fs`] handle and the actor task handle.
    pub fn spawn(self) -> (super::Fs, JoinHandle<()>) {
        let (tx, mut rx) = tokio::sync::mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                use Message::*;
                match msg {
                    ReadToString { tx, path } => {
                        let _ = tx.send(tokio::fs::read_to_string(&path).await);
                    }
                    Write { tx, path, contents } => {
                        let _ = tx.send(tokio::fs::write(&path, contents).await);
                    }
                    Append { tx, path, contents } => {
                        let _ = tx.send(append(&path, contents).await);
                    }
                    RemoveFile { tx, path } => {
                        let _ = tx.send(tokio::fs::remove_file(&path).await);
                    }
                    ReadDir { tx, path } => {
                        let _ = tx.send(read_dir(&path).await);
                    }
                    MkDir { tx, path } => {
                        let _ = tx.send(tokio::fs::create_dir_all(&path).await);
                    }
                }
            }
        });

        (super::Fs::Actual(tx), handle)
    }
}

/// Appends to a file, creating it when it does not exist yet.
pub(super) async fn append(path: &Path, contents: String) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(contents.as_bytes()).await?;
    file.flush().await
}

pub(super) async fn read_dir(path: &Path) -> io::Result<LinkedList<ArcPath>> {
    let mut entries = LinkedList::new();
    let mut dir = tokio::fs::read_dir(path).await?;
    while let Some(entry) = dir.next_entry().await? {
        entries.push_back(arc_path(entry.path()));
    }
    Ok(entries)
}

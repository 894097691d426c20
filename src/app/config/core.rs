use anyhow::Context;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{ArcPath, arc_path, fs::Fs};

use super::{data::Data, message::Message};

/// Configuration actor state: the file location and the values in use.
pub struct Core {
    fs: Fs,
    path: ArcPath,
    data: Data,
}

impl Core {
    pub fn new(fs: Fs, path: ArcPath) -> Self {
        Self {
            fs,
            path,
            data: Data::default(),
        }
    }

    pub fn spawn(mut self) -> (super::Config, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Load { tx } => {
                        let _ = tx.send(self.load().await);
                    }
                    Message::Save { tx } => {
                        let _ = tx.send(self.save().await);
                    }
                    Message::Get { tx } => {
                        let _ = tx.send(self.data.clone());
                    }
                    Message::Set { data } => self.data = data,
                }
            }
        });
        (super::Config::Actual(tx), handle)
    }

    /// On failure the values in use are kept.
    async fn load(&mut self) -> anyhow::Result<()> {
        let contents = self
            .fs
            .read_to_string(self.path.clone())
            .await
            .with_context(|| format!("Reading config file {}", self.path.display()))?;
        self.data = Data::parse(&contents)
            .with_context(|| format!("Parsing config file {}", self.path.display()))?;
        Ok(())
    }

    async fn save(&self) -> anyhow::Result<()> {
        let contents = self.data.to_toml()?;
        if let Some(dir) = self.path.parent() {
            self.fs
                .mkdir(arc_path(dir))
                .await
                .with_context(|| format!("Creating config directory {}", dir.display()))?;
        }
        self.fs
            .write(self.path.clone(), contents)
            .await
            .with_context(|| format!("Writing config file {}", self.path.display()))
    }
}

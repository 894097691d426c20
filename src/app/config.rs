use anyhow::Context;
use tokio::sync::{mpsc::Sender, oneshot};

use crate::{ArcPath, fs::Fs};
use message::Message;

mod core;
mod data;
mod message;
mod mock;

pub use data::{Data, LogSection, RepositorySection};

/// The configuration actor, backed by a TOML file.
///
/// Until [`Config::load`] succeeds the defaults of [`Data`] are in use.
///
/// # Examples
/// ```ignore
/// let config = Config::spawn(fs, config_path);
/// if config.load().await.is_err() {
///     config.save().await?;
/// }
/// let latency = config.get().await.latency();
/// ```
#[derive(Debug, Clone)]
pub enum Config {
    Actual(Sender<Message>),
    Mock(mock::Mock),
}

impl Config {
    pub fn spawn(fs: Fs, path: ArcPath) -> Self {
        let (config, _) = core::Core::new(fs, path).spawn();
        config
    }

    pub fn mock(data: Data) -> Self {
        Self::Mock(mock::Mock::new(data))
    }

    /// Reads the file. Always succeeds for the mock.
    pub async fn load(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Load { tx })
                    .await
                    .context("Loading config with Config actor")
                    .expect("Config actor died");
                rx.await
                    .context("Awaiting config load from Config actor")
                    .expect("Config actor died")
            }
            Self::Mock(_) => Ok(()),
        }
    }

    /// Writes the values in use to the file, creating its directory. Always
    /// succeeds for the mock.
    pub async fn save(&self) -> anyhow::Result<()> {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Save { tx })
                    .await
                    .context("Saving config with Config actor")
                    .expect("Config actor died");
                rx.await
                    .context("Awaiting config save from Config actor")
                    .expect("Config actor died")
            }
            Self::Mock(_) => Ok(()),
        }
    }

    /// Snapshot of the values in use.
    pub async fn get(&self) -> Data {
        match self {
            Self::Actual(sender) => {
                let (tx, rx) = oneshot::channel();
                sender
                    .send(Message::Get { tx })
                    .await
                    .context("Reading config with Config actor")
                    .expect("Config actor died");
                rx.await
                    .context("Awaiting config from Config actor")
                    .expect("Config actor died")
            }
            Self::Mock(mock) => mock.get().await,
        }
    }

    /// Replaces the values in use. Call [`Config::save`] to persist them.
    pub async fn set(&self, data: Data) {
        match self {
            Self::Actual(sender) => sender
                .send(Message::Set { data })
                .await
                .context("Updating config with Config actor")
                .expect("Config actor died"),
            Self::Mock(mock) => mock.set(data).await,
        }
    }
}

use anyhow::Context;
use chrono::{NaiveDateTime, Utc};
use tokio::{sync::mpsc, task::JoinHandle};

use super::data::{LogLevel, LogMessage};
use super::message::Message;
use crate::{ArcPath, arc_path, fs::Fs};

const SESSION_PREFIX: &str = "articles_";
const SESSION_STAMP: &str = "%Y%m%dT%H%M%S";
const LATEST: &str = "latest.log";
const SCOPE: &str = "log";

/// Builds the file name of the session started at `started`.
fn session_file_name(started: NaiveDateTime) -> String {
    format!("{SESSION_PREFIX}{}.log", started.format(SESSION_STAMP))
}

/// Reads back the start of a session from its file name. Files that were not
/// written by this logger yield `None`.
fn session_start(file_name: &str) -> Option<NaiveDateTime> {
    let stamp = file_name
        .strip_prefix(SESSION_PREFIX)?
        .strip_suffix(".log")?;
    NaiveDateTime::parse_from_str(stamp, SESSION_STAMP).ok()
}

/// Log actor state. Records go to a per-session file and to `latest.log`;
/// the ones at or above `echo_level` are kept to be echoed on stderr when the
/// logger is flushed.
#[derive(Debug)]
pub struct Core {
    fs: Fs,
    dir: ArcPath,
    session: ArcPath,
    latest: ArcPath,
    echo_level: LogLevel,
    echo: Vec<LogMessage>,
    /// Days a session file is kept, `0` keeps them forever
    max_age: usize,
}

impl Core {
    /// Prepares the log directory and starts a fresh `latest.log`.
    ///
    /// # Errors
    /// Fails if the directory or `latest.log` cannot be written.
    pub async fn build(
        fs: Fs,
        echo_level: LogLevel,
        max_age: usize,
        dir: ArcPath,
    ) -> anyhow::Result<Self> {
        let session = arc_path(dir.join(session_file_name(Utc::now().naive_utc())));
        let latest = arc_path(dir.join(LATEST));

        fs.mkdir(dir.clone())
            .await
            .with_context(|| format!("Creating log directory {}", dir.display()))?;
        fs.write(latest.clone(), String::new())
            .await
            .with_context(|| format!("Resetting {}", latest.display()))?;

        Ok(Self {
            fs,
            dir,
            session,
            latest,
            echo_level,
            echo: Vec::new(),
            max_age,
        })
    }

    /// Spawns the actor. Records are written in the order they were sent.
    pub fn spawn(mut self) -> (super::Log, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Log(record) => self.write(record).await,
                    Message::CollectGarbage => self.collect_garbage().await,
                    Message::Flush { tx } => {
                        // Drain what was sent before the flush, then stop
                        rx.close();
                        while let Some(message) = rx.recv().await {
                            if let Message::Log(record) = message {
                                self.write(record).await;
                            }
                        }
                        self.echo();
                        let _ = tx.send(());
                        break;
                    }
                }
            }
        });
        (super::Log::Actual(tx), handle)
    }

    async fn write(&mut self, record: LogMessage) {
        let line = format!("{record}\n");
        for path in [&self.session, &self.latest] {
            if let Err(err) = self.fs.append(path.clone(), line.clone()).await {
                eprintln!("Could not write log file {}: {err}", path.display());
            }
        }
        if record.level >= self.echo_level {
            self.echo.push(record);
        }
    }

    fn echo(&mut self) {
        if self.echo.is_empty() {
            return;
        }
        for record in self.echo.drain(..) {
            eprintln!("{record}");
        }
        eprintln!("Full log: {}", self.session.display());
    }

    /// Removes session files that started more than `max_age` days ago.
    async fn collect_garbage(&mut self) {
        if self.max_age == 0 {
            return;
        }

        let entries = match self.fs.read_dir(self.dir.clone()).await {
            Ok(entries) => entries,
            Err(err) => {
                let record = LogMessage::now(
                    LogLevel::Error,
                    SCOPE,
                    format!("Could not list {}: {err}", self.dir.display()),
                );
                self.write(record).await;
                return;
            }
        };

        let now = Utc::now().naive_utc();
        for entry in entries {
            let Some(started) = entry
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(session_start)
            else {
                continue;
            };
            if (now - started).num_days() <= self.max_age as i64 {
                continue;
            }
            if let Err(err) = self.fs.remove_file(entry.clone()).await {
                let record = LogMessage::now(
                    LogLevel::Warning,
                    SCOPE,
                    format!("Could not remove {}: {err}", entry.display()),
                );
                self.write(record).await;
            }
        }
    }
}

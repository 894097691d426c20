use std::sync::{Arc, Mutex};

use super::data::{LogLevel, LogMessage};

/// In-memory logger used by tests to assert on what was logged.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    records: Arc<Mutex<Vec<LogMessage>>>,
}

impl Mock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self, scope: &'static str, message: String, level: LogLevel) {
        if let Ok(mut records) = self.records.lock() {
            records.push(LogMessage::now(level, scope, message));
        }
    }

    pub async fn flush(&self) {
        for record in self.get_messages().await {
            eprintln!("{record}");
        }
    }

    pub async fn get_messages(&self) -> Vec<LogMessage> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

use std::sync::Arc;

use tokio::sync::Mutex;

use super::data::Data;

/// In-memory configuration. Loading and saving do nothing.
#[derive(Debug, Clone)]
pub struct Mock {
    data: Arc<Mutex<Data>>,
}

impl Mock {
    pub fn new(data: Data) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn get(&self) -> Data {
        self.data.lock().await.clone()
    }

    pub async fn set(&self, data: Data) {
        *self.data.lock().await = data;
    }
}

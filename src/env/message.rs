use std::env::VarError;

use tokio::sync::oneshot;

use crate::ArcStr;

#[derive(Debug)]
pub enum Message {
    /// Read one variable
    Var {
        key: ArcStr,
        tx: oneshot::Sender<Result<ArcStr, VarError>>,
    },
}

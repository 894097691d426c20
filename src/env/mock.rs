use std::{collections::HashMap, env::VarError, sync::Arc};

use crate::ArcStr;

/// Fixed set of variables.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    variables: Arc<HashMap<ArcStr, ArcStr>>,
}

impl Mock {
    pub fn new<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ArcStr>,
        V: Into<ArcStr>,
    {
        Self {
            variables: Arc::new(
                variables
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    pub fn var(&self, key: &str) -> Result<ArcStr, VarError> {
        self.variables
            .get(key)
            .cloned()
            .ok_or(VarError::NotPresent)
    }
}

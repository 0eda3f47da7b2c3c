use serde::{Deserialize, Serialize};

/// `{"items": [...]}` request wrapper used by the batch endpoints
#[derive(Debug, Serialize)]
pub(crate) struct Items<'a, T> {
    pub items: &'a [T],
}

/// `{"results": [...]}` response wrapper
#[derive(Debug, Deserialize)]
pub(crate) struct Results<T> {
    pub results: Vec<T>,
}

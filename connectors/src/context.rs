//! Host index context and the location of a widget inside the search state.

use serde::{Deserialize, Serialize};

pub const INDICES_KEY: &str = "indices";


/// Which index a widget targets.
///
/// A page searching one index keeps widget refinements at the top of the
/// state tree. A page searching several indices nests them under
/// `indices.<target_index>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexContext {
    SingleIndex(String),
    MultiIndex(String),
}

impl IndexContext {
    pub fn single(main_index: impl Into<String>) -> Self {
        IndexContext::SingleIndex(main_index.into())
    }

    pub fn multi(target_index: impl Into<String>) -> Self {
        IndexContext::MultiIndex(target_index.into())
    }

    /// The index whose results and metadata belong to the widget.
    pub fn index_id(&self) -> &str {
        match self {
            IndexContext::SingleIndex(index) => index,
            IndexContext::MultiIndex(index) => index,
        }
    }

    pub fn is_multi_index(&self) -> bool {
        matches!(self, IndexContext::MultiIndex(_))
    }
}


/// Path of a widget's refinement inside the search state:
/// `[indices, <index>,] [<namespace>,] <id>`.
pub fn resolve_path(id: &str, namespace: Option<&str>, context: &IndexContext) -> Vec<String> {
    let mut path = Vec::with_capacity(4);
    if let IndexContext::MultiIndex(target_index) = context {
        path.push(INDICES_KEY.to_string());
        path.push(target_index.clone());
    }
    if let Some(namespace) = namespace {
        path.push(namespace.to_string());
    }
    path.push(id.to_string());
    path
}

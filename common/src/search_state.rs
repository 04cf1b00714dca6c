//! Persistent search-state tree shared by every widget.
//!
//! The tree is keyed by widget namespace (`hierarchicalMenu`, `multiRange`, ...)
//! or by a reserved key (`sortBy`, `page`, `indices`). Nodes are reference
//! counted, so a clone is cheap and every write only copies the nodes on the
//! path it touches. Untouched siblings stay shared with the previous tree.

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};


/// A value in the tree. Connectors only read `Text`, `Number` and `Tree`; the
/// other variants carry what other widgets store (lists of refined values,
/// toggles, ...) so the whole state still loads and writes back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Null,
    Bool(bool),
    Number(i64),
    Float(f64),
    Text(String),
    List(Vec<StateValue>),
    Tree(SearchState),
}

impl StateValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            StateValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&SearchState> {
        match self {
            StateValue::Tree(t) => Some(t),
            _ => None,
        }
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::Text(value.to_string())
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        StateValue::Text(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        StateValue::Number(value)
    }
}

impl From<SearchState> for StateValue {
    fn from(value: SearchState) -> Self {
        StateValue::Tree(value)
    }
}


#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchState {
    entries: Arc<BTreeMap<String, StateValue>>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.entries.get(key)
    }

    pub fn get_tree(&self, key: &str) -> Option<&SearchState> {
        self.get(key).and_then(StateValue::as_tree)
    }

    /// Follows `path` through nested trees and returns the value at its end.
    pub fn get_in<S: AsRef<str>>(&self, path: &[S]) -> Option<&StateValue> {
        let (last, parents) = path.split_last()?;
        let mut node = self;
        for segment in parents {
            node = node.get_tree(segment.as_ref())?;
        }
        node.get(last.as_ref())
    }

    /// Returns a new tree with `key` set to `value`.
    pub fn with(&self, key: impl Into<String>, value: impl Into<StateValue>) -> SearchState {
        let mut next = self.clone();
        Arc::make_mut(&mut next.entries).insert(key.into(), value.into());
        next
    }

    /// Returns a new tree without `key`. Shares the node when the key is absent.
    pub fn without(&self, key: &str) -> SearchState {
        if !self.entries.contains_key(key) {
            return self.clone();
        }
        let mut next = self.clone();
        Arc::make_mut(&mut next.entries).remove(key);
        next
    }

    /// Sets the value at `path`, creating intermediate trees as needed.
    /// A non-tree value found on the way is replaced by a tree.
    pub fn set_in<S: AsRef<str>>(&self, path: &[S], value: impl Into<StateValue>) -> SearchState {
        self.set_in_value(path, value.into())
    }

    fn set_in_value<S: AsRef<str>>(&self, path: &[S], value: StateValue) -> SearchState {
        match path {
            [] => self.clone(),
            [key] => self.with(key.as_ref(), value),
            [key, rest @ ..] => {
                let child = self.get_tree(key.as_ref()).cloned().unwrap_or_default();
                self.with(key.as_ref(), child.set_in_value(rest, value))
            }
        }
    }

    /// Removes the value at `path`. Every tree on the path that ends up empty
    /// is removed as well, so no empty containers are left behind.
    pub fn remove_in<S: AsRef<str>>(&self, path: &[S]) -> SearchState {
        match path {
            [] => self.clone(),
            [key] => self.without(key.as_ref()),
            [key, rest @ ..] => {
                let Some(child) = self.get_tree(key.as_ref()) else {
                    return self.clone();
                };
                let child = child.remove_in(rest);
                if child.is_empty() {
                    self.without(key.as_ref())
                } else {
                    self.with(key.as_ref(), child)
                }
            }
        }
    }

    /// True when both trees point at the same node.
    pub fn ptr_eq(&self, other: &SearchState) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl<K: Into<String>, V: Into<StateValue>> FromIterator<(K, V)> for SearchState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        SearchState {
            entries: Arc::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }
}

//! Resolved path formatting
//!
//! A resolved path is the concrete, wildcard-free address of one location
//! reached while running a plan. Getters emit them and updaters look them up,
//! so both sides go through these helpers:
//!
//! - the root is `$`
//! - a field step appends `.name`, whatever notation the expression used
//! - an array step appends `[i]` with the concrete element index

use std::collections::BTreeMap;

/// Concrete location of a node, e.g. `$.buz.arr[1].haha`
pub type ResolvedPath = String;

/// Values keyed by resolved path, in path order
pub type PathMap<V> = BTreeMap<ResolvedPath, V>;

/// Resolved path of the root value
pub const ROOT: &str = "$";

/// Resolved path of the root value
pub fn root() -> ResolvedPath {
    ROOT.to_string()
}

/// Append a field step
pub fn field(parent: &str, name: &str) -> ResolvedPath {
    let mut path = String::with_capacity(parent.len() + 1 + name.len());
    path.push_str(parent);
    path.push('.');
    path.push_str(name);
    path
}

/// Append an array element step
pub fn index(parent: &str, index: usize) -> ResolvedPath {
    format!("{}[{}]", parent, index)
}

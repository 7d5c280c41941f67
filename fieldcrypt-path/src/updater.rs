//! Write interpreter
//!
//! Runs the same plan as the [`Getter`](crate::getter::Getter) over a deep
//! copy of the record. At every resolved path with a replacement the copy is
//! overwritten and the replacement becomes the node for deeper steps; every
//! other node is forwarded untouched. The input record is never mutated.

use crate::ast::{ArraySub, PathExpression};
use crate::error::{AccessError, ResolutionError};
use crate::plan::{Task, TaskList};
use crate::resolved::{self, PathMap, ResolvedPath, ROOT};
use crate::tree::Tree;
use std::sync::Arc;

/// Writes replacement values back into a copy of a record
#[derive(Debug)]
pub struct Updater<T> {
    plan: Arc<TaskList<T>>,
}

impl<T> Clone for Updater<T> {
    fn clone(&self) -> Self {
        Updater {
            plan: Arc::clone(&self.plan),
        }
    }
}

impl<T: Tree> Updater<T> {
    /// Wrap a compiled plan
    pub fn new(plan: TaskList<T>) -> Self {
        Updater {
            plan: Arc::new(plan),
        }
    }

    /// Compile a parsed expression
    pub fn from_expression(expression: &PathExpression) -> Self {
        Self::new(TaskList::compile(expression))
    }

    /// Source expression
    pub fn expression(&self) -> &str {
        self.plan.expression()
    }

    /// Compiled plan
    pub fn plan(&self) -> &TaskList<T> {
        &self.plan
    }

    /// Apply `replacements`, keyed by resolved path, to a copy of `root`.
    ///
    /// Paths the plan never reaches are ignored. With no replacements the
    /// result is an unmodified copy.
    pub fn run(&self, root: &T, replacements: &PathMap<T>) -> Result<T, ResolutionError> {
        if replacements.is_empty() {
            return Ok(root.deep_copy());
        }
        if self.plan.tasks().is_empty() {
            return Ok(replacements.get(ROOT).unwrap_or(root).deep_copy());
        }

        let mut copy = root.deep_copy();
        {
            let mut state: Vec<(ResolvedPath, &mut T)> = vec![(resolved::root(), &mut copy)];

            for task in self.plan.tasks() {
                let mut next = Vec::with_capacity(state.len());
                for (path, node) in state {
                    match task {
                        Task::Object(name) => {
                            update_field(&path, node, name, replacements, &mut next)?
                        }
                        Task::Array(sub) => {
                            update_elements(&path, node, *sub, replacements, &mut next)?
                        }
                    }
                }
                if next.is_empty() {
                    break;
                }
                state = next;
            }
        }

        Ok(copy)
    }
}

fn update_field<'a, T: Tree>(
    path: &str,
    node: &'a mut T,
    name: &str,
    replacements: &PathMap<T>,
    next: &mut Vec<(ResolvedPath, &'a mut T)>,
) -> Result<(), ResolutionError> {
    let child_path = resolved::field(path, name);
    if let Some(replacement) = replacements.get(&child_path) {
        node.set_field(name, replacement.deep_copy())
            .map_err(|err| match err {
                err @ AccessError::NotAnObject { .. } => err.at(path),
                other => other.at(&child_path),
            })?;
    }
    if let Some(child) = node.get_field_mut(name).map_err(|e| e.at(path))? {
        if !child.is_null() {
            next.push((child_path, child));
        }
    }
    Ok(())
}

fn update_elements<'a, T: Tree>(
    path: &str,
    node: &'a mut T,
    sub: ArraySub,
    replacements: &PathMap<T>,
    next: &mut Vec<(ResolvedPath, &'a mut T)>,
) -> Result<(), ResolutionError> {
    let found = node.kind_name();
    let len = match node.array_len() {
        Some(len) => len,
        None => return Err(ResolutionError::shape(path, "array", found)),
    };
    let selected = match sub {
        ArraySub::Index(i) if i < len => i..i + 1,
        ArraySub::Index(_) => 0..0,
        ArraySub::Wildcard => 0..len,
    };

    for i in selected.clone() {
        let child_path = resolved::index(path, i);
        if let Some(replacement) = replacements.get(&child_path) {
            node.set_index(i, replacement.deep_copy())
                .map_err(|e| e.at(&child_path))?;
        }
    }

    let elements = match node.elements_mut() {
        Some(elements) => elements,
        None => return Err(ResolutionError::shape(path, "array", found)),
    };
    for (i, child) in elements
        .iter_mut()
        .enumerate()
        .skip(selected.start)
        .take(selected.len())
    {
        if child.is_null() {
            continue;
        }
        let child_path = resolved::index(path, i);
        if child.is_array() {
            return Err(ResolutionError::NestedArray { path: child_path });
        }
        next.push((child_path, child));
    }
    Ok(())
}

//! Read interpreter
//!
//! Runs a compiled plan breadth-first over a record. The state starts as
//! `{"$": root}`; every task maps each entry to zero or more children, keyed
//! by their resolved path. Whatever survives the last task is the result.

use crate::ast::{ArraySub, PathExpression};
use crate::error::ResolutionError;
use crate::plan::{Task, TaskList};
use crate::resolved::{self, PathMap, ResolvedPath};
use crate::tree::Tree;
use std::sync::Arc;

/// Extracts every value an expression addresses in a record
#[derive(Debug)]
pub struct Getter<T> {
    plan: Arc<TaskList<T>>,
}

impl<T> Clone for Getter<T> {
    fn clone(&self) -> Self {
        Getter {
            plan: Arc::clone(&self.plan),
        }
    }
}

impl<T: Tree> Getter<T> {
    /// Wrap a compiled plan
    pub fn new(plan: TaskList<T>) -> Self {
        Getter {
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

    /// Resolve the plan against `root`.
    ///
    /// Absent and null fields contribute nothing, so an empty map is a valid
    /// result. A node whose shape does not fit the next task fails with the
    /// resolved path of that node.
    pub fn run<'a>(&self, root: &'a T) -> Result<PathMap<&'a T>, ResolutionError> {
        let mut state: Vec<(ResolvedPath, &'a T)> = vec![(resolved::root(), root)];

        for task in self.plan.tasks() {
            let mut next = Vec::with_capacity(state.len());
            for (path, node) in state {
                match task {
                    Task::Object(name) => select_field(&path, node, name, &mut next)?,
                    Task::Array(sub) => select_elements(&path, node, *sub, &mut next)?,
                }
            }
            if next.is_empty() {
                return Ok(PathMap::new());
            }
            state = next;
        }

        Ok(state.into_iter().collect())
    }

    /// Like [`run`](Self::run), returning owned copies of the values
    pub fn run_cloned(&self, root: &T) -> Result<PathMap<T>, ResolutionError> {
        Ok(self
            .run(root)?
            .into_iter()
            .map(|(path, value)| (path, value.deep_copy()))
            .collect())
    }
}

fn select_field<'a, T: Tree>(
    path: &str,
    node: &'a T,
    name: &str,
    next: &mut Vec<(ResolvedPath, &'a T)>,
) -> Result<(), ResolutionError> {
    match node.get_field(name).map_err(|e| e.at(path))? {
        Some(child) if !child.is_null() => next.push((resolved::field(path, name), child)),
        _ => {}
    }
    Ok(())
}

fn select_elements<'a, T: Tree>(
    path: &str,
    node: &'a T,
    sub: ArraySub,
    next: &mut Vec<(ResolvedPath, &'a T)>,
) -> Result<(), ResolutionError> {
    let elements = match node.elements() {
        Some(elements) => elements,
        None => return Err(ResolutionError::shape(path, "array", node.kind_name())),
    };

    match sub {
        ArraySub::Index(i) => {
            if let Some(child) = elements.get(i) {
                push_element(path, i, child, next)?;
            }
        }
        ArraySub::Wildcard => {
            for (i, child) in elements.iter().enumerate() {
                push_element(path, i, child, next)?;
            }
        }
    }
    Ok(())
}

fn push_element<'a, T: Tree>(
    path: &str,
    i: usize,
    child: &'a T,
    next: &mut Vec<(ResolvedPath, &'a T)>,
) -> Result<(), ResolutionError> {
    if child.is_null() {
        return Ok(());
    }
    let child_path = resolved::index(path, i);
    if child.is_array() {
        return Err(ResolutionError::NestedArray { path: child_path });
    }
    next.push((child_path, child));
    Ok(())
}

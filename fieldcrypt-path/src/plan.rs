//! Plan compiler: parsed steps to executable tasks

use crate::ast::{ArraySub, PathExpression};
use crate::tree::{Tree, TreeFlavor};
use smallvec::SmallVec;
use std::fmt;
use std::marker::PhantomData;

/// One compiled subscript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Select a named field of an object node
    Object(String),
    /// Select one or all elements of an array node
    Array(ArraySub),
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Object(name) => write!(f, "object({})", name),
            Task::Array(ArraySub::Index(i)) => write!(f, "array({})", i),
            Task::Array(ArraySub::Wildcard) => f.write_str("array(*)"),
        }
    }
}

/// Immutable task list compiled for the tree representation `T`
pub struct TaskList<T> {
    expression: String,
    tasks: SmallVec<[Task; 8]>,
    _tree: PhantomData<fn() -> T>,
}

impl<T: Tree> TaskList<T> {
    /// Compile a parsed expression: one object task per field step, followed
    /// by an array task when the step carries an array subscript.
    pub fn compile(expression: &PathExpression) -> Self {
        let mut tasks = SmallVec::with_capacity(expression.task_count());
        for step in expression.steps() {
            tasks.push(Task::Object(step.name.clone()));
            if let Some(sub) = step.array {
                tasks.push(Task::Array(sub));
            }
        }
        TaskList {
            expression: expression.source().to_string(),
            tasks,
            _tree: PhantomData,
        }
    }

    /// Flavor this plan was compiled for
    pub fn flavor(&self) -> TreeFlavor {
        T::FLAVOR
    }
}

impl<T> TaskList<T> {
    /// Source expression
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Tasks in execution order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

impl<T> Clone for TaskList<T> {
    fn clone(&self) -> Self {
        TaskList {
            expression: self.expression.clone(),
            tasks: self.tasks.clone(),
            _tree: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TaskList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskList")
            .field("expression", &self.expression)
            .field("tasks", &self.tasks)
            .finish()
    }
}

/// Compile `expression` for the tree representation `T`
pub fn compile<T: Tree>(expression: &PathExpression) -> TaskList<T> {
    TaskList::compile(expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::record::Datum;
    use serde_json::Value;

    #[test]
    fn compiles_one_task_per_subscript() {
        let expr = parse("$.buz.arr[*].haha['x'][2]").unwrap();
        let plan = compile::<Value>(&expr);
        assert_eq!(
            plan.tasks(),
            &[
                Task::Object("buz".to_string()),
                Task::Object("arr".to_string()),
                Task::Array(ArraySub::Wildcard),
                Task::Object("haha".to_string()),
                Task::Object("x".to_string()),
                Task::Array(ArraySub::Index(2)),
            ]
        );
        assert_eq!(plan.expression(), "$.buz.arr[*].haha['x'][2]");
    }

    #[test]
    fn both_flavors_share_the_same_tasks() {
        let expr = parse("$.a[0].b").unwrap();
        let generic = compile::<Value>(&expr);
        let structured = compile::<Datum>(&expr);
        assert_eq!(generic.tasks(), structured.tasks());
        assert_eq!(generic.flavor(), TreeFlavor::Generic);
        assert_eq!(structured.flavor(), TreeFlavor::Structured);
    }

    #[test]
    fn root_compiles_to_empty_plan() {
        let plan = compile::<Value>(&parse("$").unwrap());
        assert!(plan.tasks().is_empty());
    }

    #[test]
    fn plans_are_shareable_across_threads() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<TaskList<Value>>();
        assert_send_sync::<TaskList<Datum>>();
    }

    #[test]
    fn task_display() {
        assert_eq!(Task::Object("a".into()).to_string(), "object(a)");
        assert_eq!(Task::Array(ArraySub::Wildcard).to_string(), "array(*)");
    }
}

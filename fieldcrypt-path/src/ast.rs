//! Parsed path expressions

use crate::error::ParseError;
use crate::token::is_identifier;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// How a field step was written in the source expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    /// `.field`
    Dot,
    /// `['field']`
    Bracket,
}

/// Array subscript attached to a field step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArraySub {
    /// `[n]` selects exactly one element
    Index(usize),
    /// `[*]` selects every element
    Wildcard,
}

/// One field subscript, optionally followed by an array subscript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStep {
    /// Field name, unquoted
    pub name: String,
    /// Source notation; has no effect on evaluation
    pub notation: Notation,
    /// Trailing array subscript
    pub array: Option<ArraySub>,
}

/// Immutable parsed path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    source: String,
    steps: SmallVec<[FieldStep; 4]>,
}

impl PathExpression {
    pub(crate) fn new(source: &str, steps: SmallVec<[FieldStep; 4]>) -> Self {
        PathExpression {
            source: source.to_string(),
            steps,
        }
    }

    /// The expression text as configured
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Field steps in evaluation order
    pub fn steps(&self) -> &[FieldStep] {
        &self.steps
    }

    /// Whether the expression selects the root value itself
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of tasks this expression compiles into
    pub fn task_count(&self) -> usize {
        self.steps
            .iter()
            .map(|step| 1 + usize::from(step.array.is_some()))
            .sum()
    }
}

/// Canonical form: dot notation where the name allows it, bracket otherwise.
impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for step in &self.steps {
            if is_identifier(&step.name) {
                write!(f, ".{}", step.name)?;
            } else {
                let escaped = step.name.replace('\\', "\\\\").replace('\'', "\\'");
                write!(f, "['{}']", escaped)?;
            }
            match step.array {
                Some(ArraySub::Index(i)) => write!(f, "[{}]", i)?,
                Some(ArraySub::Wildcard) => f.write_str("[*]")?,
                None => {}
            }
        }
        Ok(())
    }
}

impl FromStr for PathExpression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parser::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefers_dot_notation() {
        let expr: PathExpression = "$['buz'].arr[*]['haha']".parse().unwrap();
        assert_eq!(expr.to_string(), "$.buz.arr[*].haha");
    }

    #[test]
    fn display_keeps_brackets_for_non_identifiers() {
        let expr: PathExpression = r#"$["first name"]['it\'s'][2]"#.parse().unwrap();
        assert_eq!(expr.to_string(), r"$['first name']['it\'s'][2]");
    }

    #[test]
    fn task_count_includes_array_subscripts() {
        let expr: PathExpression = "$.a[0].b.c[*]".parse().unwrap();
        assert_eq!(expr.steps().len(), 3);
        assert_eq!(expr.task_count(), 5);
    }

    #[test]
    fn root_expression_has_no_steps() {
        let expr: PathExpression = "$".parse().unwrap();
        assert!(expr.is_root());
        assert_eq!(expr.task_count(), 0);
        assert_eq!(expr.source(), "$");
    }
}

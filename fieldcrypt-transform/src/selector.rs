//! Compiled getters and updaters for the configured fields

use crate::codec::LeafCodec;
use crate::condition::Condition;
use ahash::{AHashMap, AHashSet};
use fieldcrypt_path::{
    parse_with_limits, Datum, Getter, ParseError, PathExpression, PathLimits, Updater,
};
use serde_json::Value;

/// Getter and updater compiled from one expression for one record flavor
#[derive(Debug, Clone)]
pub struct FieldPlan<T> {
    getter: Getter<T>,
    updater: Updater<T>,
}

impl<T: LeafCodec> FieldPlan<T> {
    fn compile(expression: &PathExpression) -> Self {
        FieldPlan {
            getter: Getter::from_expression(expression),
            updater: Updater::from_expression(expression),
        }
    }

    /// Source expression
    pub fn expression(&self) -> &str {
        self.getter.expression()
    }

    /// Read plan
    pub fn getter(&self) -> &Getter<T> {
        &self.getter
    }

    /// Write plan
    pub fn updater(&self) -> &Updater<T> {
        &self.updater
    }
}

/// Plans for one record flavor, in configuration order
#[derive(Debug, Clone)]
pub struct FlavorPlans<T> {
    plans: Vec<FieldPlan<T>>,
    index: AHashMap<String, usize>,
}

impl<T: LeafCodec> FlavorPlans<T> {
    fn new() -> Self {
        FlavorPlans {
            plans: Vec::new(),
            index: AHashMap::new(),
        }
    }

    fn push(&mut self, expression: &PathExpression) {
        self.index
            .insert(expression.source().to_string(), self.plans.len());
        self.plans.push(FieldPlan::compile(expression));
    }

    /// Plans in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &FieldPlan<T>> {
        self.plans.iter()
    }

    /// Plan compiled from `expression`
    pub fn get(&self, expression: &str) -> Option<&FieldPlan<T>> {
        self.index.get(expression).map(|&i| &self.plans[i])
    }
}

/// Every distinct configured expression, compiled for both record flavors
#[derive(Debug, Clone)]
pub struct FieldSelector {
    expressions: Vec<String>,
    schemaless: FlavorPlans<Value>,
    structured: FlavorPlans<Datum>,
}

impl FieldSelector {
    /// Compile `expressions`, dropping duplicates and keeping first-seen order
    pub fn new<I, S>(expressions: I, limits: &PathLimits) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = AHashSet::new();
        let mut selector = FieldSelector {
            expressions: Vec::new(),
            schemaless: FlavorPlans::new(),
            structured: FlavorPlans::new(),
        };

        for text in expressions {
            let text = text.as_ref();
            if !seen.insert(text.to_string()) {
                continue;
            }
            let expression = parse_with_limits(text, limits)?;
            selector.schemaless.push(&expression);
            selector.structured.push(&expression);
            selector.expressions.push(text.to_string());
        }

        Ok(selector)
    }

    /// Distinct expressions in configuration order
    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    /// Number of distinct expressions
    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    /// Whether no expression is configured
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Plans for schemaless records
    pub fn schemaless(&self) -> &FlavorPlans<Value> {
        &self.schemaless
    }

    /// Plans for structured records
    pub fn structured(&self) -> &FlavorPlans<Datum> {
        &self.structured
    }
}

/// Record flavors a transform can run on
pub trait Selectable: LeafCodec + Sized {
    /// This flavor's field plans
    fn field_plans(selector: &FieldSelector) -> &FlavorPlans<Self>;

    /// This flavor's condition getter
    fn condition_getter(condition: &Condition) -> &Getter<Self>;
}

impl Selectable for Value {
    fn field_plans(selector: &FieldSelector) -> &FlavorPlans<Self> {
        selector.schemaless()
    }

    fn condition_getter(condition: &Condition) -> &Getter<Self> {
        condition.schemaless_getter()
    }
}

impl Selectable for Datum {
    fn field_plans(selector: &FieldSelector) -> &FlavorPlans<Self> {
        selector.structured()
    }

    fn condition_getter(condition: &Condition) -> &Getter<Self> {
        condition.structured_getter()
    }
}

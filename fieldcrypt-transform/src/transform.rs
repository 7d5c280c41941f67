//! Record transformation: harvest, process, splice back

use crate::condition::Condition;
use crate::config::{Mode, TransformConfig};
use crate::error::{Result, TransformError};
use crate::selector::{FieldSelector, Selectable};
use crate::service::{CryptoService, FieldKey};
use crate::Record;
use ahash::AHashMap;
use fieldcrypt_path::{Datum, PathMap, Struct, Tree};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Encrypts or decrypts the configured fields of records
pub struct Transform<S: CryptoService> {
    config: TransformConfig,
    selector: FieldSelector,
    condition: Option<Condition>,
    service: S,
    pool: Option<ThreadPool>,
}

impl<S: CryptoService> Transform<S> {
    /// Validate `config`, compile its expressions and initialise `service`
    pub fn new(config: TransformConfig, service: S) -> Result<Self> {
        config.validate()?;
        let limits = config.limits();

        let selector = FieldSelector::new(&config.fields, &limits)?;
        let condition = config
            .condition
            .as_ref()
            .map(|c| Condition::from_config(c, &limits))
            .transpose()?;

        let pool = match config.threads {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|idx| format!("fieldcrypt-transform-{}", idx))
                    .build()
                    .map_err(|e| {
                        TransformError::InvalidConfig(format!("Failed to create thread pool: {}", e))
                    })?,
            ),
            None => None,
        };

        service.init()?;
        debug!(
            service = service.name(),
            mode = %config.mode,
            fields = selector.len(),
            "transform initialised"
        );

        Ok(Transform {
            config,
            selector,
            condition,
            service,
            pool,
        })
    }

    /// Build from a JSON configuration document
    pub fn from_json(config: &str, service: S) -> Result<Self> {
        Self::new(TransformConfig::from_json(config)?, service)
    }

    /// Active configuration
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Configured direction
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Compiled field plans
    pub fn selector(&self) -> &FieldSelector {
        &self.selector
    }

    /// Backend
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Transform a schemaless record
    pub fn apply_value(&self, value: &Value) -> Result<Value> {
        self.transform(value)
    }

    /// Transform a structured record
    pub fn apply_struct(&self, record: &Struct) -> Result<Struct> {
        self.apply_datum(Datum::Struct(record.clone()))
    }

    fn apply_datum(&self, datum: Datum) -> Result<Struct> {
        match self.transform(&datum)? {
            Datum::Struct(updated) => Ok(updated),
            other => Err(TransformError::UnsupportedValue {
                path: fieldcrypt_path::resolved::ROOT.to_string(),
                found: other.kind_name(),
            }),
        }
    }

    /// Transform a record of any flavor; empty records pass through
    pub fn apply(&self, record: Record) -> Result<Record> {
        match record {
            Record::Schemaless(value) => self.apply_value(&value).map(Record::Schemaless),
            Record::Structured(record) => {
                self.apply_datum(Datum::Struct(record)).map(Record::Structured)
            }
            Record::Empty => Ok(Record::Empty),
        }
    }

    /// Transform records in parallel, returning one result per record in input order
    pub fn apply_batch(&self, records: &[Record]) -> Vec<Result<Record>> {
        let run = || -> Vec<Result<Record>> {
            records
                .par_iter()
                .map(|record| self.apply(record.clone()))
                .collect()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    fn transform<T: Selectable>(&self, record: &T) -> Result<T> {
        if let Some(condition) = &self.condition {
            if !condition.accepts(record)? {
                debug!(
                    field = condition.field(),
                    equals = condition.equals(),
                    "condition not met, skipping record"
                );
                return Ok(record.deep_copy());
            }
        }

        let plans = T::field_plans(&self.selector);
        let mut items = HashMap::new();
        for plan in plans.iter() {
            for (path, leaf) in plan.getter().run(record)? {
                let item = leaf.to_item(&path)?;
                items.insert(FieldKey::new(plan.expression(), path), item);
            }
        }

        if items.is_empty() {
            debug!("no configured field present, record unchanged");
            return Ok(record.deep_copy());
        }
        debug!(
            service = self.service.name(),
            mode = %self.config.mode,
            fields = items.len(),
            "harvested fields"
        );

        let results = self.service.process(items).map_err(|err| {
            warn!(
                service = self.service.name(),
                retriable = err.is_retriable(),
                error = %err,
                "crypto service failed"
            );
            err
        })?;

        let mut grouped: AHashMap<String, PathMap<T>> = AHashMap::new();
        for (key, item) in results {
            let leaf = T::from_item(&item, self.config.output_encoding);
            grouped.entry(key.expression).or_default().insert(key.path, leaf);
        }

        let mut updated: Option<T> = None;
        for plan in plans.iter() {
            let replacements = match grouped.get(plan.expression()) {
                Some(replacements) => replacements,
                None => continue,
            };
            trace!(
                expression = plan.expression(),
                replacements = replacements.len(),
                "applying updater"
            );
            let base = updated.as_ref().unwrap_or(record);
            updated = Some(plan.updater().run(base, replacements)?);
        }

        Ok(updated.unwrap_or_else(|| record.deep_copy()))
    }
}

impl<S: CryptoService> Drop for Transform<S> {
    fn drop(&mut self) {
        trace!(service = self.service.name(), "closing crypto service");
        self.service.close();
    }
}

impl<S: CryptoService> std::fmt::Debug for Transform<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("config", &self.config)
            .field("service", &self.service.name())
            .finish()
    }
}

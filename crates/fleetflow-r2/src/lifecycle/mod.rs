//! Bucket lifecycle rules
//!
//! A lifecycle policy is an ordered list of rules. Each rule may delete
//! objects, move them to another storage class, and abort abandoned
//! multipart uploads, each gated by a [`Condition`].
//!
//! ```text
//! {
//!   "rules": [{
//!     "id": "delete-by-date",
//!     "enabled": true,
//!     "conditions": { "prefix": "logs/" },
//!     "deleteObjectsTransition": { "condition": { "type": "Date", "date": "..." } },
//!     "storageClassTransitions": [{ "condition": {..}, "storageClass": "InfrequentAccess" }],
//!     "abortMultipartUploadsTransition": { "condition": { "type": "Age", "maxAge": 86400 } }
//!   }]
//! }
//! ```
//!
//! Request bodies are built by [`LifecycleModel::marshal_custom`] and
//! [`LifecycleModel::marshal_custom_for_update`], which restore full
//! timestamp precision after the generic marshal.

mod custom;

pub use custom::DATE_KEY;

use crate::config::BucketRef;
use crate::error::{R2Error, Result};
use crate::resource::BucketSubResource;
use fleetflow_apijson::Rfc3339;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Lifecycle policy of one bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecycleModel {
    #[serde(skip)]
    pub bucket: BucketRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<LifecycleRule>>,
}

/// A single lifecycle rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Must be given explicitly; a missing value is not `false`
    pub enabled: bool,

    /// Object key prefix the rule is scoped to
    #[serde(rename = "conditions", default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<RuleScope>,

    #[serde(
        rename = "deleteObjectsTransition",
        default,
        skip_serializing_if = "transition_unset"
    )]
    pub delete_transition: Option<Transition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class_transitions: Option<Vec<StorageClassTransition>>,

    #[serde(
        rename = "abortMultipartUploadsTransition",
        default,
        skip_serializing_if = "transition_unset"
    )]
    pub abort_multipart_transition: Option<Transition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleScope {
    #[serde(default)]
    pub prefix: String,
}

/// Transition gated by a condition. Without a condition it is never sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClassTransition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    pub storage_class: StorageClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageClass {
    InfrequentAccess,
}

/// When a transition fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Condition {
    /// Seconds since object creation
    Age {
        #[serde(rename = "maxAge")]
        max_age: u64,
    },
    /// Absolute instant
    Date {
        #[serde(default)]
        date: Rfc3339,
    },
}

impl Condition {
    pub fn age(max_age: u64) -> Self {
        Condition::Age { max_age }
    }

    pub fn date(date: impl Into<Rfc3339>) -> Self {
        Condition::Date { date: date.into() }
    }

    /// Instant of a `Date` condition
    pub fn instant(&self) -> Option<&Rfc3339> {
        match self {
            Condition::Date { date } => Some(date),
            Condition::Age { .. } => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Condition::Age { .. } => "Age",
            Condition::Date { .. } => "Date",
        }
    }
}

fn transition_unset(transition: &Option<Transition>) -> bool {
    transition
        .as_ref()
        .is_none_or(|t| t.condition.is_none())
}

impl Transition {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition: Some(condition),
        }
    }
}

impl LifecycleRule {
    pub fn new(id: impl Into<String>, enabled: bool) -> Self {
        Self {
            id: Some(id.into()),
            enabled,
            scope: None,
            delete_transition: None,
            storage_class_transitions: None,
            abort_multipart_transition: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.scope = Some(RuleScope {
            prefix: prefix.into(),
        });
        self
    }

    pub fn delete_when(mut self, condition: Condition) -> Self {
        self.delete_transition = Some(Transition::new(condition));
        self
    }

    pub fn transition_when(mut self, storage_class: StorageClass, condition: Condition) -> Self {
        self.storage_class_transitions
            .get_or_insert_with(Vec::new)
            .push(StorageClassTransition {
                condition: Some(condition),
                storage_class,
            });
        self
    }

    pub fn abort_multipart_after(mut self, max_age: u64) -> Self {
        self.abort_multipart_transition = Some(Transition::new(Condition::age(max_age)));
        self
    }

    fn label(&self, index: usize) -> String {
        match &self.id {
            Some(id) => format!("rule '{}'", id),
            None => format!("rule #{}", index),
        }
    }
}

impl LifecycleModel {
    pub fn new(bucket: BucketRef, rules: Vec<LifecycleRule>) -> Self {
        Self {
            bucket,
            rules: Some(rules),
        }
    }

    /// Rules as a slice; empty when none are declared
    pub fn rules(&self) -> &[LifecycleRule] {
        self.rules.as_deref().unwrap_or_default()
    }

    pub fn rule(&self, id: &str) -> Option<&LifecycleRule> {
        self.rules().iter().find(|r| r.id.as_deref() == Some(id))
    }

    /// Number of rules with at least one `Date` condition
    pub fn dated_rule_count(&self) -> usize {
        self.rules()
            .iter()
            .filter(|rule| {
                let delete = rule
                    .delete_transition
                    .as_ref()
                    .and_then(|t| t.condition.as_ref());
                let storage = rule
                    .storage_class_transitions
                    .iter()
                    .flatten()
                    .filter_map(|t| t.condition.as_ref());
                delete
                    .into_iter()
                    .chain(storage)
                    .any(|c| c.instant().is_some())
            })
            .count()
    }
}

impl BucketSubResource for LifecycleModel {
    const KIND: &'static str = "r2-bucket-lifecycle";
    const PATH: &'static str = "lifecycle";

    fn bucket(&self) -> &BucketRef {
        &self.bucket
    }

    fn set_bucket(&mut self, bucket: BucketRef) {
        self.bucket = bucket;
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for (index, rule) in self.rules().iter().enumerate() {
            if let Some(id) = &rule.id {
                if id.trim().is_empty() {
                    return Err(R2Error::Validation(format!("rule #{} has an empty id", index)));
                }
                if !seen.insert(id.as_str()) {
                    return Err(R2Error::Validation(format!("duplicate rule id '{}'", id)));
                }
            }

            if let Some(condition) = rule
                .delete_transition
                .as_ref()
                .and_then(|t| t.condition.as_ref())
                && condition.instant().is_some_and(Rfc3339::is_unset)
            {
                return Err(R2Error::Validation(format!(
                    "{}: delete objects transition has a Date condition without a date",
                    rule.label(index)
                )));
            }

            for (j, transition) in rule.storage_class_transitions.iter().flatten().enumerate() {
                let Some(condition) = &transition.condition else {
                    return Err(R2Error::Validation(format!(
                        "{}: storage class transition #{} has no condition",
                        rule.label(index),
                        j
                    )));
                };
                if condition.instant().is_some_and(Rfc3339::is_unset) {
                    return Err(R2Error::Validation(format!(
                        "{}: storage class transition #{} has a Date condition without a date",
                        rule.label(index),
                        j
                    )));
                }
            }

            if let Some(Condition::Date { .. }) = rule
                .abort_multipart_transition
                .as_ref()
                .and_then(|t| t.condition.as_ref())
            {
                return Err(R2Error::Validation(format!(
                    "{}: abort multipart uploads transition only supports Age conditions",
                    rule.label(index)
                )));
            }
        }

        Ok(())
    }

    fn marshal(&self) -> Result<Vec<u8>> {
        self.marshal_custom()
    }

    fn marshal_for_update(&self, prior: &Self) -> Result<Vec<u8>> {
        self.marshal_custom_for_update(prior)
    }
}

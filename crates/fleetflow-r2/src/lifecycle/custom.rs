//! Lifecycle request bodies with full timestamp precision
//!
//! The generic marshaler writes `Date` conditions at whole-second precision.
//! After it runs, the rendered tree is walked next to the model and every
//! condition date it can locate is overwritten with the model's
//! full-precision value. The model is the source of truth; the tree only
//! decides where a value goes.
//!
//! Patched locations, per rule `i` (zipped by index with the model):
//!
//! - `rules[i].deleteObjectsTransition.condition.date`
//! - `rules[i].storageClassTransitions[j].condition.date`, only when the tree
//!   and the model carry the same number of transitions
//!
//! Anything that is missing or shaped differently is skipped.

use super::{Condition, LifecycleModel, LifecycleRule};
use crate::error::Result;
use fleetflow_apijson::tree::{array_at_mut, kind, object_at_mut};
use fleetflow_apijson::{Rfc3339, diff_tree, marshal_root, to_tree};
use serde_json::{Map, Value};

/// Key holding the instant of a `Date` condition
pub const DATE_KEY: &str = "date";

const RULES_KEY: &str = "rules";
const DELETE_TRANSITION_KEY: &str = "deleteObjectsTransition";
const STORAGE_TRANSITIONS_KEY: &str = "storageClassTransitions";
const CONDITION_KEY: &str = "condition";

impl LifecycleModel {
    /// Body for a full policy write
    pub fn marshal_custom(&self) -> Result<Vec<u8>> {
        let data = marshal_root(self)?;
        self.patch_timestamps(data)
    }

    /// Body for an update against the prior state.
    ///
    /// Both snapshots are patched before diffing, so a date that moved only
    /// below the second still shows up as a change. The diff is patched again
    /// from `self` (the desired model).
    pub fn marshal_custom_for_update(&self, prior: &LifecycleModel) -> Result<Vec<u8>> {
        let diff = diff_tree(&self.patched_tree()?, &prior.patched_tree()?);
        tracing::debug!(
            "lifecycle update diff carries {} top-level field(s)",
            diff.as_object().map(|m| m.len()).unwrap_or(0)
        );
        self.patch_timestamps(serde_json::to_vec(&diff)?)
    }

    /// Generic tree of the whole model with condition dates at full precision
    fn patched_tree(&self) -> Result<Value> {
        let mut tree = to_tree(self)?;
        if let Some(tree_rules) = array_at_mut(&mut tree, &[RULES_KEY]) {
            patch_rules(tree_rules, self.rules());
        }
        Ok(tree)
    }

    /// Overwrite condition dates in an encoded body with full-precision values.
    ///
    /// Returns `data` untouched when the model has no rules or the body has no
    /// `rules` array. Fails only when `data` is not valid JSON.
    pub fn patch_timestamps(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let rules = self.rules();
        if rules.is_empty() {
            return Ok(data);
        }

        let mut tree: Value = serde_json::from_slice(&data)?;

        let Some(tree_rules) = array_at_mut(&mut tree, &[RULES_KEY]) else {
            tracing::debug!("body has no rules array, leaving timestamps as marshaled");
            return Ok(data);
        };

        if tree_rules.len() != rules.len() {
            tracing::debug!(
                "body carries {} rule(s) but the model has {}; patching the common prefix",
                tree_rules.len(),
                rules.len()
            );
        }

        let patched = patch_rules(tree_rules, rules);
        tracing::trace!("restored precision on {} condition date(s)", patched);

        Ok(serde_json::to_vec(&tree)?)
    }
}

fn patch_rules(tree_rules: &mut [Value], rules: &[LifecycleRule]) -> usize {
    let mut patched = 0;

    for (index, (tree_rule, rule)) in tree_rules.iter_mut().zip(rules).enumerate() {
        if !tree_rule.is_object() {
            tracing::debug!("rules[{}] is {}, skipping", index, kind(tree_rule));
            continue;
        }

        if let Some(date) = rule
            .delete_transition
            .as_ref()
            .and_then(|t| t.condition.as_ref())
            .and_then(Condition::instant)
            && let Some(condition) =
                object_at_mut(tree_rule, &[DELETE_TRANSITION_KEY, CONDITION_KEY])
        {
            patched += usize::from(update_instant_field(condition, date));
        }

        let Some(transitions) = rule.storage_class_transitions.as_deref() else {
            continue;
        };
        let Some(tree_transitions) = array_at_mut(tree_rule, &[STORAGE_TRANSITIONS_KEY]) else {
            continue;
        };
        if tree_transitions.len() != transitions.len() {
            tracing::debug!(
                "rules[{}] has {} storage class transition(s) in the body but {} in the model, skipping",
                index,
                tree_transitions.len(),
                transitions.len()
            );
            continue;
        }

        for (tree_transition, transition) in tree_transitions.iter_mut().zip(transitions) {
            let Some(date) = transition.condition.as_ref().and_then(Condition::instant) else {
                continue;
            };
            if let Some(condition) = object_at_mut(tree_transition, &[CONDITION_KEY]) {
                patched += usize::from(update_instant_field(condition, date));
            }
        }
    }

    patched
}

/// Write the full-precision instant into a condition object.
///
/// An unset model value leaves whatever the tree holds in place.
fn update_instant_field(condition: &mut Map<String, Value>, date: &Rfc3339) -> bool {
    let Some(rendered) = date.to_rfc3339_nano() else {
        return false;
    };
    condition.insert(DATE_KEY.to_string(), Value::String(rendered));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BucketRef;
    use crate::lifecycle::{StorageClass, Transition};
    use serde_json::json;

    fn ts(s: &str) -> Rfc3339 {
        Rfc3339::parse(s).unwrap()
    }

    fn model(rules: Vec<LifecycleRule>) -> LifecycleModel {
        LifecycleModel::new(BucketRef::new("acc", "logs"), rules)
    }

    fn decode(data: &[u8]) -> Value {
        serde_json::from_slice(data).unwrap()
    }

    #[test]
    fn test_update_instant_field_overwrites() {
        let mut condition = Map::new();
        condition.insert("type".to_string(), json!("Date"));
        condition.insert("date".to_string(), json!("2024-12-31T23:59:59Z"));

        assert!(update_instant_field(
            &mut condition,
            &ts("2024-12-31T23:59:59.5Z")
        ));
        assert_eq!(condition["date"], json!("2024-12-31T23:59:59.5Z"));
    }

    #[test]
    fn test_update_instant_field_unset_is_noop() {
        let mut condition = Map::new();
        condition.insert("date".to_string(), json!("2020-01-01T00:00:00Z"));

        assert!(!update_instant_field(&mut condition, &Rfc3339::Null));
        assert!(!update_instant_field(&mut condition, &Rfc3339::Unknown));
        assert_eq!(condition["date"], json!("2020-01-01T00:00:00Z"));
    }

    #[test]
    fn test_marshal_custom_restores_delete_date() {
        let m = model(vec![
            LifecycleRule::new("delete-by-date", true)
                .delete_when(Condition::date(ts("2024-12-31T23:59:59.123456Z"))),
        ]);

        let body = decode(&m.marshal_custom().unwrap());
        assert_eq!(
            body["rules"][0]["deleteObjectsTransition"]["condition"],
            json!({"type": "Date", "date": "2024-12-31T23:59:59.123456Z"})
        );
    }

    #[test]
    fn test_marshal_custom_restores_storage_transition_dates() {
        let m = model(vec![
            LifecycleRule::new("archive", true)
                .transition_when(StorageClass::InfrequentAccess, Condition::age(86400))
                .transition_when(
                    StorageClass::InfrequentAccess,
                    Condition::date(ts("2031-03-01T00:00:00.25Z")),
                ),
        ]);

        let body = decode(&m.marshal_custom().unwrap());
        let transitions = &body["rules"][0]["storageClassTransitions"];
        assert_eq!(transitions[0]["condition"], json!({"type": "Age", "maxAge": 86400}));
        assert_eq!(
            transitions[1]["condition"]["date"],
            json!("2031-03-01T00:00:00.25Z")
        );
    }

    #[test]
    fn test_patch_without_rules_is_byte_identical() {
        let m = LifecycleModel {
            bucket: BucketRef::new("acc", "logs"),
            rules: None,
        };
        let data = br#"{ "rules" : [ {"deleteObjectsTransition": {"condition": {"date": "x"}}} ] }"#.to_vec();
        assert_eq!(m.patch_timestamps(data.clone()).unwrap(), data);

        let empty = model(vec![]);
        assert_eq!(empty.patch_timestamps(data.clone()).unwrap(), data);
    }

    #[test]
    fn test_patch_rules_not_a_list_is_unchanged() {
        let m = model(vec![
            LifecycleRule::new("r", true).delete_when(Condition::date(ts("2024-01-01T00:00:00.1Z"))),
        ]);
        let data = br#"{"rules": {"0": {}}}"#.to_vec();
        assert_eq!(m.patch_timestamps(data.clone()).unwrap(), data);

        let data = br#"{"other": true}"#.to_vec();
        assert_eq!(m.patch_timestamps(data.clone()).unwrap(), data);
    }

    #[test]
    fn test_patch_malformed_bytes_fails() {
        let m = model(vec![LifecycleRule::new("r", true)]);
        let err = m.patch_timestamps(b"{\"rules\": [".to_vec()).unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_patch_skips_misshapen_elements() {
        let m = model(vec![
            LifecycleRule::new("a", true).delete_when(Condition::date(ts("2024-01-01T00:00:00.1Z"))),
            LifecycleRule::new("b", true).delete_when(Condition::date(ts("2024-01-02T00:00:00.2Z"))),
            LifecycleRule::new("c", true).delete_when(Condition::date(ts("2024-01-03T00:00:00.3Z"))),
        ]);
        let data = json!({
            "rules": [
                "not-a-rule",
                {"deleteObjectsTransition": {"condition": "flat"}},
                {"deleteObjectsTransition": {"condition": {"type": "Date", "date": "2024-01-03T00:00:00Z"}}}
            ]
        });

        let body = decode(&m.patch_timestamps(serde_json::to_vec(&data).unwrap()).unwrap());
        assert_eq!(body["rules"][0], json!("not-a-rule"));
        assert_eq!(body["rules"][1]["deleteObjectsTransition"]["condition"], json!("flat"));
        assert_eq!(
            body["rules"][2]["deleteObjectsTransition"]["condition"]["date"],
            json!("2024-01-03T00:00:00.3Z")
        );
    }

    #[test]
    fn test_patch_ignores_extra_tree_rules() {
        let m = model(vec![
            LifecycleRule::new("a", true).delete_when(Condition::date(ts("2024-01-01T00:00:00.1Z"))),
        ]);
        let data = json!({
            "rules": [
                {"deleteObjectsTransition": {"condition": {"date": "2024-01-01T00:00:00Z"}}},
                {"deleteObjectsTransition": {"condition": {"date": "1999-01-01T00:00:00Z"}}}
            ]
        });

        let body = decode(&m.patch_timestamps(serde_json::to_vec(&data).unwrap()).unwrap());
        assert_eq!(
            body["rules"][0]["deleteObjectsTransition"]["condition"]["date"],
            json!("2024-01-01T00:00:00.1Z")
        );
        assert_eq!(
            body["rules"][1]["deleteObjectsTransition"]["condition"]["date"],
            json!("1999-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_patch_does_not_synthesize_missing_condition() {
        let m = model(vec![
            LifecycleRule::new("a", true).delete_when(Condition::date(ts("2024-01-01T00:00:00.1Z"))),
        ]);
        let data = json!({"rules": [{"id": "a", "enabled": true}]});

        let body = decode(&m.patch_timestamps(serde_json::to_vec(&data).unwrap()).unwrap());
        assert_eq!(body, data);
    }

    #[test]
    fn test_delete_transition_without_condition() {
        let mut rule = LifecycleRule::new("a", true);
        rule.delete_transition = Some(Transition::default());
        let m = model(vec![rule]);

        let body = decode(&m.marshal_custom().unwrap());
        assert!(body["rules"][0].get("deleteObjectsTransition").is_none());
    }
}

//! Bucket event notifications delivered to a queue
//!
//! One model per (bucket, queue) pair. The API addresses it under the
//! account's `event_notifications` tree rather than under the bucket.

use crate::config::BucketRef;
use crate::error::{R2Error, Result};
use crate::resource::BucketSubResource;
use fleetflow_apijson::decode_result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNotificationModel {
    #[serde(skip)]
    pub bucket: BucketRef,

    #[serde(skip)]
    pub queue_id: String,

    /// Observed only
    #[serde(default, skip_serializing)]
    pub queue_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<NotificationRule>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRule {
    pub actions: Vec<EventAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventAction {
    PutObject,
    CopyObject,
    DeleteObject,
    CompleteMultipartUpload,
    LifecycleDeletion,
}

/// Shape of a GET response: every queue configured for the bucket
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketNotifications {
    #[serde(default)]
    queues: Vec<QueueNotifications>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueNotifications {
    queue_id: String,
    #[serde(default)]
    queue_name: Option<String>,
    #[serde(default)]
    rules: Option<Vec<NotificationRule>>,
}

impl NotificationRule {
    pub fn new(actions: Vec<EventAction>) -> Self {
        Self {
            actions,
            description: None,
            prefix: None,
            suffix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl EventNotificationModel {
    pub fn new(bucket: BucketRef, queue_id: impl Into<String>, rules: Vec<NotificationRule>) -> Self {
        Self {
            bucket,
            queue_id: queue_id.into(),
            queue_name: None,
            rules: Some(rules),
        }
    }

    /// Rebuild the model for one queue from a GET of the bucket's configuration.
    ///
    /// A queue absent from the response yields a model without rules.
    pub fn from_queue_response(bucket: BucketRef, queue_id: &str, body: &[u8]) -> Result<Self> {
        let config: BucketNotifications = decode_result(body)?.unwrap_or_default();
        let mut model = Self {
            bucket,
            queue_id: queue_id.to_string(),
            ..Default::default()
        };

        match config.queues.into_iter().find(|q| q.queue_id == queue_id) {
            Some(queue) => {
                model.queue_name = queue.queue_name;
                model.rules = queue.rules;
            }
            None => {
                tracing::debug!(
                    "queue {} has no notification rules on bucket {}",
                    queue_id,
                    model.bucket.bucket_name
                );
            }
        }

        Ok(model)
    }
}

impl BucketSubResource for EventNotificationModel {
    const KIND: &'static str = "r2-bucket-event-notification";
    const PATH: &'static str = "configuration/queues";

    fn bucket(&self) -> &BucketRef {
        &self.bucket
    }

    fn set_bucket(&mut self, bucket: BucketRef) {
        self.bucket = bucket;
    }

    fn path(&self) -> String {
        format!(
            "accounts/{}/event_notifications/r2/{}/{}/{}",
            self.bucket.account_id,
            self.bucket.bucket_name,
            Self::PATH,
            self.queue_id
        )
    }

    fn validate(&self) -> Result<()> {
        if self.queue_id.trim().is_empty() {
            return Err(R2Error::Validation("queue_id is required".to_string()));
        }

        for (index, rule) in self.rules.iter().flatten().enumerate() {
            if rule.actions.is_empty() {
                return Err(R2Error::Validation(format!(
                    "notification rule #{}: at least one action is required",
                    index
                )));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = rule.actions.iter().find(|a| !seen.insert(**a)) {
                return Err(R2Error::Validation(format!(
                    "notification rule #{}: duplicate action {:?}",
                    index, dup
                )));
            }
        }

        Ok(())
    }
}

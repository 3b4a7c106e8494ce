//! Bucket CORS policy

use crate::config::BucketRef;
use crate::error::{R2Error, Result};
use crate::resource::BucketSubResource;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorsModel {
    #[serde(skip)]
    pub bucket: BucketRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<CorsRule>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub allowed: CorsAllowed,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expose_headers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorsAllowed {
    pub methods: Vec<CorsMethod>,
    pub origins: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CorsMethod {
    Get,
    Put,
    Post,
    Delete,
    Head,
}

impl CorsRule {
    pub fn new(methods: Vec<CorsMethod>, origins: Vec<String>) -> Self {
        Self {
            id: None,
            allowed: CorsAllowed {
                methods,
                origins,
                headers: None,
            },
            expose_headers: None,
            max_age_seconds: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_max_age(mut self, seconds: f64) -> Self {
        self.max_age_seconds = Some(seconds);
        self
    }
}

impl BucketSubResource for CorsModel {
    const KIND: &'static str = "r2-bucket-cors";
    const PATH: &'static str = "cors";

    fn bucket(&self) -> &BucketRef {
        &self.bucket
    }

    fn set_bucket(&mut self, bucket: BucketRef) {
        self.bucket = bucket;
    }

    fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();

        for (index, rule) in self.rules.iter().flatten().enumerate() {
            let label = rule
                .id
                .as_ref()
                .map(|id| format!("CORS rule '{}'", id))
                .unwrap_or_else(|| format!("CORS rule #{}", index));

            if let Some(id) = &rule.id
                && !ids.insert(id.as_str())
            {
                return Err(R2Error::Validation(format!("duplicate CORS rule id '{}'", id)));
            }
            if rule.allowed.methods.is_empty() {
                return Err(R2Error::Validation(format!(
                    "{}: at least one allowed method is required",
                    label
                )));
            }
            if rule.allowed.origins.is_empty() {
                return Err(R2Error::Validation(format!(
                    "{}: at least one allowed origin is required",
                    label
                )));
            }
            if let Some(origin) = rule.allowed.origins.iter().find(|o| o.trim().is_empty()) {
                return Err(R2Error::Validation(format!(
                    "{}: invalid origin '{}'",
                    label, origin
                )));
            }
            if let Some(max_age) = rule.max_age_seconds
                && !(max_age.is_finite() && max_age >= 0.0)
            {
                return Err(R2Error::Validation(format!(
                    "{}: max_age_seconds must be a non-negative number",
                    label
                )));
            }
        }

        Ok(())
    }
}

//! Sippy: incremental migration into an R2 bucket from another provider
//!
//! Objects missing from the R2 bucket are fetched from the source bucket on
//! first read and copied over. Whether migration is active is reported by the
//! API and never sent.

use crate::config::BucketRef;
use crate::error::{R2Error, Result};
use crate::resource::BucketSubResource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SippyModel {
    #[serde(skip)]
    pub bucket: BucketRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SippySource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<SippyDestination>,

    /// Observed only
    #[serde(default, skip_serializing)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceProvider {
    Aws,
    Gcs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SippySource {
    pub provider: SourceProvider,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationProvider {
    #[default]
    R2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SippyDestination {
    #[serde(default)]
    pub provider: DestinationProvider,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

impl SippySource {
    fn validate(&self) -> Result<()> {
        if is_blank(&self.bucket) {
            return Err(R2Error::Validation(
                "sippy source bucket is required".to_string(),
            ));
        }

        let missing: Vec<&str> = match self.provider {
            SourceProvider::Aws => [
                ("region", &self.region),
                ("access_key_id", &self.access_key_id),
                ("secret_access_key", &self.secret_access_key),
            ]
            .into_iter()
            .filter(|(_, v)| is_blank(v))
            .map(|(name, _)| name)
            .collect(),
            SourceProvider::Gcs => [
                ("client_email", &self.client_email),
                ("private_key", &self.private_key),
            ]
            .into_iter()
            .filter(|(_, v)| is_blank(v))
            .map(|(name, _)| name)
            .collect(),
        };

        if !missing.is_empty() {
            return Err(R2Error::Validation(format!(
                "sippy source ({:?}) is missing: {}",
                self.provider,
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

impl BucketSubResource for SippyModel {
    const KIND: &'static str = "r2-bucket-sippy";
    const PATH: &'static str = "sippy";

    fn bucket(&self) -> &BucketRef {
        &self.bucket
    }

    fn set_bucket(&mut self, bucket: BucketRef) {
        self.bucket = bucket;
    }

    fn validate(&self) -> Result<()> {
        if let Some(source) = &self.source {
            source.validate()?;
        }
        if let Some(destination) = &self.destination
            && (is_blank(&destination.access_key_id) || is_blank(&destination.secret_access_key))
        {
            return Err(R2Error::Validation(
                "sippy destination needs access_key_id and secret_access_key".to_string(),
            ));
        }
        Ok(())
    }

    /// Sippy is configured with a PUT of the whole body
    fn marshal_for_update(&self, _prior: &Self) -> Result<Vec<u8>> {
        self.marshal()
    }
}

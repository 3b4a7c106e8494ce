//! Account configuration and bucket addressing

use crate::error::{R2Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Request header selecting a non-default jurisdiction
pub const JURISDICTION_HEADER: &str = "cf-r2-jurisdiction";

/// Data location jurisdiction of a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jurisdiction {
    #[default]
    Default,
    Eu,
    Fedramp,
}

impl Jurisdiction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Jurisdiction::Default => "default",
            Jurisdiction::Eu => "eu",
            Jurisdiction::Fedramp => "fedramp",
        }
    }

    /// Header to send, if any. The default jurisdiction sends none.
    pub fn header(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Jurisdiction::Default => None,
            other => Some((JURISDICTION_HEADER, other.as_str())),
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Jurisdiction {
    type Err = R2Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(Jurisdiction::Default),
            "eu" => Ok(Jurisdiction::Eu),
            "fedramp" => Ok(Jurisdiction::Fedramp),
            other => Err(R2Error::InvalidConfig(format!(
                "unknown jurisdiction '{}' (expected default, eu or fedramp)",
                other
            ))),
        }
    }
}

/// Path parameters shared by every bucket sub-resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRef {
    pub account_id: String,
    pub bucket_name: String,
    #[serde(default)]
    pub jurisdiction: Jurisdiction,
}

impl BucketRef {
    pub fn new(account_id: impl Into<String>, bucket_name: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            bucket_name: bucket_name.into(),
            jurisdiction: Jurisdiction::Default,
        }
    }

    pub fn with_jurisdiction(mut self, jurisdiction: Jurisdiction) -> Self {
        self.jurisdiction = jurisdiction;
        self
    }

    /// `accounts/{account}/r2/buckets/{bucket}/{suffix}`
    pub fn path(&self, suffix: &str) -> String {
        let base = format!(
            "accounts/{}/r2/buckets/{}",
            self.account_id, self.bucket_name
        );
        let suffix = suffix.trim_matches('/');
        if suffix.is_empty() {
            base
        } else {
            format!("{}/{}", base, suffix)
        }
    }

    /// Parse `accounts/{account_id}/{bucket_name}[/{jurisdiction}]`
    pub fn parse_import_id(id: &str) -> Result<Self> {
        let parts: Vec<&str> = id.trim_matches('/').split('/').collect();
        match parts.as_slice() {
            ["accounts", account_id, bucket_name] => Ok(Self::new(*account_id, *bucket_name)),
            ["accounts", account_id, bucket_name, jurisdiction] => {
                Ok(Self::new(*account_id, *bucket_name).with_jurisdiction(jurisdiction.parse()?))
            }
            _ => Err(R2Error::InvalidImportId(format!(
                "'{}' (expected accounts/<account_id>/<bucket_name>[/<jurisdiction>])",
                id
            ))),
        }
        .and_then(|bucket| bucket.validate().map(|_| bucket))
    }

    pub fn validate(&self) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(R2Error::InvalidConfig("account_id is empty".to_string()));
        }
        if self.bucket_name.trim().is_empty() {
            return Err(R2Error::InvalidConfig("bucket_name is empty".to_string()));
        }
        Ok(())
    }
}

/// Account-level settings read from the environment
#[derive(Debug, Clone)]
pub struct AccountConfig {
    pub account_id: String,
    pub zone_id: Option<String>,
    pub domain: Option<String>,
}

impl AccountConfig {
    /// Create AccountConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let account_id = std::env::var("CLOUDFLARE_ACCOUNT_ID")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| R2Error::MissingEnvVar("CLOUDFLARE_ACCOUNT_ID".to_string()))?;
        let zone_id = std::env::var("CLOUDFLARE_ZONE_ID")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let domain = std::env::var("CLOUDFLARE_DOMAIN")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            account_id,
            zone_id,
            domain,
        })
    }

    pub fn bucket(&self, bucket_name: impl Into<String>) -> BucketRef {
        BucketRef::new(self.account_id.clone(), bucket_name)
    }
}

//! Custom domain serving a bucket publicly

use crate::config::BucketRef;
use crate::error::{R2Error, Result};
use crate::resource::BucketSubResource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDomainModel {
    #[serde(skip)]
    pub bucket: BucketRef,

    pub domain: String,

    pub zone_id: String,

    pub enabled: bool,

    #[serde(rename = "minTLS", default, skip_serializing_if = "Option::is_none")]
    pub min_tls: Option<MinTls>,

    /// Observed only
    #[serde(default, skip_serializing)]
    pub zone_name: Option<String>,

    /// Observed only
    #[serde(default, skip_serializing)]
    pub status: Option<DomainStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinTls {
    #[serde(rename = "1.0")]
    V1_0,
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "1.2")]
    V1_2,
    #[serde(rename = "1.3")]
    V1_3,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainStatus {
    #[serde(default)]
    pub ownership: Option<String>,
    #[serde(default)]
    pub ssl: Option<String>,
}

/// Body of an in-place update; the domain itself is the path key
#[derive(Debug, Serialize)]
struct CustomDomainUpdate {
    enabled: bool,
    #[serde(rename = "minTLS", skip_serializing_if = "Option::is_none")]
    min_tls: Option<MinTls>,
}

impl CustomDomainModel {
    pub fn new(bucket: BucketRef, domain: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            bucket,
            domain: domain.into(),
            zone_id: zone_id.into(),
            enabled: true,
            ..Default::default()
        }
    }

    /// Path of this domain for read/update/delete
    pub fn domain_path(&self) -> String {
        format!("{}/{}", self.path(), self.domain)
    }
}

impl BucketSubResource for CustomDomainModel {
    const KIND: &'static str = "r2-custom-domain";
    const PATH: &'static str = "domains/custom";

    fn bucket(&self) -> &BucketRef {
        &self.bucket
    }

    fn set_bucket(&mut self, bucket: BucketRef) {
        self.bucket = bucket;
    }

    fn validate(&self) -> Result<()> {
        let domain = self.domain.trim();
        if domain.is_empty() {
            return Err(R2Error::Validation("domain is required".to_string()));
        }
        if domain.contains('/') || domain.contains(' ') || !domain.contains('.') {
            return Err(R2Error::Validation(format!("invalid domain '{}'", self.domain)));
        }
        if self.zone_id.trim().is_empty() {
            return Err(R2Error::Validation("zone_id is required".to_string()));
        }
        Ok(())
    }

    fn marshal_for_update(&self, prior: &Self) -> Result<Vec<u8>> {
        if self.domain != prior.domain || self.zone_id != prior.zone_id {
            return Err(R2Error::Validation(format!(
                "custom domain {} cannot be moved to {} in place; replace it instead",
                prior.domain, self.domain
            )));
        }
        let update = CustomDomainUpdate {
            enabled: self.enabled,
            min_tls: self.min_tls,
        };
        Ok(fleetflow_apijson::marshal_root(&update)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    const ZONE_ID: &str = "f8786e3be4a0d180338bb7caf27171a5";

    fn model() -> CustomDomainModel {
        CustomDomainModel::new(BucketRef::new("acc", "site"), "terraform-r2.cfapi.net", ZONE_ID)
    }

    #[test]
    fn test_marshal_create() {
        let mut m = model();
        m.min_tls = Some(MinTls::V1_2);
        m.validate().unwrap();

        let body: Value = serde_json::from_slice(&m.marshal().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "domain": "terraform-r2.cfapi.net",
                "zoneId": ZONE_ID,
                "enabled": true,
                "minTLS": "1.2"
            })
        );
        assert_eq!(
            m.domain_path(),
            "accounts/acc/r2/buckets/site/domains/custom/terraform-r2.cfapi.net"
        );
    }

    #[test]
    fn test_update_omits_domain() {
        let prior = model();
        let mut desired = model();
        desired.enabled = false;

        let body: Value =
            serde_json::from_slice(&desired.marshal_for_update(&prior).unwrap()).unwrap();
        assert_eq!(body, json!({"enabled": false}));
    }

    #[test]
    fn test_update_rejects_domain_change() {
        let prior = model();
        let mut desired = model();
        desired.domain = "other.cfapi.net".to_string();
        assert!(desired.marshal_for_update(&prior).is_err());
    }

    #[test]
    fn test_validate() {
        let mut m = model();
        m.domain = "localhost".to_string();
        assert!(m.validate().is_err());

        let mut m = model();
        m.zone_id = String::new();
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_from_response_reads_status() {
        let body = json!({
            "success": true,
            "result": {
                "domain": "terraform-r2.cfapi.net",
                "zoneId": ZONE_ID,
                "zoneName": "cfapi.net",
                "enabled": true,
                "minTLS": "1.0",
                "status": {"ownership": "active", "ssl": "active"}
            }
        });
        let m = CustomDomainModel::from_response(BucketRef::new("acc", "site"), body.to_string().as_bytes())
            .unwrap();
        assert_eq!(m.min_tls, Some(MinTls::V1_0));
        assert_eq!(m.zone_name.as_deref(), Some("cfapi.net"));
        assert_eq!(m.status.unwrap().ssl.as_deref(), Some("active"));
    }
}

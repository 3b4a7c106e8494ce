//! Common surface of bucket sub-resources

use crate::config::BucketRef;
use crate::error::Result;
use fleetflow_apijson::decode_result;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A configuration object attached to one R2 bucket
///
/// Implementors are plain models: the bucket they belong to is carried
/// alongside the body fields but never serialized into it.
pub trait BucketSubResource: Serialize + DeserializeOwned + Default {
    /// Resource type name (e.g. "r2-bucket-lifecycle")
    const KIND: &'static str;

    /// Path segment below `accounts/{account}/r2/buckets/{bucket}/`
    const PATH: &'static str;

    fn bucket(&self) -> &BucketRef;

    fn set_bucket(&mut self, bucket: BucketRef);

    /// Check constraints the API enforces before sending anything
    fn validate(&self) -> Result<()>;

    /// API path of this resource
    fn path(&self) -> String {
        self.bucket().path(Self::PATH)
    }

    /// Body for a create/replace call
    fn marshal(&self) -> Result<Vec<u8>> {
        Ok(fleetflow_apijson::marshal_root(self)?)
    }

    /// Body for an update call against the prior state
    fn marshal_for_update(&self, prior: &Self) -> Result<Vec<u8>> {
        Ok(fleetflow_apijson::marshal_for_update(self, prior)?)
    }

    /// Rebuild the model from a GET response
    fn from_response(bucket: BucketRef, body: &[u8]) -> Result<Self> {
        let mut model: Self = decode_result(body)?.unwrap_or_default();
        model.set_bucket(bucket);
        Ok(model)
    }
}

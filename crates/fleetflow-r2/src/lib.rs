//! Cloudflare R2 bucket sub-resources for FleetFlow
//!
//! Typed models for the configuration objects attached to an R2 bucket, and
//! the request bodies the management API expects for them.
//!
//! # Resources
//!
//! - Lifecycle rules ([`lifecycle`]), with full-precision condition dates
//! - CORS rules ([`cors`])
//! - Event notifications to a queue ([`event_notification`])
//! - Sippy incremental migration ([`sippy`])
//! - Custom domains ([`custom_domain`])
//!
//! Sending the bodies, authentication and retries live elsewhere; this crate
//! stops at bytes.
//!
//! # Example
//!
//! ```ignore
//! use fleetflow_r2::{AccountConfig, BucketSubResource, Condition, LifecycleModel, LifecycleRule};
//! use fleetflow_apijson::Rfc3339;
//!
//! let account = AccountConfig::from_env()?;
//! let policy = LifecycleModel::new(
//!     account.bucket("logs"),
//!     vec![LifecycleRule::new("delete-by-date", true)
//!         .delete_when(Condition::date(Rfc3339::parse("2024-12-31T23:59:59.123Z")?))],
//! );
//!
//! policy.validate()?;
//! let body = policy.marshal()?;
//! ```

pub mod config;
pub mod cors;
pub mod custom_domain;
pub mod error;
pub mod event_notification;
pub mod lifecycle;
pub mod resource;
pub mod sippy;

pub use config::{AccountConfig, BucketRef, Jurisdiction};
pub use cors::{CorsAllowed, CorsMethod, CorsModel, CorsRule};
pub use custom_domain::{CustomDomainModel, DomainStatus, MinTls};
pub use error::{R2Error, Result};
pub use event_notification::{EventAction, EventNotificationModel, NotificationRule};
pub use lifecycle::{
    Condition, LifecycleModel, LifecycleRule, RuleScope, StorageClass, StorageClassTransition,
    Transition,
};
pub use resource::BucketSubResource;
pub use sippy::{SippyDestination, SippyModel, SippySource, SourceProvider};

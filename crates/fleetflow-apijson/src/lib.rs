//! FleetFlow API JSON
//!
//! Generic, schema-driven marshaling between typed models and the JSON bodies
//! the Cloudflare management API speaks.
//!
//! # Pipeline
//!
//! ```text
//!  typed model ──marshal_root────────────▶ JSON body (create / replace)
//!  (desired, prior) ──marshal_for_update──▶ JSON body (changed fields only)
//!  response bytes ──decode_result─────────▶ typed model
//! ```
//!
//! The marshaler knows nothing about individual resources. Date-time
//! attributes ([`Rfc3339`]) are encoded at whole-second granularity; resources
//! that need sub-second fidelity post-process the tree with the helpers in
//! [`tree`].

pub mod envelope;
pub mod error;
pub mod marshal;
pub mod timestamp;
pub mod tree;

// Re-exports
pub use envelope::{ApiMessage, ApiResponse, decode_result};
pub use error::{ApiJsonError, Result};
pub use marshal::{diff_tree, marshal_for_update, marshal_root, to_tree};
pub use timestamp::Rfc3339;

//! Foundation types for objkit.
//!
//! This crate provides the object identity protocol, the shared error
//! taxonomy, misuse diagnostics, runtime configuration, and the serialization
//! capability traits. Every other objkit crate depends on `objkit-types`.
//!
//! # Key Types
//!
//! - [`ObjectIdentity`] — Random surrogate id plus declared type tag
//! - [`IdentityObject`] — Capability trait carrying the equality protocol
//! - [`ObjectError`] — Error taxonomy surfaced to callers
//! - [`ObjectRuntime`] — Configuration and diagnostics collaborator
//! - [`Serializable`] / [`Deserializable`] — JSON capability pair

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod identity;
pub mod runtime;
pub mod serialization;

pub use config::{DisplayMode, RuntimeConfig};
pub use diagnostics::{
    Diagnostic, DiagnosticSink, NullSink, RecordingSink, Severity, TracingSink,
    DIRECT_CONSTRUCTION, UNSET_NORMALIZED,
};
pub use error::{ErrorKind, ObjectError, ObjectResult};
pub use identity::{
    identity_equals, next_surrogate, same_instance, Comparison, IdentityObject, ObjectIdentity,
    MAX_SURROGATE,
};
pub use runtime::ObjectRuntime;
pub use serialization::{matches_tag, Deserializable, Serializable, SubType};

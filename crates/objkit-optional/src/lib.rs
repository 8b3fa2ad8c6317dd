//! Null-safety container for objkit.
//!
//! [`Optional`] wraps at most one value behind an immutable, shareable
//! handle. It offers presence checks, extraction with fallbacks, chainable
//! transformations, identity-protocol equality, and a JSON envelope
//! round-trip validated against an expected subtype tag.
//!
//! ```
//! use objkit_optional::Optional;
//!
//! let name = Optional::of("  Ada  ")
//!     .map(|s| s.trim().to_string())
//!     .filter(|s| !s.is_empty());
//! assert_eq!(name.or_else("anonymous".into()), "Ada");
//! ```

pub mod factory;
pub mod json;
pub mod optional;
pub mod transform;

pub use factory::OptionalFactory;
pub use optional::{ConstructArgs, Optional, RawValue, TYPE_TAG};

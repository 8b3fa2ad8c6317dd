use std::any::Any;
use std::fmt;
use std::sync::{Mutex, OnceLock};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DisplayMode;

/// Largest surrogate id that can be assigned (`2^31 - 1`).
pub const MAX_SURROGATE: u32 = 0x7fff_ffff;

fn generator() -> &'static Mutex<StdRng> {
    static GENERATOR: OnceLock<Mutex<StdRng>> = OnceLock::new();
    GENERATOR.get_or_init(|| Mutex::new(StdRng::from_entropy()))
}

/// Draw a surrogate id uniformly from `[0, MAX_SURROGATE]`.
///
/// Backed by a single process-wide generator seeded from OS entropy on first
/// use. Ids are not unique: collisions are rare, not impossible.
pub fn next_surrogate() -> u32 {
    generator()
        .lock()
        .expect("surrogate generator poisoned")
        .gen_range(0..=MAX_SURROGATE)
}

/// The identity embedded in every object that takes part in the equality
/// protocol.
///
/// An `ObjectIdentity` carries a randomly assigned surrogate id standing in
/// for a memory address, plus the declared type tag of the object that owns
/// it. Both are fixed at construction. It is deliberately not `Clone`: a
/// copied identity would claim to be a second instance of the same object.
pub struct ObjectIdentity {
    surrogate_id: u32,
    type_tag: &'static str,
    display: DisplayMode,
}

impl ObjectIdentity {
    /// Create an identity for an object of the given declared type.
    pub fn new(type_tag: &'static str) -> Self {
        Self::with_display(type_tag, DisplayMode::Stable)
    }

    /// Create an identity rendering its identity string with `display`.
    pub fn with_display(type_tag: &'static str, display: DisplayMode) -> Self {
        Self {
            surrogate_id: next_surrogate(),
            type_tag,
            display,
        }
    }

    /// The surrogate id. Stable for the lifetime of the identity.
    pub fn surrogate_id(&self) -> u32 {
        self.surrogate_id
    }

    /// Declared type tag of the owning object.
    pub fn type_tag(&self) -> &'static str {
        self.type_tag
    }

    /// How the identity string is rendered.
    pub fn display_mode(&self) -> DisplayMode {
        self.display
    }

    /// Surrogate id as 8 hex characters.
    pub fn short_hex(&self) -> String {
        hex::encode(self.surrogate_id.to_be_bytes())
    }

    /// `<type_tag>@<suffix>`.
    ///
    /// In [`DisplayMode::Stable`] the suffix is [`short_hex`](Self::short_hex).
    /// In [`DisplayMode::Compat`] a fresh random suffix is drawn on every call,
    /// so two calls on the same identity disagree.
    pub fn identity_string(&self) -> String {
        match self.display {
            DisplayMode::Stable => format!("{}@{}", self.type_tag, self.short_hex()),
            DisplayMode::Compat => format!(
                "{}@{}",
                self.type_tag,
                hex::encode(next_surrogate().to_be_bytes())
            ),
        }
    }
}

impl fmt::Debug for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectIdentity({}@{})", self.type_tag, self.short_hex())
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity_string())
    }
}

/// Capability shared by every value type that uses the identity-based
/// equality protocol.
///
/// The trait is object-safe so heterogeneous values can be compared through
/// `&dyn IdentityObject`.
pub trait IdentityObject: Any {
    /// The embedded identity.
    fn identity(&self) -> &ObjectIdentity;

    fn as_any(&self) -> &dyn Any;

    /// The immutable surrogate id. A collision-prone convenience value, not a
    /// content hash.
    fn hash_surrogate(&self) -> u32 {
        self.identity().surrogate_id()
    }

    fn type_tag(&self) -> &'static str {
        self.identity().type_tag()
    }

    fn identity_string(&self) -> String {
        self.identity().identity_string()
    }

    /// Default equality: same declared type and same surrogate id.
    ///
    /// Types with a payload override this and call [`identity_equals`] with
    /// [`Comparison::Payload`].
    fn equals(&self, other: Option<&dyn IdentityObject>) -> bool {
        match prefilter(self.identity(), self.as_any(), other) {
            Prefilter::Same => true,
            Prefilter::Differ => false,
            Prefilter::Compatible(other) => self.hash_surrogate() == other.hash_surrogate(),
        }
    }
}

/// How [`identity_equals`] settles two compatible instances.
pub enum Comparison<'a, T> {
    /// Equal iff the surrogate ids match.
    Identity,
    /// Equal iff the callback says so. The callback only ever sees two values
    /// of the same concrete type.
    Payload(&'a dyn Fn(&T, &T) -> bool),
}

enum Prefilter<'a> {
    Same,
    Differ,
    Compatible(&'a dyn IdentityObject),
}

// Steps shared by every comparison, in order: reference identity, absence,
// then type conformance.
fn prefilter<'a>(
    identity: &ObjectIdentity,
    any: &dyn Any,
    other: Option<&'a dyn IdentityObject>,
) -> Prefilter<'a> {
    if let Some(o) = other {
        if std::ptr::eq(identity, o.identity()) {
            return Prefilter::Same;
        }
    }
    let Some(other) = other else {
        return Prefilter::Differ;
    };
    if other.type_tag() != identity.type_tag() || other.as_any().type_id() != any.type_id() {
        return Prefilter::Differ;
    }
    Prefilter::Compatible(other)
}

/// The identity equality algorithm.
///
/// 1. The same instance is always equal to itself.
/// 2. An absent `other` is never equal.
/// 3. `other` must have the same declared type tag and the same concrete type.
/// 4. With [`Comparison::Identity`], surrogate ids must match.
/// 5. With [`Comparison::Payload`], the callback decides.
///
/// Payload comparison does not consult the surrogate ids: they are drawn
/// independently per instance, so two containers holding the same value would
/// otherwise never compare equal.
pub fn identity_equals<T: IdentityObject>(
    this: &T,
    other: Option<&dyn IdentityObject>,
    comparison: Comparison<'_, T>,
) -> bool {
    let other = match prefilter(this.identity(), this.as_any(), other) {
        Prefilter::Same => return true,
        Prefilter::Differ => return false,
        Prefilter::Compatible(other) => other,
    };
    let Some(other) = other.as_any().downcast_ref::<T>() else {
        return false;
    };
    match comparison {
        Comparison::Identity => this.hash_surrogate() == other.hash_surrogate(),
        Comparison::Payload(compare) => compare(this, other),
    }
}

/// Returns `true` if `a` and `b` are the same instance.
pub fn same_instance(a: &dyn IdentityObject, b: &dyn IdentityObject) -> bool {
    std::ptr::eq(a.identity(), b.identity())
}

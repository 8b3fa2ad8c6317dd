use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use objkit_types::{
    identity_equals, Comparison, IdentityObject, ObjectError, ObjectIdentity, ObjectResult,
    ObjectRuntime, Severity, SubType, DIRECT_CONSTRUCTION, UNSET_NORMALIZED,
};

use crate::factory::OptionalFactory;

/// Declared type tag of every [`Optional`].
pub const TYPE_TAG: &str = "Optional";

pub(crate) const NULL_VALUE_MESSAGE: &str = "Value cannot be null.";

/// A host value on its way into an [`Optional`].
///
/// `Unset` is the "never assigned" artifact some hosts distinguish from an
/// explicit null. It never survives construction: it is normalized to empty
/// and reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawValue<T> {
    Present(T),
    Null,
    Unset,
}

impl<T> From<Option<T>> for RawValue<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Present(v),
            None => Self::Null,
        }
    }
}

/// Arguments marking a construction as coming from a factory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConstructArgs {
    /// Whether an empty value is acceptable.
    pub nullable: bool,
    /// Message for the failure raised when an empty value is not acceptable.
    pub message: Option<String>,
}

impl ConstructArgs {
    pub fn nullable() -> Self {
        Self {
            nullable: true,
            message: None,
        }
    }

    pub fn non_null(message: Option<&str>) -> Self {
        Self {
            nullable: false,
            message: message.map(str::to_string),
        }
    }
}

struct Inner<T> {
    identity: ObjectIdentity,
    slot: Option<T>,
}

/// Immutable null-safety container holding at most one value.
///
/// An `Optional` is a shared handle: cloning it yields the same instance, and
/// no operation ever changes what an instance holds. Every transformation
/// returns a new instance (except [`filter`](Optional::filter), which hands
/// back the receiver when the predicate holds).
///
/// Build instances through the factories ([`of`](Optional::of),
/// [`of_nullable`](Optional::of_nullable),
/// [`require_non_null`](Optional::require_non_null)) or through an
/// [`ObjectRuntime`] via [`OptionalFactory`].
pub struct Optional<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Optional<T> {
    pub(crate) fn from_parts(identity: ObjectIdentity, slot: Option<T>) -> Self {
        Self {
            inner: Arc::new(Inner { identity, slot }),
        }
    }

    /// A fresh instance holding `slot`, rendered like `self`.
    pub(crate) fn derive<U>(&self, slot: Option<U>) -> Optional<U> {
        Optional::from_parts(
            ObjectIdentity::with_display(TYPE_TAG, self.inner.identity.display_mode()),
            slot,
        )
    }

    pub(crate) fn construct_in(
        runtime: &ObjectRuntime,
        value: RawValue<T>,
        args: Option<ConstructArgs>,
    ) -> ObjectResult<Self> {
        let slot = match value {
            RawValue::Present(v) => Some(v),
            RawValue::Null => None,
            RawValue::Unset => {
                runtime.diagnose(
                    Severity::Warning,
                    UNSET_NORMALIZED,
                    "unset value passed to Optional, treating it as null",
                );
                None
            }
        };
        let args = match args {
            Some(args) => args,
            None => {
                runtime.diagnose(
                    Severity::Error,
                    DIRECT_CONSTRUCTION,
                    "Optional constructed directly; use Optional::of or Optional::of_nullable instead",
                );
                ConstructArgs::default()
            }
        };
        if slot.is_none() && !args.nullable {
            let message = args
                .message
                .unwrap_or_else(|| NULL_VALUE_MESSAGE.to_string());
            return Err(ObjectError::IllegalArgument(message));
        }
        Ok(Self::from_parts(runtime.new_identity(TYPE_TAG), slot))
    }

    /// Raw constructor.
    ///
    /// Prefer the factories. Calling this with `args == None` is reported as
    /// misuse and treated as a non-nullable construction.
    pub fn new(value: RawValue<T>, args: Option<ConstructArgs>) -> ObjectResult<Self> {
        ObjectRuntime::global().construct(value, args)
    }

    /// A present container. Non-nullness is guaranteed by the type.
    pub fn of(value: T) -> Self {
        ObjectRuntime::global().of(value)
    }

    /// A present container, or `IllegalArgument` if `value` is `None`.
    pub fn try_of(value: Option<T>) -> ObjectResult<Self> {
        ObjectRuntime::global().require_non_null(value, None)
    }

    /// A container that may be empty. Never fails.
    pub fn of_nullable(value: Option<T>) -> Self {
        ObjectRuntime::global().of_nullable(value)
    }

    pub fn empty() -> Self {
        ObjectRuntime::global().empty()
    }

    /// Like [`try_of`](Self::try_of) with a caller-supplied failure message.
    pub fn require_non_null(value: Option<T>, message: Option<&str>) -> ObjectResult<Self> {
        ObjectRuntime::global().require_non_null(value, message)
    }

    pub fn is_present(&self) -> bool {
        self.inner.slot.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.slot.is_none()
    }

    /// Borrow the contained value, if any.
    pub fn as_option(&self) -> Option<&T> {
        self.inner.slot.as_ref()
    }

    /// The contained value, or [`ObjectError::NoValuePresent`].
    pub fn get(&self) -> ObjectResult<&T> {
        self.as_option().ok_or(ObjectError::NoValuePresent)
    }

    pub fn or_else(&self, other: T) -> T
    where
        T: Clone,
    {
        match self.as_option() {
            Some(v) => v.clone(),
            None => other,
        }
    }

    /// The contained value, or the supplier's result. The supplier only runs
    /// when the container is empty.
    pub fn or_else_get<F>(&self, supplier: F) -> T
    where
        T: Clone,
        F: FnOnce() -> T,
    {
        match self.as_option() {
            Some(v) => v.clone(),
            None => supplier(),
        }
    }

    /// The contained value, or [`ObjectError::NoValuePresent`].
    pub fn or_else_throw(&self) -> ObjectResult<&T> {
        self.get()
    }

    /// The contained value, or the supplier's error returned as-is.
    pub fn or_else_throw_with<E, F>(&self, error_supplier: F) -> Result<&T, E>
    where
        F: FnOnce() -> E,
    {
        self.as_option().ok_or_else(error_supplier)
    }

    pub fn if_present<F>(&self, consumer: F)
    where
        F: FnOnce(&T),
    {
        if let Some(v) = self.as_option() {
            consumer(v);
        }
    }

    /// Runs exactly one of the two branches.
    pub fn if_present_or_else<F, G>(&self, consumer: F, otherwise: G)
    where
        F: FnOnce(&T),
        G: FnOnce(),
    {
        match self.as_option() {
            Some(v) => consumer(v),
            None => otherwise(),
        }
    }

    /// Returns `true` if both handles point at the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn hash_code(&self) -> u32 {
        self.inner.identity.surrogate_id()
    }
}

impl<T> Clone for Optional<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        Self::of_nullable(value)
    }
}

impl<T: Clone> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.as_option().cloned()
    }
}

impl<T: PartialEq + 'static> IdentityObject for Optional<T> {
    fn identity(&self) -> &ObjectIdentity {
        &self.inner.identity
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: Option<&dyn IdentityObject>) -> bool {
        identity_equals(
            self,
            other,
            Comparison::Payload(&|a: &Optional<T>, b: &Optional<T>| {
                a.as_option() == b.as_option()
            }),
        )
    }
}

impl<T: PartialEq + 'static> PartialEq for Optional<T> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(Some(other))
    }
}

impl<T: Eq + 'static> Eq for Optional<T> {}

// Consistent with `PartialEq`: only the slot takes part.
impl<T: Hash> Hash for Optional<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.slot.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Optional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Optional")
            .field("value", &self.inner.slot)
            .field("identity", &self.inner.identity)
            .finish()
    }
}

impl<T: fmt::Display + SubType> fmt::Display for Optional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hash = self.hash_code();
        match self.as_option() {
            Some(v) => write!(f, "Optional[{v}, type={}, hashcode={hash}]", v.sub_type()),
            None => write!(f, "Optional[null, type={}, hashcode={hash}]", T::declared_tag()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use objkit_types::{ErrorKind, MAX_SURROGATE};

    use super::*;

    #[test]
    fn of_is_present_and_returns_the_value() {
        let o = Optional::of(5);
        assert!(o.is_present());
        assert!(!o.is_empty());
        assert_eq!(o.get(), Ok(&5));
    }

    #[test]
    fn try_of_rejects_empty_with_illegal_argument() {
        let err = Optional::<i32>::try_of(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalArgument);
        assert_eq!(err.to_string(), "Value cannot be null.");
    }

    #[test]
    fn require_non_null_uses_custom_message() {
        let err = Optional::<i32>::require_non_null(None, Some("id is required")).unwrap_err();
        assert_eq!(err, ObjectError::IllegalArgument("id is required".into()));
        assert!(Optional::require_non_null(Some(1), Some("unused")).is_ok());
    }

    #[test]
    fn of_nullable_empty_falls_back() {
        let o = Optional::<i32>::of_nullable(None);
        assert!(!o.is_present());
        assert_eq!(o.or_else(7), 7);
        assert_eq!(Optional::of_nullable(Some(3)).or_else(7), 3);
    }

    #[test]
    fn get_on_empty_is_generic_absence() {
        let err = Optional::<String>::empty().get().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GenericAbsence);
    }

    #[test]
    fn raw_constructor_without_args_is_non_nullable() {
        let err = Optional::<i32>::new(RawValue::Null, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalArgument);
        assert!(Optional::new(RawValue::Present(1), None).is_ok());
    }

    #[test]
    fn unset_is_normalized_to_empty() {
        let o = Optional::<i32>::new(RawValue::Unset, Some(ConstructArgs::nullable())).unwrap();
        assert!(o.is_empty());
        let err = Optional::<i32>::new(RawValue::Unset, Some(ConstructArgs::non_null(None)));
        assert!(err.is_err());
    }

    #[test]
    fn or_else_get_is_lazy() {
        let calls = Cell::new(0);
        let present = Optional::of(1).or_else_get(|| {
            calls.set(calls.get() + 1);
            9
        });
        assert_eq!(present, 1);
        assert_eq!(calls.get(), 0);

        let empty = Optional::<i32>::empty().or_else_get(|| {
            calls.set(calls.get() + 1);
            9
        });
        assert_eq!(empty, 9);
        assert_eq!(calls.get(), 1);
    }

    #[derive(Debug, PartialEq)]
    struct Missing(&'static str);

    #[test]
    fn or_else_throw_with_never_calls_supplier_when_present() {
        let calls = Cell::new(0);
        let four = Optional::of(4);
        let result = four.or_else_throw_with(|| {
            calls.set(calls.get() + 1);
            Missing("nope")
        });
        assert_eq!(result, Ok(&4));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn or_else_throw_with_propagates_supplier_error_verbatim() {
        let calls = Cell::new(0);
        let o = Optional::<i32>::empty();
        let result = o.or_else_throw_with(|| {
            calls.set(calls.get() + 1);
            Missing("custom")
        });
        assert_eq!(result, Err(Missing("custom")));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn or_else_throw_without_supplier() {
        assert_eq!(Optional::of(2).or_else_throw(), Ok(&2));
        assert_eq!(
            Optional::<i32>::empty().or_else_throw(),
            Err(ObjectError::NoValuePresent)
        );
    }

    #[test]
    fn if_present_only_runs_when_present() {
        let seen = Cell::new(0);
        Optional::of(3).if_present(|v| seen.set(*v));
        assert_eq!(seen.get(), 3);
        Optional::<i32>::empty().if_present(|_| seen.set(100));
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn if_present_or_else_runs_exactly_one_branch() {
        let present = Cell::new(0);
        let absent = Cell::new(0);
        Optional::of(1).if_present_or_else(|_| present.set(present.get() + 1), || {
            absent.set(absent.get() + 1)
        });
        Optional::<i32>::empty().if_present_or_else(|_| present.set(present.get() + 1), || {
            absent.set(absent.get() + 1)
        });
        assert_eq!(present.get(), 1);
        assert_eq!(absent.get(), 1);
    }

    #[test]
    fn equal_contents_compare_equal() {
        assert_eq!(Optional::of(5), Optional::of(5));
        assert_ne!(Optional::of(5), Optional::of(6));
        assert_eq!(Optional::<i32>::empty(), Optional::of_nullable(None));
        assert_ne!(Optional::of(5), Optional::empty());
    }

    #[test]
    fn different_payload_types_are_not_equal() {
        let number = Optional::of(5);
        let text = Optional::of("5");
        assert!(!number.equals(Some(&text)));
        assert!(!text.equals(Some(&number)));
    }

    #[test]
    fn absent_other_is_not_equal() {
        assert!(!Optional::of(5).equals(None));
    }

    #[test]
    fn clones_are_the_same_instance() {
        let a = Optional::of(String::from("x"));
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(objkit_types::same_instance(&a, &b));
        assert!(!a.ptr_eq(&Optional::of(String::from("x"))));
    }

    #[test]
    fn hash_code_is_stable() {
        let o = Optional::of(1);
        assert_eq!(o.hash_code(), o.hash_code());
        assert_eq!(o.hash_code(), o.hash_surrogate());
        assert!(o.hash_code() <= MAX_SURROGATE);
    }

    #[test]
    fn display_mirrors_value_and_tag() {
        let o = Optional::of(42);
        assert_eq!(
            o.to_string(),
            format!("Optional[42, type=number, hashcode={}]", o.hash_code())
        );
        let e = Optional::<String>::empty();
        assert_eq!(
            e.to_string(),
            format!("Optional[null, type=string, hashcode={}]", e.hash_code())
        );
    }

    #[test]
    fn identity_string_uses_the_optional_tag() {
        let o = Optional::of(1);
        assert!(o.identity_string().starts_with("Optional@"));
        assert_eq!(o.type_tag(), TYPE_TAG);
    }

    #[test]
    fn option_conversions() {
        let o: Optional<i32> = Some(3).into();
        assert_eq!(Option::from(o), Some(3));
        let e: Optional<i32> = None.into();
        assert!(e.is_empty());
    }

    #[test]
    fn equal_optionals_hash_alike() {
        use std::hash::DefaultHasher;

        let hash = |o: &Optional<i32>| {
            let mut h = DefaultHasher::new();
            o.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&Optional::of(8)), hash(&Optional::of(8)));
    }
}

use serde::de::DeserializeOwned;

use objkit_types::{ObjectResult, ObjectRuntime, SubType};

use crate::json::decode;
use crate::optional::{ConstructArgs, Optional, RawValue, TYPE_TAG};

/// [`Optional`] factories bound to an explicit [`ObjectRuntime`].
///
/// The associated functions on `Optional` go through
/// [`ObjectRuntime::global`]; use this trait to pick the configuration and
/// diagnostics sink yourself.
pub trait OptionalFactory {
    fn of<T>(&self, value: T) -> Optional<T>;

    fn of_nullable<T>(&self, value: Option<T>) -> Optional<T>;

    fn empty<T>(&self) -> Optional<T>;

    fn require_non_null<T>(
        &self,
        value: Option<T>,
        message: Option<&str>,
    ) -> ObjectResult<Optional<T>>;

    /// The raw constructor path. `args == None` is reported as misuse.
    fn construct<T>(
        &self,
        value: RawValue<T>,
        args: Option<ConstructArgs>,
    ) -> ObjectResult<Optional<T>>;

    fn optional_from_json<T: DeserializeOwned + SubType>(
        &self,
        json: &str,
        expected_sub_type: &str,
    ) -> ObjectResult<Optional<T>>;
}

impl OptionalFactory for ObjectRuntime {
    fn of<T>(&self, value: T) -> Optional<T> {
        Optional::from_parts(self.new_identity(TYPE_TAG), Some(value))
    }

    fn of_nullable<T>(&self, value: Option<T>) -> Optional<T> {
        Optional::from_parts(self.new_identity(TYPE_TAG), value)
    }

    fn empty<T>(&self) -> Optional<T> {
        Optional::from_parts(self.new_identity(TYPE_TAG), None)
    }

    fn require_non_null<T>(
        &self,
        value: Option<T>,
        message: Option<&str>,
    ) -> ObjectResult<Optional<T>> {
        Optional::construct_in(self, value.into(), Some(ConstructArgs::non_null(message)))
    }

    fn construct<T>(
        &self,
        value: RawValue<T>,
        args: Option<ConstructArgs>,
    ) -> ObjectResult<Optional<T>> {
        Optional::construct_in(self, value, args)
    }

    fn optional_from_json<T: DeserializeOwned + SubType>(
        &self,
        json: &str,
        expected_sub_type: &str,
    ) -> ObjectResult<Optional<T>> {
        decode(self, json, expected_sub_type)
    }
}

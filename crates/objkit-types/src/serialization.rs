use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::error::{ObjectError, ObjectResult};

/// Produces a structured, textually encodable representation of itself.
pub trait Serializable {
    fn to_json_value(&self) -> ObjectResult<Value>;

    fn to_json(&self) -> ObjectResult<String> {
        let value = self.to_json_value()?;
        serde_json::to_string(&value).map_err(|e| ObjectError::malformed(e.to_string()))
    }
}

/// Reconstructs an instance from its textual representation plus a hint
/// about the expected type.
pub trait Deserializable: Sized {
    type Hint: ?Sized;

    fn from_json(json: &str, hint: &Self::Hint) -> ObjectResult<Self>;
}

/// Runtime type tag of a value, as written into the `subType` field of a
/// serialized container.
pub trait SubType {
    /// Tag for the declared type, used when no value is at hand.
    fn declared_tag() -> &'static str;

    /// Tag for this particular value.
    fn sub_type(&self) -> &'static str {
        Self::declared_tag()
    }
}

pub const NUMBER: &str = "number";
pub const STRING: &str = "string";
pub const BOOLEAN: &str = "boolean";
pub const OBJECT: &str = "object";

/// Returns `true` if `value` has the JSON kind a known tag implies.
///
/// Unknown tags and `null` always pass.
pub fn matches_tag(tag: &str, value: &Value) -> bool {
    match (tag, value) {
        (_, Value::Null) => true,
        (NUMBER, v) => v.is_number(),
        (STRING, v) => v.is_string(),
        (BOOLEAN, v) => v.is_boolean(),
        (OBJECT, v) => v.is_object() || v.is_array(),
        _ => true,
    }
}

macro_rules! impl_sub_type {
    ($tag:expr => $($t:ty),+ $(,)?) => {
        $(
            impl SubType for $t {
                fn declared_tag() -> &'static str {
                    $tag
                }
            }
        )+
    };
}

// 128-bit integers are left out: `serde_json::Value` cannot hold them, so
// their envelopes would not decode.
impl_sub_type!(NUMBER => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
impl_sub_type!(STRING => String, &'static str, char);
impl_sub_type!(BOOLEAN => bool);

impl<T> SubType for Vec<T> {
    fn declared_tag() -> &'static str {
        OBJECT
    }
}

impl<K, V> SubType for BTreeMap<K, V> {
    fn declared_tag() -> &'static str {
        OBJECT
    }
}

impl<K, V, S> SubType for HashMap<K, V, S> {
    fn declared_tag() -> &'static str {
        OBJECT
    }
}

impl SubType for Value {
    fn declared_tag() -> &'static str {
        OBJECT
    }

    fn sub_type(&self) -> &'static str {
        match self {
            Value::Bool(_) => BOOLEAN,
            Value::Number(_) => NUMBER,
            Value::String(_) => STRING,
            Value::Null | Value::Array(_) | Value::Object(_) => OBJECT,
        }
    }
}

//! JSON envelope for [`Optional`]:
//! `{"type":"Optional","subType":"<tag>","value":<payload or null>}`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use objkit_types::{
    matches_tag, Deserializable, ObjectError, ObjectResult, ObjectRuntime, Serializable, SubType,
};

use crate::optional::{ConstructArgs, Optional, RawValue, TYPE_TAG};

#[derive(Serialize)]
struct Envelope<'a, T> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "subType")]
    sub_type: &'static str,
    value: Option<&'a T>,
}

impl<T: Serialize + SubType> Optional<T> {
    fn envelope(&self) -> Envelope<'_, T> {
        let sub_type = match self.as_option() {
            Some(v) => v.sub_type(),
            None => T::declared_tag(),
        };
        Envelope {
            kind: TYPE_TAG,
            sub_type,
            value: self.as_option(),
        }
    }
}

impl<T: Serialize + SubType> Serializable for Optional<T> {
    fn to_json_value(&self) -> ObjectResult<Value> {
        serde_json::to_value(self.envelope()).map_err(|e| {
            ObjectError::illegal_argument(format!("cannot serialize Optional value: {e}"))
        })
    }

    // Serialized straight from the envelope so fields keep their order.
    fn to_json(&self) -> ObjectResult<String> {
        serde_json::to_string(&self.envelope()).map_err(|e| {
            ObjectError::illegal_argument(format!("cannot serialize Optional value: {e}"))
        })
    }
}

impl<T: DeserializeOwned + SubType> Deserializable for Optional<T> {
    /// The expected `subType` tag.
    type Hint = str;

    fn from_json(json: &str, expected: &str) -> ObjectResult<Self> {
        decode(ObjectRuntime::global(), json, expected)
    }
}

fn reject(json: &str, reason: &str) -> ObjectError {
    debug!(reason, "rejected Optional envelope");
    ObjectError::malformed(format!("Cannot deserialize Optional from: `{json}`"))
}

/// Validate an envelope and rebuild the container through the nullable path.
///
/// Checks run in a fixed order and every failure happens before anything is
/// constructed: structure, `type`, `subType`, value kind, subtype match,
/// payload decoding.
pub(crate) fn decode<T: DeserializeOwned>(
    runtime: &ObjectRuntime,
    json: &str,
    expected: &str,
) -> ObjectResult<Optional<T>> {
    let parsed: Value = serde_json::from_str(json).map_err(|_| reject(json, "not JSON"))?;
    let Value::Object(mut fields) = parsed else {
        return Err(reject(json, "not an object"));
    };
    if fields.get("type").and_then(Value::as_str) != Some(TYPE_TAG) {
        return Err(reject(json, "missing or wrong type"));
    }
    let sub_type = match fields.get("subType").and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => return Err(reject(json, "missing subType")),
    };
    let raw = fields.remove("value");
    if let Some(value) = &raw {
        if !matches_tag(&sub_type, value) {
            return Err(reject(json, "value does not match subType"));
        }
    }
    if sub_type != expected {
        return Err(ObjectError::sub_type_mismatch(sub_type, expected));
    }

    let value = match raw {
        None => RawValue::Unset,
        Some(Value::Null) => RawValue::Null,
        Some(v) => RawValue::Present(
            serde_json::from_value(v).map_err(|_| reject(json, "payload does not decode"))?,
        ),
    };
    Optional::construct_in(runtime, value, Some(ConstructArgs::nullable()))
}

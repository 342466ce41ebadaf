//! Callback-wrapped JSON script bodies
//!
//! A JSONP response body is a single call expression,
//! `<callback>(<json>);`. [`ScriptBody`] renders that text on the responder
//! side and takes it apart again on the fetcher side.

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;

use crate::{CallbackName, DomainError, DomainResult};

/// Indent used for pretty-printed payloads
pub const PRETTY_INDENT: &[u8] = b"    ";

/// Serialize `value` as pretty-printed JSON with a four-space indent
///
/// # Errors
///
/// Returns [`DomainError::Serialization`] if `value` cannot be serialized.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> DomainResult<String> {
    let mut buf = Vec::with_capacity(64);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(PRETTY_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;

    String::from_utf8(buf).map_err(|e| DomainError::Serialization(e.to_string()))
}

/// A `<callback>(<json>);` expression split into its two parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBody {
    callback: CallbackName,
    json: String,
}

impl ScriptBody {
    /// Wrap `payload` in a call to `callback`
    ///
    /// The payload is pretty-printed; the callback is used verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Serialization`] if `payload` cannot be serialized.
    pub fn wrap<T: Serialize + ?Sized>(callback: CallbackName, payload: &T) -> DomainResult<Self> {
        Ok(Self {
            callback,
            json: to_pretty_json(payload)?,
        })
    }

    /// Parse a script body, splitting the callback at the first `(`
    ///
    /// Surrounding whitespace and the trailing `;` are optional.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MalformedScript`] if the text is not a single
    /// call expression with a non-empty callback and argument.
    pub fn parse(body: &str) -> DomainResult<Self> {
        let inner = strip_call_suffix(body)?.trim_start();
        let open = inner
            .find('(')
            .ok_or_else(|| malformed("missing opening parenthesis"))?;
        let callback = CallbackName::new(inner[..open].trim())
            .map_err(|_| malformed("missing callback name"))?;

        Self::from_parts(callback, &inner[open + 1..])
    }

    /// Parse a script body that is expected to call `expected`
    ///
    /// Unlike [`ScriptBody::parse`] this matches the whole callback name as a
    /// prefix, so names that themselves contain `(` are handled.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MalformedScript`] if the body does not call
    /// `expected` with a non-empty argument.
    pub fn parse_for(body: &str, expected: &CallbackName) -> DomainResult<Self> {
        let inner = strip_call_suffix(body)?;
        let args = inner
            .strip_prefix(expected.as_str())
            .or_else(|| inner.trim_start().strip_prefix(expected.as_str()))
            .and_then(|rest| rest.trim_start().strip_prefix('('))
            .ok_or_else(|| malformed(format!("body does not call '{expected}'")))?;

        Self::from_parts(expected.clone(), args)
    }

    fn from_parts(callback: CallbackName, json: &str) -> DomainResult<Self> {
        let json = json.trim();
        if json.is_empty() {
            return Err(malformed("empty call argument"));
        }

        Ok(Self {
            callback,
            json: json.to_string(),
        })
    }

    /// Callback the body invokes
    #[must_use]
    pub fn callback(&self) -> &CallbackName {
        &self.callback
    }

    /// Raw JSON argument text
    #[must_use]
    pub fn json(&self) -> &str {
        &self.json
    }

    /// Parse the argument as an untyped JSON value
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Serialization`] if the argument is not JSON.
    pub fn value(&self) -> DomainResult<JsonValue> {
        Ok(serde_json::from_str(&self.json)?)
    }

    /// Decode the argument into `T`
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Serialization`] if the argument does not
    /// deserialize into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> DomainResult<T> {
        Ok(serde_json::from_str(&self.json)?)
    }

    /// Split into callback and JSON text
    #[must_use]
    pub fn into_parts(self) -> (CallbackName, String) {
        (self.callback, self.json)
    }
}

impl fmt::Display for ScriptBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({});", self.callback, self.json)
    }
}

fn strip_call_suffix(body: &str) -> DomainResult<&str> {
    let trimmed = body.trim_end();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
    trimmed
        .strip_suffix(')')
        .ok_or_else(|| malformed("missing closing parenthesis"))
}

fn malformed(reason: impl Into<String>) -> DomainError {
    DomainError::MalformedScript(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Payload;

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let json = to_pretty_json(&Payload::default()).unwrap();
        assert_eq!(json, "{\n    \"name\": \"alice\"\n}");
    }

    #[test]
    fn test_render() {
        let body = ScriptBody::wrap(CallbackName::new("foo").unwrap(), &Payload::default()).unwrap();
        assert_eq!(body.to_string(), "foo({\n    \"name\": \"alice\"\n});");
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_missing_semicolon() {
        let body = ScriptBody::parse("  cb ( {\"name\":\"bob\"} ) \n").unwrap();
        assert_eq!(body.callback().as_str(), "cb");
        assert_eq!(body.decode::<Payload>().unwrap(), Payload::new("bob"));
    }

    #[test]
    fn test_parse_rejects_non_call() {
        for bad in ["", "{\"name\":\"alice\"}", "cb{}", "({});", "cb();", "cb(1"] {
            assert!(
                matches!(ScriptBody::parse(bad), Err(DomainError::MalformedScript(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_parse_for_handles_parenthesised_names() {
        let name = CallbackName::new("weird(name").unwrap();
        let text = ScriptBody::wrap(name.clone(), &Payload::default())
            .unwrap()
            .to_string();

        let parsed = ScriptBody::parse_for(&text, &name).unwrap();
        assert_eq!(parsed.callback(), &name);
        assert_eq!(parsed.decode::<Payload>().unwrap(), Payload::default());

        let other = CallbackName::new("other").unwrap();
        assert!(ScriptBody::parse_for(&text, &other).is_err());
    }

    #[test]
    fn test_value_reports_bad_json() {
        let body = ScriptBody::parse("cb(not json);").unwrap();
        assert!(matches!(body.value(), Err(DomainError::Serialization(_))));
    }
}

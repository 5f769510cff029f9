//! Conversion between loose values, typed attributes and caller types.

use crate::common::{Error, Result};
use crate::store::api::{AttributeValue, Record};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Encode a scalar key value as a typed attribute.
///
/// Numbers become `N` with their decimal text, strings become `S`.
/// Anything else is rejected instead of being dropped from the request.
pub fn encode(value: &Value) -> Result<AttributeValue> {
    match value {
        Value::Number(n) => Ok(AttributeValue::N(n.to_string())),
        Value::String(s) => Ok(AttributeValue::S(s.clone())),
        other => Err(Error::UnsupportedKey(format!(
            "expected string or number, got {}",
            kind(other)
        ))),
    }
}

/// Bind a page aggregate into caller types, in order.
pub fn decode<T: DeserializeOwned>(records: Vec<Record>) -> Result<Vec<T>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let value = record_to_json(record).map_err(|source| Error::Binding { index, source })?;
            serde_json::from_value(value).map_err(|source| Error::Binding { index, source })
        })
        .collect()
}

/// Convert a serializable struct into a store item.
pub fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    let json = serde_json::to_value(value)
        .map_err(|e| Error::InvalidRequest(format!("item is not serializable: {}", e)))?;
    match json {
        Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, field)| (name, from_json(field)))
            .collect()),
        other => Err(Error::InvalidRequest(format!(
            "item must serialize to a map, got {}",
            kind(&other)
        ))),
    }
}

fn record_to_json(record: Record) -> serde_json::Result<Value> {
    let mut object = Map::with_capacity(record.len());
    for (name, attr) in record {
        object.insert(name, to_json(attr)?);
    }
    Ok(Value::Object(object))
}

fn to_json(attr: AttributeValue) -> serde_json::Result<Value> {
    Ok(match attr {
        AttributeValue::S(s) => Value::String(s),
        AttributeValue::N(n) => Value::Number(n.parse::<Number>()?),
        AttributeValue::B(bytes) => Value::Array(bytes.into_iter().map(Value::from).collect()),
        AttributeValue::Bool(b) => Value::Bool(b),
        AttributeValue::Null => Value::Null,
        AttributeValue::L(items) => {
            Value::Array(items.into_iter().map(to_json).collect::<serde_json::Result<_>>()?)
        }
        AttributeValue::M(record) => record_to_json(record)?,
        AttributeValue::Ss(items) => Value::Array(items.into_iter().map(Value::String).collect()),
        AttributeValue::Ns(items) => Value::Array(
            items
                .iter()
                .map(|n| n.parse::<Number>().map(Value::Number))
                .collect::<serde_json::Result<_>>()?,
        ),
    })
}

fn from_json(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(items) => AttributeValue::L(items.into_iter().map(from_json).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .into_iter()
                .map(|(name, field)| (name, from_json(field)))
                .collect(),
        ),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Message {
        id: String,
        sent: bool,
        attempts: u32,
        score: f64,
        tags: Vec<String>,
    }

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode(&json!("abc")).unwrap(), AttributeValue::S("abc".into()));
        assert_eq!(encode(&json!(42)).unwrap(), AttributeValue::N("42".into()));
        assert_eq!(encode(&json!(-7)).unwrap(), AttributeValue::N("-7".into()));
        assert_eq!(encode(&json!(u64::MAX)).unwrap(), AttributeValue::N(u64::MAX.to_string()));
        assert_eq!(encode(&json!(1.5)).unwrap(), AttributeValue::N("1.5".into()));
    }

    #[test]
    fn test_encode_rejects_other_kinds() {
        for value in [json!(true), json!(null), json!([1]), json!({"a": 1})] {
            assert!(matches!(encode(&value), Err(Error::UnsupportedKey(_))));
        }
    }

    #[test]
    fn test_decode_binds_fields() {
        let record: Record = [
            ("id".to_string(), AttributeValue::S("m-1".into())),
            ("sent".to_string(), AttributeValue::Bool(true)),
            ("attempts".to_string(), AttributeValue::N("3".into())),
            ("score".to_string(), AttributeValue::N("0.25".into())),
            (
                "tags".to_string(),
                AttributeValue::Ss(vec!["a".into(), "b".into()]),
            ),
        ]
        .into_iter()
        .collect();

        let decoded: Vec<Message> = decode(vec![record]).unwrap();
        assert_eq!(
            decoded,
            vec![Message {
                id: "m-1".into(),
                sent: true,
                attempts: 3,
                score: 0.25,
                tags: vec!["a".into(), "b".into()],
            }]
        );
    }

    #[test]
    fn test_decode_reports_failing_index() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Keyed {
            id: u64,
        }

        let good: Record = [("id".to_string(), AttributeValue::N("1".into()))].into();
        let bad: Record = [("id".to_string(), AttributeValue::S("one".into()))].into();

        let err = decode::<Keyed>(vec![good, bad]).unwrap_err();
        assert!(matches!(err, Error::Binding { index: 1, .. }));
    }

    #[test]
    fn test_decode_rejects_malformed_number() {
        let record: Record = [("n".to_string(), AttributeValue::N("12abc".into()))].into();
        let err = decode::<Value>(vec![record]).unwrap_err();
        assert!(matches!(err, Error::Binding { index: 0, .. }));
    }

    #[test]
    fn test_to_record_nested() {
        let record = to_record(&json!({"id": "x", "meta": {"n": 2}, "list": [1, "a"]})).unwrap();
        assert_eq!(record["id"], AttributeValue::S("x".into()));
        assert_eq!(
            record["meta"],
            AttributeValue::M([("n".to_string(), AttributeValue::N("2".into()))].into())
        );
        assert_eq!(
            record["list"],
            AttributeValue::L(vec![AttributeValue::N("1".into()), AttributeValue::S("a".into())])
        );

        assert!(to_record(&json!("scalar")).is_err());
    }
}

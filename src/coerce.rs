//! Value coercion
//!
//! Turns the wire representation of a SQL value into its JSON-schema
//! compatible form, directed by the declared property types.

use crate::catalog::{Stream, StreamProperty};
use crate::error::{Error, Result};
use crate::sink::Record;
use crate::types::JsonValue;
use crate::upstream::{Field, Row, Value};
use chrono::{NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Coerce one SQL value into its JSON-schema compatible representation
///
/// JSON schema thinks both int64 and floats are numbers, so the persisted
/// SQL type decides between them before the declared types take over.
pub fn convert(property: &StreamProperty, value: &Value) -> Result<JsonValue> {
    if value.is_float() {
        let f: f64 = value
            .as_text()
            .parse()
            .map_err(|e| Error::coercion(format!("invalid float {:?}: {e}", value.as_text())))?;
        return Ok(serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null));
    }

    if property.is_date_time() {
        return Ok(iso_timestamp(value));
    }

    if property.is_integer() || property.is_number() {
        if value.is_null() {
            return Ok(JsonValue::Null);
        }
        let i: i64 = value
            .as_text()
            .parse()
            .map_err(|e| Error::coercion(format!("invalid integer {:?}: {e}", value.as_text())))?;
        return Ok(JsonValue::from(i));
    }

    if property.is_boolean() {
        if value.is_null() {
            return Ok(JsonValue::Null);
        }
        let i: i64 = value
            .as_text()
            .parse()
            .map_err(|e| Error::coercion(format!("invalid boolean {:?}: {e}", value.as_text())))?;
        return Ok(JsonValue::Bool(i != 0));
    }

    Ok(JsonValue::String(value.as_text()))
}

/// Format a `YYYY-MM-DD HH:MM:SS` value as RFC3339 (UTC assumed).
/// Unparseable input yields the empty string.
fn iso_timestamp(value: &Value) -> JsonValue {
    if value.is_null() {
        return JsonValue::Null;
    }

    match NaiveDateTime::parse_from_str(&value.as_text(), "%Y-%m-%d %H:%M:%S") {
        Ok(naive) => JsonValue::String(
            Utc.from_utc_datetime(&naive)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        Err(_) => JsonValue::String(String::new()),
    }
}

/// Build a record from one row, keeping only the stream's schema properties
///
/// The field → value mapping is ordinal: the i-th field describes the i-th
/// value of the row.
pub fn record_from_row(stream: &Stream, fields: &[Field], row: &Row) -> Result<Record> {
    let mut data = serde_json::Map::new();

    for (i, field) in fields.iter().enumerate() {
        let Some(property) = stream.schema.properties.get(&field.name) else {
            continue;
        };
        let value = row.values.get(i).ok_or_else(|| {
            Error::coercion(format!(
                "row has {} values but field {:?} is at ordinal {i}",
                row.values.len(),
                field.name
            ))
        })?;
        data.insert(field.name.clone(), convert(property, value)?);
    }

    Ok(Record::new(&stream.name, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StreamSchema, StreamProperty};
    use crate::upstream::SqlType;
    use std::collections::BTreeMap;

    #[test]
    fn test_convert_integer() {
        let property = StreamProperty::of("integer");
        let value = Value::from_str_value(SqlType::Int8, "12");
        assert_eq!(convert(&property, &value).unwrap(), JsonValue::from(12));
    }

    #[test]
    fn test_convert_null_integer() {
        let property = StreamProperty::of("integer");
        assert_eq!(convert(&property, &Value::null()).unwrap(), JsonValue::Null);
    }

    #[test]
    fn test_convert_float() {
        let property = StreamProperty::of("number");
        let value = Value::from_str_value(SqlType::Float64, "3.1415927E+00");
        assert_eq!(
            convert(&property, &value).unwrap(),
            JsonValue::from(3.141_592_7)
        );
    }

    #[test]
    fn test_convert_null_number() {
        let property = StreamProperty::of("number");
        assert_eq!(convert(&property, &Value::null()).unwrap(), JsonValue::Null);
    }

    #[test]
    fn test_convert_boolean() {
        let property = StreamProperty::of("boolean");
        let truthy = Value::from_str_value(SqlType::Int64, "1");
        let falsy = Value::from_str_value(SqlType::Int64, "0");
        assert_eq!(convert(&property, &truthy).unwrap(), JsonValue::Bool(true));
        assert_eq!(convert(&property, &falsy).unwrap(), JsonValue::Bool(false));
        assert_eq!(convert(&property, &Value::null()).unwrap(), JsonValue::Null);
    }

    #[test]
    fn test_convert_date_time() {
        let property = StreamProperty::with_format("string", "date-time");
        let value = Value::from_str_value(SqlType::Datetime, "2023-03-23 14:28:21");
        assert_eq!(
            convert(&property, &value).unwrap(),
            JsonValue::String("2023-03-23T14:28:21Z".to_string())
        );
    }

    #[test]
    fn test_convert_date_time_fractional_seconds_are_rejected() {
        let property = StreamProperty::with_format("string", "date-time");
        let value = Value::from_str_value(SqlType::Datetime, "2023-03-23 14:28:21.592111");
        assert_eq!(
            convert(&property, &value).unwrap(),
            JsonValue::String(String::new())
        );
    }

    #[test]
    fn test_convert_date_time_null() {
        let property = StreamProperty::with_format("string", "date-time");
        assert_eq!(convert(&property, &Value::null()).unwrap(), JsonValue::Null);
    }

    #[test]
    fn test_convert_date_time_unparseable_is_empty_string() {
        let property = StreamProperty::with_format("string", "date-time");
        let value = Value::from_str_value(SqlType::Datetime, "soon");
        assert_eq!(
            convert(&property, &value).unwrap(),
            JsonValue::String(String::new())
        );
    }

    #[test]
    fn test_convert_default_is_string() {
        let property = StreamProperty::of("string");
        let value = Value::from_str_value(SqlType::Varchar, "keyboard");
        assert_eq!(
            convert(&property, &value).unwrap(),
            JsonValue::String("keyboard".to_string())
        );
    }

    #[test]
    fn test_record_from_row_skips_unknown_fields() {
        let mut properties = BTreeMap::new();
        properties.insert("pid".to_string(), StreamProperty::of("integer"));
        properties.insert("description".to_string(), StreamProperty::of("string"));
        let stream = Stream {
            name: "products".to_string(),
            schema: StreamSchema::object(properties),
            ..Stream::default()
        };

        let fields = vec![
            Field {
                name: "pid".to_string(),
                r#type: SqlType::Int64 as i32,
            },
            Field {
                name: "description".to_string(),
                r#type: SqlType::Varchar as i32,
            },
            Field {
                name: "internal_notes".to_string(),
                r#type: SqlType::Varchar as i32,
            },
        ];
        let row = Row {
            values: vec![
                Value::from_str_value(SqlType::Int64, "1"),
                Value::from_str_value(SqlType::Varchar, "keyboard"),
                Value::from_str_value(SqlType::Varchar, "do not emit"),
            ],
        };

        let record = record_from_row(&stream, &fields, &row).unwrap();
        assert_eq!(record.stream, "products");
        assert_eq!(record.data["pid"], JsonValue::from(1));
        assert_eq!(record.data["description"], JsonValue::from("keyboard"));
        assert!(!record.data.contains_key("internal_notes"));
    }
}

//! Schema types, stored field instances, and resolved values.
//!
//! Field instances deserialize from the JSON the content store keeps for a
//! field (`{"Text": "Hello"}`, `{"Value": 42.0}`, `{"Values": ["a", "b"]}`).
//! [`FieldValue`] is what a resolver hands back to the query engine.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::kind::FieldKind;
use crate::timespan::TimeSpan;

/// Reference to a type in the query schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Boolean,
    Date,
    DateTime,
    Decimal,
    String,
    TimeSpan,
    List(&'static SchemaType),
}

impl SchemaType {
    /// Whether values of this type are sequences.
    pub fn is_list(&self) -> bool {
        matches!(self, SchemaType::List(_))
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaType::Boolean => f.write_str("Boolean"),
            SchemaType::Date => f.write_str("Date"),
            SchemaType::DateTime => f.write_str("DateTime"),
            SchemaType::Decimal => f.write_str("Decimal"),
            SchemaType::String => f.write_str("String"),
            SchemaType::TimeSpan => f.write_str("TimeSpan"),
            SchemaType::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BooleanField {
    #[serde(default)]
    pub value: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateField {
    /// Stored either as a date or as a full date-time, which is truncated.
    #[serde(default, deserialize_with = "date_or_date_time")]
    pub value: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateTimeField {
    /// Stored with an offset or without one; the latter is read as UTC.
    #[serde(default, deserialize_with = "date_time_assume_utc")]
    pub value: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NumericField {
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextField {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeField {
    #[serde(default)]
    pub value: Option<TimeSpan>,
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    raw.parse::<NaiveDate>()
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|dt| dt.date()))
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn parse_date_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|dt| dt.and_utc()))
}

fn date_or_date_time<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_date(&raw)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
}

fn date_time_assume_utc<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_date_time(&raw)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid date-time: {raw}")))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MultiTextField {
    #[serde(default)]
    pub values: Option<Vec<String>>,
}

/// A field instance located on a content node, typed by its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInstance {
    Boolean(BooleanField),
    Date(DateField),
    DateTime(DateTimeField),
    Numeric(NumericField),
    Text(TextField),
    Time(TimeField),
    MultiText(MultiTextField),
}

impl FieldInstance {
    /// Interpret stored JSON as an instance of `kind`.
    pub fn from_json(kind: FieldKind, value: &serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            FieldKind::Boolean => FieldInstance::Boolean(BooleanField::deserialize(value)?),
            FieldKind::Date => FieldInstance::Date(DateField::deserialize(value)?),
            FieldKind::DateTime => FieldInstance::DateTime(DateTimeField::deserialize(value)?),
            FieldKind::Numeric => FieldInstance::Numeric(NumericField::deserialize(value)?),
            FieldKind::Text => FieldInstance::Text(TextField::deserialize(value)?),
            FieldKind::Time => FieldInstance::Time(TimeField::deserialize(value)?),
            FieldKind::MultiText => FieldInstance::MultiText(MultiTextField::deserialize(value)?),
        })
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldInstance::Boolean(_) => FieldKind::Boolean,
            FieldInstance::Date(_) => FieldKind::Date,
            FieldInstance::DateTime(_) => FieldKind::DateTime,
            FieldInstance::Numeric(_) => FieldKind::Numeric,
            FieldInstance::Text(_) => FieldKind::Text,
            FieldInstance::Time(_) => FieldKind::Time,
            FieldInstance::MultiText(_) => FieldKind::MultiText,
        }
    }
}

/// A resolved field value.
///
/// `Null` is a stored null (an instance exists but carries no value). An
/// absent instance is represented by the resolver returning `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Decimal(f64),
    Text(String),
    TimeSpan(TimeSpan),
    TextList(Vec<String>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::TextList(values) => Some(values),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<TimeSpan> for FieldValue {
    fn from(value: TimeSpan) -> Self {
        FieldValue::TimeSpan(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::TextList(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_type_names() {
        assert_eq!(SchemaType::Decimal.to_string(), "Decimal");
        assert_eq!(SchemaType::List(&SchemaType::String).to_string(), "[String]");
        assert!(SchemaType::List(&SchemaType::String).is_list());
        assert!(!SchemaType::TimeSpan.is_list());
    }

    #[test]
    fn text_instance_from_stored_json() {
        let instance = FieldInstance::from_json(FieldKind::Text, &json!({"Text": "Hello"})).unwrap();
        assert_eq!(
            instance,
            FieldInstance::Text(TextField {
                text: Some("Hello".into())
            })
        );
        assert_eq!(instance.kind(), FieldKind::Text);
    }

    #[test]
    fn missing_members_default() {
        let instance = FieldInstance::from_json(FieldKind::Numeric, &json!({})).unwrap();
        assert_eq!(instance, FieldInstance::Numeric(NumericField { value: None }));

        let instance = FieldInstance::from_json(FieldKind::Boolean, &json!({})).unwrap();
        assert_eq!(instance, FieldInstance::Boolean(BooleanField { value: None }));
    }

    #[test]
    fn stored_nulls_keep_the_instance() {
        for kind in FieldKind::ALL {
            let member = match kind {
                FieldKind::Text => "Text",
                FieldKind::MultiText => "Values",
                _ => "Value",
            };
            let mut stored = serde_json::Map::new();
            stored.insert(member.to_string(), serde_json::Value::Null);
            let stored = serde_json::Value::Object(stored);
            let instance = FieldInstance::from_json(kind, &stored).unwrap();
            assert_eq!(instance.kind(), kind);
        }
        assert_eq!(
            FieldInstance::from_json(FieldKind::Boolean, &json!({"Value": null})).unwrap(),
            FieldInstance::Boolean(BooleanField { value: None })
        );
    }

    #[test]
    fn temporal_instances_parse() {
        let date = FieldInstance::from_json(FieldKind::Date, &json!({"Value": "2024-02-29"})).unwrap();
        assert_eq!(
            date,
            FieldInstance::Date(DateField {
                value: NaiveDate::from_ymd_opt(2024, 2, 29)
            })
        );

        let time = FieldInstance::from_json(FieldKind::Time, &json!({"Value": "14:30:00"})).unwrap();
        assert_eq!(
            time,
            FieldInstance::Time(TimeField {
                value: Some("14:30:00".parse().unwrap())
            })
        );
    }

    #[test]
    fn date_accepts_full_date_time_text() {
        let expected = FieldInstance::Date(DateField {
            value: NaiveDate::from_ymd_opt(2024, 5, 1),
        });
        for stored in ["2024-05-01T00:00:00", "2024-05-01T13:15:00.250", "2024-05-01T00:00:00Z"] {
            let instance = FieldInstance::from_json(FieldKind::Date, &json!({"Value": stored})).unwrap();
            assert_eq!(instance, expected, "{stored}");
        }
    }

    #[test]
    fn date_time_without_offset_is_utc() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            .and_utc();

        let naive = FieldInstance::from_json(FieldKind::DateTime, &json!({"Value": "2024-05-01T09:30:00"}))
            .unwrap();
        assert_eq!(naive, FieldInstance::DateTime(DateTimeField { value: Some(expected) }));

        let offset = FieldInstance::from_json(
            FieldKind::DateTime,
            &json!({"Value": "2024-05-01T11:30:00+02:00"}),
        )
        .unwrap();
        assert_eq!(offset, FieldInstance::DateTime(DateTimeField { value: Some(expected) }));
    }

    #[test]
    fn time_accepts_spans_past_a_day() {
        let instance = FieldInstance::from_json(FieldKind::Time, &json!({"Value": "1.02:03:04"})).unwrap();
        let FieldInstance::Time(TimeField { value: Some(span) }) = instance else {
            panic!("expected a time span, got {instance:?}");
        };
        assert_eq!(span.as_delta().num_seconds(), 86_400 + 2 * 3_600 + 3 * 60 + 4);
    }

    #[test]
    fn mismatched_shape_is_an_error() {
        assert!(FieldInstance::from_json(FieldKind::Numeric, &json!({"Value": "ten"})).is_err());
        assert!(FieldInstance::from_json(FieldKind::Text, &json!("bare string")).is_err());
        assert!(FieldInstance::from_json(FieldKind::Date, &json!({"Value": "May 1st"})).is_err());
        assert!(FieldInstance::from_json(FieldKind::DateTime, &json!({"Value": "2024-05-01"})).is_err());
    }

    #[test]
    fn field_value_serializes_for_transport() {
        assert_eq!(serde_json::to_value(FieldValue::Null).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(FieldValue::from("hi")).unwrap(), json!("hi"));
        assert_eq!(
            serde_json::to_value(FieldValue::TextList(vec!["a".into(), "b".into()])).unwrap(),
            json!(["a", "b"])
        );
        let span: TimeSpan = "09:05".parse().unwrap();
        assert_eq!(serde_json::to_value(FieldValue::from(span)).unwrap(), json!("09:05:00"));
    }

    #[test]
    fn value_views() {
        assert_eq!(FieldValue::from("hi").as_str(), Some("hi"));
        assert_eq!(FieldValue::Boolean(true).as_str(), None);

        let tags = FieldValue::TextList(vec!["x".into(), "x".into()]);
        assert_eq!(tags.as_list(), Some(&["x".to_string(), "x".to_string()][..]));
        assert_eq!(FieldValue::Null.as_list(), None);
    }

    #[test]
    fn optional_values_map_to_null() {
        let missing: Option<String> = None;
        assert!(FieldValue::from(missing).is_null());
        assert_eq!(FieldValue::from(Some(1.5)), FieldValue::Decimal(1.5));
        assert!(FieldValue::from(None::<bool>).is_null());
    }
}

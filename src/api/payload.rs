//! Wire payloads for the HTTP adapter
//!
//! Request bodies are parsed by hand from a `serde_json::Value` so that each
//! failure carries a precise description for the 400 response, and so that
//! numeric strings are accepted alongside JSON numbers.
//!
//! Statistics are rendered as plain decimals: shortest round-trip digits, no
//! exponent, no trailing zeros.

use crate::stats::{Transaction, WindowStatistics};
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum MalformedInput {
    InvalidJson(String),
    MissingField(&'static str),
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

impl std::fmt::Display for MalformedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedInput::InvalidJson(e) => write!(f, "Invalid JSON: {}", e),
            MalformedInput::MissingField(field) => write!(f, "Field \"{}\" not found", field),
            MalformedInput::InvalidField { field, reason } => {
                write!(f, "Field \"{}\" {}", field, reason)
            }
        }
    }
}

impl std::error::Error for MalformedInput {}

/// Parse a `{"amount": .., "timestamp": ..}` body into a transaction
pub fn parse_transaction(body: &str) -> Result<Transaction, MalformedInput> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| MalformedInput::InvalidJson(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| MalformedInput::InvalidJson("expected a JSON object".to_string()))?;

    Ok(Transaction {
        amount: read_amount(object)?,
        timestamp: read_timestamp(object)?,
    })
}

fn field<'a>(object: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, MalformedInput> {
    match object.get(name) {
        None | Some(Value::Null) => Err(MalformedInput::MissingField(name)),
        Some(value) => Ok(value),
    }
}

fn read_amount(object: &Map<String, Value>) -> Result<f64, MalformedInput> {
    let amount = match field(object, "amount")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or(MalformedInput::InvalidField {
        field: "amount",
        reason: "is not a number",
    })?;

    if !amount.is_finite() {
        return Err(MalformedInput::InvalidField {
            field: "amount",
            reason: "must be finite",
        });
    }
    Ok(amount)
}

fn read_timestamp(object: &Map<String, Value>) -> Result<i64, MalformedInput> {
    match field(object, "timestamp")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or(MalformedInput::InvalidField {
        field: "timestamp",
        reason: "is not an integer epoch millisecond",
    })
}

/// Render a float as a plain JSON decimal
///
/// `Display` for `f64` never switches to exponent notation and prints the
/// shortest digits that round-trip, e.g. `1770`, `29.5`, `0.00000001`.
pub fn format_decimal(value: f64) -> String {
    format!("{}", value)
}

fn raw_decimal(value: f64) -> Result<Box<RawValue>, serde_json::Error> {
    RawValue::from_string(format_decimal(value))
}

/// `200 OK` body of `GET /api/statistics`, keys in wire order
#[derive(Debug, Serialize)]
pub struct StatisticsBody {
    pub sum: Box<RawValue>,
    pub avg: Box<RawValue>,
    pub max: Box<RawValue>,
    pub min: Box<RawValue>,
    pub count: u64,
}

impl StatisticsBody {
    /// Fails only for non-finite values, which have no JSON representation
    pub fn from_statistics(stats: &WindowStatistics) -> Result<Self, serde_json::Error> {
        Ok(Self {
            sum: raw_decimal(stats.sum)?,
            avg: raw_decimal(stats.avg)?,
            max: raw_decimal(stats.max)?,
            min: raw_decimal(stats.min)?,
            count: stats.count,
        })
    }
}

/// Error body: `{"error": <status>, "description": ".."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: u16,
    pub description: String,
}

impl ErrorBody {
    pub fn new(error: u16, description: impl ToString) -> Self {
        Self {
            error,
            description: description.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_transaction() {
        let tx = parse_transaction(r#"{"amount": 12.3, "timestamp": 1478192204000}"#).unwrap();
        assert_eq!(tx.amount, 12.3);
        assert_eq!(tx.timestamp, 1478192204000);
    }

    #[test]
    fn test_parse_accepts_numeric_strings_and_integers() {
        // Test: lenient field types
        let tx = parse_transaction(r#"{"amount": "10", "timestamp": "1478192204000"}"#).unwrap();
        assert_eq!(tx.amount, 10.0);
        assert_eq!(tx.timestamp, 1478192204000);

        let tx = parse_transaction(r#"{"amount": 10, "timestamp": 5}"#).unwrap();
        assert_eq!(tx.amount, 10.0);
    }

    #[test]
    fn test_parse_rejections() {
        // Test: each malformed shape maps to a distinct error
        assert!(matches!(
            parse_transaction("not json"),
            Err(MalformedInput::InvalidJson(_))
        ));
        assert!(matches!(
            parse_transaction("[1, 2]"),
            Err(MalformedInput::InvalidJson(_))
        ));
        assert_eq!(
            parse_transaction(r#"{"timestamp": 1}"#),
            Err(MalformedInput::MissingField("amount"))
        );
        assert_eq!(
            parse_transaction(r#"{"amount": 1.0, "timestamp": null}"#),
            Err(MalformedInput::MissingField("timestamp"))
        );
        assert!(matches!(
            parse_transaction(r#"{"amount": "abc", "timestamp": 1}"#),
            Err(MalformedInput::InvalidField { field: "amount", .. })
        ));
        assert!(matches!(
            parse_transaction(r#"{"amount": "NaN", "timestamp": 1}"#),
            Err(MalformedInput::InvalidField { field: "amount", .. })
        ));
        assert!(matches!(
            parse_transaction(r#"{"amount": 1.0, "timestamp": 1.5}"#),
            Err(MalformedInput::InvalidField { field: "timestamp", .. })
        ));
        assert!(matches!(
            parse_transaction(r#"{"amount": true, "timestamp": 1}"#),
            Err(MalformedInput::InvalidField { field: "amount", .. })
        ));
    }

    #[test]
    fn test_format_decimal_plain() {
        assert_eq!(format_decimal(1770.0), "1770");
        assert_eq!(format_decimal(29.5), "29.5");
        assert_eq!(format_decimal(0.00000001), "0.00000001");
        assert_eq!(format_decimal(99999.0), "99999");
        assert_eq!(format_decimal(1e21), "1000000000000000000000");
        assert_eq!(format_decimal(-2.25), "-2.25");
    }

    #[test]
    fn test_statistics_body_key_order() {
        // Test: keys serialize as sum, avg, max, min, count with plain decimals
        let stats = WindowStatistics {
            count: 2,
            sum: 20.0,
            avg: 10.0,
            max: 10.0,
            min: 0.00000001,
        };

        let body = StatisticsBody::from_statistics(&stats).unwrap();
        let json = serde_json::to_string(&body).unwrap();

        assert_eq!(
            json,
            r#"{"sum":20,"avg":10,"max":10,"min":0.00000001,"count":2}"#
        );
    }

    #[test]
    fn test_statistics_body_rejects_infinity() {
        let stats = WindowStatistics {
            count: 2,
            sum: f64::INFINITY,
            avg: f64::INFINITY,
            max: f64::MAX,
            min: f64::MAX,
        };
        assert!(StatisticsBody::from_statistics(&stats).is_err());
    }

    #[test]
    fn test_error_body_shape() {
        let json = serde_json::to_string(&ErrorBody::new(404, "nothing here")).unwrap();
        assert_eq!(json, r#"{"error":404,"description":"nothing here"}"#);
    }
}

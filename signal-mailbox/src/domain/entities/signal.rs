use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

use crate::domain::errors::IngestError;

/// Fields every submitted signal must carry, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "unique_id",
    "symbol",
    "order_type",
    "lot",
    "open_price",
    "stop_loss",
    "take_profit",
    "open_time",
];

pub const UNIQUE_ID: &str = "unique_id";
pub const LOT: &str = "lot";
pub const OPEN_TIME: &str = "open_time";
pub const TIMESTAMP_RECEIVED: &str = "timestamp_received";

/// Identity of a signal.
///
/// Wraps the raw JSON value the producer sent. Strings compare as strings and
/// numbers compare by numeric value, so `7` and `7.0` name the same signal
/// while `"7"` does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalId(Value);

impl SignalId {
    pub fn new(value: Value) -> Self {
        SignalId(value)
    }
}

impl PartialEq for SignalId {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
            (a, b) => a == b,
        }
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

impl From<&str> for SignalId {
    fn from(value: &str) -> Self {
        SignalId(Value::String(value.to_string()))
    }
}

impl From<i64> for SignalId {
    fn from(value: i64) -> Self {
        SignalId(Value::from(value))
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other),
        }
    }
}

/// A trading signal as submitted by a producer.
///
/// The record is kept as the producer's JSON object so that fields the
/// mailbox does not know about are stored and returned untouched. Typed
/// accessors cover the fields the registry acts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(Map<String, Value>);

impl Signal {
    /// Build a signal from an incoming payload.
    ///
    /// Fails with [`IngestError::MissingField`] naming the first absent
    /// required field, or [`IngestError::Malformed`] when the payload is not
    /// an object or `lot` is not a number.
    pub fn from_value(value: Value) -> Result<Self, IngestError> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(IngestError::malformed(format!(
                    "signal must be a JSON object, got {}",
                    json_kind(&other)
                )));
            }
        };

        if let Some(missing) = REQUIRED_FIELDS
            .iter()
            .find(|field| !fields.contains_key(**field))
        {
            return Err(IngestError::MissingField(*missing));
        }

        let signal = Signal(fields);
        if signal.lot().is_none() {
            return Err(IngestError::malformed(format!(
                "field 'lot' must be a number, got {}",
                signal.0.get(LOT).map(json_kind).unwrap_or("nothing")
            )));
        }

        Ok(signal)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The signal's identity, if it carries one.
    ///
    /// Always present on ingested signals; records read back from storage
    /// may lack it.
    pub fn unique_id(&self) -> Option<SignalId> {
        self.0.get(UNIQUE_ID).cloned().map(SignalId::new)
    }

    pub fn has_id(&self, id: &SignalId) -> bool {
        self.unique_id().is_some_and(|own| own == *id)
    }

    pub fn lot(&self) -> Option<f64> {
        self.0.get(LOT).and_then(Value::as_f64)
    }

    /// Whether this record asks for its signal to be closed (`lot <= 0`).
    ///
    /// A missing or non-numeric lot counts as zero.
    pub fn is_close_request(&self) -> bool {
        self.lot().unwrap_or(0.0) <= 0.0
    }

    /// Integer sort key derived from `open_time`. Missing or unusable values
    /// sort as 0.
    pub fn open_time_key(&self) -> i64 {
        match self.0.get(OPEN_TIME) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
            _ => 0,
        }
    }

    /// Seconds since the epoch at which the mailbox accepted this record.
    /// Records without a stamp read as received at time 0.
    pub fn timestamp_received(&self) -> f64 {
        self.0
            .get(TIMESTAMP_RECEIVED)
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn stamp_received(&mut self, secs: f64) {
        let value = Number::from_f64(secs).map(Value::Number).unwrap_or(Value::Null);
        self.0.insert(TIMESTAMP_RECEIVED.to_string(), value);
    }

    /// A closed record whose stamp is older than `retention_secs` at `now_secs`.
    pub fn is_expired(&self, now_secs: f64, retention_secs: f64) -> bool {
        self.is_close_request() && now_secs - self.timestamp_received() > retention_secs
    }
}

impl From<Map<String, Value>> for Signal {
    fn from(fields: Map<String, Value>) -> Self {
        Signal(fields)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eurusd() -> Value {
        json!({
            "unique_id": "A",
            "symbol": "EURUSD",
            "order_type": "buy",
            "lot": 1.0,
            "open_price": 1.1,
            "stop_loss": 1.05,
            "take_profit": 1.2,
            "open_time": 1000
        })
    }

    #[test]
    fn test_accepts_complete_record() {
        let signal = Signal::from_value(eurusd()).unwrap();
        assert_eq!(signal.unique_id(), Some(SignalId::from("A")));
        assert_eq!(signal.lot(), Some(1.0));
        assert_eq!(signal.open_time_key(), 1000);
        assert!(!signal.is_close_request());
    }

    #[test]
    fn test_reports_first_missing_field() {
        let mut payload = eurusd();
        let fields = payload.as_object_mut().unwrap();
        fields.remove("stop_loss");
        fields.remove("open_time");

        let err = Signal::from_value(payload).unwrap_err();
        assert_eq!(err, IngestError::MissingField("stop_loss"));
        assert_eq!(err.to_string(), "Missing field: stop_loss");
        assert!(err.is_validation());
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let err = Signal::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, IngestError::Malformed(_)));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_rejects_non_numeric_lot() {
        let mut payload = eurusd();
        payload["lot"] = json!("one");

        let err = Signal::from_value(payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'lot' must be a number, got a string"
        );
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let mut payload = eurusd();
        payload["comment"] = json!("from EA #4");
        payload["magic"] = json!(77);

        let signal = Signal::from_value(payload.clone()).unwrap();
        assert_eq!(serde_json::to_value(&signal).unwrap(), payload);
    }

    #[test]
    fn test_close_request_on_zero_or_negative_lot() {
        let mut payload = eurusd();
        payload["lot"] = json!(0);
        assert!(Signal::from_value(payload.clone()).unwrap().is_close_request());

        payload["lot"] = json!(-0.5);
        assert!(Signal::from_value(payload).unwrap().is_close_request());
    }

    #[test]
    fn test_open_time_coercion() {
        let mut fields = Map::new();
        assert_eq!(Signal::from(fields.clone()).open_time_key(), 0);

        fields.insert(OPEN_TIME.into(), json!(1699.9));
        assert_eq!(Signal::from(fields.clone()).open_time_key(), 1699);

        fields.insert(OPEN_TIME.into(), json!("250"));
        assert_eq!(Signal::from(fields.clone()).open_time_key(), 250);

        fields.insert(OPEN_TIME.into(), json!("soon"));
        assert_eq!(Signal::from(fields).open_time_key(), 0);
    }

    #[test]
    fn test_id_equality() {
        assert_eq!(SignalId::new(json!(7)), SignalId::new(json!(7.0)));
        assert_ne!(SignalId::new(json!("7")), SignalId::new(json!(7)));
        assert_eq!(SignalId::from("A"), SignalId::new(json!("A")));
        assert_ne!(SignalId::from("A"), SignalId::from("B"));
    }

    #[test]
    fn test_expiry_window() {
        let mut payload = eurusd();
        payload["lot"] = json!(0);
        let mut signal = Signal::from_value(payload).unwrap();

        signal.stamp_received(1_000.0);
        assert!(signal.is_expired(1_121.0, 120.0));
        assert!(!signal.is_expired(1_060.0, 120.0));
        assert!(!signal.is_expired(1_120.0, 120.0));
    }

    #[test]
    fn test_missing_stamp_reads_as_epoch() {
        let mut fields = Map::new();
        fields.insert(LOT.into(), json!(0));
        let signal = Signal::from(fields);

        assert_eq!(signal.timestamp_received(), 0.0);
        assert!(signal.is_expired(121.0, 120.0));
    }

    #[test]
    fn test_open_signal_never_expires() {
        let mut signal = Signal::from_value(eurusd()).unwrap();
        signal.stamp_received(0.0);
        assert!(!signal.is_expired(1_000_000.0, 120.0));
    }
}

//! Feature schema: the request surface of the model
//!
//! Defines the 15 required numeric input fields and the structural
//! validation that turns a raw JSON body into a typed [`FeatureVector`].
//! Validation enumerates every offending field, distinguishing missing
//! fields from non-numeric values, so callers can fix a whole payload in
//! one round trip.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Number of raw input features the model expects
pub const FEATURE_COUNT: usize = 15;

/// Canonical field names, in schema order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "feature_0",
    "feature_1",
    "feature_2",
    "feature_3",
    "feature_4",
    "feature_5",
    "feature_6",
    "feature_7",
    "feature_8",
    "feature_9",
    "feature_10",
    "feature_11",
    "feature_12",
    "feature_13",
    "feature_14",
];

/// Validated model input: all 15 fields present and numeric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub feature_0: f64,
    pub feature_1: f64,
    pub feature_2: f64,
    pub feature_3: f64,
    pub feature_4: f64,
    pub feature_5: f64,
    pub feature_6: f64,
    pub feature_7: f64,
    pub feature_8: f64,
    pub feature_9: f64,
    pub feature_10: f64,
    pub feature_11: f64,
    pub feature_12: f64,
    pub feature_13: f64,
    pub feature_14: f64,
}

/// What went wrong with a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Field absent from the request body
    Missing,
    /// Field present but not coercible to a float
    NotNumeric,
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorKind::Missing => write!(f, "field is required"),
            FieldErrorKind::NotNumeric => write!(f, "expected a numeric value"),
        }
    }
}

/// A single offending field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

/// All structural problems found in one request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s):", self.errors.len())?;
        for err in &self.errors {
            write!(f, " {} ({})", err.field, err.kind)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Standard numeric coercion: JSON numbers pass through, numeric strings
/// parse, everything else (booleans, nulls, containers) is rejected.
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl FeatureVector {
    /// Validate a raw JSON body into a typed vector.
    ///
    /// Collects one [`FieldError`] per offending field rather than failing
    /// fast. Unknown extra fields are ignored. Pure: no side effects.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let obj = body.as_object();

        let mut values = [0.0_f64; FEATURE_COUNT];
        let mut errors = Vec::new();

        for (i, name) in FEATURE_NAMES.iter().enumerate() {
            match obj.and_then(|o| o.get(*name)) {
                None => errors.push(FieldError {
                    field: name,
                    kind: FieldErrorKind::Missing,
                }),
                Some(raw) => match coerce_f64(raw) {
                    Some(v) => values[i] = v,
                    None => errors.push(FieldError {
                        field: name,
                        kind: FieldErrorKind::NotNumeric,
                    }),
                },
            }
        }

        if errors.is_empty() {
            Ok(Self::from_values(values))
        } else {
            Err(ValidationErrors { errors })
        }
    }

    /// Build a vector from values in schema order
    pub fn from_values(v: [f64; FEATURE_COUNT]) -> Self {
        Self {
            feature_0: v[0],
            feature_1: v[1],
            feature_2: v[2],
            feature_3: v[3],
            feature_4: v[4],
            feature_5: v[5],
            feature_6: v[6],
            feature_7: v[7],
            feature_8: v[8],
            feature_9: v[9],
            feature_10: v[10],
            feature_11: v[11],
            feature_12: v[12],
            feature_13: v[13],
            feature_14: v[14],
        }
    }

    /// Values in schema order
    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.feature_0,
            self.feature_1,
            self.feature_2,
            self.feature_3,
            self.feature_4,
            self.feature_5,
            self.feature_6,
            self.feature_7,
            self.feature_8,
            self.feature_9,
            self.feature_10,
            self.feature_11,
            self.feature_12,
            self.feature_13,
            self.feature_14,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        let mut obj = serde_json::Map::new();
        for (i, name) in FEATURE_NAMES.iter().enumerate() {
            obj.insert(name.to_string(), json!(i as f64 * 0.5));
        }
        Value::Object(obj)
    }

    #[test]
    fn test_valid_body_parses() {
        let vector = FeatureVector::from_json(&valid_body()).unwrap();
        assert_eq!(vector.feature_0, 0.0);
        assert_eq!(vector.feature_14, 7.0);
    }

    #[test]
    fn test_missing_field_reported() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("feature_7");

        let errors = FeatureVector::from_json(&body).unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.errors[0].field, "feature_7");
        assert_eq!(errors.errors[0].kind, FieldErrorKind::Missing);
    }

    #[test]
    fn test_all_problems_enumerated() {
        let mut body = valid_body();
        {
            let obj = body.as_object_mut().unwrap();
            obj.remove("feature_1");
            obj.remove("feature_9");
            obj.insert("feature_4".to_string(), json!("not a number"));
        }

        let errors = FeatureVector::from_json(&body).unwrap_err();
        assert_eq!(errors.errors.len(), 3);

        let missing: Vec<&str> = errors
            .errors
            .iter()
            .filter(|e| e.kind == FieldErrorKind::Missing)
            .map(|e| e.field)
            .collect();
        assert_eq!(missing, vec!["feature_1", "feature_9"]);

        let mistyped: Vec<&str> = errors
            .errors
            .iter()
            .filter(|e| e.kind == FieldErrorKind::NotNumeric)
            .map(|e| e.field)
            .collect();
        assert_eq!(mistyped, vec!["feature_4"]);
    }

    #[test]
    fn test_numeric_string_coerces() {
        let mut body = valid_body();
        body.as_object_mut()
            .unwrap()
            .insert("feature_3".to_string(), json!("2.75"));

        let vector = FeatureVector::from_json(&body).unwrap();
        assert_eq!(vector.feature_3, 2.75);
    }

    #[test]
    fn test_integer_accepted() {
        let mut body = valid_body();
        body.as_object_mut()
            .unwrap()
            .insert("feature_5".to_string(), json!(3));

        let vector = FeatureVector::from_json(&body).unwrap();
        assert_eq!(vector.feature_5, 3.0);
    }

    #[test]
    fn test_bool_and_null_rejected() {
        let mut body = valid_body();
        {
            let obj = body.as_object_mut().unwrap();
            obj.insert("feature_0".to_string(), json!(true));
            obj.insert("feature_2".to_string(), Value::Null);
        }

        let errors = FeatureVector::from_json(&body).unwrap_err();
        assert_eq!(errors.errors.len(), 2);
        assert!(errors
            .errors
            .iter()
            .all(|e| e.kind == FieldErrorKind::NotNumeric));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let mut body = valid_body();
        body.as_object_mut()
            .unwrap()
            .insert("unexpected".to_string(), json!("whatever"));

        assert!(FeatureVector::from_json(&body).is_ok());
    }

    #[test]
    fn test_non_object_body_reports_all_missing() {
        let errors = FeatureVector::from_json(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(errors.errors.len(), FEATURE_COUNT);
        assert!(errors
            .errors
            .iter()
            .all(|e| e.kind == FieldErrorKind::Missing));
    }

    #[test]
    fn test_values_round_trip_order() {
        let vector = FeatureVector::from_values([
            0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0,
        ]);
        assert_eq!(vector.values()[9], 9.0);
        assert_eq!(vector.feature_9, 9.0);
    }
}

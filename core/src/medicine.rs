//! The `Medicine` record and its tolerant JSON mapping.
//!
//! # Design
//! Backend rows come from a spreadsheet-backed table, so numeric columns
//! arrive as numbers, numeric strings, nulls or garbage depending on the
//! row. Instead of failing the whole response on one bad cell, every field
//! deserializes leniently: text falls back to `""`, the two cost columns to
//! `0.0`, and the optional numbers to `None`.
//!
//! Field names on the wire are the backend column names verbatim
//! (`"Cost of branded"`, `"Side Effects"`, ...).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single medicine entry comparing branded and generic cost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    #[serde(rename = "Name", default, deserialize_with = "lenient_text")]
    pub name: String,

    #[serde(rename = "Dosage", default, deserialize_with = "lenient_text")]
    pub dosage: String,

    #[serde(rename = "Formulation", default, deserialize_with = "lenient_text")]
    pub formulation: String,

    #[serde(rename = "Cost of branded", default, deserialize_with = "lenient_cost")]
    pub cost_of_branded: f64,

    #[serde(rename = "Cost of generic", default, deserialize_with = "lenient_cost")]
    pub cost_of_generic: f64,

    #[serde(
        rename = "Cost difference",
        default,
        deserialize_with = "lenient_optional_number"
    )]
    pub cost_difference: Option<f64>,

    /// Percentage saved by buying generic.
    #[serde(rename = "Savings", default, deserialize_with = "lenient_optional_number")]
    pub savings: Option<f64>,

    #[serde(rename = "Type", default, deserialize_with = "lenient_text")]
    pub medicine_type: String,

    #[serde(rename = "Uses", default, deserialize_with = "lenient_text")]
    pub uses: String,

    #[serde(rename = "Side Effects", default, deserialize_with = "lenient_text")]
    pub side_effects: String,
}

impl Medicine {
    /// Map a JSON value (one backend row) into a record. Only a non-object
    /// value is rejected; individual fields never fail.
    pub fn from_json(value: &Value) -> Result<Self, serde_json::Error> {
        Medicine::deserialize(value)
    }

    pub fn to_json(&self) -> Value {
        // Serialize impl for plain fields and f64 cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// The server-provided difference, or branded minus generic.
    pub fn effective_cost_difference(&self) -> f64 {
        self.cost_difference
            .unwrap_or(self.cost_of_branded - self.cost_of_generic)
    }

    /// The server-provided savings, or the percentage derived from the two
    /// costs rounded to one decimal. `None` when the branded cost is zero.
    pub fn effective_savings(&self) -> Option<f64> {
        if self.savings.is_some() {
            return self.savings;
        }
        if self.cost_of_branded <= 0.0 {
            return None;
        }
        let pct = (self.cost_of_branded - self.cost_of_generic) / self.cost_of_branded * 100.0;
        Some((pct * 10.0).round() / 10.0)
    }
}

/// Numbers and numeric strings become `f64`; everything else is `None`.
fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_cost<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|cost| *cost >= 0.0)
        .unwrap_or(0.0))
}

fn lenient_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn paracetamol() -> Value {
        json!({
            "Name": "TAB PARACETAMOL",
            "Dosage": "500mg",
            "Formulation": "Paracetamol 500mg",
            "Cost of branded": 30.0,
            "Cost of generic": 9.5,
            "Cost difference": 20.5,
            "Savings": 68.3,
            "Type": "Analgesic",
            "Uses": "Fever and mild pain",
            "Side Effects": "Nausea"
        })
    }

    #[test]
    fn maps_complete_row() {
        let med = Medicine::from_json(&paracetamol()).unwrap();
        assert_eq!(med.name, "TAB PARACETAMOL");
        assert_eq!(med.formulation, "Paracetamol 500mg");
        assert_eq!(med.cost_of_branded, 30.0);
        assert_eq!(med.cost_of_generic, 9.5);
        assert_eq!(med.cost_difference, Some(20.5));
        assert_eq!(med.savings, Some(68.3));
        assert_eq!(med.medicine_type, "Analgesic");
        assert_eq!(med.side_effects, "Nausea");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let med = Medicine::from_json(&json!({ "Name": "X" })).unwrap();
        assert_eq!(med.name, "X");
        assert_eq!(med.dosage, "");
        assert_eq!(med.cost_of_branded, 0.0);
        assert_eq!(med.cost_of_generic, 0.0);
        assert_eq!(med.cost_difference, None);
        assert_eq!(med.savings, None);
        assert_eq!(med.uses, "");
    }

    #[test]
    fn numeric_strings_and_junk() {
        let med = Medicine::from_json(&json!({
            "Name": null,
            "Dosage": 500,
            "Cost of branded": " 12.50 ",
            "Cost of generic": "n/a",
            "Cost difference": "abc",
            "Savings": [1, 2],
        }))
        .unwrap();
        assert_eq!(med.name, "");
        assert_eq!(med.dosage, "500");
        assert_eq!(med.cost_of_branded, 12.5);
        assert_eq!(med.cost_of_generic, 0.0);
        assert_eq!(med.cost_difference, None);
        assert_eq!(med.savings, None);
    }

    #[test]
    fn negative_cost_is_treated_as_unparsable() {
        let med = Medicine::from_json(&json!({ "Cost of generic": -4 })).unwrap();
        assert_eq!(med.cost_of_generic, 0.0);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(Medicine::from_json(&json!("TAB PARACETAMOL")).is_err());
    }

    #[test]
    fn to_json_uses_backend_column_names() {
        let med = Medicine::from_json(&paracetamol()).unwrap();
        let value = med.to_json();
        assert_eq!(value["Cost of generic"], 9.5);
        assert_eq!(value["Side Effects"], "Nausea");
        assert_eq!(value["Type"], "Analgesic");
        assert_eq!(Medicine::from_json(&value).unwrap(), med);
    }

    #[test]
    fn derived_savings_when_absent() {
        let med = Medicine {
            cost_of_branded: 40.0,
            cost_of_generic: 10.0,
            ..Medicine::default()
        };
        assert_eq!(med.effective_cost_difference(), 30.0);
        assert_eq!(med.effective_savings(), Some(75.0));

        let free = Medicine::default();
        assert_eq!(free.effective_savings(), None);
    }

    fn junk() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            ".*".prop_map(Value::String),
            Just(json!([])),
            Just(json!({ "nested": true })),
        ]
    }

    proptest! {
        #[test]
        fn any_field_values_map_without_error(
            branded in junk(),
            generic in junk(),
            diff in junk(),
            savings in junk(),
            name in junk(),
        ) {
            let row = json!({
                "Name": name,
                "Cost of branded": branded,
                "Cost of generic": generic,
                "Cost difference": diff,
                "Savings": savings,
            });
            let med = Medicine::from_json(&row).unwrap();
            prop_assert!(med.cost_of_branded >= 0.0);
            prop_assert!(med.cost_of_generic >= 0.0);
            prop_assert!(med.cost_of_branded.is_finite());

            for (raw, mapped) in [(&diff, med.cost_difference), (&savings, med.savings)] {
                match raw {
                    Value::Number(n) => prop_assert_eq!(mapped, n.as_f64()),
                    Value::String(s) if s.trim().parse::<f64>().is_ok() => {}
                    _ => prop_assert_eq!(mapped, None),
                }
            }
        }
    }
}

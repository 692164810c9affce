//! Hyperparameter configurations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{HgError, HgResult};
use crate::value::ParameterValue;

/// A single hyperparameter configuration.
///
/// `config_id` is unique within the config space that produced it; two
/// configs of the same space are interchangeable iff their ids match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub config_id: String,
    pub values: BTreeMap<String, ParameterValue>,
}

impl Config {
    pub fn new(config_id: impl Into<String>, values: BTreeMap<String, ParameterValue>) -> Self {
        Self {
            config_id: config_id.into(),
            values,
        }
    }

    pub fn from_pairs<K, V, I>(config_id: impl Into<String>, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<ParameterValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new(
            config_id,
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    /// Values in hyperparameter-name order.
    pub fn to_tuple(&self) -> Vec<&ParameterValue> {
        self.values.values().collect()
    }

    /// Numeric values in hyperparameter-name order, for analytic objectives.
    pub fn numeric_values(&self) -> HgResult<Vec<f64>> {
        self.values
            .iter()
            .map(|(name, value)| {
                value.as_f64().ok_or_else(|| {
                    HgError::Validation(format!(
                        "hyperparameter '{name}' of config '{}' is not numeric: {value}",
                        self.config_id
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_follows_name_order() {
        let config = Config::from_pairs("0", [("x1", 2.0), ("x0", 1.0)]);
        let tuple: Vec<f64> = config.to_tuple().iter().filter_map(|v| v.as_f64()).collect();
        assert_eq!(tuple, vec![1.0, 2.0]);
    }

    #[test]
    fn numeric_values_reject_categoricals() {
        let mut values = BTreeMap::new();
        values.insert("lr".to_string(), ParameterValue::Float(0.1));
        values.insert("opt".to_string(), ParameterValue::from("adam"));
        let config = Config::new("3", values);

        let err = config.numeric_values().unwrap_err();
        assert!(err.to_string().contains("'opt'"));
    }
}

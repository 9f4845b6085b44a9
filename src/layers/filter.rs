use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Layer filter restricting which features are drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Keep features whose `property` equals `value`
    Equals { property: String, value: Value },
}

impl Filter {
    pub fn equals(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Equals {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Style-expression form, e.g. `["==", ["get", "id"], "wrf"]`
    pub fn to_expression(&self) -> Value {
        match self {
            Filter::Equals { property, value } => json!(["==", ["get", property], value]),
        }
    }

    /// Evaluates the filter against a feature's properties
    pub fn matches(&self, properties: &Value) -> bool {
        match self {
            Filter::Equals { property, value } => properties.get(property) == Some(value),
        }
    }
}

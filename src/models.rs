use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

/// A loosely shaped request field (measurements, preferences), classified once on arrival.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value", into = "Value")]
pub enum FieldValue {
    Text(String),
    KeyValueMap(Map<String, Value>),
    List(Vec<Value>),
    Opaque(Value),
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Object(map) => Self::KeyValueMap(map),
            Value::Array(items) => Self::List(items),
            other => Self::Opaque(other),
        }
    }
}

impl From<FieldValue> for Value {
    fn from(field: FieldValue) -> Self {
        match field {
            FieldValue::Text(s) => Value::String(s),
            FieldValue::KeyValueMap(map) => Value::Object(map),
            FieldValue::List(items) => Value::Array(items),
            FieldValue::Opaque(v) => v,
        }
    }
}

impl FieldValue {
    /// Values a client would treat as "nothing": blank text, `false`, `0`, `null`.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Opaque(Value::Null) | Self::Opaque(Value::Bool(false)) => true,
            Self::Opaque(Value::Number(n)) => n.as_f64() == Some(0.0),
            _ => false,
        }
    }

    /// Renders the field for embedding in a natural-language instruction.
    ///
    /// Mappings become one `key: value` line per entry in insertion order,
    /// lists are joined with `, `, text passes through untouched.
    pub fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::KeyValueMap(map) => map
                .iter()
                .map(|(key, value)| format!("{}: {}", key, render_scalar(value)))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::List(items) => items.iter().map(render_scalar).collect::<Vec<_>>().join(", "),
            Self::Opaque(v) => render_scalar(v),
        }
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Body of `/api/generate-prompt` and `/api/design-clothing` as it arrives on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignPayload {
    #[serde(default)]
    pub measurements: Option<FieldValue>,
    #[serde(default)]
    pub clothing_type: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub preferences: Option<FieldValue>,
}

pub const MISSING_DESIGN_FIELDS: &str = "Missing required fields: measurements and clothingType";
pub const MISSING_PROMPT_FIELD: &str = "Missing required field: prompt";

impl DesignPayload {
    /// Checks the mandatory fields; `None` means the request must be rejected as a client error.
    pub fn into_request(self) -> Option<DesignRequest> {
        let measurements = self.measurements.filter(|m| !m.is_blank())?;
        let clothing_type = self.clothing_type.filter(|c| !c.trim().is_empty())?;
        Some(DesignRequest {
            measurements,
            clothing_type,
            style: self.style.filter(|s| !s.trim().is_empty()),
            preferences: self.preferences.filter(|p| !p.is_blank()),
        })
    }
}

/// A request that has passed the required-field check.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignRequest {
    pub measurements: FieldValue,
    pub clothing_type: String,
    pub style: Option<String>,
    pub preferences: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagePayload {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Self-contained image: MIME type plus the provider's bytes, base64 encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub base64_data: String,
}

impl GeneratedImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub success: bool,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub success: bool,
    pub image_url: String,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSummary {
    pub clothing_type: String,
    pub style: Option<String>,
    pub measurements: FieldValue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignResponse {
    pub success: bool,
    pub prompt: String,
    pub image_url: String,
    pub design: DesignSummary,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    pub code: String,
}

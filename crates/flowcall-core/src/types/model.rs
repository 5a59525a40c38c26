//! Model catalog entries

use serde::{Deserialize, Deserializer, Serialize};

/// Temperature used when a model does not configure one
pub const DEFAULT_TEMPERATURE: f64 = 0.0;

/// Connection parameters for one catalog model
///
/// Read-only from the pipeline's point of view. `temperature` is stored as
/// text, the way catalogs keep it, and parsed when a request is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Catalog identifier
    pub id: String,
    /// Display name shown in the editor
    pub name: String,
    /// Model identifier sent to the completion endpoint
    pub model: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "text_or_number"
    )]
    pub temperature: Option<String>,
    /// Reference to a stored credential, not the key itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// OpenAI-compatible base URL, e.g. `https://api.openai.com/v1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Accept `temperature: 0.2` as well as `temperature: "0.2"`
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(f64),
    }

    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(|v| match v {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Number(n) => n.to_string(),
    }))
}

/// Outcome of reading the configured temperature
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Temperature {
    /// Nothing configured; the default applies
    Unset,
    Parsed(f64),
    /// Configured text that is not a finite number; the default applies
    Invalid,
}

impl Temperature {
    pub fn value(&self) -> f64 {
        match self {
            Temperature::Parsed(v) => *v,
            Temperature::Unset | Temperature::Invalid => DEFAULT_TEMPERATURE,
        }
    }
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model: model.into(),
            temperature: None,
            api_key: None,
            base_url: None,
        }
    }

    pub fn with_temperature(mut self, temperature: impl Into<String>) -> Self {
        self.temperature = Some(temperature.into());
        self
    }

    pub fn with_api_key(mut self, reference: impl Into<String>) -> Self {
        self.api_key = Some(reference.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Parse the configured temperature
    pub fn temperature(&self) -> Temperature {
        match self.temperature.as_deref().map(str::trim) {
            None | Some("") => Temperature::Unset,
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Temperature::Parsed(v),
                _ => Temperature::Invalid,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_descriptor_builder() {
        let model = ModelDescriptor::new("gpt4o", "GPT-4o", "gpt-4o")
            .with_temperature("0.7")
            .with_api_key("openai")
            .with_base_url("https://api.openai.com/v1");

        assert_eq!(model.id, "gpt4o");
        assert_eq!(model.api_key.as_deref(), Some("openai"));
        assert_eq!(model.temperature(), Temperature::Parsed(0.7));
    }

    #[test]
    fn test_temperature_defaults() {
        let unset = ModelDescriptor::new("m", "M", "m");
        assert_eq!(unset.temperature(), Temperature::Unset);
        assert_eq!(unset.temperature().value(), 0.0);

        let blank = unset.clone().with_temperature("  ");
        assert_eq!(blank.temperature(), Temperature::Unset);

        let junk = unset.clone().with_temperature("warm");
        assert_eq!(junk.temperature(), Temperature::Invalid);
        assert_eq!(junk.temperature().value(), 0.0);

        let nan = unset.with_temperature("NaN");
        assert_eq!(nan.temperature(), Temperature::Invalid);
    }

    #[test]
    fn test_model_descriptor_yaml_shape() {
        let yaml = "id: local\nname: Local Llama\nmodel: llama3\ntemperature: \"0.2\"\n";
        let model: ModelDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(model.model, "llama3");
        assert!(model.base_url.is_none());
        assert_eq!(model.temperature().value(), 0.2);

        let numeric: ModelDescriptor =
            serde_yaml::from_str("id: a\nname: A\nmodel: a\ntemperature: 1.5\n").unwrap();
        assert_eq!(numeric.temperature(), Temperature::Parsed(1.5));
    }
}

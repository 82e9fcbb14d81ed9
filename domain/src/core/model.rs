//! Model value object representing a generation model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available generation models (Value Object)
///
/// The orchestration core only needs "send structured prompt, receive text",
/// so any backend model name is accepted through [`Model::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Gemini3Pro,
    Gemini25Pro,
    Gemini25Flash,
    Gemini25FlashLite,
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini3Pro => "gemini-3-pro-preview",
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Model::Custom(s) => s,
        }
    }

    /// Resolve a model identifier; unknown names become [`Model::Custom`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "gemini-3-pro-preview" => Model::Gemini3Pro,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            other => Model::Custom(other.to_string()),
        }
    }

    /// Whether the model accepts a thinking budget
    pub fn supports_thinking(&self) -> bool {
        !matches!(self, Model::Gemini25FlashLite)
    }
}

impl Default for Model {
    /// Returns the default model (Gemini 2.5 Flash)
    fn default() -> Self {
        Model::Gemini25Flash
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from_name(s))
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from_name(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for model in [Model::Gemini3Pro, Model::Gemini25Pro, Model::Gemini25Flash] {
            let parsed: Model = model.to_string().parse().unwrap();
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_custom_model() {
        let model: Model = "custom-model-v1".parse().unwrap();
        assert_eq!(model, Model::Custom("custom-model-v1".to_string()));
        assert_eq!(model.to_string(), "custom-model-v1");
    }

    #[test]
    fn test_thinking_support() {
        assert!(Model::Gemini25Pro.supports_thinking());
        assert!(!Model::Gemini25FlashLite.supports_thinking());
    }
}

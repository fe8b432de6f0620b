//! Preprocessor configuration
//!
//! JSON settings for the translate-attribute rewrite. Every field has a
//! default, so `{}` is a complete configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{PreprocessError, Result};

pub const DEFAULT_CONTEXT_KEY: &str = "paraglide";
pub const DEFAULT_OPT_OUT_ATTRIBUTE: &str = "data-no-translate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_rules")]
    pub attribute_translations: Vec<AttributeTranslation>,
    #[serde(default = "default_context_key")]
    pub context_key: String,
    #[serde(default = "default_opt_out_attribute")]
    pub opt_out_attribute: String,
}

/// Route `attribute_name` on `element_name` through the translation hook,
/// passing the value of `lang_attribute_name` along when given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeTranslation {
    #[serde(alias = "elementName")]
    pub element_name: String,
    #[serde(alias = "attributeName")]
    pub attribute_name: String,
    #[serde(alias = "langAttributeName", default, skip_serializing_if = "Option::is_none")]
    pub lang_attribute_name: Option<String>,
}

impl AttributeTranslation {
    pub fn new(element_name: &str, attribute_name: &str, lang_attribute_name: Option<&str>) -> Self {
        AttributeTranslation {
            element_name: element_name.to_string(),
            attribute_name: attribute_name.to_string(),
            lang_attribute_name: lang_attribute_name.map(str::to_string),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_context_key() -> String {
    DEFAULT_CONTEXT_KEY.to_string()
}

fn default_opt_out_attribute() -> String {
    DEFAULT_OPT_OUT_ATTRIBUTE.to_string()
}

/// Links, form targets and form button targets.
pub fn default_rules() -> Vec<AttributeTranslation> {
    vec![
        AttributeTranslation::new("a", "href", Some("hreflang")),
        AttributeTranslation::new("form", "action", None),
        AttributeTranslation::new("button", "formaction", None),
    ]
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        PreprocessorConfig {
            enabled: default_enabled(),
            attribute_translations: default_rules(),
            context_key: default_context_key(),
            opt_out_attribute: default_opt_out_attribute(),
        }
    }
}

impl PreprocessorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PreprocessorConfig =
            serde_json::from_str(json).map_err(|err| PreprocessError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = PreprocessorConfig::from_json(&content)?;
        Ok(config)
    }

    /// Names end up in markup and in generated string literals; they must be
    /// non-empty and free of whitespace and quotes.
    pub fn validate(&self) -> Result<()> {
        check_name("contextKey", &self.context_key)?;
        check_name("optOutAttribute", &self.opt_out_attribute)?;
        for (index, rule) in self.attribute_translations.iter().enumerate() {
            check_name(&format!("attributeTranslations[{}].element_name", index), &rule.element_name)?;
            check_name(
                &format!("attributeTranslations[{}].attribute_name", index),
                &rule.attribute_name,
            )?;
            if let Some(lang) = &rule.lang_attribute_name {
                check_name(&format!("attributeTranslations[{}].lang_attribute_name", index), lang)?;
            }
        }
        Ok(())
    }
}

fn check_name(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(PreprocessError::Config(format!("`{}` must not be empty", field)));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '`'))
    {
        return Err(PreprocessError::Config(format!(
            "`{}` contains whitespace or quotes: {:?}",
            field, value
        )));
    }
    Ok(())
}

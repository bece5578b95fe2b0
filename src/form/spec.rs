//! Form definitions loaded from JSON or built in code.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_FORM_TITLE: &str = "Form";

fn default_title() -> String {
    DEFAULT_FORM_TITLE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSpec {
    Text {
        label: String,
        #[serde(default)]
        value: String,
    },
    Number {
        label: String,
        min: i64,
        max: i64,
        #[serde(default)]
        default: i64,
    },
    Checkbox {
        label: String,
        #[serde(default)]
        checked: bool,
    },
    List {
        label: String,
        #[serde(default)]
        options: Vec<String>,
        #[serde(default)]
        selected: usize,
    },
}

impl FieldSpec {
    pub fn label(&self) -> &str {
        match self {
            FieldSpec::Text { label, .. }
            | FieldSpec::Number { label, .. }
            | FieldSpec::Checkbox { label, .. }
            | FieldSpec::List { label, .. } => label,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            FieldSpec::Number {
                label,
                min,
                max,
                default,
            } => {
                if min > max {
                    bail!("field \"{label}\": min {min} is greater than max {max}");
                }
                if default < min || default > max {
                    bail!(
                        "field \"{label}\": default {default} is outside {min}..={max}"
                    );
                }
            }
            FieldSpec::List {
                label,
                options,
                selected,
            } => {
                if !options.is_empty() && *selected >= options.len() {
                    bail!(
                        "field \"{label}\": selected option {selected} but only {} options",
                        options.len()
                    );
                }
            }
            FieldSpec::Text { .. } | FieldSpec::Checkbox { .. } => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSpec {
    #[serde(default = "default_title")]
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

impl Default for FormSpec {
    fn default() -> Self {
        Self {
            title: default_title(),
            fields: vec![
                FieldSpec::Text {
                    label: "Name".to_string(),
                    value: String::new(),
                },
                FieldSpec::Number {
                    label: "Age".to_string(),
                    min: 0,
                    max: 120,
                    default: 18,
                },
                FieldSpec::Checkbox {
                    label: "Terms".to_string(),
                    checked: false,
                },
                FieldSpec::List {
                    label: "Language".to_string(),
                    options: ["Go", "JavaScript", "Rust", "C++"]
                        .into_iter()
                        .map(String::from)
                        .collect(),
                    selected: 0,
                },
            ],
        }
    }
}

impl FormSpec {
    pub fn from_json(text: &str) -> Result<Self> {
        let spec: FormSpec = serde_json::from_str(text).context("invalid form spec")?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read form spec '{}'", path.display()))?;
        Self::from_json(&text).with_context(|| format!("form spec '{}'", path.display()))
    }

    /// A form must have at least one field and consistent bounds.
    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            bail!("form \"{}\" has no fields", self.title);
        }
        for field in &self.fields {
            field.validate()?;
        }
        Ok(())
    }
}

use serde::Serialize;
use std::fmt;

use super::spec::FieldSpec;

/// Editable state of one field; the variant fixes the field type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    Text {
        value: String,
    },
    Number {
        value: String,
        min: i64,
        max: i64,
        default: i64,
    },
    Checkbox {
        checked: bool,
    },
    List {
        options: Vec<String>,
        selected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: String,
    pub state: FieldState,
}

/// Parse an integer, falling back to `default` on empty or junk input.
pub fn parse_number(text: &str, default: i64) -> i64 {
    text.trim().parse().unwrap_or(default)
}

impl FormField {
    pub fn from_spec(spec: &FieldSpec) -> Self {
        let state = match spec {
            FieldSpec::Text { value, .. } => FieldState::Text {
                value: value.clone(),
            },
            FieldSpec::Number {
                min, max, default, ..
            } => FieldState::Number {
                value: default.to_string(),
                min: *min,
                max: *max,
                default: *default,
            },
            FieldSpec::Checkbox { checked, .. } => FieldState::Checkbox { checked: *checked },
            FieldSpec::List {
                options, selected, ..
            } => FieldState::List {
                options: options.clone(),
                selected: if *selected < options.len() {
                    *selected
                } else {
                    0
                },
            },
        };
        Self {
            label: spec.label().to_string(),
            state,
        }
    }

    /// Left (-1) / Right (+1). Returns false for kinds without stepping.
    pub fn step(&mut self, delta: i64) -> bool {
        match &mut self.state {
            FieldState::List { options, selected } => {
                if !options.is_empty() {
                    let len = options.len() as i64;
                    *selected = (*selected as i64 + delta).rem_euclid(len) as usize;
                }
                true
            }
            FieldState::Number {
                value, min, max, ..
            } => {
                let current = parse_number(value, 0);
                *value = current.saturating_add(delta).clamp(*min, *max).to_string();
                true
            }
            FieldState::Text { .. } | FieldState::Checkbox { .. } => false,
        }
    }

    pub fn type_char(&mut self, ch: char) {
        match &mut self.state {
            FieldState::Text { value } => value.push(ch),
            FieldState::Number {
                value, min, max, ..
            } => {
                if ch.is_ascii_digit() {
                    let candidate = format!("{value}{ch}");
                    let fits = candidate
                        .parse::<i64>()
                        .is_ok_and(|n| n >= *min && n <= *max);
                    if fits {
                        *value = candidate;
                    }
                }
            }
            FieldState::Checkbox { checked } => {
                if matches!(ch, ' ' | 'x' | 'X') {
                    *checked = !*checked;
                }
            }
            FieldState::List { .. } => {}
        }
    }

    pub fn backspace(&mut self) {
        if let FieldState::Text { value } | FieldState::Number { value, .. } = &mut self.state {
            value.pop();
        }
    }

    /// Text shown to the right of the label.
    pub fn display_value(&self) -> String {
        match &self.state {
            FieldState::Text { value } | FieldState::Number { value, .. } => value.clone(),
            FieldState::Checkbox { checked: true } => "[x]".to_string(),
            FieldState::Checkbox { checked: false } => "[ ]".to_string(),
            FieldState::List { options, selected } => options
                .get(*selected)
                .cloned()
                .unwrap_or_else(|| "(empty)".to_string()),
        }
    }

    /// Committed value: trimmed text, parsed number, flag or chosen option.
    pub fn value(&self) -> FieldValue {
        match &self.state {
            FieldState::Text { value } => FieldValue::Text(value.trim().to_string()),
            FieldState::Number { value, default, .. } => {
                FieldValue::Number(parse_number(value, *default))
            }
            FieldState::Checkbox { checked } => FieldValue::Bool(*checked),
            FieldState::List { options, selected } => {
                FieldValue::Choice(options.get(*selected).cloned())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Bool(bool),
    Choice(Option<String>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Bool(flag) => write!(f, "{flag}"),
            FieldValue::Choice(choice) => f.write_str(choice.as_deref().unwrap_or("")),
        }
    }
}

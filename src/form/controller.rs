use anyhow::{bail, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Serialize;

use super::field::{FieldValue, FormField};
use super::spec::FormSpec;
use crate::{log_debug, log_debug_content};

pub const FORM_CANCELLED: &str = "form: cancelled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedField {
    pub label: String,
    pub value: FieldValue,
}

/// Values captured when the last field is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSubmission {
    pub title: String,
    pub fields: Vec<SubmittedField>,
}

impl FormSubmission {
    /// `OK: Label=value  Label=value`
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{}={}", field.label, field.value))
            .collect();
        format!("OK: {}", parts.join("  "))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// The form is closed; the key belongs to someone else.
    Ignored,
    /// Consumed; the form stays open.
    Edited,
    Cancelled,
    Submitted(FormSubmission),
}

#[derive(Debug, Default)]
pub struct FormController {
    title: String,
    fields: Vec<FormField>,
    cursor: usize,
    active: bool,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the fields from `spec` and show the form.
    pub fn open(&mut self, spec: &FormSpec) -> Result<()> {
        if spec.fields.is_empty() {
            bail!("form \"{}\" has no fields", spec.title);
        }
        self.title = spec.title.clone();
        self.fields = spec.fields.iter().map(FormField::from_spec).collect();
        self.cursor = 0;
        self.active = true;
        let count = self.fields.len();
        log_debug(&format!("form opened: {} ({count} fields)", self.title));
        Ok(())
    }

    pub fn close(&mut self) {
        if self.active {
            log_debug("form closed");
        }
        self.active = false;
        self.fields.clear();
        self.cursor = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> FormOutcome {
        if !self.active || self.fields.is_empty() {
            return FormOutcome::Ignored;
        }
        let last = self.fields.len() - 1;

        match key.code {
            KeyCode::Esc => {
                self.close();
                return FormOutcome::Cancelled;
            }
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => self.cursor = (self.cursor + 1).min(last),
            KeyCode::Left => {
                self.fields[self.cursor].step(-1);
            }
            KeyCode::Right => {
                self.fields[self.cursor].step(1);
            }
            KeyCode::Enter | KeyCode::Tab => {
                if self.cursor < last {
                    self.cursor += 1;
                } else {
                    return FormOutcome::Submitted(self.commit());
                }
            }
            KeyCode::Backspace => self.fields[self.cursor].backspace(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.fields[self.cursor].type_char(ch);
            }
            _ => {}
        }
        FormOutcome::Edited
    }

    fn commit(&mut self) -> FormSubmission {
        let submission = FormSubmission {
            title: self.title.clone(),
            fields: self
                .fields
                .iter()
                .map(|field| SubmittedField {
                    label: field.label.clone(),
                    value: field.value(),
                })
                .collect(),
        };
        log_debug_content(&format!("form submitted: {}", submission.to_json()));
        self.close();
        submission
    }
}

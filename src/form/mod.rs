//! Dynamic multi-field form overlay.

mod controller;
mod field;
mod render;
mod spec;

pub use controller::{FormController, FormOutcome, FormSubmission, SubmittedField, FORM_CANCELLED};
pub use field::{parse_number, FieldState, FieldValue, FormField};
pub use render::{
    form_height, form_row, render_form, FORM_CONTENT_WIDTH, FORM_FOOTER, FORM_LABEL_WIDTH,
};
pub use spec::{FieldSpec, FormSpec, DEFAULT_FORM_TITLE};

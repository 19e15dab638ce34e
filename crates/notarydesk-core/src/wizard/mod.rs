// ── Booking wizard ──
//
// Declarative step/field table, the pure validators that consume it, and
// the form state controller that walks a draft through the steps.

pub mod fields;
pub mod form;
pub mod validate;

pub use fields::{
    Catalog, ChoiceOption, FieldId, FieldKind, FieldSpec, Requirement, STEPS, StepId, StepSpec,
};
pub use form::{Advance, BookingWizard, FieldValue};
pub use validate::{FieldErrors, ValidatedDraft, validate_all, validate_step};

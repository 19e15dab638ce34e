// ── Form state controller ──
//
// One `BookingWizard` per booking attempt. It owns the draft and the
// current step; dropping it abandons the draft (nothing is saved).

use tracing::debug;

use super::fields::{FieldId, FieldKind, STEPS, StepId, StepSpec};
use super::validate::{FieldErrors, ValidatedDraft, validate_all, validate_step};
use crate::model::BookingDraft;

/// Result of a successful `advance()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved forward to this step.
    Moved(StepId),
    /// The final step passed; the draft is ready to submit.
    Ready(ValidatedDraft),
}

/// Borrowed view of one field's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
    Selection(&'a [String]),
}

#[derive(Debug, Clone, Default)]
pub struct BookingWizard {
    step: usize,
    draft: BookingDraft,
}

impl BookingWizard {
    /// Step 1, empty fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume at step 1 with prefilled values.
    pub fn from_draft(draft: BookingDraft) -> Self {
        Self { step: 0, draft }
    }

    // ── State ────────────────────────────────────────────────────────

    pub fn step(&self) -> StepId {
        self.spec().id
    }

    /// 1-based position, for display.
    pub fn step_number(&self) -> usize {
        self.step + 1
    }

    pub fn step_count(&self) -> usize {
        STEPS.len()
    }

    pub fn spec(&self) -> &'static StepSpec {
        &STEPS[self.step.min(STEPS.len() - 1)]
    }

    pub fn is_final_step(&self) -> bool {
        self.step + 1 >= STEPS.len()
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn into_draft(self) -> BookingDraft {
        self.draft
    }

    // ── Field access ─────────────────────────────────────────────────

    pub fn value(&self, field: FieldId) -> FieldValue<'_> {
        match field {
            FieldId::SmsOptIn => FieldValue::Flag(self.draft.sms_opt_in),
            FieldId::AddOns => FieldValue::Selection(&self.draft.add_ons),
            other => FieldValue::Text(self.draft.text(other).unwrap_or_default()),
        }
    }

    /// Replace a text-like field's value. Returns `false` for flag and
    /// multi-choice fields, which use `set_flag` and `toggle`.
    pub fn set(&mut self, field: FieldId, value: impl Into<String>) -> bool {
        match self.draft.text_mut(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn set_flag(&mut self, field: FieldId, on: bool) -> bool {
        if field == FieldId::SmsOptIn {
            self.draft.sms_opt_in = on;
            true
        } else {
            false
        }
    }

    /// Add `option` to a multi-choice field, or remove it if present.
    /// Returns whether the option is selected afterwards.
    pub fn toggle(&mut self, field: FieldId, option: &str) -> bool {
        let is_multi = field
            .spec()
            .is_some_and(|spec| matches!(spec.kind, FieldKind::MultiChoice(_)));
        if !is_multi {
            return false;
        }

        let selection = &mut self.draft.add_ons;
        if let Some(pos) = selection.iter().position(|o| o == option) {
            selection.remove(pos);
            false
        } else {
            selection.push(option.to_owned());
            true
        }
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Validate the current step and move forward.
    ///
    /// On the final step every step is re-validated and the typed draft
    /// is returned. On failure the step index does not change.
    pub fn advance(&mut self) -> Result<Advance, FieldErrors> {
        if self.is_final_step() {
            let validated = validate_all(&self.draft)?;
            debug!("wizard complete");
            return Ok(Advance::Ready(validated));
        }

        validate_step(self.step(), &self.draft)?;
        self.step += 1;
        debug!(step = %self.step(), "wizard advanced");
        Ok(Advance::Moved(self.step()))
    }

    /// Go back one step, keeping every entered value. No-op on step 1.
    pub fn back(&mut self) -> StepId {
        self.step = self.step.saturating_sub(1);
        self.step()
    }
}

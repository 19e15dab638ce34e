//! `notarydesk book`: the interactive booking wizard and draft submission.

use std::io::IsTerminal;
use std::str::FromStr;

use dialoguer::{Confirm, Input, MultiSelect, Select};
use notarydesk_core::wizard::validate::validate_field;
use notarydesk_core::wizard::{
    Catalog, FieldKind, FieldSpec, FieldValue, Requirement, STEPS, StepId, validate_all,
};
use notarydesk_core::{
    Advance, BookingDraft, BookingWizard, ServiceType, SubmissionOutcome, ValidatedDraft,
};
use serde::Serialize;
use tracing::debug;

use crate::cli::{BookArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, Painter};
use crate::ui::{self, TerminalPresenter};

use super::bookings::record_detail;
use super::util::{self, prompt_err};

// ── Report ──────────────────────────────────────────────────────────

/// What `book` prints once a record exists.
#[derive(Debug, Serialize)]
struct SubmissionReport {
    booking_id: String,
    reference: String,
    status: String,
    service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    checkout_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_error: Option<String>,
}

impl From<&SubmissionOutcome> for SubmissionReport {
    fn from(outcome: &SubmissionOutcome) -> Self {
        let record = outcome.record();
        let (checkout_url, payment_error) = match outcome {
            SubmissionOutcome::Redirected { session, .. } => (Some(session.url.to_string()), None),
            SubmissionOutcome::PaymentUnavailable { error, .. } => {
                (None, Some(error.user_message()))
            }
        };
        Self {
            booking_id: record.id.to_string(),
            reference: record.reference(),
            status: record.status.to_string(),
            service: record.service_type.key().into(),
            checkout_url,
            payment_error,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &BookArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let painter = Painter::new(&global.color);

    if args.check {
        let path = args.from_file.as_deref().ok_or_else(|| CliError::Validation {
            field: "check".into(),
            reason: "--check needs --from-file".into(),
        })?;
        let draft = validate_all(&util::read_draft(path)?)?;
        let out = output::render_single(&global.output, &draft, draft_detail, |d| {
            d.service_type().key().to_owned()
        })?;
        output::print_output(&out, global.quiet);
        if !global.quiet {
            eprintln!("{}", painter.success("✓ Draft is valid"));
        }
        return Ok(());
    }

    // Resolve the backend before asking the customer anything.
    let desk = util::connect(global)?;

    let validated = match &args.from_file {
        Some(path) => validate_all(&util::read_draft(path)?)?,
        None => match run_wizard(desk.wizard(), painter)? {
            Some(validated) => validated,
            None => {
                if !global.quiet {
                    eprintln!("Booking discarded.");
                }
                desk.shutdown().await;
                return Ok(());
            }
        },
    };

    let progress = ui::spinner("Submitting booking...", global.quiet);
    let presenter = TerminalPresenter::new(painter, global.quiet, !args.no_open, progress.clone());
    let result = desk.submit(validated, &presenter).await;
    progress.finish_and_clear();

    // Let confirmation messages finish before the process exits.
    desk.shutdown().await;
    let outcome = result?;

    let report = SubmissionReport::from(&outcome);
    let out = output::render_single(
        &global.output,
        &report,
        |r| match &r.checkout_url {
            Some(url) => format!("{}\n\nCheckout: {url}", record_detail(outcome.record())),
            None => record_detail(outcome.record()),
        },
        |r| r.checkout_url.clone().unwrap_or_else(|| r.booking_id.clone()),
    )?;
    output::print_output(&out, global.quiet);

    match outcome {
        SubmissionOutcome::Redirected { .. } => Ok(()),
        SubmissionOutcome::PaymentUnavailable { record, .. } => {
            Err(CliError::PaymentUnavailable {
                reference: record.reference(),
            })
        }
    }
}

// ── Wizard loop ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepAction {
    Continue,
    Back,
    Discard,
}

/// Drive the wizard through its steps. `None` means the customer
/// discarded the draft.
fn run_wizard(
    mut wizard: BookingWizard,
    painter: Painter,
) -> Result<Option<ValidatedDraft>, CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NotATerminal);
    }

    loop {
        let spec = wizard.spec();
        eprintln!(
            "\n{}",
            painter.heading(&format!(
                "Step {}/{}: {}",
                wizard.step_number(),
                wizard.step_count(),
                spec.title
            ))
        );

        if spec.id == StepId::Confirm {
            eprintln!("{}", draft_review(wizard.draft()));
        } else {
            for field in spec.fields {
                prompt_field(&mut wizard, field, painter)?;
            }
        }

        match choose_action(&wizard)? {
            StepAction::Discard => return Ok(None),
            StepAction::Back => {
                wizard.back();
                continue;
            }
            StepAction::Continue => {}
        }

        match wizard.advance() {
            Ok(Advance::Moved(step)) => debug!(%step, "wizard advanced"),
            Ok(Advance::Ready(validated)) => return Ok(Some(validated)),
            Err(errors) => {
                for error in errors.iter() {
                    eprintln!("  {} {}", painter.error(error.field.label()), error.message);
                }
            }
        }
    }
}

fn choose_action(wizard: &BookingWizard) -> Result<StepAction, CliError> {
    let forward = if wizard.is_final_step() {
        "Submit booking"
    } else {
        "Continue"
    };
    let mut actions = vec![(forward, StepAction::Continue)];
    if wizard.step_number() > 1 {
        actions.push(("Back", StepAction::Back));
    }
    actions.push(("Discard booking", StepAction::Discard));

    let labels: Vec<&str> = actions.iter().map(|(label, _)| *label).collect();
    let picked = Select::new()
        .items(&labels)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    Ok(actions
        .get(picked)
        .map_or(StepAction::Continue, |(_, action)| *action))
}

// ── Field prompts ───────────────────────────────────────────────────

fn is_in_person(draft: &BookingDraft) -> bool {
    ServiceType::from_str(draft.service_type.trim()).is_ok_and(ServiceType::is_in_person)
}

fn prompt_label(field: &FieldSpec, draft: &BookingDraft) -> String {
    let optional = match field.rule {
        Requirement::Required => false,
        Requirement::Optional => true,
        Requirement::RequiredWhenInPerson => !is_in_person(draft),
    };
    if optional {
        format!("{} (optional)", field.label)
    } else {
        field.label.to_owned()
    }
}

fn prompt_field(
    wizard: &mut BookingWizard,
    field: &FieldSpec,
    painter: Painter,
) -> Result<(), CliError> {
    let label = prompt_label(field, wizard.draft());
    match field.kind {
        FieldKind::Flag => {
            let current = matches!(wizard.value(field.id), FieldValue::Flag(true));
            let on = Confirm::new()
                .with_prompt(label)
                .default(current)
                .interact()
                .map_err(prompt_err)?;
            wizard.set_flag(field.id, on);
        }

        FieldKind::Choice(catalog) => {
            let options = catalog.options();
            let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
            let current = text_value(wizard, field);
            let default = options.iter().position(|o| o.key == current).unwrap_or(0);
            let picked = Select::new()
                .with_prompt(label)
                .items(&labels)
                .default(default)
                .interact()
                .map_err(prompt_err)?;
            if let Some(option) = options.get(picked) {
                wizard.set(field.id, option.key);
            }
        }

        FieldKind::MultiChoice(catalog) => {
            let options = catalog.options();
            let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
            let selected = selection(wizard, field, catalog);
            let picked = MultiSelect::new()
                .with_prompt(label)
                .items(&labels)
                .defaults(&selected)
                .interact()
                .map_err(prompt_err)?;
            for ((index, option), was_selected) in options.iter().enumerate().zip(&selected) {
                if picked.contains(&index) != *was_selected {
                    wizard.toggle(field.id, option.key);
                }
            }
        }

        // Free text: re-ask until the field passes on its own.
        _ => loop {
            let current = text_value(wizard, field).to_owned();
            let value: String = Input::new()
                .with_prompt(label.as_str())
                .allow_empty(true)
                .with_initial_text(current)
                .interact_text()
                .map_err(prompt_err)?;
            wizard.set(field.id, value.trim());
            match validate_field(field, wizard.draft()) {
                Ok(()) => break,
                Err(message) => eprintln!("  {}", painter.error(&message)),
            }
        },
    }
    Ok(())
}

fn text_value<'a>(wizard: &'a BookingWizard, field: &FieldSpec) -> &'a str {
    match wizard.value(field.id) {
        FieldValue::Text(text) => text,
        FieldValue::Flag(_) | FieldValue::Selection(_) => "",
    }
}

fn selection(wizard: &BookingWizard, field: &FieldSpec, catalog: Catalog) -> Vec<bool> {
    let chosen: &[String] = match wizard.value(field.id) {
        FieldValue::Selection(chosen) => chosen,
        FieldValue::Text(_) | FieldValue::Flag(_) => &[],
    };
    catalog
        .options()
        .iter()
        .map(|o| chosen.iter().any(|c| c == o.key))
        .collect()
}

// ── Review ──────────────────────────────────────────────────────────

/// Human-readable value of a draft field, with catalog keys shown as labels.
fn display_value(field: &FieldSpec, draft: &BookingDraft) -> String {
    let label_for = |catalog: Catalog, key: &str| {
        catalog
            .options()
            .into_iter()
            .find(|o| o.key == key)
            .map_or_else(|| key.to_owned(), |o| o.label.to_owned())
    };
    match field.kind {
        FieldKind::Flag => String::from(if draft.sms_opt_in { "yes" } else { "no" }),
        FieldKind::MultiChoice(catalog) => draft
            .add_ons
            .iter()
            .map(|key| label_for(catalog, key))
            .collect::<Vec<_>>()
            .join(", "),
        FieldKind::Choice(catalog) => {
            label_for(catalog, draft.text(field.id).unwrap_or_default().trim())
        }
        _ => draft.text(field.id).unwrap_or_default().trim().to_owned(),
    }
}

fn draft_review(draft: &BookingDraft) -> String {
    let pairs: Vec<(&str, String)> = STEPS
        .iter()
        .flat_map(|step| step.fields.iter())
        .map(|field| (field.label, display_value(field, draft)))
        .collect();
    output::detail_block(&pairs)
}

fn draft_detail(draft: &ValidatedDraft) -> String {
    let add_ons = draft
        .add_ons()
        .iter()
        .copied()
        .map(notarydesk_core::AddOn::label)
        .collect::<Vec<_>>()
        .join(", ");
    output::detail_block(&[
        ("Name", draft.name().to_owned()),
        ("Email", draft.email().to_owned()),
        ("Phone", draft.phone().to_owned()),
        ("Service", draft.service_type().label().to_owned()),
        ("Location", draft.location().unwrap_or_default().to_owned()),
        ("Documents", draft.document_count().to_string()),
        (
            "Preferred date",
            draft
                .preferred_date()
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        (
            "Preferred time",
            draft
                .preferred_time()
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
        ),
        ("Add-ons", add_ons),
        ("Notes", draft.notes().unwrap_or_default().to_owned()),
    ])
}

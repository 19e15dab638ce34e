//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use notarydesk_core::{BookingDraft, Desk};
use uuid::Uuid;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

/// Build the desk for the active profile and flag overrides.
pub fn connect(global: &GlobalOpts) -> Result<Desk, CliError> {
    let backend = config::resolve_backend_config(global)?;
    tracing::debug!(project = %backend.project_url, "connecting");
    Ok(Desk::new(backend)?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Read a booking draft for `--from-file`.
///
/// Unknown keys are ignored; missing keys stay empty and are reported by
/// validation, not here.
pub fn read_draft(path: &Path) -> Result<BookingDraft, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn parse_booking_id(raw: &str) -> Result<Uuid, CliError> {
    raw.trim().parse().map_err(|_| CliError::Validation {
        field: "id".into(),
        reason: format!("'{raw}' is not a booking ID (expected a UUID)"),
    })
}

pub fn prompt_err(e: dialoguer::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

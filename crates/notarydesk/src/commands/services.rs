//! Service catalog command handlers.

use notarydesk_core::{AddOn, ServiceType};
use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use crate::cli::{GlobalOpts, ServicesArgs, ServicesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct ServiceEntry {
    key: &'static str,
    label: &'static str,
    in_person: bool,
}

#[derive(Debug, Serialize)]
struct AddOnEntry {
    key: &'static str,
    label: &'static str,
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Service")]
    label: &'static str,
    #[tabled(rename = "Needs Address")]
    in_person: &'static str,
}

impl From<&ServiceEntry> for ServiceRow {
    fn from(s: &ServiceEntry) -> Self {
        Self {
            key: s.key,
            label: s.label,
            in_person: if s.in_person { "yes" } else { "" },
        }
    }
}

#[derive(Tabled)]
struct AddOnRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Add-on")]
    label: &'static str,
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ServicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        ServicesCommand::List => {
            let entries: Vec<ServiceEntry> = ServiceType::iter()
                .map(|s| ServiceEntry {
                    key: s.key(),
                    label: s.label(),
                    in_person: s.is_in_person(),
                })
                .collect();
            output::render_list(&global.output, &entries, |s| ServiceRow::from(s), |s| {
                s.key.to_owned()
            })?
        }
        ServicesCommand::AddOns => {
            let entries: Vec<AddOnEntry> = AddOn::iter()
                .map(|a| AddOnEntry {
                    key: a.key(),
                    label: a.label(),
                })
                .collect();
            output::render_list(
                &global.output,
                &entries,
                |a| AddOnRow {
                    key: a.key,
                    label: a.label,
                },
                |a| a.key.to_owned(),
            )?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

//! Booking admin command handlers.

use notarydesk_core::{AddOn, BookingRecord, BookingStatus, Desk};

use crate::cli::{BookingsArgs, BookingsCommand, GlobalOpts, StatusArg};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<StatusArg> for BookingStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::Confirmed => Self::Confirmed,
            StatusArg::Completed => Self::Completed,
            StatusArg::Cancelled => Self::Cancelled,
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn yes_no(flag: bool) -> String {
    String::from(if flag { "yes" } else { "no" })
}

pub(crate) fn record_detail(r: &BookingRecord) -> String {
    let add_ons = r
        .add_ons
        .iter()
        .copied()
        .map(AddOn::label)
        .collect::<Vec<_>>()
        .join(", ");

    output::detail_block(&[
        ("ID", r.id.to_string()),
        ("Reference", r.reference()),
        ("Status", r.status.to_string()),
        ("Created", r.created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        ("Name", r.name.clone()),
        ("Email", r.email.clone()),
        ("Phone", r.phone.clone()),
        ("Text updates", yes_no(r.sms_opt_in)),
        ("Service", r.service_type.label().into()),
        ("Location", r.location.clone().unwrap_or_default()),
        ("Documents", r.document_count.to_string()),
        (
            "Preferred date",
            r.preferred_date
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        (
            "Preferred time",
            r.preferred_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
        ),
        ("Add-ons", add_ons),
        ("Notes", r.notes.clone().unwrap_or_default()),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(desk: &Desk, args: BookingsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let record = match args.command {
        BookingsCommand::Get { id } => {
            let id = util::parse_booking_id(&id)?;
            desk.get_booking(id).await?
        }

        BookingsCommand::SetStatus { id, status } => {
            let id = util::parse_booking_id(&id)?;
            let record = desk.set_status(id, status.into()).await?;
            if !global.quiet {
                eprintln!("Booking {} is now {}", record.reference(), record.status);
            }
            record
        }

        BookingsCommand::Cancel { id } => {
            let id = util::parse_booking_id(&id)?;
            if !util::confirm(
                &format!("Cancel booking {id}? The customer is not notified."),
                "cancel booking",
                global.yes,
            )? {
                return Ok(());
            }
            let record = desk.set_status(id, BookingStatus::Cancelled).await?;
            if !global.quiet {
                eprintln!("Booking {} cancelled", record.reference());
            }
            record
        }
    };

    let out = output::render_single(&global.output, &record, record_detail, |r| {
        r.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

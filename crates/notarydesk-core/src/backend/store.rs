// Hosted data store over the REST table client.

use async_trait::async_trait;
use notarydesk_api::RestClient;
use notarydesk_api::rest::NewBookingRow;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::BookingStore;
use crate::error::CoreError;
use crate::model::{BookingRecord, BookingStatus};
use crate::wizard::ValidatedDraft;

pub struct HostedStore {
    client: RestClient,
}

impl HostedStore {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

/// Write failures that are not connectivity or auth problems become
/// `Persistence` errors so the caller can word them as such.
fn persistence(err: notarydesk_api::Error) -> CoreError {
    match CoreError::from(err) {
        CoreError::Api { message, .. } | CoreError::Internal(message) => {
            CoreError::Persistence { message }
        }
        other => other,
    }
}

/// The `id` of the first row in an insert reply that did not decode whole.
fn inserted_id(body: &str) -> Option<Uuid> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(body).ok()?;
    rows.first()?.get("id")?.as_str()?.parse().ok()
}

/// A 2xx insert is committed even when its reply is unreadable. With an id
/// the record is rebuilt from the submitted values; without one the outcome
/// is unknown and must not be reported as "nothing saved".
fn stored_unreadable(
    draft: &ValidatedDraft,
    id: Option<Uuid>,
    message: String,
) -> Result<BookingRecord, CoreError> {
    match id {
        Some(id) => {
            warn!(booking_id = %id, error = %message, "stored row unreadable, using submitted values");
            Ok(BookingRecord::from_inserted(id, draft))
        }
        None => {
            warn!(error = %message, "insert accepted but the reply names no booking");
            Err(CoreError::SaveUnconfirmed { message })
        }
    }
}

#[async_trait]
impl BookingStore for HostedStore {
    async fn create(&self, draft: &ValidatedDraft) -> Result<BookingRecord, CoreError> {
        let record = match self.client.insert_booking(&NewBookingRow::from(draft)).await {
            Ok(row) => {
                let id = row.id;
                match BookingRecord::try_from(row) {
                    Ok(record) => record,
                    Err(e) => stored_unreadable(draft, Some(id), e.to_string())?,
                }
            }
            Err(notarydesk_api::Error::Deserialization { message, body }) => {
                stored_unreadable(draft, inserted_id(&body), message)?
            }
            Err(e @ notarydesk_api::Error::EmptyResponse { .. }) => {
                stored_unreadable(draft, None, e.to_string())?
            }
            Err(e) => return Err(persistence(e)),
        };
        info!(booking_id = %record.id, service = %record.service_type, "booking stored");
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> Result<BookingRecord, CoreError> {
        debug!(booking_id = %id, "fetching booking");
        self.client
            .get_booking(id)
            .await?
            .ok_or_else(|| CoreError::BookingNotFound { id: id.to_string() })?
            .try_into()
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<BookingRecord, CoreError> {
        let row = self
            .client
            .update_booking_status(id, status.as_str())
            .await
            .map_err(persistence)?
            .ok_or_else(|| CoreError::BookingNotFound { id: id.to_string() })?;
        info!(booking_id = %id, %status, "booking status updated");
        row.try_into()
    }
}

// Booking endpoints on the REST table client.

use uuid::Uuid;

use crate::error::Error;
use crate::rest::client::RestClient;
use crate::rest::types::{BookingRow, NewBookingRow, StatusPatch};

impl RestClient {
    /// Insert a new booking and return the stored row (with its id).
    pub async fn insert_booking(&self, row: &NewBookingRow) -> Result<BookingRow, Error> {
        self.insert_returning(row).await
    }

    /// Fetch a booking by id.
    pub async fn get_booking(&self, id: Uuid) -> Result<Option<BookingRow>, Error> {
        self.select_one(&[("id", id.to_string())]).await
    }

    /// Overwrite a booking's status. Returns `None` if no row has this id.
    pub async fn update_booking_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<Option<BookingRow>, Error> {
        self.update_returning(&[("id", id.to_string())], &StatusPatch { status })
            .await
    }
}

// REST table API
//
// Hand-written client for the hosted backend's PostgREST-style table
// endpoints under `/rest/v1/`. Table operations live on `RestClient`;
// resource-specific methods (bookings) are inherent methods in their own
// files to keep the client focused on transport mechanics.

pub mod bookings;
pub mod client;
pub mod types;

pub use client::RestClient;
pub use types::{BookingRow, NewBookingRow, StatusPatch};

//! Data access, one module per table. Every function runs on the caller's
//! session and commits on its own.

pub mod trip_requests;
pub mod trips;
pub mod users;

//! # Storage Module
//!
//! Persistence for babies, calendar events and alerts.
//!
//! - **connection**: `DbConnection`, the SQLite pool and schema setup
//! - **traits**: storage abstractions the domain layer depends on
//! - **repositories**: SQLite implementations of those traits

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{AlertRepository, BabyRepository, CalendarEventRepository};
pub use traits::{AlertStorage, BabyStorage, CalendarEventStorage};

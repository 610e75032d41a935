//! Callboard HTTP API service.
//!
//! Users spend coins to have calls placed by a telephony provider. This crate
//! wires the stores and provider clients into:
//!
//! - the call placement workflow ([`CallOrchestrator`])
//! - achievement awarding and reconciliation ([`AchievementAwarder`])
//! - the HTTP API ([`create_router`])
//!
//! Callers are not authenticated; user ids are taken from requests as given.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers are async for the router even when the store is sync

pub mod awards;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod orchestrator;
pub mod routes;
pub mod state;

pub use awards::{AchievementAwarder, ReconcileReport};
pub use config::ServiceConfig;
pub use error::ApiError;
pub use orchestrator::{CallOrchestrator, PlacedCall};
pub use routes::create_router;
pub use state::AppState;

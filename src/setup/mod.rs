//! First-run setup flow — wizard steps, form validation, and persistence.
//!
//! The flow walks a new user through equipment configuration: welcome,
//! grinder scale, basket dose ranges, then a summary that commits both
//! records and marks setup complete. Forward progress is gated on the
//! current step's form validity; skipping writes sensible defaults instead.

pub mod flow;
pub mod form;
pub mod routes;
pub mod state;
pub mod step;

pub use flow::{SetupFlow, SetupStatus};
pub use form::{BasketField, BasketForm, Field, GrinderField, GrinderForm};
pub use routes::{SetupRouteState, setup_routes};
pub use state::FlowState;
pub use step::SetupStep;

//! Data models for the deal pipeline client.
//!
//! Wire types mirror the API's camelCase JSON; domain types (stages, screens,
//! roles) are closed enums.

pub mod audit;
pub mod auth;
pub mod deal;
pub mod payload;
pub mod screen;
pub mod stage;
pub mod user;

pub use audit::*;
pub use auth::*;
pub use deal::*;
pub use payload::*;
pub use screen::*;
pub use stage::*;
pub use user::*;

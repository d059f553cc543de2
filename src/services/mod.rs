//! Session, access control, list querying and API services.
//!
//! `session` owns the stored credential, `authenticator` and `access_gate`
//! consume it, `query` and `list_view` shape fetched lists, and the endpoint
//! services (`auth`, `deals`, `users`) sit on top of `api_client`.

pub mod access_gate;
pub mod api_client;
pub mod auth;
pub mod authenticator;
pub mod deals;
pub mod list_view;
pub mod metrics;
pub mod query;
pub mod session;
pub mod stage;
pub mod storage;
pub mod users;

pub use access_gate::*;
pub use api_client::*;
pub use auth::*;
pub use authenticator::*;
pub use deals::*;
pub use list_view::*;
pub use metrics::*;
pub use query::*;
pub use session::*;
pub use stage::*;
pub use storage::*;
pub use users::*;

//! Deal Pipeline - a role-gated client for a deal-pipeline tracking API
//!
//! The client keeps a bearer-token session, attaches it to every outbound
//! request, gates screens on authentication and role, and shapes fetched deal
//! and user lists with search, category filters and pagination.
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - Roles, deals, stages, users, screens and request bodies
//! - `services/` - Session storage, request authentication, access gate,
//!   query engine and the API endpoint services
//! - `handlers/` - Screen controllers driving the services
//! - `config/` - Configuration structures and environment loading
//! - `utils/` - Input validation helpers
//! - `errors` - Error taxonomy
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use deal_pipeline::{AppContext, ClientConfig, DealListScreen, LoginScreen, Router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), deal_pipeline::PipelineError> {
//!     let ctx = AppContext::from_config(ClientConfig::from_env(), Arc::new(Router::new()), None)?;
//!     LoginScreen::open(ctx.clone())?.submit("alice", "secret").await?;
//!     let mut deals = DealListScreen::open(ctx)?;
//!     deals.reload().await;
//!     println!("{} deals", deals.view().total_count());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use config::{ApiConfig, ClientConfig, PaginationConfig, SessionConfig};
pub use errors::{AccessDenied, ApiError, PipelineError, StorageError, ValidationError};
pub use handlers::{
    AppContext, DealDetailScreen, DealFormScreen, DealListScreen, LoginScreen, UserFormScreen,
    UserManagementScreen, logout,
};
pub use models::{
    Credential, Deal, DealDraft, DealNote, DealPayload, DealStage, Guard, LoginRequest,
    LoginResponse, NewUser, Role, Screen, User, UserStatus,
};
pub use services::{
    AccessGate, ApiClient, ApiMetrics, CategoryFilter, DealDimension, FileStore, FilterCriteria,
    HttpTransport, KeyValueStore, ListView, MemoryStore, Navigator, PageInfo, RefreshOutcome,
    RequestAuthenticator, Router, SessionStore, UserDimension, group_by_stage, run_query,
};

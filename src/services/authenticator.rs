//! Outbound request decoration with the session's bearer credential.

use crate::services::session::SessionStore;
use reqwest::{
    Request,
    header::{AUTHORIZATION, HeaderValue},
};
use std::future::Future;
use tracing::warn;

/// Attaches `Authorization: Bearer <token>` to outbound requests when a
/// session exists. Performs no I/O and never looks at responses.
#[derive(Debug, Clone)]
pub struct RequestAuthenticator {
    session: SessionStore,
}

impl RequestAuthenticator {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Decorate `request` in place of the caller and hand it back
    pub fn authenticate(&self, mut request: Request) -> Request {
        let Some(token) = self.session.access_token() else {
            return request;
        };

        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(e) => {
                warn!(error = %e, "stored access token is not a valid header value; sending unauthenticated");
            }
        }
        request
    }

    /// Decorate `request` and forward it to `next`
    pub fn intercept<F, Fut, T>(&self, request: Request, next: F) -> Fut
    where
        F: FnOnce(Request) -> Fut,
        Fut: Future<Output = T>,
    {
        next(self.authenticate(request))
    }
}

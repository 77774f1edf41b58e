//! Response interception.
//!
//! # Responsibilities
//! - Wait for the downstream service to commit its response head
//! - Hand out a substitute response whose headers may still change
//! - Pipe the untouched body back into the real response
//!
//! # Design Decisions
//! - One future per request, resolved exactly once
//! - Success and failure are distinct variants, not an error/result pair
//! - The body is never polled here, so nothing reaches the client before
//!   the substitute is piped

use std::future::Future;

use axum::http::{response::Parts, HeaderMap, Response, StatusCode};

/// Outcome of intercepting one response.
#[derive(Debug)]
pub enum Interception<B, E> {
    /// Headers are committed and the body has not been polled.
    Hijacked(Substitute<B>),
    /// The downstream service failed before producing a response.
    Failed(E),
}

impl<B, E> Interception<B, E> {
    /// Restore pass-through: give back exactly what the downstream service
    /// produced, without any modification.
    pub fn unhijack(self) -> Result<Response<B>, E> {
        match self {
            Interception::Hijacked(substitute) => Ok(substitute.pipe()),
            Interception::Failed(err) => Err(err),
        }
    }
}

/// Stand-in for the real response during the deferred-header window.
#[derive(Debug)]
pub struct Substitute<B> {
    parts: Parts,
    body: B,
}

impl<B> Substitute<B> {
    pub fn status(&self) -> StatusCode {
        self.parts.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.parts.headers
    }

    /// Connect the substitute to the real response. The body is forwarded
    /// as-is.
    pub fn pipe(self) -> Response<B> {
        Response::from_parts(self.parts, self.body)
    }
}

impl<B> From<Response<B>> for Substitute<B> {
    fn from(response: Response<B>) -> Self {
        let (parts, body) = response.into_parts();
        Self { parts, body }
    }
}

/// Intercept a pending response.
///
/// Resolves once the downstream service has produced its response head.
pub async fn hijack<F, B, E>(pending: F) -> Interception<B, E>
where
    F: Future<Output = Result<Response<B>, E>>,
{
    match pending.await {
        Ok(response) => Interception::Hijacked(Substitute::from(response)),
        Err(err) => Interception::Failed(err),
    }
}

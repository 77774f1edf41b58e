//! Response header patching middleware.
//!
//! The inner service is called as soon as a request arrives. Once it has
//! committed a response head, the policy runs over the headers and the body
//! is forwarded untouched.

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::{Request as AxumRequest, State},
    http::{Request, Response},
    middleware::Next,
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service, ServiceExt};

use crate::http::intercept::{hijack, Interception};
use crate::patch::{patch, HeaderPolicy};

/// Build a layer that patches every response with `policy`.
pub fn patch_headers(policy: HeaderPolicy) -> PatchHeadersLayer {
    PatchHeadersLayer::new(policy)
}

/// Layer applying [`PatchHeaders`] with a fixed policy.
#[derive(Debug, Clone)]
pub struct PatchHeadersLayer {
    policy: Arc<HeaderPolicy>,
}

impl PatchHeadersLayer {
    pub fn new(policy: HeaderPolicy) -> Self {
        Self::shared(Arc::new(policy))
    }

    /// Build a layer around a policy already shared elsewhere.
    pub fn shared(policy: Arc<HeaderPolicy>) -> Self {
        Self { policy }
    }
}

impl<S> Layer<S> for PatchHeadersLayer {
    type Service = PatchHeaders<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PatchHeaders {
            inner,
            policy: self.policy.clone(),
        }
    }
}

/// Middleware that rewrites response headers according to a [`HeaderPolicy`].
#[derive(Debug, Clone)]
pub struct PatchHeaders<S> {
    inner: S,
    policy: Arc<HeaderPolicy>,
}

impl<S> PatchHeaders<S> {
    pub fn new(inner: S, policy: HeaderPolicy) -> Self {
        PatchHeadersLayer::new(policy).layer(inner)
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for PatchHeaders<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let policy = self.policy.clone();
        // downstream starts now; patching waits for its response head
        let pending = self.inner.call(request);
        Box::pin(async move { finish(&policy, hijack(pending).await) })
    }
}

/// Run one request through `next` and patch its response.
///
/// Direct entry point for callers that do not build a layer. `next` is
/// driven to readiness before the request is handed over.
pub async fn middleware<S, ReqBody, ResBody>(
    policy: &HeaderPolicy,
    request: Request<ReqBody>,
    next: S,
) -> Result<Response<ResBody>, S::Error>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    finish(policy, hijack(next.oneshot(request)).await)
}

/// Same behavior shaped for `axum::middleware::from_fn_with_state`.
pub async fn patch_headers_middleware(
    State(policy): State<Arc<HeaderPolicy>>,
    request: AxumRequest,
    next: Next,
) -> Response<Body> {
    let pending = async move { Ok::<_, Infallible>(next.run(request).await) };
    match finish(&policy, hijack(pending).await) {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

fn finish<B, E>(policy: &HeaderPolicy, interception: Interception<B, E>) -> Result<Response<B>, E> {
    match interception {
        hijacked @ Interception::Hijacked(_) if policy.is_noop() => {
            tracing::trace!("Empty policy, response passed through");
            hijacked.unhijack()
        }
        Interception::Hijacked(mut substitute) => {
            patch(policy, substitute.headers_mut());
            Ok(substitute.pipe())
        }
        failed @ Interception::Failed(_) => {
            tracing::warn!("Response interception failed, headers left unpatched");
            failed.unhijack()
        }
    }
}

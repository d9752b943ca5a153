use std::convert::Infallible;
use std::future::Future;
use std::time::Duration;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::repo::StoreError;

/// Cancellation and deadline scope for the store calls made on behalf of
/// one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Drive `work` to completion unless the context is cancelled or its
    /// deadline passes first. Losing the race drops `work`, which aborts
    /// the underlying query.
    pub async fn run<F, T, E>(&self, work: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, E>>,
        StoreError: From<E>,
    {
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(StoreError::Cancelled),
            () = deadline => Err(StoreError::DeadlineExceeded),
            result = work => result.map_err(StoreError::from),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}

/// Handlers get the context installed by [`attach_request_context`], or a
/// background context when the router runs without that middleware.
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Per-request time budget applied by [`attach_request_context`].
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout(pub Duration);

/// Middleware creating one [`RequestContext`] per request.
///
/// The token is cancelled when this future is dropped, which is what hyper
/// does when the client disconnects mid-request.
pub async fn attach_request_context(
    State(RequestTimeout(timeout)): State<RequestTimeout>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::with_timeout(timeout);
    let _cancel_on_drop = ctx.token().clone().drop_guard();
    request.extensions_mut().insert(ctx);
    next.run(request).await
}

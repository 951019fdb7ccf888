//! Tower middleware that enforces path grants before delegating.

use std::convert::Infallible;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use grants::{Decision, Evaluator, PrefixMatch};
use http::Request;
use http::request::Parts;
use tower::{Layer, Service};
use tracing::{debug, error, warn};

use crate::{HelperError, Helpers, Rejection};

/// Wrap services with the gate, using literal prefix matching.
pub fn file_permissions<H: Helpers>(helpers: H) -> FilePermissionsLayer<H> {
    FilePermissionsLayer::new(helpers)
}

/// [`Layer`] producing [`FilePermissions`] services.
pub struct FilePermissionsLayer<H> {
    helpers: Arc<H>,
    evaluator: Evaluator,
}

impl<H> FilePermissionsLayer<H> {
    pub fn new(helpers: H) -> Self {
        Self::from_arc(Arc::new(helpers))
    }

    /// Share helpers that are already reference counted.
    pub fn from_arc(helpers: Arc<H>) -> Self {
        Self {
            helpers,
            evaluator: Evaluator::default(),
        }
    }

    pub fn with_prefix_match(mut self, prefix_match: PrefixMatch) -> Self {
        self.evaluator = Evaluator::new(prefix_match);
        self
    }
}

impl<H> Clone for FilePermissionsLayer<H> {
    fn clone(&self) -> Self {
        Self {
            helpers: Arc::clone(&self.helpers),
            evaluator: self.evaluator,
        }
    }
}

impl<S, H> Layer<S> for FilePermissionsLayer<H> {
    type Service = FilePermissions<S, H>;

    fn layer(&self, inner: S) -> Self::Service {
        FilePermissions {
            inner,
            helpers: Arc::clone(&self.helpers),
            evaluator: self.evaluator,
        }
    }
}

/// Service that authorizes each request against the caller's grants and
/// either delegates to `inner` or answers with a [`Rejection`].
pub struct FilePermissions<S, H> {
    inner: S,
    helpers: Arc<H>,
    evaluator: Evaluator,
}

impl<S: Clone, H> Clone for FilePermissions<S, H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            helpers: Arc::clone(&self.helpers),
            evaluator: self.evaluator,
        }
    }
}

impl<S, H, B> Service<Request<B>> for FilePermissions<S, H>
where
    S: Service<Request<B>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send + 'static,
    H: Helpers,
    B: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        let helpers = Arc::clone(&self.helpers);
        let evaluator = self.evaluator;

        // Keep the instance that was driven to readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            match authorize(helpers.as_ref(), evaluator, &parts).await {
                Ok(()) => {
                    let response = inner.call(Request::from_parts(parts, body)).await?;
                    Ok(response.into_response())
                }
                Err(rejection) => Ok(rejection.into_response()),
            }
        })
    }
}

/// Run both helpers and the evaluator for one request.
async fn authorize<H: Helpers>(
    helpers: &H,
    evaluator: Evaluator,
    parts: &Parts,
) -> Result<(), Rejection> {
    let grants = match guarded(helpers.user_grants(parts)).await {
        Ok(grants) => grants,
        Err(HelperError::Authorization(err)) => {
            debug!(status = %err.status, message = %err.message, "grant resolution refused");
            return Err(Rejection::Authorization(err));
        }
        Err(HelperError::Internal(cause)) => {
            warn!(error = %cause, "failed to resolve user grants");
            return Err(Rejection::Internal);
        }
    };

    let path = match guarded(helpers.requested_path(parts)).await {
        Ok(path) => path,
        Err(err) => {
            warn!(error = %err, "failed to resolve requested path");
            return Err(Rejection::Internal);
        }
    };

    match evaluator.evaluate(&path, &parts.method, &grants) {
        Decision::Allow => {
            debug!(method = %parts.method, path = %path, "request allowed");
            Ok(())
        }
        Decision::Deny { reason } => {
            debug!(method = %parts.method, path = %path, %reason, "request denied");
            Err(Rejection::Denied)
        }
    }
}

/// Turn a panic inside a helper future into an internal error.
async fn guarded<T>(
    future: impl Future<Output = Result<T, HelperError>>,
) -> Result<T, HelperError> {
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(_) => {
            error!("helper panicked");
            Err(HelperError::internal("helper panicked"))
        }
    }
}

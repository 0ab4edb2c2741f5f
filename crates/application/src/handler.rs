use async_trait::async_trait;

use crate::{DispatchError, Request};

/// Executes exactly one request type.
///
/// Handlers are built once at startup with their collaborators injected and
/// shared across concurrent calls, so they must not keep per-call state.
/// They only ever see requests that already passed authorization.
#[async_trait]
pub trait Handler<R: Request>: Send + Sync {
    async fn handle(&self, request: R) -> Result<R::Output, DispatchError>;
}

#[async_trait]
impl<R, H> Handler<R> for std::sync::Arc<H>
where
    R: Request,
    H: Handler<R> + ?Sized,
{
    async fn handle(&self, request: R) -> Result<R::Output, DispatchError> {
        (**self).handle(request).await
    }
}

use crate::auth::{SessionRegistry, TokenCodec};
use crate::helpers::CookiePolicy;
use crate::middleware::authentication::*;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse},
    Error, HttpMessage, ResponseError,
};
use futures::future::{FutureExt, LocalBoxFuture};
use std::rc::Rc;
use std::sync::Arc;

pub struct GateMiddleware<S> {
    pub(super) service: Rc<S>,
    pub(super) codec: Arc<TokenCodec>,
    pub(super) registry: Arc<SessionRegistry>,
    pub(super) cookies: CookiePolicy,
}

impl<S, B> Service<ServiceRequest> for GateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let outcome = authenticate(&req, &self.cookies.name, &self.codec, &self.registry);

        match outcome {
            Ok(admin) => {
                req.extensions_mut().insert(Arc::new(admin));
                let fut = self.service.call(req);
                async move { fut.await.map(ServiceResponse::map_into_left_body) }.boxed_local()
            }
            Err(err) => {
                tracing::debug!(code = err.code(), path = %req.path(), "Admin request rejected");
                let mut response = err.error_response();
                if err.clears_cookie() {
                    if let Err(cookie_err) = response.add_cookie(&self.cookies.removal()) {
                        tracing::error!("failed to expire session cookie: {cookie_err}");
                    }
                }
                let response = req.into_response(response).map_into_right_body();
                async move { Ok(response) }.boxed_local()
            }
        }
    }
}

use crate::auth::{SessionRegistry, TokenCodec};
use crate::helpers::CookiePolicy;
use crate::middleware::authentication::*;

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};

/// Middleware factory guarding privileged admin routes.
#[derive(Clone)]
pub struct Gate {
    codec: Arc<TokenCodec>,
    registry: Arc<SessionRegistry>,
    cookies: CookiePolicy,
}

impl Gate {
    pub fn new(codec: Arc<TokenCodec>, registry: Arc<SessionRegistry>, cookies: CookiePolicy) -> Self {
        Self {
            codec,
            registry,
            cookies,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Gate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = GateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GateMiddleware {
            service: Rc::new(service),
            codec: self.codec.clone(),
            registry: self.registry.clone(),
            cookies: self.cookies.clone(),
        }))
    }
}

use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, Transform};
use actix_web::{Error as ActixError, HttpMessage};
use serde::{Deserialize, Serialize};

use crate::context::UserInfo;
use crate::core::ports::tokener::{Payload, Tokener};
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;

pub static JWT_TOKEN: &str = "JWT_TOKEN";
pub static JWT_SECRET: &str = "JWT_SECRET";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claim {
    pub user: String,
    pub exp: i64,
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }
}

/// Resolves the caller identity from a bearer token (or the login cookie)
/// and stashes it in request extensions for the `UserInfo` extractor.
pub struct JWTMiddleware {
    secret: Vec<u8>,
}

impl JWTMiddleware {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S> Transform<S, ServiceRequest> for JWTMiddleware
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<ActixError>,
{
    type Response = S::Response;
    type Error = ActixError;
    type Transform = JWTService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JWTService {
            tokener: JWT::new(self.secret.clone()),
            next_service: service,
        }))
    }
}

pub struct JWTService<S> {
    tokener: JWT,
    next_service: S,
}

impl<S> JWTService<S> {
    fn token_of(&self, req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(|h| h.strip_prefix("Bearer ").unwrap_or(h).to_owned())
            .or_else(|| req.cookie(JWT_TOKEN).map(|c| c.value().to_owned()))
    }
}

impl<S> Service<ServiceRequest> for JWTService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<ActixError>,
{
    type Response = S::Response;
    type Error = ActixError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = match self.token_of(&req) {
            Some(token) => token,
            None => return Box::pin(async { Err(Error::Unauthenticated("no token on request".into()).into()) }),
        };
        let claim: Claim = match self.tokener.verify_token(&token) {
            Ok(claim) => claim,
            Err(e) => return Box::pin(async move { Err(Error::Unauthenticated(e.to_string()).into()) }),
        };
        match claim.user.parse::<i32>() {
            Ok(id) => {
                req.extensions_mut().insert(UserInfo { id });
            }
            Err(e) => return Box::pin(async move { Err(Error::Unauthenticated(e.to_string()).into()) }),
        }
        let res_fut = self.next_service.call(req);
        Box::pin(async move { res_fut.await.map_err(|e| e.into()) })
    }
}

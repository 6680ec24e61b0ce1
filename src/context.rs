use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpMessage};

use crate::error::Error;

/// Identity of the authenticated caller, inserted into request extensions by
/// the JWT middleware.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: i32,
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(user) = req.extensions().get::<Self>() {
            ready(Ok(user.clone()))
        } else {
            ready(Err(Error::Unauthenticated("no identity on request".into())))
        }
    }
}

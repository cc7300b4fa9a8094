use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::http::header::HeaderValue;
use actix_web::web;
use std::future::Ready;
use tsk_core::ID;

/// Extractor for authenticated requests.
/// Validates the bearer token; there is no server-side session to consult.
pub struct Auth(pub Claims);

impl Auth {
    pub fn claims(&self) -> &Claims {
        &self.0
    }
    pub fn user(&self) -> ID<Member> {
        self.0.user()
    }
}

/// `Bearer <token>`, split on a single space into exactly two parts.
fn bearer(header: &HeaderValue) -> Option<&str> {
    match header.to_str().ok()?.split(' ').collect::<Vec<&str>>().as_slice() {
        ["Bearer", token] => Some(*token),
        _ => None,
    }
}

fn authenticate(req: &HttpRequest) -> Result<Auth, actix_web::Error> {
    let crypto = req.app_data::<web::Data<Crypto>>().ok_or_else(|| {
        actix_web::error::ErrorInternalServerError("token service not configured")
    })?;
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| actix_web::error::ErrorUnauthorized("missing token"))?;
    let token = bearer(header)
        .ok_or_else(|| actix_web::error::ErrorUnauthorized("invalid token format"))?;
    crypto
        .validate(token)
        .map(Auth)
        .inspect_err(|e| log::debug!("rejected bearer token for {}: {}", req.path(), e))
        .map_err(|_| actix_web::error::ErrorUnauthorized("invalid token"))
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        std::future::ready(authenticate(req))
    }
}

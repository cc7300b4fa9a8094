use super::*;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

pub async fn register(
    db: web::Data<Arc<Client>>,
    params: web::Data<Params>,
    req: web::Json<RegisterRequest>,
) -> impl Responder {
    match account::register(db.get_ref(), &params, req.into_inner()).await {
        Ok(ref member) => HttpResponse::Created().json(UserInfo::from(member)),
        Err(AuthError::UserAlreadyExists) => HttpResponse::Conflict().body("user already exists"),
        Err(e) => {
            log::error!("registration failed: {}", e);
            HttpResponse::InternalServerError().body("failed to create user")
        }
    }
}

pub async fn login(
    db: web::Data<Arc<Client>>,
    crypto: web::Data<Crypto>,
    params: web::Data<Params>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    let req = req.into_inner();
    let email = req.email.clone();
    match account::login(db.get_ref(), &crypto, &params, req).await {
        Ok(access) => HttpResponse::Ok().json(TokenResponse { access }),
        Err(AuthError::UserNotFound | AuthError::InvalidCredentials) => {
            HttpResponse::Unauthorized().body("invalid email or password")
        }
        Err(AuthError::Password(e @ PasswordError::InvalidRecordFormat { .. })) => {
            log::error!("stored credential for {} is unreadable: {}", email, e);
            HttpResponse::Unauthorized().body("invalid email or password")
        }
        Err(e) => {
            log::error!("login failed: {}", e);
            HttpResponse::InternalServerError().body("failed to login")
        }
    }
}

pub async fn me(db: web::Data<Arc<Client>>, auth: Auth) -> impl Responder {
    match db.get_ref().member(auth.user()).await {
        Ok(Some(ref member)) => HttpResponse::Ok().json(UserInfo::from(member)),
        Ok(None) => HttpResponse::NotFound().body("user not found"),
        Err(e) => {
            log::error!("user lookup failed: {}", e);
            HttpResponse::InternalServerError().body("failed to load user")
        }
    }
}

/// Mounts the account routes under the caller's scope.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/me", web::get().to(me));
}

pub mod survey;

use std::ops::Add;

use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::{Cookie, CookieBuilder};
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use hex::ToHex;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::core::models::user::Insert as UserInsert;
use crate::core::ports::repository::UserCommon;
use crate::core::ports::tokener::Tokener;
use crate::database::sqlx::PgSqlx;
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use crate::middlewares::jwt::{Claim, JWT_SECRET, JWT_TOKEN};

fn hash_password(pass: &str, slt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pass);
    hasher.update(slt);
    hasher.finalize().encode_hex()
}

fn random_salt() -> String {
    thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn login(Json(Login { email, password }): Json<Login>, db: Data<PgPool>) -> Result<HttpResponse, Error> {
    let mut store = PgSqlx::new(db.acquire().await?);
    let user = UserCommon::get_by_email(&mut store, &email)
        .await?
        .ok_or(Error::InvalidCredentials)?;
    if hash_password(&password, &user.salt) != user.password {
        return Err(Error::InvalidCredentials);
    }
    let claim = Claim {
        user: user.id.to_string(),
        exp: chrono::Utc::now().add(chrono::Duration::days(30)).timestamp(),
    };
    let secret = dotenv::var(JWT_SECRET)?;
    let token = JWT::new(secret.into_bytes()).gen_token(&claim)?;
    Ok(HttpResponse::Ok()
        .cookie(Cookie::new(JWT_TOKEN, token.clone()))
        .json(TokenResponse { token }))
}

#[derive(Debug, Deserialize)]
pub struct Signup {
    pub nickname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub id: i32,
}

pub async fn signup(Json(Signup { nickname, email, password }): Json<Signup>, db: Data<PgPool>) -> Result<Json<SignupResponse>, Error> {
    let mut store = PgSqlx::new(db.acquire().await?);
    let salt = random_salt();
    let id = UserCommon::insert(
        &mut store,
        UserInsert {
            nickname,
            email,
            password: hash_password(&password, &salt),
            salt,
        },
    )
    .await?;
    Ok(Json(SignupResponse { id }))
}

pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(CookieBuilder::new(JWT_TOKEN, "").expires(OffsetDateTime::now_utc()).finish())
        .finish()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_hash_password_depends_on_salt() {
        let a = hash_password("secret", "salt-a");
        let b = hash_password("secret", "salt-b");
        assert_ne!(a, b);
        assert_eq!(a, hash_password("secret", "salt-a"));
    }

    #[test]
    fn test_random_salt_length() {
        let salt = random_salt();
        assert_eq!(salt.len(), 32);
        assert_ne!(salt, random_salt());
    }
}

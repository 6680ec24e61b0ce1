use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub nickname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub salt: String,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub nickname: String,
    pub email: String,
    pub password: String,
    pub salt: String,
}

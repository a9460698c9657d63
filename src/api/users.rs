//! User endpoints: login plus the admin user-management screen.
//!
//! Plain functions over a shared [`ApiClient`] — no per-resource client
//! types; nothing here depends on anything but the dispatcher.

use serde::Serialize;
use serde_json::json;

use super::{ApiClient, ApiError, DataResponse};

/// Registration payload for `user/register_user`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Exchange credentials for a session token.
///
/// On success the envelope's `data` carries `token`, `currentUser` and
/// `expire_in`; [`crate::session::SessionManager::login`] interprets it.
pub async fn login(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<DataResponse, ApiError> {
    client
        .post(
            "user/login",
            &json!({ "email": email, "password": password }),
            false,
        )
        .await
}

pub async fn get_all(client: &ApiClient) -> Result<DataResponse, ApiError> {
    client.get("user/get_all", false).await
}

pub async fn register(client: &ApiClient, user: &NewUser) -> Result<DataResponse, ApiError> {
    client.post("user/register_user", user, false).await
}

pub async fn update(
    client: &ApiClient,
    id: i64,
    name: &str,
    email: &str,
    is_admin: bool,
) -> Result<DataResponse, ApiError> {
    client
        .post(
            "user/update",
            &json!({ "id": id, "name": name, "email": email, "isAdmin": is_admin }),
            false,
        )
        .await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<DataResponse, ApiError> {
    client.post("user/delete", &json!({ "id": id }), false).await
}

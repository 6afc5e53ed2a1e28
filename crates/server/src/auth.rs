//! Login, logout and current user endpoints.

use api_types::auth::{LoginRequest, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use engine::User;

use crate::{
    ServerError,
    server::{SESSION_COOKIE, ServerState},
};

fn view(user: User) -> UserView {
    UserView {
        username: user.username,
    }
}

/// Check the credentials and hand out a session cookie.
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<UserView>), ServerError> {
    let session = state
        .engine
        .login(&payload.username, &payload.password, state.session_ttl)
        .await?;

    let cookie = Cookie::build((SESSION_COOKIE, session.token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax);
    let user = UserView {
        username: session.username,
    };

    Ok((jar.add(cookie), Json(user)))
}

/// Close the caller's session, if any, and clear the cookie.
pub async fn logout(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ServerError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.engine.logout(cookie.value()).await?;
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, StatusCode::NO_CONTENT))
}

pub async fn me(Extension(user): Extension<User>) -> Json<UserView> {
    Json(view(user))
}

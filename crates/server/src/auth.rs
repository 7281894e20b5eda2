//! Login, logout and password endpoints.

use api_types::{
    Success,
    auth::{ChangePassword, Login, LoginResponse},
    user::UserView,
};
use axum::{Extension, Json, extract::State};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use engine::EngineError;

use crate::{
    ServerError,
    server::{Caller, SESSION_COOKIE, ServerState},
    users::user_view,
};

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(payload): Json<Login>,
) -> Result<(CookieJar, Json<LoginResponse>), ServerError> {
    let session = state
        .engine
        .login(&payload.username, &payload.password)
        .await?;

    let jar = jar.add(session_cookie(session.token, state.secure_cookies));
    Ok((
        jar,
        Json(LoginResponse {
            success: true,
            user: user_view(session.user),
        }),
    ))
}

/// Close the session behind the cookie, if any. Always succeeds.
pub async fn logout(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Success>), ServerError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.engine.logout(cookie.value()).await?;
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Json(Success::ok())))
}

/// The current user, or `null` for anonymous callers.
pub async fn me(
    State(state): State<ServerState>,
    jar: CookieJar,
) -> Result<Json<Option<UserView>>, ServerError> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(Json(None));
    };
    match state.engine.authenticate(cookie.value()).await {
        Ok(user) => Ok(Json(Some(user_view(user)))),
        Err(EngineError::Unauthorized(_)) => Ok(Json(None)),
        Err(err) => Err(err.into()),
    }
}

pub async fn change_password(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
    Json(payload): Json<ChangePassword>,
) -> Result<Json<Success>, ServerError> {
    state
        .engine
        .change_password(
            &caller.user,
            &payload.current_password,
            &payload.new_password,
            Some(&caller.token),
        )
        .await?;
    Ok(Json(Success::ok()))
}

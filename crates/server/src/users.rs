use api_types::user::UserView;
use axum::{Extension, Json, extract::State};
use engine::User;

use crate::{
    ServerError,
    server::{Caller, ServerState},
};

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        name: user.name,
        role: user.role,
        last_signed_in: user.last_signed_in,
    }
}

/// Every user ordered by name (admin only).
pub async fn list(
    Extension(caller): Extension<Caller>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<UserView>>, ServerError> {
    let users = state.engine.list_users(&caller.user).await?;
    Ok(Json(users.into_iter().map(user_view).collect()))
}

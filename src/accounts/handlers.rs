use axum::{
    extract::{Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    accounts::{
        dto::{
            AuthenticationRequest, AuthenticationResponse, SaveUserDetailRequest,
            SuccessResponse, UpdateUserNameRequest, UserDetailsRequest, UserDetailsResponse,
        },
        errors::AccountError,
        services::AccountService,
    },
    state::AppState,
};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/users/authenticate", post(authenticate_user))
        .route(
            "/users/details",
            get(get_user_details).put(save_user_details),
        )
        .route("/users/name", patch(update_user_name))
}

#[instrument(skip_all)]
pub async fn authenticate_user(
    State(accounts): State<AccountService>,
    Json(payload): Json<AuthenticationRequest>,
) -> Result<Json<AuthenticationResponse>, AccountError> {
    let token = accounts
        .register(&payload.username, &payload.password)
        .await?;
    Ok(Json(AuthenticationResponse { token }))
}

#[instrument(skip_all)]
pub async fn get_user_details(
    State(accounts): State<AccountService>,
    Query(req): Query<UserDetailsRequest>,
) -> Result<Json<UserDetailsResponse>, AccountError> {
    let profile = accounts.get_profile(&req.token).await?;
    Ok(Json(UserDetailsResponse {
        name: profile.name,
        age: profile.age,
    }))
}

#[instrument(skip_all)]
pub async fn save_user_details(
    State(accounts): State<AccountService>,
    Json(payload): Json<SaveUserDetailRequest>,
) -> Result<Json<SuccessResponse>, AccountError> {
    accounts
        .save_profile(&payload.token, &payload.name, payload.age)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

#[instrument(skip_all)]
pub async fn update_user_name(
    State(accounts): State<AccountService>,
    Json(payload): Json<UpdateUserNameRequest>,
) -> Result<Json<SuccessResponse>, AccountError> {
    accounts
        .update_name(&payload.token, &payload.new_name)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

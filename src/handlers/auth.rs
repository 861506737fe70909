// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{
        AuthResponse, LoginUserPayload, RegisterUserPayload, User, VerifyOtpPayload,
    },
};

// Handler de registro: cria o usuário e dispara o OTP por e-mail.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado, aguardando verificação", body = User),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state
        .auth_service
        .register_user(&payload.email, &payload.full_name, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// Confirmação do código OTP: devolve o primeiro token.
#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    tag = "Auth",
    request_body = VerifyOtpPayload,
    responses(
        (status = 200, description = "E-mail verificado", body = AuthResponse),
        (status = 422, description = "Código inválido ou expirado")
    )
)]
pub async fn verify_otp(
    State(app_state): State<AppState>,
    Json(payload): Json<VerifyOtpPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .verify_otp(&payload.email, &payload.code)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Autenticado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses((status = 200, description = "Perfil do usuário", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

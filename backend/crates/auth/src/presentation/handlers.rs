//! HTTP Handlers
//!
//! Every response body is a JSend envelope. Errors render through
//! [`AuthError`]'s `IntoResponse`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use kernel::response::JSend;

use crate::application::{AuthService, AuthenticatedUser, SignInInput, SignUpInput};
use crate::domain::repository::{RevocationRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    EmailRequest, LoginRequest, PasswordRequest, PublicIdBody, RegisterRequest, RegisterResponse,
    TokenResponse, UpdatedResponse, UserResponse, UserSummary, UsersResponse,
};

/// Raw `Authorization` value, if the header is present
fn authorization(headers: &HeaderMap) -> AuthResult<Option<&str>> {
    headers
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| AuthError::MalformedAuthorization))
        .transpose()
}

// ============================================================================
// Users
// ============================================================================

/// POST /users
///
/// 認証ヘッダーは任意。管理者作成時のみ意味を持つ。
pub async fn register<R>(
    State(service): State<AuthService<R>>,
    headers: HeaderMap,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let caller = match authorization(&headers)? {
        Some(value) => Some(service.check_session(Some(value)).await?),
        None => None,
    };

    let input = SignUpInput {
        email: req.email,
        user_name: req.username,
        password: req.password,
        admin: req.admin,
    };

    let output = service.register(input, caller.as_ref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(JSend::success(RegisterResponse {
            user: PublicIdBody {
                public_id: output.public_id,
            },
        })),
    ))
}

/// GET /users
pub async fn list_users<R>(
    State(service): State<AuthService<R>>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    let users = service.list_users(&caller).await?;

    Ok(Json(JSend::success(UsersResponse {
        users: users.iter().map(UserSummary::from).collect(),
    })))
}

/// GET /users/{public_id}
pub async fn get_user<R>(
    State(service): State<AuthService<R>>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(public_id): Path<String>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    let user = service.get_user(&caller, &public_id).await?;

    Ok(Json(JSend::success(UserResponse {
        user: UserSummary::from(&user),
    })))
}

/// POST /users/email
pub async fn change_email<R>(
    State(service): State<AuthService<R>>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;
    service.change_email(&caller, &req.email).await?;

    Ok(Json(JSend::success(UpdatedResponse {
        updated: "Email updated".to_string(),
    })))
}

// ============================================================================
// Session
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(service): State<AuthService<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let output = service
        .login(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(JSend::success(TokenResponse {
        token: output.session_token,
    })))
}

/// POST /auth/logout
pub async fn logout<R>(
    State(service): State<AuthService<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    service.logout(authorization(&headers)?).await?;
    Ok(Json(JSend::empty()))
}

// ============================================================================
// Email confirmation / password
// ============================================================================

/// POST /auth/confirm/{token}
pub async fn confirm_email<R>(
    State(service): State<AuthService<R>>,
    Path(token): Path<String>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    service.confirm_email(&token).await?;
    Ok(Json(JSend::empty()))
}

/// POST /auth/reset/request
pub async fn request_password_reset<R>(
    State(service): State<AuthService<R>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;
    service.request_password_reset(&req.email).await?;
    Ok(Json(JSend::empty()))
}

/// POST /auth/reset/{token}
pub async fn reset_password<R>(
    State(service): State<AuthService<R>>,
    Path(token): Path<String>,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;
    service.reset_password(&token, req.password).await?;
    Ok(Json(JSend::empty()))
}

/// POST /auth/change
pub async fn change_password<R>(
    State(service): State<AuthService<R>>,
    Extension(caller): Extension<AuthenticatedUser>,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;
    service.change_password(&caller, req.password).await?;
    Ok(Json(JSend::empty()))
}

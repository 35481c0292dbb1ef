//! Auth Router

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::{AuthContext, AuthService};
use crate::domain::repository::{RevocationRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers;
use crate::presentation::middleware::require_session;

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, ctx: AuthContext) -> Router {
    auth_router_generic(AuthService::new(Arc::new(repo), Arc::new(ctx)))
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(service: AuthService<R>) -> Router
where
    R: UserRepository + RevocationRepository + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/users", get(handlers::list_users::<R>))
        .route("/users/email", post(handlers::change_email::<R>))
        .route("/users/{public_id}", get(handlers::get_user::<R>))
        .route("/auth/change", post(handlers::change_password::<R>))
        .route_layer(middleware::from_fn_with_state(
            service.clone(),
            require_session::<R>,
        ));

    // logout and register read the Authorization header themselves
    let public = Router::new()
        .route("/users", post(handlers::register::<R>))
        .route("/auth/login", post(handlers::login::<R>))
        .route("/auth/logout", post(handlers::logout::<R>))
        .route("/auth/confirm/{token}", post(handlers::confirm_email::<R>))
        .route("/auth/reset/request", post(handlers::request_password_reset::<R>))
        .route("/auth/reset/{token}", post(handlers::reset_password::<R>));

    public.merge(protected).with_state(service)
}

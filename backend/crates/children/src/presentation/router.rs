//! Children Routers

use axum::middleware::from_fn_with_state;
use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use auth::TokenCodec;
use auth::middleware::{AuthMiddlewareState, require_auth};

use crate::domain::repository::ChildrenRepository;
use crate::infra::postgres::PgChildrenRepository;
use crate::presentation::handlers::{self, ChildrenAppState};

/// Create the children router (bulk-onboard, link, list, update)
pub fn children_router(repo: PgChildrenRepository, codec: Arc<TokenCodec>) -> Router {
    children_router_generic(repo, codec)
}

/// Create the admin router (company lookup)
pub fn admin_router(repo: PgChildrenRepository, codec: Arc<TokenCodec>) -> Router {
    admin_router_generic(repo, codec)
}

/// Generic children router for any repository implementation
pub fn children_router_generic<C>(repo: C, codec: Arc<TokenCodec>) -> Router
where
    C: ChildrenRepository + Clone + Send + Sync + 'static,
{
    let state = ChildrenAppState {
        repo: Arc::new(repo),
    };
    let auth_state = AuthMiddlewareState { codec };

    Router::new()
        .route("/bulk-onboard", post(handlers::bulk_onboard::<C>))
        .route("/link", post(handlers::link::<C>))
        .route("/parent/{parent_id}", get(handlers::children_of_parent::<C>))
        .route("/{id}", patch(handlers::update_child::<C>))
        .layer(from_fn_with_state(auth_state, require_auth))
        .with_state(state)
}

/// Generic admin router for any repository implementation
pub fn admin_router_generic<C>(repo: C, codec: Arc<TokenCodec>) -> Router
where
    C: ChildrenRepository + Clone + Send + Sync + 'static,
{
    let state = ChildrenAppState {
        repo: Arc::new(repo),
    };
    let auth_state = AuthMiddlewareState { codec };

    Router::new()
        .route("/company/{id}", get(handlers::get_company::<C>))
        .layer(from_fn_with_state(auth_state, require_auth))
        .with_state(state)
}

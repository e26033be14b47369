//! HTTP Handlers
//!
//! All routes here sit behind the auth crate's `require_auth` middleware,
//! which deposits verified [`Claims`] in request extensions. Guards are
//! applied per endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;
use uuid::Uuid;

use auth::application::guard::{require_company, require_role, require_self};
use auth::domain::value_object::user_role::UserRole;
use auth::{AuthError, Claims};
use kernel::id::{ChildId, CompanyId, UserId};

use crate::application::{
    BulkOnboardUseCase, ChildInput, ChildPatch, ChildrenQueryUseCase, LinkChildUseCase,
    UpdateChildUseCase,
};
use crate::domain::repository::ChildrenRepository;
use crate::error::{ChildrenError, ChildrenResult};
use crate::presentation::dto::{
    BulkOnboardRequest, BulkOnboardResponse, ChildDto, CompanyDto, LinkRequest, LinkResponse,
    UpdateChildRequest,
};

/// Shared state for children handlers
#[derive(Clone)]
pub struct ChildrenAppState<C>
where
    C: ChildrenRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<C>,
}

// ============================================================================
// Bulk Onboard
// ============================================================================

/// POST /children/bulk-onboard
pub async fn bulk_onboard<C>(
    State(state): State<ChildrenAppState<C>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BulkOnboardRequest>,
) -> ChildrenResult<(StatusCode, Json<BulkOnboardResponse>)>
where
    C: ChildrenRepository + Clone + Send + Sync + 'static,
{
    require_role(&claims, &[UserRole::CompanyAdmin])?;
    let company_id = claims
        .company_id
        .map(CompanyId::from_uuid)
        .ok_or(ChildrenError::Auth(AuthError::Forbidden))?;

    let inputs: Vec<ChildInput> = req
        .children
        .into_iter()
        .map(|c| ChildInput {
            first_name: c.first_name,
            last_name: c.last_name,
            dob: c.dob,
            gender: c.gender,
            grade: c.grade,
        })
        .collect();

    let use_case = BulkOnboardUseCase::new(state.repo.clone());
    let children = use_case.execute(company_id, inputs).await?;

    Ok((
        StatusCode::CREATED,
        Json(BulkOnboardResponse {
            children: children.iter().map(ChildDto::from).collect(),
        }),
    ))
}

// ============================================================================
// Link
// ============================================================================

/// POST /children/link
pub async fn link<C>(
    State(state): State<ChildrenAppState<C>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<LinkRequest>,
) -> ChildrenResult<Json<LinkResponse>>
where
    C: ChildrenRepository + Clone + Send + Sync + 'static,
{
    require_role(&claims, &[UserRole::Parent])?;

    let use_case = LinkChildUseCase::new(state.repo.clone());
    let output = use_case
        .execute(UserId::from_uuid(claims.sub), &req.unique_code)
        .await?;

    Ok(Json(LinkResponse::from(&output.link)))
}

// ============================================================================
// Parent's Children
// ============================================================================

/// GET /children/parent/{parent_id}
pub async fn children_of_parent<C>(
    State(state): State<ChildrenAppState<C>>,
    Extension(claims): Extension<Claims>,
    Path(parent_id): Path<Uuid>,
) -> ChildrenResult<Json<Vec<ChildDto>>>
where
    C: ChildrenRepository + Clone + Send + Sync + 'static,
{
    require_role(&claims, &[UserRole::Parent, UserRole::PlatformAdmin])?;
    require_self(&claims, parent_id)?;

    let use_case = ChildrenQueryUseCase::new(state.repo.clone());
    let children = use_case
        .children_of_parent(&UserId::from_uuid(parent_id))
        .await?;

    Ok(Json(children.iter().map(ChildDto::from).collect()))
}

// ============================================================================
// Update Child
// ============================================================================

/// PATCH /children/{id}
pub async fn update_child<C>(
    State(state): State<ChildrenAppState<C>>,
    Extension(claims): Extension<Claims>,
    Path(child_id): Path<Uuid>,
    Json(req): Json<UpdateChildRequest>,
) -> ChildrenResult<Json<ChildDto>>
where
    C: ChildrenRepository + Clone + Send + Sync + 'static,
{
    require_role(&claims, &[UserRole::Parent, UserRole::PlatformAdmin])?;

    let patch = ChildPatch {
        first_name: req.first_name,
        last_name: req.last_name,
        dob: req.dob,
        gender: req.gender,
        grade: req.grade,
    };

    let use_case = UpdateChildUseCase::new(state.repo.clone());
    let child = use_case
        .execute(
            UserId::from_uuid(claims.sub),
            ChildId::from_uuid(child_id),
            patch,
            claims.role.is_platform_admin(),
        )
        .await?;

    Ok(Json(ChildDto::from(&child)))
}

// ============================================================================
// Company (admin surface)
// ============================================================================

/// GET /admin/company/{id}
pub async fn get_company<C>(
    State(state): State<ChildrenAppState<C>>,
    Extension(claims): Extension<Claims>,
    Path(company_id): Path<Uuid>,
) -> ChildrenResult<Json<CompanyDto>>
where
    C: ChildrenRepository + Clone + Send + Sync + 'static,
{
    require_role(&claims, &[UserRole::CompanyAdmin, UserRole::PlatformAdmin])?;
    require_company(&claims, company_id)?;

    let use_case = ChildrenQueryUseCase::new(state.repo.clone());
    let company = use_case.company(&CompanyId::from_uuid(company_id)).await?;

    Ok(Json(CompanyDto::from(&company)))
}

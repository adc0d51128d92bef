//! 역할과 소유권에 따른 접근 범위.
//!
//! 관리자는 모든 프로젝트에 접근합니다. 고객은 자신에게 연결된 고객 레코드의
//! 프로젝트에만 접근합니다.

use portfolio_core::{Client, Permission, Project};

use crate::auth::Identity;
use crate::repository::{Storage, StoreError};

/// 접근 범위 결정 에러.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// 계정에 연결된 고객 레코드가 없음 (계정 설정 오류)
    #[error("No client record for user")]
    NoClientRecord,

    #[error("Project not found")]
    ProjectNotFound(i32),

    #[error("Access denied to project {0}")]
    NotOwner(i32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 호출자에게 연결된 고객 레코드를 찾습니다.
pub async fn client_for_identity(
    storage: &dyn Storage,
    identity: &Identity,
) -> Result<Client, AccessError> {
    storage
        .get_client_by_user(identity.id)
        .await?
        .ok_or(AccessError::NoClientRecord)
}

/// 호출자가 볼 수 있는 프로젝트 목록.
///
/// 연결된 고객이 없는 고객 계정은 빈 목록이 아니라 `NoClientRecord`입니다.
pub async fn visible_projects(
    storage: &dyn Storage,
    identity: &Identity,
) -> Result<Vec<Project>, AccessError> {
    if identity.has_permission(Permission::ViewAllProjects) {
        return Ok(storage.list_projects().await?);
    }

    let client = client_for_identity(storage, identity).await?;
    Ok(storage.list_projects_by_client(client.id).await?)
}

/// 프로젝트 접근 권한을 확인하고 프로젝트를 반환합니다.
pub async fn authorize_project(
    storage: &dyn Storage,
    identity: &Identity,
    project_id: i32,
) -> Result<Project, AccessError> {
    let project = storage
        .get_project(project_id)
        .await?
        .ok_or(AccessError::ProjectNotFound(project_id))?;

    if identity.has_permission(Permission::ViewAllProjects) {
        return Ok(project);
    }

    let owner = storage.get_client(project.client_id).await?;
    match owner {
        Some(client) if client.is_linked_to(identity.id) => Ok(project),
        _ => {
            tracing::warn!(
                user_id = identity.id,
                project_id,
                "Project access denied"
            );
            Err(AccessError::NotOwner(project_id))
        }
    }
}

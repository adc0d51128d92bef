//! GitHub 저장소 목록 passthrough.
//!
//! `GET /api/github/repos` - 설정된 사용자의 공개 저장소 (포크 제외, 최근 갱신순).

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use tracing::warn;

use super::types::GithubRepo;
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// GitHub REST API 응답 중 사용하는 필드.
#[derive(Debug, Deserialize)]
struct UpstreamRepo {
    name: String,
    description: Option<String>,
    html_url: String,
    homepage: Option<String>,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u32,
    #[serde(default)]
    forks_count: u32,
    #[serde(default)]
    topics: Vec<String>,
    updated_at: Option<String>,
    #[serde(default)]
    fork: bool,
}

impl From<UpstreamRepo> for GithubRepo {
    fn from(repo: UpstreamRepo) -> Self {
        GithubRepo {
            name: repo.name,
            description: repo.description,
            html_url: repo.html_url,
            homepage: repo.homepage.filter(|h| !h.is_empty()),
            language: repo.language,
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count,
            topics: repo.topics,
            updated_at: repo.updated_at,
        }
    }
}

/// 공개 저장소 목록.
#[utoipa::path(
    get,
    path = "/api/github/repos",
    responses(
        (status = 200, description = "저장소 목록", body = [GithubRepo]),
        (status = 404, description = "GitHub 사용자 미설정", body = ApiErrorResponse),
        (status = 502, description = "GitHub API 실패", body = ApiErrorResponse)
    ),
    tag = "public"
)]
pub async fn list_repos(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<GithubRepo>>> {
    let username = state
        .github
        .username
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::not_found("GitHub integration is not configured"))?;

    let url = format!(
        "{}/users/{}/repos",
        state.github.api_base.trim_end_matches('/'),
        username
    );

    let response = state
        .http
        .get(&url)
        .header("Accept", "application/vnd.github+json")
        .query(&[("sort", "updated"), ("per_page", "100")])
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "GitHub request failed");
            ApiError::Upstream("Failed to reach GitHub".to_string())
        })?;

    if !response.status().is_success() {
        warn!(status = %response.status(), username, "GitHub returned an error");
        return Err(ApiError::Upstream(format!(
            "GitHub responded with status {}",
            response.status().as_u16()
        )));
    }

    let repos: Vec<UpstreamRepo> = response.json().await.map_err(|e| {
        warn!(error = %e, "Unexpected GitHub response body");
        ApiError::Upstream("Unexpected response from GitHub".to_string())
    })?;

    Ok(Json(
        repos
            .into_iter()
            .filter(|r| !r.fork)
            .map(GithubRepo::from)
            .collect(),
    ))
}

/// GitHub 라우터.
pub fn github_router() -> Router<Arc<AppState>> {
    Router::new().route("/github/repos", get(list_repos))
}

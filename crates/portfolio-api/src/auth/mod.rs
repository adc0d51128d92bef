//! 인증 및 권한 부여.
//!
//! JWT 기반 인증 및 역할 기반 접근 제어(RBAC)를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenService`]: 토큰 발급/검증
//! - [`require_auth`]: 토큰을 검증하고 요청 확장에 [`Identity`]를 넣는 미들웨어
//! - [`AuthUser`], [`AdminAuth`]: Axum 추출기
//! - 비밀번호 해싱 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(AuthUser(identity): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", identity.username)
//! }
//! ```

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, Identity, JwtError, TokenService};
pub use middleware::{
    bearer_token, require_auth, require_permission, require_role, AdminAuth, AuthUser,
    JwtAuthError,
};
pub use password::{hash_password, validate_password_strength, verify_password, PasswordError};
pub use portfolio_core::{Permission, Role};

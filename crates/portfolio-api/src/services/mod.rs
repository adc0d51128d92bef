//! 핸들러가 조합하는 도메인 서비스.
//!
//! - [`accounts`]: 로그인, 계정 생성, 관리자 부트스트랩
//! - [`access`]: 역할/소유권 기반 접근 범위 결정

pub mod access;
pub mod accounts;

pub use access::{authorize_project, client_for_identity, visible_projects, AccessError};
pub use accounts::{
    bootstrap_admin, login, register_client_account, register_user, AccountError,
    BootstrapOutcome, LoginOutcome, NewAccount,
};

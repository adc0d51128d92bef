//! JWT 토큰 처리.
//!
//! 세션 토큰 발급/검증 로직. 갱신 토큰은 없습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use portfolio_core::{Permission, Role, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    pub id: i32,
    /// 사용자 이름
    pub username: String,
    /// 사용자 역할
    pub role: Role,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 사용자에 대한 Claims 생성.
    pub fn for_user(user: &User, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// 검증된 요청자 신원.
///
/// `require_auth` 미들웨어가 요청 확장에 넣고 핸들러가 꺼내 씁니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// 특정 권한을 가지는지 확인.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.has_permission(permission)
    }
}

/// JWT 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    /// 디코딩/서명/만료 실패는 구분하지 않습니다.
    #[error("Invalid or expired token")]
    InvalidOrExpired,
}

/// 토큰 발급/검증 서비스 (HS256).
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_days", &self.ttl.num_days())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// # Arguments
    ///
    /// * `secret` - 서명 키
    /// * `ttl_days` - 토큰 유효 기간 (일)
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        // 만료 시각이 지나면 즉시 거부
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::days(ttl_days),
        }
    }

    /// 토큰 유효 기간 (초).
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// 사용자에 대한 토큰 발급.
    pub fn issue(&self, user: &User) -> Result<String, JwtError> {
        self.encode(&Claims::for_user(user, self.ttl))
    }

    /// Claims를 그대로 서명합니다.
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding).map_err(JwtError::from)
    }

    /// 토큰 검증.
    ///
    /// 서명이나 만료 검증에 실패하면 `InvalidOrExpired`를 반환합니다.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| JwtError::InvalidOrExpired)
    }
}

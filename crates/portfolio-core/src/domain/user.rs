//! 로그인 계정 (자격증명 저장소 레코드).

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Role;

/// 저장된 사용자.
///
/// `password_hash`는 직렬화되지 않으므로 응답에 그대로 실어도 해시가 노출되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Argon2 PHC 문자열
    #[serde(skip_serializing)]
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "password"))]
    pub password_hash: String,
    #[cfg_attr(feature = "sqlx-support", sqlx(try_from = "String"))]
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// 사용자 생성 입력. 비밀번호는 호출자가 미리 해시해야 합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: 1,
            username: "admin".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            role: Role::Admin,
            is_active: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "admin");
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn test_new_user_is_active() {
        let user = NewUser::new("jane", "hash", Role::Client);
        assert!(user.is_active);
        assert_eq!(user.role, Role::Client);
    }
}

//! 계정 서비스.
//!
//! 저장소는 해시된 비밀번호만 다룹니다. 해싱과 검증은 모두 여기서 합니다.

use portfolio_core::{Client, NewUser, Role, User};
use tracing::{info, warn};

use crate::auth::{
    hash_password, validate_password_strength, verify_password, JwtError, PasswordError,
    TokenService,
};
use crate::repository::{Storage, StoreError};

/// 계정 서비스 에러.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// 사용자 없음, 비밀번호 불일치, 비활성 계정을 구분하지 않습니다.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Client not found")]
    ClientNotFound(i32),

    #[error("Client {0} already has a portal account")]
    AlreadyLinked(i32),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

/// 로그인 성공 결과.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
}

/// 계정 생성 입력 (평문 비밀번호).
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// 관리자 부트스트랩 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    Existing,
}

/// 자격증명을 검증하고 토큰을 발급합니다.
pub async fn login(
    storage: &dyn Storage,
    tokens: &TokenService,
    username: &str,
    password: &str,
) -> Result<LoginOutcome, AccountError> {
    let user = match storage.get_user_by_username(username).await? {
        Some(user) if user.is_active => user,
        _ => return Err(AccountError::InvalidCredentials),
    };

    match verify_password(password, &user.password_hash) {
        Ok(()) => {}
        Err(PasswordError::VerificationFailed) => return Err(AccountError::InvalidCredentials),
        Err(e) => {
            warn!(user_id = user.id, error = %e, "Stored password hash is unreadable");
            return Err(AccountError::InvalidCredentials);
        }
    }

    let token = tokens.issue(&user)?;
    info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(LoginOutcome { user, token })
}

/// 사용자를 생성하고 생성된 레코드를 그대로 반환합니다.
pub async fn register_user(storage: &dyn Storage, account: NewAccount) -> Result<User, AccountError> {
    validate_password_strength(&account.password)
        .map_err(|msg| AccountError::WeakPassword(msg.to_string()))?;

    let hash = hash_password(&account.password)?;
    let user = storage
        .create_user(NewUser::new(account.username, hash, account.role))
        .await?;

    info!(user_id = user.id, role = %user.role, "User registered");
    Ok(user)
}

/// 기존 고객에게 포털 계정을 만들어 연결합니다.
///
/// 고객이 없으면 `ClientNotFound`, 이미 계정이 있으면 `AlreadyLinked`.
pub async fn register_client_account(
    storage: &dyn Storage,
    client_id: i32,
    username: &str,
    password: &str,
) -> Result<(User, Client), AccountError> {
    let client = storage
        .get_client(client_id)
        .await?
        .ok_or(AccountError::ClientNotFound(client_id))?;

    if client.has_account() {
        return Err(AccountError::AlreadyLinked(client_id));
    }

    validate_password_strength(password)
        .map_err(|msg| AccountError::WeakPassword(msg.to_string()))?;
    let hash = hash_password(password)?;

    // 사용자 삽입과 연결은 한 단위로 커밋되며, 연결이 실패하면 사용자도 남지 않음
    let (user, client) = match storage
        .create_linked_client_user(client_id, NewUser::new(username, hash, Role::Client))
        .await?
    {
        Some(created) => created,
        None => {
            warn!(client_id, "Client was linked or removed concurrently");
            return Err(match storage.get_client(client_id).await? {
                Some(_) => AccountError::AlreadyLinked(client_id),
                None => AccountError::ClientNotFound(client_id),
            });
        }
    };

    info!(client_id, user_id = user.id, "Client portal account created");
    Ok((user, client))
}

/// 관리자 계정이 없으면 생성합니다.
///
/// 이미 있으면 비밀번호를 포함해 아무것도 바꾸지 않습니다.
pub async fn bootstrap_admin(
    storage: &dyn Storage,
    username: &str,
    password: &str,
) -> Result<BootstrapOutcome, AccountError> {
    if let Some(existing) = storage.get_user_by_username(username).await? {
        if !existing.is_admin() {
            warn!(
                username,
                role = %existing.role,
                "Bootstrap username belongs to a non-admin account"
            );
        }
        return Ok(BootstrapOutcome::Existing);
    }

    let hash = hash_password(password)?;
    match storage
        .create_user(NewUser::new(username, hash, Role::Admin))
        .await
    {
        Ok(user) => {
            info!(user_id = user.id, username, "Admin account created");
            Ok(BootstrapOutcome::Created)
        }
        Err(StoreError::DuplicateUsername) => Ok(BootstrapOutcome::Existing),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemStorage;
    use portfolio_core::NewClient;

    fn tokens() -> TokenService {
        TokenService::new("test-secret-key-for-jwt-testing-minimum-32-chars", 7)
    }

    async fn storage_with_user(username: &str, password: &str, role: Role) -> MemStorage {
        let storage = MemStorage::new();
        register_user(
            &storage,
            NewAccount {
                username: username.to_string(),
                password: password.to_string(),
                role,
            },
        )
        .await
        .unwrap();
        storage
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let storage = storage_with_user("jane", "secret123", Role::Client).await;
        let tokens = tokens();

        let outcome = login(&storage, &tokens, "jane", "secret123").await.unwrap();
        let claims = tokens.verify(&outcome.token).unwrap();

        assert_eq!(claims.id, outcome.user.id);
        assert_eq!(claims.username, "jane");
        assert_eq!(claims.role, Role::Client);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let storage = storage_with_user("jane", "secret123", Role::Client).await;
        let tokens = tokens();

        let wrong_password = login(&storage, &tokens, "jane", "nope").await.unwrap_err();
        let unknown_user = login(&storage, &tokens, "ghost", "secret123")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AccountError::InvalidCredentials));
        assert!(matches!(unknown_user, AccountError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_weak_passwords() {
        let storage = storage_with_user("jane", "secret123", Role::Client).await;

        let duplicate = register_user(
            &storage,
            NewAccount {
                username: "jane".to_string(),
                password: "another-secret".to_string(),
                role: Role::Admin,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            duplicate,
            AccountError::Store(StoreError::DuplicateUsername)
        ));

        let weak = register_user(
            &storage,
            NewAccount {
                username: "bob".to_string(),
                password: "123".to_string(),
                role: Role::Client,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(weak, AccountError::WeakPassword(_)));
        assert_eq!(storage.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_register_client_account_links_once() {
        let storage = MemStorage::new();
        let client = storage
            .create_client(NewClient {
                full_name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                phone: "555-0100".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let (user, linked) = register_client_account(&storage, client.id, "jane", "secret123")
            .await
            .unwrap();
        assert_eq!(user.role, Role::Client);
        assert_eq!(linked.user_id, Some(user.id));

        let again = register_client_account(&storage, client.id, "jane2", "secret123")
            .await
            .unwrap_err();
        assert!(matches!(again, AccountError::AlreadyLinked(id) if id == client.id));

        let missing = register_client_account(&storage, 999, "ghost", "secret123")
            .await
            .unwrap_err();
        assert!(matches!(missing, AccountError::ClientNotFound(999)));

        // 실패한 시도는 사용자 레코드를 남기지 않음
        assert_eq!(storage.user_count().await, 1);
        assert!(storage.get_user_by_username("jane2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_client_account_duplicate_username_leaves_client_unlinked() {
        let storage = storage_with_user("taken", "secret123", Role::Admin).await;
        let client = storage
            .create_client(NewClient {
                full_name: "Bob Stone".to_string(),
                email: "bob@x.com".to_string(),
                phone: "555-0101".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let err = register_client_account(&storage, client.id, "taken", "secret123")
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::Store(StoreError::DuplicateUsername)));
        assert!(!storage.get_client(client.id).await.unwrap().unwrap().has_account());
        assert_eq!(storage.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_bootstrap_admin_is_idempotent() {
        let storage = MemStorage::new();

        let first = bootstrap_admin(&storage, "admin", "first-password").await.unwrap();
        let second = bootstrap_admin(&storage, "admin", "second-password").await.unwrap();

        assert_eq!(first, BootstrapOutcome::Created);
        assert_eq!(second, BootstrapOutcome::Existing);
        assert_eq!(storage.user_count().await, 1);

        // 두 번째 실행은 비밀번호를 바꾸지 않는다
        let tokens = tokens();
        assert!(login(&storage, &tokens, "admin", "first-password").await.is_ok());
        assert!(login(&storage, &tokens, "admin", "second-password").await.is_err());
    }
}

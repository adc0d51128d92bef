//! 비밀번호 해싱 유틸리티.
//!
//! Argon2 기반 비밀번호 해싱 및 검증.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 최소 길이.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 검증 실패")]
    VerificationFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 비밀번호 해싱.
///
/// Argon2id 알고리즘을 사용하며 솔트는 자동으로 생성됩니다.
/// 결과는 PHC 형식 문자열입니다 (`$argon2id$v=19$...`).
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 일치하면 Ok(()), 불일치하면 `VerificationFailed`.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// 비밀번호 강도 검증 (최소 6자).
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

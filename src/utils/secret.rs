//! 作业访问密钥哈希
//!
//! 密钥以 Argon2id 加盐哈希落库，比对走 Argon2 的常数时间验证，
//! 明文密钥在创建/更新请求之外不存在。

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::errors::CourseHubError;

/// 哈希访问密钥
pub fn hash_secret(secret: &str) -> Result<String, CourseHubError> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| CourseHubError::validation(format!("密钥哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 验证访问密钥
pub fn verify_secret(secret: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

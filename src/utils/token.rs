//! 身份令牌验签
//!
//! 令牌由外部身份服务签发（HS256 共享密钥），本服务只验签并
//! 提取声明，不负责签发、刷新和注销。

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::models::auth::entities::{AuthUser, UserRole};

/// 身份服务签发的声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,  // 用户 ID
    pub name: String, // 显示名
    pub email: String,
    pub role: String,
    /// 所属班级层级；讲师可带多个，以逗号分隔
    pub class_level: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

pub struct TokenUtils;

impl TokenUtils {
    fn get_secret() -> String {
        AppConfig::get().auth.token_secret.clone()
    }

    /// 验证令牌并提取声明
    pub fn verify_token(token: &str) -> Result<IdentityClaims, jsonwebtoken::errors::Error> {
        let secret = Self::get_secret();
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let validation = Validation::default();

        decode::<IdentityClaims>(token, &decoding_key, &validation)
            .map(|token_data| token_data.claims)
    }

    /// 声明转换为调用方身份
    pub fn claims_into_user(claims: IdentityClaims) -> Result<AuthUser, String> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| "Invalid user ID in token".to_string())?;
        let role = claims.role.parse::<UserRole>()?;

        Ok(AuthUser {
            id,
            name: claims.name,
            email: claims.email,
            role,
            class_level: claims.class_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: &str) -> IdentityClaims {
        IdentityClaims {
            sub: "42".to_string(),
            name: "张三".to_string(),
            email: "zs@example.com".to_string(),
            role: role.to_string(),
            class_level: Some("grade-1".to_string()),
            exp: 4_000_000_000,
            iat: 0,
        }
    }

    #[test]
    fn test_claims_into_user() {
        let user = TokenUtils::claims_into_user(claims("student")).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.role, UserRole::Student);
        assert_eq!(user.class_level.as_deref(), Some("grade-1"));
    }

    #[test]
    fn test_claims_bad_role() {
        assert!(TokenUtils::claims_into_user(claims("root")).is_err());
    }

    #[test]
    fn test_claims_bad_sub() {
        let mut c = claims("student");
        c.sub = "not-a-number".to_string();
        assert!(TokenUtils::claims_into_user(c).is_err());
    }
}

//! 访问门禁
//!
//! 纯谓词，无副作用：特权角色（管理员、该作业的发布者/负责讲师）
//! 无条件放行；未设密钥的作业放行；其余情况要求提供的密钥
//! 与落库哈希匹配（Argon2 常数时间验证，区分大小写）。
//! 无论结果如何，密钥材料都不会进入任何响应。

use crate::models::assignments::entities::AssignmentGuarded;
use crate::models::auth::entities::AuthUser;
use crate::services::assignments::visibility::can_manage;
use crate::utils::secret::verify_secret;

/// 门禁判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    /// 作业受保护但调用方未提供密钥
    SecretRequired,
    /// 提供的密钥不匹配
    SecretMismatch,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }
}

/// 门禁检查
pub fn check_access(
    guarded: &AssignmentGuarded,
    supplied_secret: Option<&str>,
    caller: Option<&AuthUser>,
) -> AccessDecision {
    // 特权放行
    if let Some(caller) = caller
        && can_manage(caller, &guarded.assignment)
    {
        return AccessDecision::Granted;
    }

    // 未设密钥的作业放行
    let Some(hash) = guarded.access_secret_hash.as_deref() else {
        return AccessDecision::Granted;
    };

    match supplied_secret {
        None => AccessDecision::SecretRequired,
        Some(secret) if verify_secret(secret, hash) => AccessDecision::Granted,
        Some(_) => AccessDecision::SecretMismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::Assignment;
    use crate::models::auth::entities::UserRole;
    use crate::utils::secret::hash_secret;

    fn guarded(secret: Option<&str>) -> AssignmentGuarded {
        AssignmentGuarded {
            assignment: Assignment {
                id: 1,
                title: "t".into(),
                content: "c".into(),
                class_level: "grade-1".into(),
                due_date: None,
                max_submissions: 0,
                current_submissions: 0,
                has_password: secret.is_some(),
                author_id: 10,
                instructor_id: 20,
                views: 0,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            },
            access_secret_hash: secret.map(|s| hash_secret(s).unwrap()),
        }
    }

    fn user(role: UserRole, id: i64) -> AuthUser {
        AuthUser {
            id,
            name: "u".into(),
            email: "u@example.com".into(),
            role,
            class_level: Some("grade-1".into()),
        }
    }

    #[test]
    fn test_unprotected_grants_everyone() {
        let g = guarded(None);
        assert!(check_access(&g, None, None).is_granted());
        assert!(
            check_access(&g, None, Some(&user(UserRole::Student, 5))).is_granted()
        );
    }

    #[test]
    fn test_correct_secret_granted() {
        let g = guarded(Some("abc123"));
        assert_eq!(
            check_access(&g, Some("abc123"), None),
            AccessDecision::Granted
        );
    }

    #[test]
    fn test_secret_is_case_sensitive() {
        let g = guarded(Some("abc123"));
        assert_eq!(
            check_access(&g, Some("ABC123"), Some(&user(UserRole::Student, 5))),
            AccessDecision::SecretMismatch
        );
    }

    #[test]
    fn test_missing_secret_challenged() {
        let g = guarded(Some("abc123"));
        assert_eq!(
            check_access(&g, None, Some(&user(UserRole::Student, 5))),
            AccessDecision::SecretRequired
        );
    }

    #[test]
    fn test_privileged_bypass() {
        let g = guarded(Some("abc123"));
        // 管理员
        assert!(check_access(&g, None, Some(&user(UserRole::Admin, 99))).is_granted());
        // 发布者讲师
        assert!(check_access(&g, None, Some(&user(UserRole::Instructor, 10))).is_granted());
        // 负责讲师
        assert!(check_access(&g, None, Some(&user(UserRole::Instructor, 20))).is_granted());
        // 不相关讲师仍被挑战
        assert_eq!(
            check_access(&g, None, Some(&user(UserRole::Instructor, 30))),
            AccessDecision::SecretRequired
        );
    }

    #[test]
    fn test_no_trimming() {
        let g = guarded(Some("abc123"));
        assert_eq!(
            check_access(&g, Some(" abc123"), None),
            AccessDecision::SecretMismatch
        );
        assert_eq!(
            check_access(&g, Some("abc123 "), None),
            AccessDecision::SecretMismatch
        );
    }
}

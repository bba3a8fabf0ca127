use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 作业的组合视图（公告记录 + 详情记录）
///
/// 访问密钥从不出现在这里，响应只携带 `has_password`。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    // 唯一 ID（公告记录主键）
    pub id: i64,
    // 作业标题
    pub title: String,
    // 作业描述
    pub content: String,
    // 可见性分组标签
    pub class_level: String,
    // 截止时间，null 表示不设截止
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    // 提交容量上限，0 表示不限量
    pub max_submissions: i64,
    // 已接受的提交数
    pub current_submissions: i64,
    // 是否设置了访问密钥
    pub has_password: bool,
    // 发布者 ID
    pub author_id: i64,
    // 负责讲师 ID
    pub instructor_id: i64,
    // 浏览计数
    pub views: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    /// 容量是否不限量
    pub fn is_unlimited(&self) -> bool {
        self.max_submissions <= 0
    }

    /// 剩余容量，None 表示不限量
    pub fn remaining_capacity(&self) -> Option<i64> {
        if self.is_unlimited() {
            None
        } else {
            Some((self.max_submissions - self.current_submissions).max(0))
        }
    }
}

/// 含访问密钥哈希的内部视图
///
/// 仅供服务层做门禁校验，刻意不派生 Serialize，
/// 保证密钥材料无法进入任何响应体。
#[derive(Debug, Clone)]
pub struct AssignmentGuarded {
    pub assignment: Assignment,
    pub access_secret_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(max: i64, current: i64) -> Assignment {
        Assignment {
            id: 1,
            title: "t".into(),
            content: "c".into(),
            class_level: "grade-1".into(),
            due_date: None,
            max_submissions: max,
            current_submissions: current,
            has_password: false,
            author_id: 1,
            instructor_id: 1,
            views: 0,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_zero_max_means_unlimited() {
        assert!(assignment(0, 100).is_unlimited());
        assert_eq!(assignment(0, 100).remaining_capacity(), None);
    }

    #[test]
    fn test_remaining_capacity() {
        assert_eq!(assignment(3, 1).remaining_capacity(), Some(2));
        assert_eq!(assignment(3, 3).remaining_capacity(), Some(0));
    }

    #[test]
    fn test_secret_never_serialized() {
        // 组合视图里根本没有密钥字段，序列化结果只可能包含 has_password
        let json = serde_json::to_string(&assignment(0, 0)).unwrap();
        assert!(json.contains("has_password"));
        assert!(!json.contains("secret"));
        assert!(!json.contains("password\":\""));
    }
}

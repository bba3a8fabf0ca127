use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学生身份
///
/// 已登录调用方按用户 ID 追踪；访客仅按提交时填写的名字精确匹配。
/// 两个访客使用同一个名字时无法区分，这是既定的追踪限制，
/// 不做模糊匹配兜底。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentIdentity {
    Registered { id: i64, name: String },
    Guest { name: String },
}

impl StudentIdentity {
    pub fn student_id(&self) -> Option<i64> {
        match self {
            StudentIdentity::Registered { id, .. } => Some(*id),
            StudentIdentity::Guest { .. } => None,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            StudentIdentity::Registered { name, .. } => name,
            StudentIdentity::Guest { name } => name,
        }
    }
}

/// 一次提交记录
///
/// 创建后除批改工作流（is_checked / checked_by / checked_at / feedback）
/// 之外不再变更。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: Option<i64>,
    pub student_name: String,
    pub file_url: String,
    pub file_name: String,
    pub comment: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub is_checked: bool,
    pub checked_by: Option<i64>,
    pub checked_at: Option<chrono::DateTime<chrono::Utc>>,
    pub feedback: Option<String>,
}

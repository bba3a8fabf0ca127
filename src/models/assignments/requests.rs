use crate::models::common::pagination::PaginationQuery;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 创建作业请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub content: String,
    pub class_level: String,
    pub due_date: Option<DateTime<Utc>>, // ISO 8601 格式，如 "2026-09-01T12:00:00Z"
    /// 0 或缺省表示不限量
    pub max_submissions: Option<i64>,
    pub access_secret: String,
    /// 缺省时由发布者兼任负责讲师
    pub instructor_id: Option<i64>,
}

/// 更新作业请求（仅更新显式给出的字段）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub class_level: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_submissions: Option<i64>,
    pub access_secret: Option<String>,
}

impl UpdateAssignmentRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.class_level.is_none()
            && self.due_date.is_none()
            && self.max_submissions.is_none()
            && self.access_secret.is_none()
    }
}

/// 作业列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    /// 显式层级过滤（仍受可见性策略约束）
    pub level: Option<String>,
}

/// 作业详情查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentDetailParams {
    /// 受密钥保护时由调用方提供
    pub password: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct AssignmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// None 表示不按层级收窄（管理员）
    pub visible_levels: Option<Vec<String>>,
    pub level: Option<String>,
}

// 用于存储层的内部更新参数（密钥已哈希）
#[derive(Debug, Clone, Default)]
pub struct AssignmentUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub class_level: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_submissions: Option<i64>,
    pub access_secret_hash: Option<String>,
}

// 用于存储层的内部创建参数（密钥已哈希）
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub title: String,
    pub content: String,
    pub class_level: String,
    pub due_date: Option<DateTime<Utc>>,
    pub max_submissions: i64,
    pub access_secret_hash: Option<String>,
    pub author_id: i64,
    pub instructor_id: i64,
}

use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationQuery;
use crate::models::submissions::entities::StudentIdentity;

/// 提交前置检查请求
///
/// 幂等、无副作用：回答"这个身份交过几次、还能交几次"。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionCheckRequest {
    /// 访客身份名；已登录调用方忽略此字段
    pub student_name: Option<String>,
}

/// 提交列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}

/// 批改状态切换请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SetCheckedRequest {
    pub checked: bool,
    /// 可选：切换的同时附上反馈
    pub feedback: Option<String>,
}

/// 反馈替换请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SetFeedbackRequest {
    pub feedback: String,
}

// 用于存储层的内部创建参数（文件已上传完成）
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub identity: StudentIdentity,
    pub file_url: String,
    pub file_name: String,
    pub comment: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct SubmissionListQuery {
    pub assignment_id: i64,
    /// Some 时只返回该身份自己的提交
    pub only_identity: Option<StudentIdentity>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

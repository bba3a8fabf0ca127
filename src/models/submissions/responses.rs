use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::PaginationInfo;
use crate::models::submissions::entities::Submission;

/// 提交列表响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<Submission>,
    pub pagination: PaginationInfo,
}

/// 提交前置检查响应
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionCheckResponse {
    /// 该身份是否已有提交
    pub already_submitted: bool,
    /// 已用提交次数
    pub attempts_used: i64,
    /// 剩余提交次数，null 表示不限次
    pub attempts_remaining: Option<i64>,
    /// 作业剩余容量，null 表示不限量
    pub capacity_remaining: Option<i64>,
}

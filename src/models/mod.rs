pub mod assignments;
pub mod auth;
pub mod common;
pub mod submissions;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 程序启动时间（用于运行时长统计）
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务状态码
///
/// 写入 `ApiResponse.code`，前端据此区分各类拒绝原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    InvalidParams = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    TooManyRequests = 1006,

    // 作业
    AssignmentNotFound = 2001,
    AccessSecretRequired = 2002,
    AccessSecretMismatch = 2003,

    // 提交
    SubmissionNotFound = 2101,
    DeadlineExceeded = 2102,
    CapacityExceeded = 2103,
    AttemptCapExceeded = 2104,
    UploadFailed = 2105,

    // 存储一致性
    ConsistencyFailure = 2301,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values_stable() {
        // 状态码是对外契约，不允许悄悄变更
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::AssignmentNotFound as i32, 2001);
        assert_eq!(ErrorCode::DeadlineExceeded as i32, 2102);
        assert_eq!(ErrorCode::CapacityExceeded as i32, 2103);
        assert_eq!(ErrorCode::AttemptCapExceeded as i32, 2104);
    }
}

pub mod assignments;
pub mod submissions;

pub use assignments::AssignmentService;
pub use submissions::SubmissionService;

use actix_web::HttpResponse;
use tracing::{debug, error};

use crate::errors::CourseHubError;
use crate::models::{ApiResponse, ErrorCode};

/// 存储层错误统一映射为 HTTP 响应
///
/// 业务规则类拒绝（截止/容量/次数上限）是预期内结果：
/// 响应 409、带结构化原因、按 debug 级别记录，不算异常。
pub(crate) fn storage_error_response(err: CourseHubError) -> HttpResponse {
    if err.is_business_rejection() {
        debug!("Business rejection: {}", err);
    } else {
        error!("{}", err);
    }

    match err {
        CourseHubError::NotFound(msg) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::NotFound, msg))
        }
        CourseHubError::Validation(msg) => {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::InvalidParams, msg))
        }
        CourseHubError::Authentication(msg) => {
            HttpResponse::Unauthorized().json(ApiResponse::error_empty(ErrorCode::Unauthorized, msg))
        }
        CourseHubError::Authorization(msg) => {
            HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, msg))
        }
        CourseHubError::DeadlineExceeded(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::DeadlineExceeded, msg)),
        CourseHubError::CapacityExceeded(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::CapacityExceeded, msg)),
        CourseHubError::AttemptCapExceeded(msg) => HttpResponse::Conflict()
            .json(ApiResponse::error_empty(ErrorCode::AttemptCapExceeded, msg)),
        CourseHubError::ObjectStore(msg) => HttpResponse::BadGateway()
            .json(ApiResponse::error_empty(ErrorCode::UploadFailed, msg)),
        CourseHubError::Consistency(msg) => HttpResponse::InternalServerError()
            .json(ApiResponse::error_empty(ErrorCode::ConsistencyFailure, msg)),
        other => HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            other.format_simple(),
        )),
    }
}

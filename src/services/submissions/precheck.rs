use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, resolve_student_identity};
use crate::config::AppConfig;
use crate::middlewares::identity::Identity;
use crate::models::submissions::requests::SubmissionCheckRequest;
use crate::models::submissions::responses::SubmissionCheckResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;

/// 提交前置检查
///
/// 幂等、无副作用：告诉调用方该身份已交过几次、还能交几次、
/// 作业还剩多少容量。提交本身仍由台账事务做权威判定。
pub async fn check_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    req: SubmissionCheckRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let current_user = Identity::extract_user(request);

    let identity =
        match resolve_student_identity(current_user.as_ref(), req.student_name.as_deref()) {
            Ok(identity) => identity,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::InvalidParams, msg)));
            }
        };

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        Err(e) => return Ok(storage_error_response(e)),
    };

    let attempts_used = match storage.count_attempts(assignment_id, &identity).await {
        Ok(used) => used,
        Err(e) => return Ok(storage_error_response(e)),
    };

    // 次数上限与容量同一语义：0 或负数表示不限
    let attempt_cap = AppConfig::get().submission.attempt_cap;
    let attempts_remaining = if attempt_cap > 0 {
        Some((attempt_cap - attempts_used).max(0))
    } else {
        None
    };

    let response = SubmissionCheckResponse {
        already_submitted: attempts_used > 0,
        attempts_used,
        attempts_remaining,
        capacity_remaining: assignment.remaining_capacity(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}

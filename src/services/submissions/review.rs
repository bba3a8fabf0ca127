use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::SubmissionService;
use crate::middlewares::identity::Identity;
use crate::models::auth::entities::AuthUser;
use crate::models::submissions::requests::{SetCheckedRequest, SetFeedbackRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::visibility::can_manage;
use crate::services::storage_error_response;
use crate::storage::Storage;

/// 批改权限校验
///
/// 提交必须属于路径里的作业，调用方必须是作业的发布者/负责讲师
/// 或管理员。学生永远不能写检查状态和反馈。
async fn check_review_permission(
    storage: &Arc<dyn Storage>,
    current_user: &AuthUser,
    assignment_id: i64,
    submission_id: i64,
) -> Result<(), HttpResponse> {
    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "提交不存在",
            )));
        }
        Err(e) => return Err(storage_error_response(e)),
    };

    if submission.assignment_id != assignment_id {
        return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "提交不属于该作业",
        )));
    }

    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        Err(e) => return Err(storage_error_response(e)),
    };

    if !can_manage(current_user, &assignment) {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能批改自己负责的作业",
        )));
    }

    Ok(())
}

/// 切换检查状态
/// PATCH /assignments/{assignment_id}/submissions/{sub_id}/check
pub async fn set_checked(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_id: i64,
    req: SetCheckedRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match Identity::extract_user(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    if let Err(resp) =
        check_review_permission(&storage, &current_user, assignment_id, submission_id).await
    {
        return Ok(resp);
    }

    match storage
        .set_submission_checked(submission_id, req.checked, current_user.id, req.feedback)
        .await
    {
        Ok(Some(submission)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "检查状态已更新")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "提交不存在",
        ))),
        Err(e) => Ok(storage_error_response(e)),
    }
}

/// 替换反馈
/// PATCH /assignments/{assignment_id}/submissions/{sub_id}/feedback
pub async fn set_feedback(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_id: i64,
    req: SetFeedbackRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match Identity::extract_user(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    if let Err(resp) =
        check_review_permission(&storage, &current_user, assignment_id, submission_id).await
    {
        return Ok(resp);
    }

    match storage
        .set_submission_feedback(submission_id, req.feedback)
        .await
    {
        Ok(Some(submission)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "反馈已更新")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "提交不存在",
        ))),
        Err(e) => Ok(storage_error_response(e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::identity::Identity;
use crate::models::auth::entities::UserRole;
use crate::models::submissions::entities::StudentIdentity;
use crate::models::submissions::requests::{SubmissionListParams, SubmissionListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::visibility::can_manage;
use crate::services::storage_error_response;

/// 列出提交
///
/// 学生只能看到自己的提交（含反馈）；作业的发布者/负责讲师和
/// 管理员可以看到全部。
pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    query: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match Identity::extract_user(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
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

    // 可管理者看全部；其余调用方只看自己的
    let only_identity = if can_manage(&current_user, &assignment) {
        None
    } else if current_user.role == UserRole::Student {
        Some(StudentIdentity::Registered {
            id: current_user.id,
            name: current_user.name.clone(),
        })
    } else {
        // 不相关的讲师无权查看该作业的提交
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "没有查看该作业提交的权限",
        )));
    };

    let list_query = SubmissionListQuery {
        assignment_id,
        only_identity,
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
    };

    match storage.list_submissions_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(storage_error_response(e)),
    }
}

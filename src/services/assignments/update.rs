use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::middlewares::identity::Identity;
use crate::models::assignments::requests::{AssignmentUpdate, UpdateAssignmentRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::visibility::can_manage;
use crate::services::storage_error_response;
use crate::utils::secret::hash_secret;
use crate::utils::validate::validate_class_level;

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    req: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match Identity::extract_user(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    if req.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidParams,
            "没有提供任何待更新字段",
        )));
    }

    // 获取作业信息
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

    // 权限检查：只有发布者/负责讲师或管理员才能更新
    if !can_manage(&current_user, &assignment) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能更新自己负责的作业",
        )));
    }

    // 给出的字段逐项校验
    if let Some(ref title) = req.title
        && title.trim().is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidParams,
            "标题不能为空",
        )));
    }
    if let Some(ref content) = req.content
        && content.trim().is_empty()
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidParams,
            "内容不能为空",
        )));
    }
    if let Some(ref class_level) = req.class_level
        && let Err(msg) = validate_class_level(class_level)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidParams, msg)));
    }
    if let Some(max_submissions) = req.max_submissions
        && max_submissions < 0
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidParams,
            "提交容量不能为负数",
        )));
    }

    // 新密钥重新哈希
    let access_secret_hash = match req.access_secret {
        Some(ref secret) if secret.is_empty() => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvalidParams,
                "访问密钥不能为空",
            )));
        }
        Some(ref secret) => match hash_secret(secret) {
            Ok(hash) => Some(hash),
            Err(e) => return Ok(storage_error_response(e)),
        },
        None => None,
    };

    let update = AssignmentUpdate {
        title: req.title,
        content: req.content,
        class_level: req.class_level,
        due_date: req.due_date,
        max_submissions: req.max_submissions,
        access_secret_hash,
    };

    match storage.update_assignment(assignment_id, update).await {
        Ok(Some(assignment)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "作业更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "作业不存在",
        ))),
        Err(e) => Ok(storage_error_response(e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::requests::{CreateAssignmentRequest, NewAssignment};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;
use crate::utils::secret::hash_secret;
use crate::utils::validate::validate_class_level;

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    author_id: i64,
    req: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    // 必填字段校验
    if req.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidParams,
            "标题不能为空",
        )));
    }
    if req.content.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidParams,
            "内容不能为空",
        )));
    }
    if req.access_secret.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidParams,
            "访问密钥不能为空",
        )));
    }
    if let Err(msg) = validate_class_level(&req.class_level) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidParams, msg)));
    }

    // 容量：0 表示不限量，负数拒绝
    let max_submissions = req.max_submissions.unwrap_or(0);
    if max_submissions < 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidParams,
            "提交容量不能为负数",
        )));
    }

    // 密钥只以哈希落库
    let access_secret_hash = match hash_secret(&req.access_secret) {
        Ok(hash) => Some(hash),
        Err(e) => return Ok(storage_error_response(e)),
    };

    let input = NewAssignment {
        title: req.title,
        content: req.content,
        class_level: req.class_level,
        due_date: req.due_date,
        max_submissions,
        access_secret_hash,
        author_id,
        instructor_id: req.instructor_id.unwrap_or(author_id),
    };

    let storage = service.get_storage(request);
    match storage.create_assignment(input).await {
        Ok(assignment) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "作业创建成功")))
        }
        Err(e) => Ok(storage_error_response(e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::AssignmentService;
use crate::middlewares::identity::Identity;
use crate::models::assignments::requests::AssignmentDetailParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::access::{AccessDecision, check_access};
use crate::services::storage_error_response;

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    params: AssignmentDetailParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let current_user = Identity::extract_user(request);

    let guarded = match storage.get_assignment_guarded(assignment_id).await {
        Ok(Some(guarded)) => guarded,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "作业不存在",
            )));
        }
        Err(e) => return Ok(storage_error_response(e)),
    };

    // 门禁检查：密钥验证失败属于预期拒绝，按 debug 记录
    match check_access(&guarded, params.password.as_deref(), current_user.as_ref()) {
        AccessDecision::Granted => {}
        AccessDecision::SecretRequired => {
            debug!("Access secret required for assignment {}", assignment_id);
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::AccessSecretRequired,
                "该作业受访问密钥保护",
            )));
        }
        AccessDecision::SecretMismatch => {
            debug!("Access secret mismatch for assignment {}", assignment_id);
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::AccessSecretMismatch,
                "访问密钥不正确",
            )));
        }
    }

    // 浏览计数尽力而为：失败只记日志，不影响读取
    {
        let storage = storage.clone();
        actix_web::rt::spawn(async move {
            if let Err(e) = storage.increment_views(assignment_id).await {
                debug!("Failed to increment views for {}: {}", assignment_id, e);
            }
        });
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(guarded.assignment, "查询成功")))
}

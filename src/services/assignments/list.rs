use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::middlewares::identity::Identity;
use crate::models::assignments::requests::{AssignmentListParams, AssignmentListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::visibility::visibility_scope;
use crate::services::storage_error_response;

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    query: AssignmentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current_user = match Identity::extract_user(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized()
                .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
        }
    };

    // 统一走可见性策略，不在端点里散落角色判断
    let visible_levels = visibility_scope(&current_user).into_visible_levels();

    let list_query = AssignmentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        visible_levels,
        level: query.level,
    };

    match storage.list_assignments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功"))),
        Err(e) => Ok(storage_error_response(e)),
    }
}

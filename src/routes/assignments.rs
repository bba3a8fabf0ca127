use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, identity::Identity};
use crate::models::assignments::requests::{
    AssignmentDetailParams, AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::auth::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::AssignmentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

// 列出作业
pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(&req, query.into_inner())
        .await
}

// 创建作业
pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match Identity::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    ASSIGNMENT_SERVICE
        .create_assignment(&req, user_id, body.into_inner())
        .await
}

// 获取作业详情（访客可过门禁访问）
pub async fn get_assignment(
    req: HttpRequest,
    path: SafeIDI64,
    query: web::Query<AssignmentDetailParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_assignment(&req, path.0, query.into_inner())
        .await
}

// 更新作业
pub async fn update_assignment(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, path.0, body.into_inner())
        .await
}

// 删除作业
pub async fn delete_assignment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.delete_assignment(&req, path.0).await
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .service(
                web::resource("")
                    // 列出作业 - 登录用户，业务层按可见性策略过滤
                    .route(
                        web::get()
                            .to(list_assignments)
                            .wrap(middlewares::RequireAuth),
                    )
                    // 创建作业 - 仅讲师和管理员
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(middlewares::RequireRole::new_any(
                                UserRole::instructor_roles(),
                            ))
                            .wrap(middlewares::RequireAuth),
                    ),
            )
            .service(
                web::resource("/{id}")
                    // 获取作业详情 - 可选认证，门禁在业务层检查
                    .route(
                        web::get()
                            .to(get_assignment)
                            .wrap(middlewares::OptionalAuth),
                    )
                    // 更新作业 - 仅讲师和管理员（所有权在业务层检查）
                    .route(
                        web::patch()
                            .to(update_assignment)
                            .wrap(middlewares::RequireRole::new_any(
                                UserRole::instructor_roles(),
                            ))
                            .wrap(middlewares::RequireAuth),
                    )
                    // 删除作业 - 仅讲师和管理员（所有权在业务层检查）
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            .wrap(middlewares::RequireRole::new_any(
                                UserRole::instructor_roles(),
                            ))
                            .wrap(middlewares::RequireAuth),
                    ),
            ),
    );
}

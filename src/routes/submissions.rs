use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::entities::UserRole;
use crate::models::submissions::requests::{
    SetCheckedRequest, SetFeedbackRequest, SubmissionCheckRequest, SubmissionListParams,
};
use crate::services::SubmissionService;
use crate::utils::SafeAssignmentIdI64;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 创建提交（multipart：file + student_name + comment）
pub async fn create_submission(
    req: HttpRequest,
    path: SafeAssignmentIdI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, path.0, payload)
        .await
}

// 提交前置检查（幂等：已交几次、还能交几次）
pub async fn check_submission(
    req: HttpRequest,
    path: SafeAssignmentIdI64,
    body: web::Json<SubmissionCheckRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .check_submission(&req, path.0, body.into_inner())
        .await
}

// 列出提交（学生只看自己的，讲师/管理员看全部）
pub async fn list_submissions(
    req: HttpRequest,
    path: SafeAssignmentIdI64,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, path.0, query.into_inner())
        .await
}

// 切换检查状态（批改者）
pub async fn set_checked(
    req: HttpRequest,
    path: web::Path<(i64, i64)>, // (assignment_id, sub_id)
    body: web::Json<SetCheckedRequest>,
) -> ActixResult<HttpResponse> {
    let (assignment_id, submission_id) = path.into_inner();
    SUBMISSION_SERVICE
        .set_checked(&req, assignment_id, submission_id, body.into_inner())
        .await
}

// 替换反馈（批改者）
pub async fn set_feedback(
    req: HttpRequest,
    path: web::Path<(i64, i64)>, // (assignment_id, sub_id)
    body: web::Json<SetFeedbackRequest>,
) -> ActixResult<HttpResponse> {
    let (assignment_id, submission_id) = path.into_inner();
    SUBMISSION_SERVICE
        .set_feedback(&req, assignment_id, submission_id, body.into_inner())
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments/{assignment_id}/submissions")
            .service(
                web::resource("")
                    // 列出提交 - 登录用户，范围在业务层收窄
                    .route(
                        web::get()
                            .to(list_submissions)
                            .wrap(middlewares::RequireAuth),
                    )
                    // 创建提交 - 访客可用，限速
                    .route(
                        web::post()
                            .to(create_submission)
                            .wrap(middlewares::OptionalAuth)
                            .wrap(middlewares::RateLimit::submit()),
                    ),
            )
            .service(
                web::resource("/check")
                    // 前置检查 - 访客可用，限速
                    .route(
                        web::post()
                            .to(check_submission)
                            .wrap(middlewares::OptionalAuth)
                            .wrap(middlewares::RateLimit::precheck()),
                    ),
            )
            .service(
                web::resource("/{sub_id}/check")
                    // 批改 - 仅讲师和管理员（所有权在业务层检查）
                    .route(
                        web::patch()
                            .to(set_checked)
                            .wrap(middlewares::RequireRole::new_any(
                                UserRole::instructor_roles(),
                            ))
                            .wrap(middlewares::RequireAuth),
                    ),
            )
            .service(
                web::resource("/{sub_id}/feedback")
                    // 批改 - 仅讲师和管理员（所有权在业务层检查）
                    .route(
                        web::patch()
                            .to(set_feedback)
                            .wrap(middlewares::RequireRole::new_any(
                                UserRole::instructor_roles(),
                            ))
                            .wrap(middlewares::RequireAuth),
                    ),
            ),
    );
}

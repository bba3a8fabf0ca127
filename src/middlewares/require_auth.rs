/*!
 * 认证中间件
 *
 * 验证外部身份服务签发的 Bearer 令牌，只有携带有效令牌的请求才能
 * 通过。验证成功后调用方身份写入请求扩展，处理程序通过
 * `Identity::extract_user` 读取。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireAuth;
 *
 * App::new().service(
 *     web::scope("/api/v1/assignments")
 *         .wrap(RequireAuth)
 *         .route("", web::get().to(list_assignments))
 * )
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <TOKEN>`
 * 2. 中间件解析身份（缓存优先，未命中本地验签）
 * 3. 身份有效则写入请求扩展并继续；无效或缺失返回 401
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use crate::middlewares::create_error_response;
use crate::middlewares::identity::{extract_bearer_token, resolve_identity};
use crate::models::ErrorCode;
use crate::utils::auth_state::AuthCheck;

#[derive(Clone)]
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    info!("Authentication required for request to {}", req.path());
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Missing or invalid Authorization header",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            match resolve_identity(&req, &token).await {
                AuthCheck::Authenticated(user) => {
                    debug!("Authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(*user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                _ => {
                    info!("Authentication failed for request to {}", req.path());
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Unauthorized: invalid token",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

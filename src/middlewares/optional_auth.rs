/*!
 * 可选认证中间件
 *
 * 用于允许访客访问的端点（提交、提交前置检查、作业详情）。
 *
 * - 未携带令牌：按访客放行，不写入身份
 * - 携带有效令牌：身份写入请求扩展后放行
 * - 携带无效令牌：返回 401（显式失败，不降级为访客）
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
pub struct OptionalAuth;

impl<S, B> Transform<S, ServiceRequest> for OptionalAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = OptionalAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OptionalAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct OptionalAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for OptionalAuthMiddleware<S>
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
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    // 访客请求
                    debug!("Guest request to {}", req.path());
                    let res = srv.call(req).await?.map_into_left_body();
                    return Ok(res);
                }
            };

            match resolve_identity(&req, &token).await {
                AuthCheck::Authenticated(user) => {
                    debug!("Optional authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(*user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                _ => {
                    // 给了令牌但令牌无效，不能当访客混过去
                    info!(
                        "Invalid token on optionally-authenticated request to {}",
                        req.path()
                    );
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

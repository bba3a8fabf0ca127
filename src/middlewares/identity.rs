//! 身份解析
//!
//! RequireAuth 与 OptionalAuth 共用的令牌解析逻辑：
//! 先查已验证声明的缓存，未命中时本地验签并回填缓存。
//! 缓存后端的瞬时失败由显式状态机按配置的上限重试，
//! 重试耗尽后跳过缓存直接验签，不让缓存故障放大成认证故障。

use actix_web::dev::ServiceRequest;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::auth::entities::AuthUser;
use crate::utils::auth_state::{AuthCheck, CheckOutcome};
use crate::utils::token::TokenUtils;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

/// 从请求头提取 Bearer 令牌
pub(crate) fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(|s| s.to_string())
}

fn claims_cache_key(token: &str) -> String {
    format!("claims:{token}")
}

/// 单次身份探测
///
/// `use_cache` 为 false 时跳过缓存，只做本地验签（降级路径）。
async fn probe_identity(
    cache: &Arc<dyn ObjectCache>,
    token: &str,
    use_cache: bool,
) -> CheckOutcome {
    let config = AppConfig::get();

    if use_cache {
        match cache.get_raw(&claims_cache_key(token)).await {
            CacheResult::Found(json) => match serde_json::from_str::<AuthUser>(&json) {
                Ok(user) => return CheckOutcome::Valid(user),
                Err(_) => {
                    cache.remove(&claims_cache_key(token)).await;
                    info!("Failed to deserialize cached claims, re-verifying token");
                }
            },
            CacheResult::NotFound => {}
            CacheResult::ExistsButNoValue => {
                // 后端瞬时失败，交给状态机决定是否重试
                return CheckOutcome::Transient;
            }
        }
    }

    // 本地验签
    let claims = match TokenUtils::verify_token(token) {
        Ok(claims) => claims,
        Err(err) => {
            info!("Token validation failed: {}", err);
            return CheckOutcome::Invalid;
        }
    };

    let user = match TokenUtils::claims_into_user(claims) {
        Ok(user) => user,
        Err(err) => {
            info!("Token claims rejected: {}", err);
            return CheckOutcome::Invalid;
        }
    };

    // 将已验证声明回填缓存
    if use_cache && let Ok(user_json) = serde_json::to_string(&user) {
        cache
            .insert_raw(
                claims_cache_key(token),
                user_json,
                config.auth.claims_cache_ttl,
            )
            .await;
    }

    CheckOutcome::Valid(user)
}

/// 解析请求携带的身份令牌
///
/// 返回终态：Authenticated / Unauthenticated。
/// 状态机的 Failed 态在此降级为跳过缓存的直接验签。
pub(crate) async fn resolve_identity(req: &ServiceRequest, token: &str) -> AuthCheck {
    let config = AppConfig::get();
    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();

    let max_retries = config.auth.check_max_retries;
    let mut state = AuthCheck::start();
    while !state.is_terminal() {
        let outcome = probe_identity(&cache, token, true).await;
        state = state.advance(outcome, max_retries);
    }

    if let AuthCheck::Failed { retries } = state {
        warn!(
            "Identity cache unavailable after {} retries, verifying token directly",
            retries
        );
        state = match probe_identity(&cache, token, false).await {
            CheckOutcome::Valid(user) => {
                debug!("Direct verification succeeded for user {}", user.id);
                AuthCheck::Authenticated(Box::new(user))
            }
            _ => AuthCheck::Unauthenticated,
        };
    }

    state
}

// 辅助函数：从请求中提取已解析的身份
pub struct Identity;

impl Identity {
    /// 从请求扩展中提取调用方身份
    /// 应在应用了 RequireAuth 或 OptionalAuth 中间件的路由处理程序中使用
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<AuthUser> {
        use actix_web::HttpMessage;
        req.extensions().get::<AuthUser>().cloned()
    }

    /// 从请求扩展中提取调用方 ID
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        use actix_web::HttpMessage;
        req.extensions().get::<AuthUser>().map(|user| user.id)
    }

    /// 从请求扩展中提取调用方角色
    pub fn extract_user_role(
        req: &actix_web::HttpRequest,
    ) -> Option<crate::models::auth::entities::UserRole> {
        use actix_web::HttpMessage;
        req.extensions()
            .get::<AuthUser>()
            .map(|user| user.role.clone())
    }
}

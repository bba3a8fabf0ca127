//! 身份检查状态机
//!
//! 身份解析可能遇到缓存后端的瞬时失败，重试次数作为显式数据
//! 随状态流转，而不是散落在调用方的局部计数器里。
//!
//! 状态流转：
//! `Idle → Checking{attempt} → Authenticated | Unauthenticated | Failed{retries}`

use crate::models::auth::entities::AuthUser;

/// 单次身份探测的结果
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// 令牌有效，得到调用方身份
    Valid(AuthUser),
    /// 令牌无效或过期
    Invalid,
    /// 后端瞬时失败，可重试
    Transient,
}

/// 身份检查状态
#[derive(Debug, Clone)]
pub enum AuthCheck {
    Idle,
    Checking { attempt: u8 },
    Authenticated(Box<AuthUser>),
    Unauthenticated,
    Failed { retries: u8 },
}

impl AuthCheck {
    /// 进入检查态
    pub fn start() -> Self {
        AuthCheck::Checking { attempt: 0 }
    }

    /// 应用一次探测结果
    ///
    /// 终态（Authenticated / Unauthenticated / Failed）不再流转；
    /// 瞬时失败在 `attempt < max_retries` 时回到 Checking，
    /// 否则带着已消耗的重试次数进入 Failed。
    pub fn advance(self, outcome: CheckOutcome, max_retries: u8) -> AuthCheck {
        match (self, outcome) {
            (AuthCheck::Idle, _) => AuthCheck::Idle,
            (AuthCheck::Checking { .. }, CheckOutcome::Valid(user)) => {
                AuthCheck::Authenticated(Box::new(user))
            }
            (AuthCheck::Checking { .. }, CheckOutcome::Invalid) => AuthCheck::Unauthenticated,
            (AuthCheck::Checking { attempt }, CheckOutcome::Transient) => {
                if attempt < max_retries {
                    AuthCheck::Checking {
                        attempt: attempt + 1,
                    }
                } else {
                    AuthCheck::Failed { retries: attempt }
                }
            }
            (terminal, _) => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AuthCheck::Checking { .. })
    }
}

//! 可见性策略
//!
//! 角色与层级决定可列出的作业范围。这里是唯一的策略出口，
//! 列表、提交读取等调用点统一消费，不允许各端点自行再实现一份。

use crate::models::assignments::entities::Assignment;
use crate::models::auth::entities::{AuthUser, UserRole};

/// 列表可见范围
#[derive(Debug, Clone, PartialEq)]
pub enum VisibilityScope {
    /// 管理员：全部作业
    All,
    /// 讲师/学生：限定在所属层级内
    Levels(Vec<String>),
}

impl VisibilityScope {
    /// 转换为存储层查询参数（None 表示不收窄）
    pub fn into_visible_levels(self) -> Option<Vec<String>> {
        match self {
            VisibilityScope::All => None,
            VisibilityScope::Levels(levels) => Some(levels),
        }
    }
}

/// 调用方的列表可见范围
///
/// 列表时应用；详情访问由访问门禁单独控制，知道 ID 的调用方
/// 仍会被密钥挑战。
pub fn visibility_scope(caller: &AuthUser) -> VisibilityScope {
    match caller.role {
        UserRole::Admin => VisibilityScope::All,
        UserRole::Instructor | UserRole::Student => VisibilityScope::Levels(caller.class_levels()),
    }
}

/// 调用方是否可管理该作业（更新/删除/批改）
///
/// 管理员，或该作业的发布者/负责讲师（角色为讲师）。
pub fn can_manage(caller: &AuthUser, assignment: &Assignment) -> bool {
    match caller.role {
        UserRole::Admin => true,
        UserRole::Instructor => {
            assignment.author_id == caller.id || assignment.instructor_id == caller.id
        }
        UserRole::Student => false,
    }
}

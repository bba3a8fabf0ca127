use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentGuarded},
        requests::{AssignmentListQuery, AssignmentUpdate, NewAssignment},
        responses::AssignmentListResponse,
    },
    submissions::{
        entities::{StudentIdentity, Submission},
        requests::{NewSubmission, SubmissionListQuery},
        responses::SubmissionListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业记录方法
    // 创建作业（公告记录 + 详情记录在同一事务中落库）
    async fn create_assignment(&self, input: NewAssignment) -> Result<Assignment>;
    // 通过ID获取作业组合视图
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 通过ID获取含密钥哈希的内部视图（门禁校验用）
    async fn get_assignment_guarded(&self, id: i64) -> Result<Option<AssignmentGuarded>>;
    // 列出作业（按可见层级收窄）
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    // 部分更新作业，updated_at 总是刷新
    async fn update_assignment(
        &self,
        id: i64,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>>;
    // 删除作业（级联删除详情与提交）
    async fn delete_assignment(&self, id: i64) -> Result<bool>;
    // 浏览计数自增（调用方按尽力而为处理）
    async fn increment_views(&self, id: i64) -> Result<bool>;

    /// 提交台账方法
    // 上账一次提交：事务内复核次数上限并原子抢占容量
    async fn record_submission(
        &self,
        input: NewSubmission,
        attempt_cap: i64,
    ) -> Result<Submission>;
    // 统计某身份在某作业上的已用提交次数
    async fn count_attempts(
        &self,
        assignment_id: i64,
        identity: &StudentIdentity,
    ) -> Result<i64>;
    // 列出提交
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 批改：切换检查状态，可同时写入反馈
    async fn set_submission_checked(
        &self,
        id: i64,
        checked: bool,
        checked_by: i64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>>;
    // 批改：单独替换反馈
    async fn set_submission_feedback(
        &self,
        id: i64,
        feedback: String,
    ) -> Result<Option<Submission>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

//! 提交台账存储操作
//!
//! `current_submissions` 只在这里变更，且只通过带条件的原子自增：
//! `UPDATE ... SET current_submissions = current_submissions + 1
//!  WHERE post_id = ? AND (max_submissions <= 0
//!        OR current_submissions < max_submissions)`
//! 零行更新即容量已满。自增、次数复核与提交行写入在同一事务内，
//! 并发提交者不会把计数推过上限。

use super::SeaOrmStorage;
use crate::entity::assignment_details::{Column as DetailColumn, Entity as AssignmentDetails};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    submissions::{
        entities::{StudentIdentity, Submission},
        requests::{NewSubmission, SubmissionListQuery},
        responses::SubmissionListResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 身份匹配条件
///
/// 已登录学生按 student_id 匹配；访客按 student_id 为空 + 名字精确匹配。
/// 同名访客彼此不可区分，这是记录在案的追踪限制，不做模糊兜底。
fn identity_condition(identity: &StudentIdentity) -> Condition {
    match identity {
        StudentIdentity::Registered { id, .. } => {
            Condition::all().add(Column::StudentId.eq(*id))
        }
        StudentIdentity::Guest { name } => Condition::all()
            .add(Column::StudentId.is_null())
            .add(Column::StudentName.eq(name.clone())),
    }
}

impl SeaOrmStorage {
    /// 统计某身份在某作业上的已用提交次数
    pub async fn count_attempts_impl(
        &self,
        assignment_id: i64,
        identity: &StudentIdentity,
    ) -> Result<i64> {
        self.count_attempts_on(&self.db, assignment_id, identity)
            .await
    }

    async fn count_attempts_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        assignment_id: i64,
        identity: &StudentIdentity,
    ) -> Result<i64> {
        let count = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(identity_condition(identity))
            .count(conn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("统计提交次数失败: {e}")))?;

        Ok(count as i64)
    }

    /// 上账一次提交
    ///
    /// 事务内依次：详情行存在性、次数上限复核、原子容量抢占、提交行写入。
    /// 任何一步拒绝都整体回滚，不留下半截提交。
    pub async fn record_submission_impl(
        &self,
        input: NewSubmission,
        attempt_cap: i64,
    ) -> Result<Submission> {
        use sea_orm::ExprTrait;
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;

        // 作业是否存在
        let detail = AssignmentDetails::find()
            .filter(DetailColumn::PostId.eq(input.assignment_id))
            .one(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询作业详情失败: {e}")))?;

        if detail.is_none() {
            return Err(CourseHubError::not_found(format!(
                "作业不存在: {}",
                input.assignment_id
            )));
        }

        // 次数上限复核（与写入同事务）
        let used = self
            .count_attempts_on(&txn, input.assignment_id, &input.identity)
            .await?;
        if attempt_cap > 0 && used >= attempt_cap {
            return Err(CourseHubError::attempt_cap_exceeded(format!(
                "该身份在作业 {} 上已提交 {used} 次，上限 {attempt_cap} 次",
                input.assignment_id
            )));
        }

        // 原子容量抢占：零行更新即容量已满
        let claimed = AssignmentDetails::update_many()
            .col_expr(
                DetailColumn::CurrentSubmissions,
                Expr::col(DetailColumn::CurrentSubmissions).add(1),
            )
            .filter(DetailColumn::PostId.eq(input.assignment_id))
            .filter(
                Condition::any()
                    .add(DetailColumn::MaxSubmissions.lte(0))
                    .add(
                        Expr::col(DetailColumn::CurrentSubmissions)
                            .lt(Expr::col(DetailColumn::MaxSubmissions)),
                    ),
            )
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("容量抢占失败: {e}")))?;

        if claimed.rows_affected == 0 {
            return Err(CourseHubError::capacity_exceeded(format!(
                "作业 {} 已达到提交容量上限",
                input.assignment_id
            )));
        }

        // 提交行写入
        let model = ActiveModel {
            assignment_id: Set(input.assignment_id),
            student_id: Set(input.identity.student_id()),
            student_name: Set(input.identity.display_name().to_string()),
            file_url: Set(input.file_url),
            file_name: Set(input.file_name),
            comment: Set(input.comment),
            submitted_at: Set(now),
            is_checked: Set(false),
            checked_by: Set(None),
            checked_at: Set(None),
            feedback: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CourseHubError::database_operation(format!("创建提交失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(model.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出提交（分页）
    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Submissions::find().filter(Column::AssignmentId.eq(query.assignment_id));

        // 学生只看自己的提交
        if let Some(ref identity) = query.only_identity {
            select = select.filter(identity_condition(identity));
        }

        // 排序
        select = select.order_by_desc(Column::SubmittedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交页数失败: {e}")))?;

        let submissions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(SubmissionListResponse {
            items: submissions
                .into_iter()
                .map(|m| m.into_submission())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 批改：切换检查状态
    ///
    /// 置为已检查时盖上 checked_by / checked_at；
    /// 取消检查时两者一并清空，反复调用结果一致。
    pub async fn set_submission_checked_impl(
        &self,
        submission_id: i64,
        checked: bool,
        checked_by: i64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        let Some(model) = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = model.into();
        if checked {
            active.is_checked = Set(true);
            active.checked_by = Set(Some(checked_by));
            active.checked_at = Set(Some(chrono::Utc::now().timestamp()));
        } else {
            active.is_checked = Set(false);
            active.checked_by = Set(None);
            active.checked_at = Set(None);
        }
        if let Some(feedback) = feedback {
            active.feedback = Set(Some(feedback));
        }

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新检查状态失败: {e}")))?;

        Ok(Some(updated.into_submission()))
    }

    /// 批改：单独替换反馈
    pub async fn set_submission_feedback_impl(
        &self,
        submission_id: i64,
        feedback: String,
    ) -> Result<Option<Submission>> {
        let Some(model) = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = model.into();
        active.feedback = Set(Some(feedback));

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新反馈失败: {e}")))?;

        Ok(Some(updated.into_submission()))
    }
}

//! 作业记录存储操作
//!
//! 公告记录与详情记录是同一个逻辑实体的两半：
//! 创建与删除都在单个事务内完成，保证不会出现只有一半的孤儿记录。

use super::SeaOrmStorage;
use crate::entity::assignment_details::{
    ActiveModel as DetailActiveModel, Column as DetailColumn, Entity as AssignmentDetails,
};
use crate::entity::assignment_posts::{
    ActiveModel as PostActiveModel, Column as PostColumn, Entity as AssignmentPosts,
};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{CourseHubError, Result};
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{Assignment, AssignmentGuarded},
        requests::{AssignmentListQuery, AssignmentUpdate, NewAssignment},
        responses::AssignmentListResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业（两表同事务）
    ///
    /// 详情写入失败时整个事务回滚，公告记录不会单独存活；
    /// 回滚本身失败属于一致性故障，带着公告 ID 上抛，便于人工清理。
    pub async fn create_assignment_impl(&self, input: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;

        let post = PostActiveModel {
            title: Set(input.title),
            content: Set(input.content),
            class_level: Set(input.class_level),
            author_id: Set(input.author_id),
            instructor_id: Set(input.instructor_id),
            views: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CourseHubError::database_operation(format!("创建作业公告失败: {e}")))?;

        let detail_result = DetailActiveModel {
            post_id: Set(post.id),
            due_date: Set(input.due_date.map(|d| d.timestamp())),
            max_submissions: Set(input.max_submissions),
            current_submissions: Set(0),
            access_secret_hash: Set(input.access_secret_hash),
            ..Default::default()
        }
        .insert(&txn)
        .await;

        let detail = match detail_result {
            Ok(detail) => detail,
            Err(e) => {
                let post_id = post.id;
                if let Err(rollback_err) = txn.rollback().await {
                    return Err(CourseHubError::consistency(format!(
                        "详情写入失败且回滚失败，公告记录 {post_id} 可能残留: {e}; 回滚错误: {rollback_err}"
                    )));
                }
                return Err(CourseHubError::database_operation(format!(
                    "创建作业详情失败: {e}"
                )));
            }
        };

        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(post.into_assignment(detail))
    }

    /// 通过 ID 获取作业组合视图
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        Ok(self
            .get_assignment_guarded_impl(id)
            .await?
            .map(|guarded| guarded.assignment))
    }

    /// 通过 ID 获取含密钥哈希的内部视图
    pub async fn get_assignment_guarded_impl(&self, id: i64) -> Result<Option<AssignmentGuarded>> {
        let result = AssignmentPosts::find_by_id(id)
            .find_also_related(AssignmentDetails)
            .one(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询作业失败: {e}")))?;

        match result {
            Some((post, Some(detail))) => {
                let hash = detail.access_secret_hash.clone();
                Ok(Some(AssignmentGuarded {
                    assignment: post.into_assignment(detail),
                    access_secret_hash: hash,
                }))
            }
            // 公告存在但详情缺失：两表不变式被破坏，必须上抛而不是装作没查到
            Some((post, None)) => Err(CourseHubError::consistency(format!(
                "作业 {} 缺少详情记录",
                post.id
            ))),
            None => Ok(None),
        }
    }

    /// 列出作业（分页，按可见层级收窄）
    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = AssignmentPosts::find().find_also_related(AssignmentDetails);

        // 可见性收窄（None 表示管理员，不收窄）
        if let Some(levels) = query.visible_levels {
            select = select.filter(PostColumn::ClassLevel.is_in(levels));
        }

        // 显式层级过滤
        if let Some(ref level) = query.level {
            select = select.filter(PostColumn::ClassLevel.eq(level.clone()));
        }

        // 排序
        select = select.order_by_desc(PostColumn::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询作业总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询作业页数失败: {e}")))?;

        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询作业列表失败: {e}")))?;

        let mut items = Vec::with_capacity(rows.len());
        for (post, detail) in rows {
            let detail = detail.ok_or_else(|| {
                CourseHubError::consistency(format!("作业 {} 缺少详情记录", post.id))
            })?;
            items.push(post.into_assignment(detail));
        }

        Ok(AssignmentListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 部分更新作业
    ///
    /// 只改动显式给出的字段，updated_at 总是刷新。
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: AssignmentUpdate,
    ) -> Result<Option<Assignment>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = AssignmentPosts::find_by_id(id)
            .find_also_related(AssignmentDetails)
            .one(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("查询作业失败: {e}")))?;

        let (post, detail) = match existing {
            Some((post, Some(detail))) => (post, detail),
            Some((post, None)) => {
                return Err(CourseHubError::consistency(format!(
                    "作业 {} 缺少详情记录",
                    post.id
                )));
            }
            None => return Ok(None),
        };

        let mut post_active: PostActiveModel = post.into();
        if let Some(title) = update.title {
            post_active.title = Set(title);
        }
        if let Some(content) = update.content {
            post_active.content = Set(content);
        }
        if let Some(class_level) = update.class_level {
            post_active.class_level = Set(class_level);
        }
        post_active.updated_at = Set(now);

        let post = post_active
            .update(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新作业公告失败: {e}")))?;

        let detail_touched = update.due_date.is_some()
            || update.max_submissions.is_some()
            || update.access_secret_hash.is_some();

        let detail = if detail_touched {
            let mut detail_active: DetailActiveModel = detail.into();
            if let Some(due_date) = update.due_date {
                detail_active.due_date = Set(Some(due_date.timestamp()));
            }
            if let Some(max_submissions) = update.max_submissions {
                detail_active.max_submissions = Set(max_submissions);
            }
            if let Some(hash) = update.access_secret_hash {
                detail_active.access_secret_hash = Set(Some(hash));
            }

            detail_active
                .update(&txn)
                .await
                .map_err(|e| CourseHubError::database_operation(format!("更新作业详情失败: {e}")))?
        } else {
            detail
        };

        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(post.into_assignment(detail)))
    }

    /// 删除作业（级联删除详情与提交）
    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("开启事务失败: {e}")))?;

        Submissions::delete_many()
            .filter(SubmissionColumn::AssignmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除作业提交失败: {e}")))?;

        AssignmentDetails::delete_many()
            .filter(DetailColumn::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除作业详情失败: {e}")))?;

        let result = AssignmentPosts::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("删除作业公告失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| CourseHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 浏览计数自增
    pub async fn increment_views_impl(&self, id: i64) -> Result<bool> {
        use sea_orm::ExprTrait;
        let result = AssignmentPosts::update_many()
            .col_expr(PostColumn::Views, Expr::col(PostColumn::Views).add(1))
            .filter(PostColumn::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| CourseHubError::database_operation(format!("更新浏览计数失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

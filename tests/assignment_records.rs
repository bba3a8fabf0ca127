//! 作业记录存储测试：两表同生共死、部分更新、级联删除、浏览计数。

mod common;

use common::{new_assignment, test_storage};
use rust_coursehub::errors::CourseHubError;
use rust_coursehub::models::assignments::requests::{AssignmentListQuery, AssignmentUpdate};
use rust_coursehub::models::submissions::entities::StudentIdentity;
use rust_coursehub::models::submissions::requests::NewSubmission;
use rust_coursehub::utils::secret::hash_secret;

fn list_all_query() -> AssignmentListQuery {
    AssignmentListQuery {
        page: Some(1),
        size: Some(50),
        visible_levels: None,
        level: None,
    }
}

#[tokio::test]
async fn create_returns_combined_view() {
    let storage = test_storage().await;

    let mut input = new_assignment("第一周作业", "grade-1", 5);
    input.access_secret_hash = Some(hash_secret("abc123").unwrap());
    input.due_date = Some(chrono::Utc::now() + chrono::Duration::days(7));

    let created = storage.create_assignment(input).await.unwrap();
    assert_eq!(created.title, "第一周作业");
    assert_eq!(created.class_level, "grade-1");
    assert_eq!(created.max_submissions, 5);
    assert_eq!(created.current_submissions, 0);
    assert!(created.has_password);
    assert!(created.due_date.is_some());
    assert_eq!(created.views, 0);

    let fetched = storage.get_assignment_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, "第一周作业");
    assert!(fetched.has_password);
}

#[tokio::test]
async fn forced_detail_failure_leaves_no_orphan_post() {
    let storage = test_storage().await;

    // max_submissions 为负违反详情表 CHECK 约束，详情写入必然失败
    let poisoned = new_assignment("坏作业", "grade-1", -1);
    let result = storage.create_assignment(poisoned).await;
    assert!(result.is_err());

    // 公告记录不允许单独存活
    let listed = storage
        .list_assignments_with_pagination(list_all_query())
        .await
        .unwrap();
    assert_eq!(listed.pagination.total, 0);
    assert!(listed.items.is_empty());
}

#[tokio::test]
async fn partial_update_touches_only_given_fields() {
    let storage = test_storage().await;

    let mut input = new_assignment("原标题", "grade-1", 3);
    input.access_secret_hash = Some(hash_secret("abc123").unwrap());
    let created = storage.create_assignment(input).await.unwrap();

    // updated_at 以秒记，隔一秒再更新才能观察到刷新
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let updated = storage
        .update_assignment(
            created.id,
            AssignmentUpdate {
                title: Some("新标题".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "新标题");
    // 未给出的字段保持不变
    assert_eq!(updated.content, created.content);
    assert_eq!(updated.class_level, "grade-1");
    assert_eq!(updated.max_submissions, 3);
    assert!(updated.has_password);
    // updated_at 总是刷新
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_missing_assignment_returns_none() {
    let storage = test_storage().await;
    let result = storage
        .update_assignment(
            999,
            AssignmentUpdate {
                title: Some("x".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn delete_cascades_to_submissions() {
    let storage = test_storage().await;

    let created = storage
        .create_assignment(new_assignment("要删除的作业", "grade-1", 0))
        .await
        .unwrap();

    let identity = StudentIdentity::Guest {
        name: "张三".to_string(),
    };
    storage
        .record_submission(
            NewSubmission {
                assignment_id: created.id,
                identity: identity.clone(),
                file_url: "http://files.test/a".to_string(),
                file_name: "a.txt".to_string(),
                comment: None,
            },
            1,
        )
        .await
        .unwrap();

    assert!(storage.delete_assignment(created.id).await.unwrap());

    // 公告、详情、提交一并消失
    assert!(storage.get_assignment_by_id(created.id).await.unwrap().is_none());
    assert_eq!(storage.count_attempts(created.id, &identity).await.unwrap(), 0);

    // 再删一次返回 false
    assert!(!storage.delete_assignment(created.id).await.unwrap());
}

#[tokio::test]
async fn increment_views_is_monotonic() {
    let storage = test_storage().await;
    let created = storage
        .create_assignment(new_assignment("热门作业", "grade-1", 0))
        .await
        .unwrap();

    assert!(storage.increment_views(created.id).await.unwrap());
    assert!(storage.increment_views(created.id).await.unwrap());

    let fetched = storage.get_assignment_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.views, 2);

    // 不存在的作业自增返回 false 而不是错误
    assert!(!storage.increment_views(999).await.unwrap());
}

#[tokio::test]
async fn listing_narrows_by_visible_levels() {
    let storage = test_storage().await;
    storage
        .create_assignment(new_assignment("一年级作业", "grade-1", 0))
        .await
        .unwrap();
    storage
        .create_assignment(new_assignment("二年级作业", "grade-2", 0))
        .await
        .unwrap();

    // 管理员视角：不收窄
    let all = storage
        .list_assignments_with_pagination(list_all_query())
        .await
        .unwrap();
    assert_eq!(all.pagination.total, 2);

    // 学生视角：只看所属层级
    let scoped = storage
        .list_assignments_with_pagination(AssignmentListQuery {
            visible_levels: Some(vec!["grade-1".to_string()]),
            ..list_all_query()
        })
        .await
        .unwrap();
    assert_eq!(scoped.pagination.total, 1);
    assert_eq!(scoped.items[0].class_level, "grade-1");

    // 无层级的调用方什么都看不到
    let none = storage
        .list_assignments_with_pagination(AssignmentListQuery {
            visible_levels: Some(vec![]),
            ..list_all_query()
        })
        .await
        .unwrap();
    assert_eq!(none.pagination.total, 0);

    // 显式层级过滤叠加生效
    let filtered = storage
        .list_assignments_with_pagination(AssignmentListQuery {
            level: Some("grade-2".to_string()),
            ..list_all_query()
        })
        .await
        .unwrap();
    assert_eq!(filtered.pagination.total, 1);
    assert_eq!(filtered.items[0].class_level, "grade-2");
}

#[tokio::test]
async fn guarded_view_exposes_hash_only_internally() {
    let storage = test_storage().await;
    let mut input = new_assignment("受保护作业", "grade-1", 0);
    input.access_secret_hash = Some(hash_secret("abc123").unwrap());
    let created = storage.create_assignment(input).await.unwrap();

    let guarded = storage
        .get_assignment_guarded(created.id)
        .await
        .unwrap()
        .unwrap();
    assert!(guarded.access_secret_hash.is_some());
    // 对外组合视图只有布尔标记
    assert!(guarded.assignment.has_password);

    // 组合视图序列化后不携带任何密钥材料
    let json = serde_json::to_string(&guarded.assignment).unwrap();
    assert!(!json.contains("abc123"));
    assert!(!json.contains("hash"));
}

#[tokio::test]
async fn storage_errors_carry_variant() {
    let storage = test_storage().await;
    let err = storage
        .record_submission(
            NewSubmission {
                assignment_id: 12345,
                identity: StudentIdentity::Guest {
                    name: "无名".to_string(),
                },
                file_url: "http://files.test/x".to_string(),
                file_name: "x.txt".to_string(),
                comment: None,
            },
            1,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CourseHubError::NotFound(_)));
}

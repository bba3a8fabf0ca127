//! 提交台账测试：容量不变式（含并发）、次数上限、身份语义、批改工作流。

mod common;

use common::{new_assignment, test_storage};
use rust_coursehub::errors::CourseHubError;
use rust_coursehub::models::submissions::entities::StudentIdentity;
use rust_coursehub::models::submissions::requests::{NewSubmission, SubmissionListQuery};

fn submission(assignment_id: i64, identity: StudentIdentity) -> NewSubmission {
    NewSubmission {
        assignment_id,
        identity,
        file_url: "http://files.test/hw".to_string(),
        file_name: "hw.txt".to_string(),
        comment: Some("请查收".to_string()),
    }
}

fn guest(name: &str) -> StudentIdentity {
    StudentIdentity::Guest {
        name: name.to_string(),
    }
}

fn registered(id: i64, name: &str) -> StudentIdentity {
    StudentIdentity::Registered {
        id,
        name: name.to_string(),
    }
}

/// 容量不变式：并发提交下接受数恰好等于容量，计数不越界。
#[tokio::test]
async fn concurrent_submissions_never_exceed_capacity() {
    let storage = test_storage().await;
    let assignment = storage
        .create_assignment(new_assignment("限量作业", "grade-1", 2))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..5 {
        let storage = storage.clone();
        let input = submission(assignment.id, guest(&format!("学生{i}")));
        handles.push(tokio::spawn(async move {
            storage.record_submission(input, 1).await
        }));
    }

    let mut accepted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(CourseHubError::CapacityExceeded(_)) => rejected += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(accepted, 2);
    assert_eq!(rejected, 3);

    let fetched = storage
        .get_assignment_by_id(assignment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.current_submissions, 2);
}

/// 场景：容量 2，三个学生并发提交，恰好 2 成功 1 拒绝。
#[tokio::test]
async fn three_students_two_seats() {
    let storage = test_storage().await;
    let assignment = storage
        .create_assignment(new_assignment("两个名额", "grade-1", 2))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for id in 1..=3 {
        let storage = storage.clone();
        let input = submission(assignment.id, registered(id, &format!("学生{id}")));
        handles.push(tokio::spawn(async move {
            storage.record_submission(input, 1).await
        }));
    }

    let results: Vec<_> = futures_util::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let capacity_rejected = results
        .iter()
        .filter(|r| matches!(r, Err(CourseHubError::CapacityExceeded(_))))
        .count();
    assert_eq!(accepted, 2);
    assert_eq!(capacity_rejected, 1);

    let fetched = storage
        .get_assignment_by_id(assignment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.current_submissions, 2);
}

#[tokio::test]
async fn attempt_cap_rejects_second_submission() {
    let storage = test_storage().await;
    let assignment = storage
        .create_assignment(new_assignment("一次机会", "grade-1", 0))
        .await
        .unwrap();

    let identity = registered(7, "张三");
    storage
        .record_submission(submission(assignment.id, identity.clone()), 1)
        .await
        .unwrap();

    let err = storage
        .record_submission(submission(assignment.id, identity.clone()), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CourseHubError::AttemptCapExceeded(_)));

    assert_eq!(
        storage.count_attempts(assignment.id, &identity).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn attempt_cap_is_extendable() {
    let storage = test_storage().await;
    let assignment = storage
        .create_assignment(new_assignment("两次机会", "grade-1", 0))
        .await
        .unwrap();

    let identity = registered(7, "张三");
    storage
        .record_submission(submission(assignment.id, identity.clone()), 2)
        .await
        .unwrap();
    storage
        .record_submission(submission(assignment.id, identity.clone()), 2)
        .await
        .unwrap();

    let err = storage
        .record_submission(submission(assignment.id, identity), 2)
        .await
        .unwrap_err();
    assert!(matches!(err, CourseHubError::AttemptCapExceeded(_)));
}

/// 0 容量表示不限量，不是封死。
#[tokio::test]
async fn zero_max_submissions_means_unlimited() {
    let storage = test_storage().await;
    let assignment = storage
        .create_assignment(new_assignment("不限量作业", "grade-1", 0))
        .await
        .unwrap();

    for i in 0..5 {
        storage
            .record_submission(submission(assignment.id, guest(&format!("学生{i}"))), 1)
            .await
            .unwrap();
    }

    let fetched = storage
        .get_assignment_by_id(assignment.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.current_submissions, 5);
    assert_eq!(fetched.max_submissions, 0);
}

/// 访客按名字精确追踪：同名访客共享次数上限（记录在案的限制），
/// 已登录学生不受同名访客影响。
#[tokio::test]
async fn guest_identity_matches_by_exact_name_only() {
    let storage = test_storage().await;
    let assignment = storage
        .create_assignment(new_assignment("身份语义", "grade-1", 0))
        .await
        .unwrap();

    storage
        .record_submission(submission(assignment.id, guest("张三")), 1)
        .await
        .unwrap();

    // 同名访客被视为同一身份
    let err = storage
        .record_submission(submission(assignment.id, guest("张三")), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CourseHubError::AttemptCapExceeded(_)));

    // 名字不同即不同身份
    storage
        .record_submission(submission(assignment.id, guest("张三丰")), 1)
        .await
        .unwrap();

    // 与访客同名的登录学生按用户 ID 追踪，不受影响
    storage
        .record_submission(submission(assignment.id, registered(7, "张三")), 1)
        .await
        .unwrap();

    assert_eq!(
        storage.count_attempts(assignment.id, &guest("张三")).await.unwrap(),
        1
    );
    assert_eq!(
        storage
            .count_attempts(assignment.id, &registered(7, "张三"))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn review_toggle_is_idempotent_and_clears_on_uncheck() {
    let storage = test_storage().await;
    let assignment = storage
        .create_assignment(new_assignment("批改流程", "grade-1", 0))
        .await
        .unwrap();

    let created = storage
        .record_submission(submission(assignment.id, registered(7, "张三")), 1)
        .await
        .unwrap();
    assert!(!created.is_checked);
    assert!(created.checked_by.is_none());
    assert!(created.checked_at.is_none());

    // 置为已检查并附反馈
    let checked = storage
        .set_submission_checked(created.id, true, 10, Some("完成得不错".to_string()))
        .await
        .unwrap()
        .unwrap();
    assert!(checked.is_checked);
    assert_eq!(checked.checked_by, Some(10));
    assert!(checked.checked_at.is_some());
    assert_eq!(checked.feedback.as_deref(), Some("完成得不错"));

    // 重复置为已检查：观察状态一致（时间戳允许被本次调用重盖）
    let checked_again = storage
        .set_submission_checked(created.id, true, 10, None)
        .await
        .unwrap()
        .unwrap();
    assert!(checked_again.is_checked);
    assert_eq!(checked_again.checked_by, Some(10));
    assert!(checked_again.checked_at.unwrap() >= checked.checked_at.unwrap());
    // 未给反馈时保留原反馈
    assert_eq!(checked_again.feedback.as_deref(), Some("完成得不错"));

    // 取消检查：标记与署名、时间一并清空
    let unchecked = storage
        .set_submission_checked(created.id, false, 10, None)
        .await
        .unwrap()
        .unwrap();
    assert!(!unchecked.is_checked);
    assert!(unchecked.checked_by.is_none());
    assert!(unchecked.checked_at.is_none());
    // 反馈独立于检查状态
    assert_eq!(unchecked.feedback.as_deref(), Some("完成得不错"));
}

#[tokio::test]
async fn feedback_replaced_independently_of_checked_state() {
    let storage = test_storage().await;
    let assignment = storage
        .create_assignment(new_assignment("反馈流程", "grade-1", 0))
        .await
        .unwrap();
    let created = storage
        .record_submission(submission(assignment.id, registered(7, "张三")), 1)
        .await
        .unwrap();

    let with_feedback = storage
        .set_submission_feedback(created.id, "第二题有误".to_string())
        .await
        .unwrap()
        .unwrap();
    assert!(!with_feedback.is_checked);
    assert_eq!(with_feedback.feedback.as_deref(), Some("第二题有误"));

    let replaced = storage
        .set_submission_feedback(created.id, "已订正，通过".to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.feedback.as_deref(), Some("已订正，通过"));

    // 不存在的提交返回 None
    assert!(
        storage
            .set_submission_feedback(9999, "x".to_string())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn listing_narrows_to_identity() {
    let storage = test_storage().await;
    let assignment = storage
        .create_assignment(new_assignment("列表范围", "grade-1", 0))
        .await
        .unwrap();

    storage
        .record_submission(submission(assignment.id, registered(7, "张三")), 1)
        .await
        .unwrap();
    storage
        .record_submission(submission(assignment.id, guest("李四")), 1)
        .await
        .unwrap();

    // 全量（批改者视角）
    let all = storage
        .list_submissions_with_pagination(SubmissionListQuery {
            assignment_id: assignment.id,
            only_identity: None,
            page: Some(1),
            size: Some(50),
        })
        .await
        .unwrap();
    assert_eq!(all.pagination.total, 2);

    // 学生视角：只看自己的
    let own = storage
        .list_submissions_with_pagination(SubmissionListQuery {
            assignment_id: assignment.id,
            only_identity: Some(registered(7, "张三")),
            page: Some(1),
            size: Some(50),
        })
        .await
        .unwrap();
    assert_eq!(own.pagination.total, 1);
    assert_eq!(own.items[0].student_id, Some(7));
}

//! 提交 HTTP 接口测试：访客提交、前置检查、截止/容量拒绝、批改接口。

mod common;

use actix_web::{App, test, web};
use std::sync::Arc;

use common::{MemoryObjectStore, bearer_token, multipart_submission, new_assignment, test_storage};
use rust_coursehub::cache::ObjectCache;
use rust_coursehub::cache::object_cache::moka::MokaCacheWrapper;
use rust_coursehub::models::submissions::entities::StudentIdentity;
use rust_coursehub::models::submissions::requests::NewSubmission;
use rust_coursehub::objstore::ObjectStore;
use rust_coursehub::routes;
use rust_coursehub::storage::Storage;

macro_rules! init_app {
    ($storage:expr, $objstore:expr) => {{
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::new().expect("cache init"));
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new(cache))
                .app_data(web::Data::new($objstore.clone()))
                .configure(routes::configure_assignments_routes)
                .configure(routes::configure_submissions_routes),
        )
        .await
    }};
}

fn submit_request(
    assignment_id: i64,
    student_name: Option<&str>,
) -> actix_web::test::TestRequest {
    let (content_type, body) = multipart_submission("hw.txt", "我的作业内容", student_name, Some("请查收"));
    test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{assignment_id}/submissions"))
        .insert_header(("content-type", content_type))
        .set_payload(body)
}

#[actix_web::test]
async fn guest_submission_and_precheck_flow() {
    let storage: Arc<dyn Storage> = test_storage().await;
    let mem_store = MemoryObjectStore::new();
    let objstore: Arc<dyn ObjectStore> = mem_store.clone();
    let assignment = storage
        .create_assignment(new_assignment("访客作业", "grade-1", 0))
        .await
        .unwrap();
    let app = init_app!(storage, objstore);

    // 前置检查：尚未提交
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{}/submissions/check", assignment.id))
        .set_json(serde_json::json!({"student_name": "张三"}))
        .to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["data"]["already_submitted"], false);
    assert_eq!(json["data"]["attempts_used"], 0);
    assert_eq!(json["data"]["attempts_remaining"], 1);
    assert!(json["data"]["capacity_remaining"].is_null()); // 不限量

    // 访客提交成功
    let resp = test::call_service(&app, submit_request(assignment.id, Some("张三")).to_request()).await;
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["data"]["student_name"], "张三");
    assert!(json["data"]["student_id"].is_null());
    assert_eq!(json["data"]["is_checked"], false);
    assert_eq!(json["data"]["file_name"], "hw.txt");
    assert!(
        json["data"]["file_url"]
            .as_str()
            .unwrap()
            .starts_with("http://files.test/")
    );

    // 前置检查：已提交、无剩余次数
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{}/submissions/check", assignment.id))
        .set_json(serde_json::json!({"student_name": "张三"}))
        .to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["data"]["already_submitted"], true);
    assert_eq!(json["data"]["attempts_remaining"], 0);

    // 超过次数上限的提交被拒，且不会再上传对象
    let resp = test::call_service(&app, submit_request(assignment.id, Some("张三")).to_request()).await;
    assert_eq!(resp.status(), 409);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["code"], 2104);
    assert_eq!(mem_store.uploaded.lock().unwrap().len(), 1);

    // 既无令牌又无名字 → 400
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{}/submissions/check", assignment.id))
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn deadline_is_enforced_at_submit_time() {
    let storage: Arc<dyn Storage> = test_storage().await;
    let objstore: Arc<dyn ObjectStore> = MemoryObjectStore::new();

    let mut expired = new_assignment("已截止作业", "grade-1", 0);
    expired.due_date = Some(chrono::Utc::now() - chrono::Duration::seconds(1));
    let expired = storage.create_assignment(expired).await.unwrap();

    let mut open = new_assignment("未截止作业", "grade-1", 0);
    open.due_date = Some(chrono::Utc::now() + chrono::Duration::seconds(5));
    let open = storage.create_assignment(open).await.unwrap();

    let app = init_app!(storage, objstore);

    // 截止后一秒 → 409
    let resp = test::call_service(&app, submit_request(expired.id, Some("张三")).to_request()).await;
    assert_eq!(resp.status(), 409);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["code"], 2102);

    // 截止前 → 成功
    let resp = test::call_service(&app, submit_request(open.id, Some("张三")).to_request()).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn capacity_rejection_over_http() {
    let storage: Arc<dyn Storage> = test_storage().await;
    let mem_store = MemoryObjectStore::new();
    let objstore: Arc<dyn ObjectStore> = mem_store.clone();
    let assignment = storage
        .create_assignment(new_assignment("一个名额", "grade-1", 1))
        .await
        .unwrap();
    let app = init_app!(storage, objstore);

    let resp = test::call_service(&app, submit_request(assignment.id, Some("张三")).to_request()).await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(&app, submit_request(assignment.id, Some("李四")).to_request()).await;
    assert_eq!(resp.status(), 409);
    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["code"], 2103);

    // 容量拒绝发生在上传之前，被拒的提交不产生对象
    assert_eq!(mem_store.uploaded.lock().unwrap().len(), 1);

    let fetched = storage.get_assignment_by_id(assignment.id).await.unwrap().unwrap();
    assert_eq!(fetched.current_submissions, 1);

    // 不存在的作业 → 404
    let resp = test::call_service(&app, submit_request(9999, Some("张三")).to_request()).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn review_endpoints_require_owning_reviewer() {
    let storage: Arc<dyn Storage> = test_storage().await;
    let objstore: Arc<dyn ObjectStore> = MemoryObjectStore::new();
    let assignment = storage
        .create_assignment(new_assignment("批改作业", "grade-1", 0))
        .await
        .unwrap();
    let submission = storage
        .record_submission(
            NewSubmission {
                assignment_id: assignment.id,
                identity: StudentIdentity::Registered {
                    id: 7,
                    name: "张三".to_string(),
                },
                file_url: "http://files.test/hw".to_string(),
                file_name: "hw.txt".to_string(),
                comment: None,
            },
            1,
        )
        .await
        .unwrap();

    let app = init_app!(storage, objstore);
    let check_uri = format!(
        "/api/v1/assignments/{}/submissions/{}/check",
        assignment.id, submission.id
    );

    // 学生被角色中间件拦下
    let req = test::TestRequest::patch()
        .uri(&check_uri)
        .insert_header((
            "Authorization",
            format!("Bearer {}", bearer_token(7, "张三", "student", Some("grade-1"))),
        ))
        .set_json(serde_json::json!({"checked": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // 不相关讲师在业务层被拒
    let req = test::TestRequest::patch()
        .uri(&check_uri)
        .insert_header((
            "Authorization",
            format!("Bearer {}", bearer_token(30, "别的老师", "instructor", Some("grade-1"))),
        ))
        .set_json(serde_json::json!({"checked": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let owner = bearer_token(10, "王老师", "instructor", Some("grade-1"));

    // 发布者批改：置为已检查并附反馈
    let req = test::TestRequest::patch()
        .uri(&check_uri)
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .set_json(serde_json::json!({"checked": true, "feedback": "完成得不错"}))
        .to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["code"], 0);
    assert_eq!(json["data"]["is_checked"], true);
    assert_eq!(json["data"]["checked_by"], 10);
    assert_eq!(json["data"]["feedback"], "完成得不错");

    // 单独替换反馈，检查状态不动
    let req = test::TestRequest::patch()
        .uri(&format!(
            "/api/v1/assignments/{}/submissions/{}/feedback",
            assignment.id, submission.id
        ))
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .set_json(serde_json::json!({"feedback": "第二题再想想"}))
        .to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["data"]["feedback"], "第二题再想想");
    assert_eq!(json["data"]["is_checked"], true);

    // 取消检查：署名与时间清空
    let req = test::TestRequest::patch()
        .uri(&check_uri)
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .set_json(serde_json::json!({"checked": false}))
        .to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["data"]["is_checked"], false);
    assert!(json["data"]["checked_by"].is_null());
    assert!(json["data"]["checked_at"].is_null());

    // 提交不属于路径里的作业 → 404
    let other = storage
        .create_assignment(new_assignment("另一个作业", "grade-1", 0))
        .await
        .unwrap();
    let req = test::TestRequest::patch()
        .uri(&format!(
            "/api/v1/assignments/{}/submissions/{}/check",
            other.id, submission.id
        ))
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .set_json(serde_json::json!({"checked": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn students_list_only_their_own_submissions() {
    let storage: Arc<dyn Storage> = test_storage().await;
    let objstore: Arc<dyn ObjectStore> = MemoryObjectStore::new();
    let assignment = storage
        .create_assignment(new_assignment("列表作业", "grade-1", 0))
        .await
        .unwrap();

    for identity in [
        StudentIdentity::Registered {
            id: 7,
            name: "张三".to_string(),
        },
        StudentIdentity::Guest {
            name: "李四".to_string(),
        },
    ] {
        storage
            .record_submission(
                NewSubmission {
                    assignment_id: assignment.id,
                    identity,
                    file_url: "http://files.test/hw".to_string(),
                    file_name: "hw.txt".to_string(),
                    comment: None,
                },
                1,
            )
            .await
            .unwrap();
    }

    let app = init_app!(storage, objstore);
    let list_uri = format!("/api/v1/assignments/{}/submissions", assignment.id);

    // 未登录 → 401
    let req = test::TestRequest::get().uri(&list_uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    // 学生只看到自己的
    let req = test::TestRequest::get()
        .uri(&list_uri)
        .insert_header((
            "Authorization",
            format!("Bearer {}", bearer_token(7, "张三", "student", Some("grade-1"))),
        ))
        .to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["data"]["pagination"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["student_id"], 7);

    // 没交过的学生看到空列表
    let req = test::TestRequest::get()
        .uri(&list_uri)
        .insert_header((
            "Authorization",
            format!("Bearer {}", bearer_token(8, "王五", "student", Some("grade-1"))),
        ))
        .to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["data"]["pagination"]["total"], 0);

    // 发布者讲师看到全部
    let req = test::TestRequest::get()
        .uri(&list_uri)
        .insert_header((
            "Authorization",
            format!("Bearer {}", bearer_token(10, "王老师", "instructor", Some("grade-1"))),
        ))
        .to_request();
    let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["data"]["pagination"]["total"], 2);

    // 不相关讲师 → 403
    let req = test::TestRequest::get()
        .uri(&list_uri)
        .insert_header((
            "Authorization",
            format!("Bearer {}", bearer_token(30, "别的老师", "instructor", Some("grade-1"))),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_web::test]
async fn disallowed_file_types_are_rejected() {
    let storage: Arc<dyn Storage> = test_storage().await;
    let mem_store = MemoryObjectStore::new();
    let objstore: Arc<dyn ObjectStore> = mem_store.clone();
    let assignment = storage
        .create_assignment(new_assignment("文件校验", "grade-1", 0))
        .await
        .unwrap();
    let app = init_app!(storage, objstore);

    let (content_type, body) = multipart_submission("evil.exe", "MZ....", Some("张三"), None);
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{}/submissions", assignment.id))
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert!(mem_store.uploaded.lock().unwrap().is_empty());
}

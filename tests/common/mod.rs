//! 集成测试公共设施：内存 SQLite 存储、内存对象存储、测试令牌。

#![allow(dead_code)]

use async_trait::async_trait;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::{Arc, Mutex};

use rust_coursehub::config::AppConfig;
use rust_coursehub::errors::Result;
use rust_coursehub::models::assignments::requests::NewAssignment;
use rust_coursehub::objstore::{ObjectStore, StoredObject};
use rust_coursehub::storage::{Storage, sea_orm_storage::SeaOrmStorage};
use rust_coursehub::utils::token::IdentityClaims;

/// 内存 SQLite 存储（每次调用独立一个库，迁移已运行）
pub async fn test_storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::from_url(":memory:", 4, 30)
        .await
        .expect("test storage init failed");
    Arc::new(storage)
}

/// 作业创建参数，测试按需覆盖字段
pub fn new_assignment(title: &str, class_level: &str, max_submissions: i64) -> NewAssignment {
    NewAssignment {
        title: title.to_string(),
        content: "完成第一章习题".to_string(),
        class_level: class_level.to_string(),
        due_date: None,
        max_submissions,
        access_secret_hash: None,
        author_id: 10,
        instructor_id: 10,
    }
}

/// 内存对象存储：上传即得 URL，记录所有写入与删除
pub struct MemoryObjectStore {
    pub uploaded: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            uploaded: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, file_name: &str, _data: Vec<u8>) -> Result<StoredObject> {
        let key = format!("obj-{}-{}", self.uploaded.lock().unwrap().len(), file_name);
        self.uploaded.lock().unwrap().push(key.clone());
        Ok(StoredObject {
            url: format!("http://files.test/{key}"),
            key,
        })
    }

    async fn remove_object(&self, key: &str) {
        self.removed.lock().unwrap().push(key.to_string());
    }
}

/// 生成测试身份令牌（与默认配置的验签密钥一致）
pub fn bearer_token(id: i64, name: &str, role: &str, class_level: Option<&str>) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = IdentityClaims {
        sub: id.to_string(),
        name: name.to_string(),
        email: format!("{name}@example.com"),
        role: role.to_string(),
        class_level: class_level.map(|s| s.to_string()),
        exp: now + 3600,
        iat: now,
    };

    let secret = AppConfig::get().auth.token_secret.clone();
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .expect("token encoding failed")
}

/// 构造 multipart 提交体，返回 (content-type, body)
pub fn multipart_submission(
    file_name: &str,
    file_content: &str,
    student_name: Option<&str>,
    comment: Option<&str>,
) -> (String, Vec<u8>) {
    let boundary = "----coursehub-test-boundary";
    let mut body = String::new();

    body.push_str(&format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n{file_content}\r\n"
    ));
    if let Some(student_name) = student_name {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"student_name\"\r\n\r\n{student_name}\r\n"
        ));
    }
    if let Some(comment) = comment {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"comment\"\r\n\r\n{comment}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    (
        format!("multipart/form-data; boundary={boundary}"),
        body.into_bytes(),
    )
}

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::declare_object_store_plugin;
use crate::errors::{CourseHubError, Result};
use crate::objstore::{ObjectStore, StoredObject};

declare_object_store_plugin!("local", LocalObjectStore);

/// 本地磁盘后端
///
/// 开发与单机部署使用；对象键为 "时间戳-uuid.bin"，
/// 公开 URL 由配置的前缀拼接对象键得到。
pub struct LocalObjectStore {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new() -> std::result::Result<Self, String> {
        let config = AppConfig::get();
        let dir = PathBuf::from(&config.object_store.local_dir);

        if !dir.exists() {
            std::fs::create_dir_all(&dir)
                .map_err(|e| format!("创建对象存储目录失败: {e}"))?;
        }

        debug!("LocalObjectStore initialized at {}", dir.display());
        Ok(Self {
            dir,
            public_base_url: config
                .object_store
                .public_base_url
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_object(&self, file_name: &str, data: Vec<u8>) -> Result<StoredObject> {
        // 对象键不复用原始文件名，避免路径注入和重名覆盖
        let key = format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
        let path = self.object_path(&key);

        tokio::fs::write(&path, data).await.map_err(|e| {
            CourseHubError::object_store(format!("写入对象失败 ({file_name}): {e}"))
        })?;

        debug!("Stored object {} as {}", file_name, key);
        Ok(StoredObject {
            url: format!("{}/{}", self.public_base_url, key),
            key,
        })
    }

    async fn remove_object(&self, key: &str) {
        // 键来自本服务生成，仍防御一次目录穿越
        if key.contains('/') || key.contains("..") || Path::new(key).is_absolute() {
            warn!("Refusing to remove suspicious object key: {}", key);
            return;
        }

        if let Err(e) = tokio::fs::remove_file(self.object_path(key)).await {
            warn!("Failed to remove object {}: {}", key, e);
        }
    }
}

//! 对象存储层
//!
//! 提交附件写入外部对象存储，换回可公开访问的持久 URL。
//! 后端通过插件注册表选择；所有上传调用带显式超时，
//! 过期返回存储错误而不是无限挂起调用方。

pub mod local;
pub mod register;

use async_trait::async_trait;
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::{CourseHubError, Result};

/// 已写入对象存储的文件
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// 可公开访问的持久 URL
    pub url: String,
    /// 存储端对象键（用于失败补偿删除）
    pub key: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 写入一个对象，返回公开 URL
    async fn put_object(&self, file_name: &str, data: Vec<u8>) -> Result<StoredObject>;

    /// 尽力而为的删除（上账失败后的补偿路径）
    async fn remove_object(&self, key: &str);
}

/// 带超时的上传封装
///
/// 上传发生在任何数据库事务之外，超时后向调用方返回存储错误。
pub async fn put_object_with_timeout(
    store: &dyn ObjectStore,
    file_name: &str,
    data: Vec<u8>,
) -> Result<StoredObject> {
    let timeout = Duration::from_secs(AppConfig::get().object_store.upload_timeout);
    match tokio::time::timeout(timeout, store.put_object(file_name, data)).await {
        Ok(result) => result,
        Err(_) => Err(CourseHubError::object_store(format!(
            "上传超时（{}s）: {file_name}",
            timeout.as_secs()
        ))),
    }
}

/// 声明一个对象存储插件并在进程启动时自动注册
#[macro_export]
macro_rules! declare_object_store_plugin {
    ($name:literal, $plugin:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_object_store_ $plugin:snake>]() {
                $crate::objstore::register::register_object_store_plugin(
                    $name,
                    std::sync::Arc::new(
                        || -> $crate::objstore::register::BoxedObjectStoreFuture {
                            Box::pin(async {
                                let plugin = $plugin::new().map_err(
                                    $crate::errors::CourseHubError::object_store,
                                )?;
                                Ok(Box::new(plugin) as Box<dyn $crate::objstore::ObjectStore>)
                            })
                        },
                    ),
                );
            }
        }
    };
}

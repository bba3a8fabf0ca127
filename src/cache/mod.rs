//! 对象缓存层
//!
//! 通过插件注册表选择后端（moka 内存缓存 / redis），
//! 当前用于缓存已验证令牌对应的身份声明。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端暂时不可用或值不可读，调用方可按瞬时失败处理
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 声明一个对象缓存插件并在进程启动时自动注册
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $plugin:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_object_cache_ $plugin:snake>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    std::sync::Arc::new(
                        || -> $crate::cache::register::BoxedObjectCacheFuture {
                            Box::pin(async {
                                let plugin = $plugin::new().map_err(
                                    $crate::errors::CourseHubError::cache_connection,
                                )?;
                                Ok(Box::new(plugin) as Box<dyn $crate::cache::ObjectCache>)
                            })
                        },
                    ),
                );
            }
        }
    };
}

//! CourseHub - 课程作业生命周期后端服务
//!
//! 基于 Actix Web 构建的作业生命周期管理后端：
//! 带门禁的作业记录、容量受控的提交台账与批改工作流。
//!
//! # 架构
//! - `cache`: 缓存层（Moka/Redis）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `objstore`: 对象存储层（提交附件）
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod objstore;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;

//! 统一错误处理模块
//!
//! 提供引擎范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **粒子系统错误** (`core::error::ParticleError`): 缓冲区大小校验、
//!   内存分配失败、发射参数校验
//! - **配置错误** (`config::ConfigError`): 配置文件读取与解析
//!
//! 池满不是错误：生成请求会被静默丢弃，`emit` 会被钳制到剩余容量。
//! 内部不变量的违反（例如重复释放同一槽位）属于编程错误，用
//! `debug_assert!` 守护，不做运行时错误传播。

use thiserror::Error;

/// 粒子系统错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParticleError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Out of memory: failed to allocate buffer for {0} particles")]
    OutOfMemory(u32),
}

/// 粒子系统结果类型别名
pub type ParticleResult<T> = Result<T, ParticleError>;

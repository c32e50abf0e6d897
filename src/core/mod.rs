//! 核心模块：错误类型与响应处理

pub mod error;
pub mod response;

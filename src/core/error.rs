//! 核心错误处理模块

use crate::config::ConfigError;

/// 调用 ProductFunction 时的错误类型
///
/// 非 2xx 状态码不算错误，见 [`crate::core::response::ApiReply`]。
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    #[error("HTTP 客户端构建失败: {0}")]
    Build(#[source] reqwest::Error),
    #[error("请求失败: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{0}")]
    Validation(String),
}

/// 命令解析错误
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("未知命令: {0}，输入 help 查看用法")]
    UnknownCommand(String),
    #[error("未知参数: {0}")]
    UnknownField(String),
    #[error("参数格式错误: {0}，应为 key=value")]
    MalformedArgument(String),
    #[error("引号未闭合")]
    UnterminatedQuote,
}

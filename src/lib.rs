//! # ProductFunction 命令行客户端
//!
//! 对远端 ProductFunction 接口执行增删改查，并把结果渲染到两个展示面：
//! - 输出面板：最近一次响应（格式化 JSON 或错误对象）
//! - 产品表格：最近一次列表请求的结果

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::app::product::handler::{dispatch, parse_line, run_shell, Command, Flow};
pub use crate::app::product::model::{Action, LookupForm, Product, ProductForm, ProductKey};
pub use crate::app::product::service::ProductConsole;
pub use crate::app::product::view::{OutputPanel, ProductTable};
pub use crate::config::{ApiConfig, Config, ConfigError, LoggingConfig};
pub use crate::core::error::{ClientError, CommandError};
pub use crate::core::response::{ApiReply, ResponseBody};
pub use crate::infrastructure::product_api::ProductClient;

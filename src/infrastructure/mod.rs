//! 基础设施：日志与 ProductFunction 接口客户端

pub mod logger;
pub mod product_api;

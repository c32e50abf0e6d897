//! 核心响应处理模块

use reqwest::StatusCode;
use serde_json::{json, Value};

/// 响应体：能解析成 JSON 就是 JSON，否则保留原始文本
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }
}

/// 一次调用的结果，状态码原样保留
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl ApiReply {
    pub fn new(status: StatusCode, text: String) -> Self {
        Self {
            status,
            body: ResponseBody::parse(text),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// 转换为输出面板展示的值
    ///
    /// 成功时非 JSON 文本包装为 `{"message": ...}`；失败时保证结果带 `error` 字段。
    pub fn into_output(self) -> Value {
        if self.status.is_success() {
            return match self.body {
                ResponseBody::Json(value) => value,
                ResponseBody::Text(text) => json!({ "message": text }),
            };
        }

        match self.body {
            ResponseBody::Json(Value::Object(map)) if map.contains_key("error") => {
                Value::Object(map)
            }
            ResponseBody::Text(text) if !text.trim().is_empty() => json!({
                "error": text,
                "status": self.status.as_u16(),
            }),
            ResponseBody::Text(text) => json!({
                "error": format!("HTTP {}", self.status),
                "detail": { "message": text },
            }),
            ResponseBody::Json(other) => json!({
                "error": format!("HTTP {}", self.status),
                "detail": other,
            }),
        }
    }

    /// 列表响应：只有 JSON 数组才有行数据
    pub fn into_rows(self) -> Option<Vec<Value>> {
        match self.body {
            ResponseBody::Json(Value::Array(rows)) => Some(rows),
            _ => None,
        }
    }
}

//! 产品数据模型

use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::core::error::{ClientError, CommandError};

/// 与 ProductFunction 交换的产品记录
///
/// `id` 与 `Category` 共同标识一个产品，`Category` 同时是后端的分区键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(min = 1, message = "id 不能为空"))]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "Category", default, deserialize_with = "lenient_string")]
    #[validate(length(min = 1, message = "Category 不能为空"))]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
}

/// 读取、删除时使用的查询键
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ProductKey {
    #[validate(length(min = 1, message = "id 不能为空"))]
    pub id: String,
    #[validate(length(min = 1, message = "Category 不能为空"))]
    pub category: String,
}

/// 产品表单的原始输入（未去空格）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
}

impl ProductForm {
    pub fn to_product(&self) -> Product {
        Product {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            price: parse_price(&self.price),
        }
    }
}

/// 查询表单的原始输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupForm {
    pub id: String,
    pub category: String,
}

impl LookupForm {
    pub fn to_key(&self) -> ProductKey {
        ProductKey {
            id: self.id.trim().to_string(),
            category: self.category.trim().to_string(),
        }
    }
}

/// 保存动作：创建走 POST，更新走 PUT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
}

impl Action {
    pub fn method(self) -> Method {
        match self {
            Action::Create => Method::POST,
            Action::Update => Method::PUT,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Update => write!(f, "update"),
        }
    }
}

impl FromStr for Action {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

/// 缺失提示按字段声明顺序输出
const FIELD_ORDER: [&str; 4] = ["id", "name", "category", "price"];

/// 存在性检查，汇总所有缺失字段的提示
pub fn require_fields<T: Validate>(value: &T) -> Result<(), ClientError> {
    value.validate().map_err(|errors| {
        let mut fields: Vec<(usize, Vec<String>)> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let field = field.to_string();
                let rank = FIELD_ORDER
                    .iter()
                    .position(|f| f.eq_ignore_ascii_case(&field))
                    .unwrap_or(FIELD_ORDER.len());
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (rank, messages)
            })
            .collect();
        fields.sort();
        let messages: Vec<String> = fields.into_iter().flat_map(|(_, m)| m).collect();
        ClientError::Validation(messages.join("; "))
    })
}

/// 解析价格输入
///
/// 取最长的十进制数字前缀，解析不出数字、结果非有限值或为零时都返回 0。
pub fn parse_price(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    // 指数部分必须带至少一位数字才算数
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p != 0.0)
        .unwrap_or(0.0)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_price(&s),
        _ => 0.0,
    })
}

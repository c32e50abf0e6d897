//! 测试用的 ProductFunction 替身服务
//! 行为与线上后端一致：POST/PUT 保存 JSON，GET/DELETE 按 id + Category 查找

#![allow(dead_code)]

use axum::{
    extract::{Query, RawQuery, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use product_console::{ApiConfig, ProductClient, ProductConsole};

pub const ENDPOINT: &str = "/api/ProductFunction";

/// 记录下来的一次请求
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub raw_query: Option<String>,
    pub query: HashMap<String, String>,
    pub body: String,
}

/// 列表接口的响应方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Normal,
    NotArray,
    PlainText,
}

#[derive(Default)]
struct Inner {
    items: Vec<Value>,
    requests: Vec<Recorded>,
    list_mode: Option<ListMode>,
    fail_with: Option<(StatusCode, String)>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.inner.lock().unwrap().requests.clear();
    }

    pub fn items(&self) -> Vec<Value> {
        self.inner.lock().unwrap().items.clone()
    }

    pub fn seed(&self, item: Value) {
        self.inner.lock().unwrap().items.push(item);
    }

    pub fn set_list_mode(&self, mode: ListMode) {
        self.inner.lock().unwrap().list_mode = Some(mode);
    }

    /// 之后所有请求都返回给定状态码和纯文本
    pub fn fail_with(&self, status: StatusCode, text: &str) {
        self.inner.lock().unwrap().fail_with = Some((status, text.to_string()));
    }
}

/// 启动替身服务，返回服务句柄和根地址
pub async fn spawn_backend() -> (MockBackend, String) {
    let backend = MockBackend::default();
    let app = Router::new()
        .route(ENDPOINT, any(product_function))
        .layer(TraceLayer::new_for_http())
        .with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (backend, format!("http://{}", addr))
}

pub fn client_for(base_url: &str) -> ProductClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        ..ApiConfig::default()
    };
    ProductClient::new(&config).unwrap()
}

pub fn console_for(base_url: &str) -> ProductConsole {
    ProductConsole::new(client_for(base_url))
}

fn json_reply(status: StatusCode, value: Value) -> Response {
    (status, Json(value)).into_response()
}

fn same_key(item: &Value, id: &str, category: &str) -> bool {
    item.get("id").and_then(Value::as_str) == Some(id)
        && item.get("Category").and_then(Value::as_str) == Some(category)
}

async fn product_function(
    State(backend): State<MockBackend>,
    method: Method,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> Response {
    let mut inner = backend.inner.lock().unwrap();
    inner.requests.push(Recorded {
        method: method.clone(),
        raw_query,
        query: query.clone(),
        body: body.clone(),
    });

    if let Some((status, text)) = inner.fail_with.clone() {
        return (status, text).into_response();
    }

    let id = query.get("id").cloned().unwrap_or_default();
    let category = query.get("Category").cloned().unwrap_or_default();

    match method {
        Method::POST | Method::PUT => {
            let Ok(data) = serde_json::from_str::<Value>(&body) else {
                return json_reply(StatusCode::BAD_REQUEST, json!({"error": "Invalid JSON"}));
            };
            let missing: Vec<&str> = ["id", "name", "Category", "price"]
                .into_iter()
                .filter(|f| data.get(*f).is_none())
                .collect();
            if !missing.is_empty() {
                return json_reply(
                    StatusCode::BAD_REQUEST,
                    json!({"error": format!("Missing fields: {}", missing.join(", "))}),
                );
            }

            let item_id = data["id"].as_str().unwrap_or_default().to_string();
            let item_category = data["Category"].as_str().unwrap_or_default().to_string();
            let existing = inner
                .items
                .iter()
                .position(|item| same_key(item, &item_id, &item_category));

            if method == Method::POST {
                if existing.is_some() {
                    return json_reply(
                        StatusCode::CONFLICT,
                        json!({"error": format!("Product {} already exists!", item_id)}),
                    );
                }
                inner.items.push(data.clone());
                json_reply(
                    StatusCode::CREATED,
                    json!({"message": "Inserted successfully", "item": data}),
                )
            } else {
                match existing {
                    Some(index) => inner.items[index] = data.clone(),
                    None => inner.items.push(data.clone()),
                }
                json_reply(
                    StatusCode::OK,
                    json!({"message": "Updated successfully", "item": data}),
                )
            }
        }
        Method::GET if !id.is_empty() && !category.is_empty() => {
            match inner.items.iter().find(|item| same_key(item, &id, &category)) {
                Some(item) => json_reply(StatusCode::OK, item.clone()),
                None => json_reply(StatusCode::NOT_FOUND, json!({"error": "Item not found"})),
            }
        }
        Method::GET => match inner.list_mode.unwrap_or(ListMode::Normal) {
            ListMode::Normal => json_reply(StatusCode::OK, Value::Array(inner.items.clone())),
            ListMode::NotArray => json_reply(StatusCode::OK, json!({"items": inner.items.clone()})),
            ListMode::PlainText => (StatusCode::OK, [(header::CONTENT_TYPE, "text/plain")], "no products")
                .into_response(),
        },
        Method::DELETE => {
            if id.is_empty() || category.is_empty() {
                return json_reply(
                    StatusCode::BAD_REQUEST,
                    json!({"error": "Missing id or Category"}),
                );
            }
            let before = inner.items.len();
            inner.items.retain(|item| !same_key(item, &id, &category));
            if inner.items.len() < before {
                json_reply(StatusCode::OK, json!({"message": "Deleted successfully"}))
            } else {
                json_reply(StatusCode::NOT_FOUND, json!({"error": "Item not found"}))
            }
        }
        _ => json_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            json!({"error": "Method not allowed"}),
        ),
    }
}

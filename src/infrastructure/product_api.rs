//! ProductFunction 接口客户端

use reqwest::{header, Client, Method, RequestBuilder, Url};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::app::product::model::{Action, Product, ProductKey};
use crate::config::ApiConfig;
use crate::core::error::ClientError;
use crate::core::response::ApiReply;

/// 请求关联 ID 头
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ProductFunction 客户端，每个操作只发一次请求
#[derive(Debug, Clone)]
pub struct ProductClient {
    http: Client,
    endpoint: Url,
}

impl ProductClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let endpoint = config.endpoint_url()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// 创建产品 (POST)
    pub async fn create(&self, product: &Product) -> Result<ApiReply, ClientError> {
        self.save(Action::Create, product).await
    }

    /// 更新产品 (PUT)
    pub async fn update(&self, product: &Product) -> Result<ApiReply, ClientError> {
        self.save(Action::Update, product).await
    }

    /// 按动作保存产品，请求方法由 [`Action::method`] 决定
    pub async fn save(&self, action: Action, product: &Product) -> Result<ApiReply, ClientError> {
        let method = action.method();
        let request = self
            .http
            .request(method.clone(), self.endpoint.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .json(product);
        self.send(method, request).await
    }

    /// 按 id 和 Category 读取产品
    pub async fn read(&self, key: &ProductKey) -> Result<ApiReply, ClientError> {
        self.keyed(Method::GET, key).await
    }

    /// 按 id 和 Category 删除产品
    pub async fn delete(&self, key: &ProductKey) -> Result<ApiReply, ClientError> {
        self.keyed(Method::DELETE, key).await
    }

    /// 获取所有产品
    ///
    /// 响应不是 JSON 数组时返回空列表；数组里无法识别的元素会被跳过。
    pub async fn list(&self) -> Result<Vec<Product>, ClientError> {
        let reply = self.send(Method::GET, self.http.get(self.endpoint.clone())).await?;
        let status = reply.status;

        let Some(rows) = reply.into_rows() else {
            warn!(status = status.as_u16(), "产品列表响应不是数组");
            return Ok(Vec::new());
        };

        let products = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Product>(row) {
                Ok(product) => Some(product),
                Err(e) => {
                    warn!(error = %e, "跳过无法识别的产品记录");
                    None
                }
            })
            .collect();

        Ok(products)
    }

    async fn keyed(&self, method: Method, key: &ProductKey) -> Result<ApiReply, ClientError> {
        let request = self
            .http
            .request(method.clone(), self.endpoint.clone())
            .query(&[("id", key.id.as_str()), ("Category", key.category.as_str())]);
        self.send(method, request).await
    }

    async fn send(&self, method: Method, request: RequestBuilder) -> Result<ApiReply, ClientError> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, %method, url = %self.endpoint, "发送请求");

        let response = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        info!(%request_id, %method, status = status.as_u16(), "收到响应");
        Ok(ApiReply::new(status, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_endpoint() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:7071/ignored/".to_string(),
            ..ApiConfig::default()
        };
        let client = ProductClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "http://127.0.0.1:7071/api/ProductFunction"
        );
    }

    #[test]
    fn test_client_rejects_bad_url() {
        let config = ApiConfig {
            base_url: "::::".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            ProductClient::new(&config),
            Err(ClientError::Config(_))
        ));
    }
}

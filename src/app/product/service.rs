//! 产品控制台：四个用户操作

use tracing::{error, warn};

use super::model::{require_fields, Action, LookupForm, ProductForm};
use super::view::{OutputPanel, ProductTable};
use crate::core::response::ApiReply;
use crate::infrastructure::product_api::ProductClient;

/// 持有客户端和两个展示面，相当于原来的页面
pub struct ProductConsole {
    client: ProductClient,
    output: OutputPanel,
    table: ProductTable,
    list_failed: bool,
}

impl ProductConsole {
    pub fn new(client: ProductClient) -> Self {
        Self {
            client,
            output: OutputPanel::default(),
            table: ProductTable::default(),
            list_failed: false,
        }
    }

    pub fn output(&self) -> &OutputPanel {
        &self.output
    }

    pub fn table(&self) -> &ProductTable {
        &self.table
    }

    /// 最近一次列表请求是否因请求失败而没有更新表格
    pub fn list_failed(&self) -> bool {
        self.list_failed
    }

    /// 创建或更新产品，成功后刷新列表
    pub async fn create_or_update(&mut self, action: Action, form: &ProductForm) {
        let product = form.to_product();
        if let Err(e) = require_fields(&product) {
            warn!(%action, error = %e, "产品字段缺失");
            self.output.show_error(e.to_string());
            return;
        }

        match self.client.save(action, &product).await {
            Ok(reply) => {
                if self.show_reply(reply) {
                    self.load_all_products().await;
                }
            }
            Err(e) => {
                error!(%action, error = %e, "保存产品失败");
                self.output.show_error(e.to_string());
            }
        }
    }

    /// 按 id 和 Category 读取产品
    pub async fn read_product(&mut self, form: &LookupForm) {
        let key = form.to_key();
        if let Err(e) = require_fields(&key) {
            warn!(error = %e, "查询参数缺失");
            self.output.show_error(e.to_string());
            return;
        }

        match self.client.read(&key).await {
            Ok(reply) => {
                self.show_reply(reply);
            }
            Err(e) => {
                error!(error = %e, "读取产品失败");
                self.output.show_error(e.to_string());
            }
        }
    }

    /// 删除产品，成功后刷新列表
    pub async fn delete_product(&mut self, form: &LookupForm) {
        let key = form.to_key();
        if let Err(e) = require_fields(&key) {
            warn!(error = %e, "查询参数缺失");
            self.output.show_error(e.to_string());
            return;
        }

        match self.client.delete(&key).await {
            Ok(reply) => {
                if self.show_reply(reply) {
                    self.load_all_products().await;
                }
            }
            Err(e) => {
                error!(error = %e, "删除产品失败");
                self.output.show_error(e.to_string());
            }
        }
    }

    /// 加载所有产品并重建表格
    ///
    /// 请求失败时表格保持原样；拿到响应后先清空，只有数组响应才会填充。
    pub async fn load_all_products(&mut self) {
        match self.client.list().await {
            Ok(products) => {
                self.list_failed = false;
                self.table.clear();
                if !products.is_empty() {
                    self.table.populate(products);
                }
            }
            Err(e) => {
                error!(error = %e, "加载产品列表失败");
                self.list_failed = true;
            }
        }
    }

    fn show_reply(&mut self, reply: ApiReply) -> bool {
        let success = reply.is_success();
        if !success {
            warn!(status = reply.status.as_u16(), "ProductFunction 返回错误状态");
        }
        self.output.show(&reply.into_output());
        success
    }
}

//! 输出面板与产品表格

use chrono::{DateTime, Local};
use serde_json::{json, Value};

use super::model::Product;

const HEADERS: [&str; 4] = ["id", "name", "Category", "price"];

/// 输出面板：展示最近一次操作的结果
#[derive(Debug, Default)]
pub struct OutputPanel {
    text: String,
    is_error: bool,
    updated_at: Option<DateTime<Local>>,
}

impl OutputPanel {
    pub fn show(&mut self, value: &Value) {
        self.is_error = value.get("error").is_some();
        self.text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        self.updated_at = Some(Local::now());
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.show(&json!({ "error": message.into() }));
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }
}

/// 产品表格
#[derive(Debug, Default)]
pub struct ProductTable {
    rows: Vec<Product>,
    refreshed_at: Option<DateTime<Local>>,
}

impl ProductTable {
    pub fn clear(&mut self) {
        self.rows.clear();
        self.refreshed_at = Some(Local::now());
    }

    pub fn populate(&mut self, rows: Vec<Product>) {
        self.rows = rows;
        self.refreshed_at = Some(Local::now());
    }

    pub fn rows(&self) -> &[Product] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.refreshed_at
    }

    /// 渲染为按列对齐的文本表格
    pub fn render(&self) -> String {
        let cells: Vec<[String; 4]> = self
            .rows
            .iter()
            .map(|p| {
                [
                    p.id.clone(),
                    p.name.clone(),
                    p.category.clone(),
                    format_price(p.price),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(cells.len() + 2);
        lines.push(format_row(&HEADERS.map(String::from), &widths));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w + 2))
                .collect::<Vec<_>>()
                .join("+"),
        );
        if cells.is_empty() {
            lines.push(" (暂无产品)".to_string());
        }
        for row in &cells {
            lines.push(format_row(row, &widths));
        }
        lines.join("\n")
    }
}

fn format_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| {
            let pad = width - cell.chars().count();
            format!(" {}{} ", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("|")
        .trim_end()
        .to_string()
}

/// 整数价格不带小数部分
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 && price.abs() < 1e15 {
        format!("{}", price as i64)
    } else {
        price.to_string()
    }
}

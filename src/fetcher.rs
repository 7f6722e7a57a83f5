//! 报表抓取（业务能力层）
//!
//! 针对一个 (股票, 报表) 组合产出一张二维表，或者失败。
//! 只依赖浏览器层的"取回渲染后 HTML"能力和表格提取，本身不写文件。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::browser::BrowserDriver;
use crate::config::DateRange;
use crate::error::{Result, ScrapeError};
use crate::extract::extract_table;
use crate::report::{ReportSpec, Table};

/// 数据表格所在的容器选择器（该来源所有报表页面相同）
pub const TABLE_SELECTOR: &str = "#tblDetail";

/// 报表抓取能力
///
/// 调度器只依赖这个 trait，测试时可以换成假实现。
#[async_trait]
pub trait FetchReport: Send + Sync {
    /// 抓取单个 (股票, 报表) 的表格数据
    async fn fetch(&self, stock: &str, report: &ReportSpec, range: &DateRange) -> Result<Table>;
}

/// 基于无头浏览器的报表抓取器
pub struct ReportFetcher {
    driver: Arc<BrowserDriver>,
    navigation_timeout: Duration,
}

impl ReportFetcher {
    pub fn new(driver: Arc<BrowserDriver>, navigation_timeout: Duration) -> Self {
        Self {
            driver,
            navigation_timeout,
        }
    }
}

#[async_trait]
impl FetchReport for ReportFetcher {
    async fn fetch(&self, stock: &str, report: &ReportSpec, range: &DateRange) -> Result<Table> {
        let url = report.build_url(stock, range);
        debug!("抓取 {} ({}): {}", stock, report.key, url);

        let html = self
            .driver
            .fetch_rendered_html(&url, TABLE_SELECTOR, self.navigation_timeout)
            .await?;

        let table = extract_table(&html, report.max_columns, report.skip_header)?;
        if table.is_empty() {
            // 容器存在但没有任何数据行，视同无数据
            return Err(ScrapeError::NoData { url });
        }
        Ok(table)
    }
}

//! # Multi Stock Scraper
//!
//! 批量抓取 goodinfo.tw 股票报表并合并输出的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Browser）
//! - `browser/` - 持有稀缺资源（Browser），只暴露能力
//! - `BrowserDriver` - 唯一的浏览器 owner，提供"取回渲染后 HTML"能力
//!
//! ### ② 业务能力层（Services）
//! - `fetcher` - 单个 (股票, 报表) 的抓取能力
//! - `extract` - 表格 HTML → 二维表，单元格规整化
//! - `storage/` - CSV 读写、当日新鲜度、失败清单、分组合并
//! - `input` - 股票清单读取
//!
//! ### ③ 数据定义层（Report）
//! - `report` - 报表集定义：URL 模板、列提取策略、分组、表头行
//! - 报表集是配置数据，内置五种，也可从 TOML 加载
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/dispatcher` - 股票 × 报表 任务调度，并发控制与汇总
//! - `orchestrator/app` - 一次完整运行的生命周期与资源管理

pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod input;
pub mod orchestrator;
pub mod report;
pub mod storage;
pub mod utils;

// 重新导出常用类型
pub use browser::BrowserDriver;
pub use config::{CliArgs, Config, DateRange};
pub use error::{Result, ScrapeError};
pub use fetcher::{FetchReport, ReportFetcher};
pub use orchestrator::{scrape_all_stocks, App, DispatchOutcome};
pub use report::{default_report_set, ReportSpec, SheetGroup, Table};

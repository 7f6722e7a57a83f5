//! 编排层
//!
//! ## 模块划分
//!
//! ### `dispatcher` - 任务调度器
//! - 把 股票 × 报表 的全积展开为任务
//! - 用 Semaphore 限制全局并发数量
//! - 汇总每只股票的成功计数，分类为完整 / 不完整
//!
//! ### `app` - 运行编排
//! - 目录准备、股票清单读取、浏览器生命周期
//! - 调度 → 失败清单持久化 → 合并 → 汇总报告
//!
//! ## 层次关系
//!
//! ```text
//! app (一次完整运行)
//!     ↓
//! dispatcher (股票 × 报表 的任务集)
//!     ↓
//! fetcher (单个任务的抓取)
//!     ↓
//! browser (基础设施：无头浏览器)
//! ```

mod app;
mod dispatcher;

pub use app::App;
pub use dispatcher::{scrape_all_stocks, DispatchOutcome};

//! 运行编排 - 编排层
//!
//! 负责一次完整运行的生命周期：目录准备 → 股票清单 → 浏览器启动 →
//! 调度 → 失败清单持久化 → 合并 → 汇总报告。
//! 浏览器是唯一的共享资源，只有本模块持有，并保证在所有调度任务
//! 结束（完整屏障之后）才关闭。

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::browser::BrowserDriver;
use crate::config::Config;
use crate::fetcher::ReportFetcher;
use crate::input::read_stock_numbers;
use crate::orchestrator::dispatcher;
use crate::report::{default_report_set, load_report_set, ReportSpec};
use crate::storage;

/// 应用主结构
pub struct App {
    config: Config,
    reports: Vec<ReportSpec>,
    driver: Arc<BrowserDriver>,
}

impl App {
    /// 初始化应用：目录、报表集、无头浏览器
    ///
    /// 浏览器启动失败是致命错误，没有它任何抓取都无法进行。
    pub async fn initialize(config: Config) -> Result<Self> {
        setup_directories(&[
            &config.input_dir,
            &config.download_dir,
            &config.final_output_dir,
            &config.failed_dir,
        ])?;

        let reports = match &config.report_config {
            Some(path) => load_report_set(path)?,
            None => default_report_set(),
        };

        log_startup(&config, reports.len());

        let driver = Arc::new(BrowserDriver::launch().await?);

        Ok(Self {
            config,
            reports,
            driver,
        })
    }

    /// 运行一次完整的抓取与合并
    pub async fn run(self) -> Result<()> {
        let run_start = Instant::now();

        let stocks = self.resolve_stocks()?;
        let Some(stocks) = stocks else {
            // 重跑模式下没有失败记录，无事可做
            self.driver.shutdown().await;
            return Ok(());
        };

        info!("✓ 共 {} 只股票待抓取", stocks.len());

        let fetcher = Arc::new(ReportFetcher::new(
            Arc::clone(&self.driver),
            self.config.navigation_timeout,
        ));

        let download_start = Instant::now();
        let outcome = dispatcher::scrape_all_stocks(
            fetcher,
            &stocks,
            &self.reports,
            self.config.date_range,
            self.config.max_workers,
            &self.config.download_dir,
        )
        .await;

        // 完整屏障已过，浏览器此后不再被任何任务使用
        self.driver.shutdown().await;
        let outcome = outcome?;

        info!("⏱ 下载阶段耗时 {:.1?}", download_start.elapsed());

        storage::save_failed_stocks(&self.config.failed_dir, &outcome.incomplete)?;

        let merge_failed = storage::combine_successful_stocks(
            &outcome.complete,
            &self.config.download_dir,
            &self.config.final_output_dir,
            &self.reports,
        );

        print_summary(&outcome, &merge_failed, run_start);
        Ok(())
    }

    /// 决定本次运行的股票清单
    ///
    /// 返回 `None` 表示重跑模式下失败清单为空，应提前结束。
    fn resolve_stocks(&self) -> Result<Option<Vec<String>>> {
        if self.config.rerun_failed {
            let stocks = storage::load_failed_stocks(&self.config.failed_dir)?;
            if stocks.is_empty() {
                info!("没有记录在案的失败股票，无需重跑");
                return Ok(None);
            }
            info!("🔁 重跑上次失败的 {} 只股票", stocks.len());
            return Ok(Some(stocks));
        }

        let stocks = read_stock_numbers(&self.config.input_dir)?;
        if stocks.is_empty() {
            bail!(
                "输入目录 {} 中没有任何股票代号",
                self.config.input_dir.display()
            );
        }
        Ok(Some(stocks))
    }
}

fn setup_directories(dirs: &[&Path]) -> Result<()> {
    for dir in dirs {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn log_startup(config: &Config, report_count: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量股票报表抓取");
    info!("📊 最大并发数: {}", config.max_workers);
    info!(
        "📅 日期区间: {} ~ {}",
        config.date_range.start_str(),
        config.date_range.end_str()
    );
    info!("📋 报表种类: {}", report_count);
    info!("{}", "=".repeat(60));
}

fn print_summary(
    outcome: &dispatcher::DispatchOutcome,
    merge_failed: &[String],
    run_start: Instant,
) {
    info!("{}", "=".repeat(60));
    info!(
        "📊 运行汇总: 成功 {} 只, 失败 {} 只",
        outcome.complete.len(),
        outcome.incomplete.len()
    );
    if !outcome.incomplete.is_empty() {
        warn!("❌ 失败股票: {}", outcome.incomplete.join(", "));
    }
    if !merge_failed.is_empty() {
        warn!("❌ 合并失败股票: {}", merge_failed.join(", "));
    }
    info!("⏱ 总耗时 {:.1?}", run_start.elapsed());
    info!("{}", "=".repeat(60));
}

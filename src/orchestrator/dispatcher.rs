//! 任务调度器 - 编排层
//!
//! 把 股票 × 报表 的全积在全局并发上限 W 下派发执行：
//!
//! - 准入：每个任务 spawn 之前先取得 Semaphore 名额，在途任务数
//!   任何时刻不超过 W；任务无论成败都在结束时释放名额
//! - 单个任务：当日新鲜则直接计成功；否则抓取并写出 CSV，任一步
//!   出错只记日志，不影响其他任务
//! - 汇总：成功计数放在共享 Mutex<HashMap> 里由各任务自增；
//!   等全部任务结束（完整屏障）后才分类
//! - 分类：某股票的成功数等于报表总数才算完整；部分成功和全部
//!   失败同样算不完整，不做部分合并

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{Mutex, Semaphore};
use tracing::{error, info, warn};

use crate::config::DateRange;
use crate::fetcher::FetchReport;
use crate::report::ReportSpec;
use crate::storage;

/// 调度结果：完整 / 不完整两个互斥的股票清单（顺序无保证）
#[derive(Debug)]
pub struct DispatchOutcome {
    pub complete: Vec<String>,
    pub incomplete: Vec<String>,
}

/// 在并发上限 `max_workers` 下抓取所有 (股票, 报表) 组合
pub async fn scrape_all_stocks(
    fetcher: Arc<dyn FetchReport>,
    stocks: &[String],
    reports: &[ReportSpec],
    range: DateRange,
    max_workers: usize,
    download_dir: &Path,
) -> Result<DispatchOutcome> {
    let total_types = reports.len();
    let success_count: Arc<Mutex<HashMap<String, usize>>> = Arc::new(Mutex::new(
        stocks.iter().map(|s| (s.clone(), 0)).collect(),
    ));
    let semaphore = Arc::new(Semaphore::new(max_workers));

    let mut handles = Vec::with_capacity(stocks.len() * total_types);
    for stock in stocks {
        for report in reports {
            // 在途任务达到上限时，这里会阻塞派发
            let permit = semaphore.clone().acquire_owned().await?;

            let fetcher = Arc::clone(&fetcher);
            let success_count = Arc::clone(&success_count);
            let stock = stock.clone();
            let report = report.clone();
            let download_dir = download_dir.to_path_buf();

            handles.push(tokio::spawn(async move {
                let _permit = permit; // 任务结束（含出错）时释放名额

                match run_work_item(fetcher.as_ref(), &stock, &report, &range, &download_dir)
                    .await
                {
                    Ok(()) => {
                        let mut counts = success_count.lock().await;
                        *counts.entry(stock).or_insert(0) += 1;
                    }
                    Err(e) => {
                        error!("❌ 抓取失败 {} ({}): {}", stock, report.key, e);
                    }
                }
            }));
        }
    }

    // 完整屏障：所有任务结束之前不读取计数、不进入合并
    for handle in handles {
        if let Err(e) = handle.await {
            error!("任务执行失败: {}", e);
        }
    }

    let counts = success_count.lock().await;
    let mut complete = Vec::new();
    let mut incomplete = Vec::new();
    for (stock, count) in counts.iter() {
        if *count == total_types {
            complete.push(stock.clone());
        } else {
            warn!("⚠️ 股票 {} 数据不完整 ({}/{})，跳过合并", stock, count, total_types);
            incomplete.push(stock.clone());
        }
    }

    Ok(DispatchOutcome {
        complete,
        incomplete,
    })
}

/// 执行单个 (股票, 报表) 任务：新鲜检查 → 抓取 → 写出
async fn run_work_item(
    fetcher: &dyn FetchReport,
    stock: &str,
    report: &ReportSpec,
    range: &DateRange,
    download_dir: &PathBuf,
) -> crate::error::Result<()> {
    let stock_dir = download_dir.join(stock);
    fs::create_dir_all(&stock_dir).map_err(|e| crate::error::ScrapeError::Write {
        path: stock_dir.clone(),
        source: e,
    })?;

    let output_file = stock_dir.join(report.output_file());
    if storage::is_file_up_to_date(&output_file) {
        info!("⏭️ {} ({}) 当日数据已存在，跳过", stock, report.key);
        return Ok(());
    }

    let table = fetcher.fetch(stock, report, range).await?;
    storage::write_csv(&output_file, &table)?;

    info!("✅ 成功抓取 {} ({})", stock, report.key);
    Ok(())
}

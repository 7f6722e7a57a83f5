//! 程序配置
//!
//! 命令行参数解析与校验。非法组合（worker 数 ≤ 0、只给一个日期）
//! 在任何任务开始前就报错退出。

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::error::{Result, ScrapeError};

const DATA_DIR: &str = "data";

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "multi-stock-scraper", about = "批量抓取 goodinfo.tw 股票报表并合并输出")]
pub struct CliArgs {
    /// 最大并发任务数
    #[arg(short = 'w', long = "workers", default_value_t = 10)]
    pub workers: usize,

    /// 只重跑上次失败的股票
    #[arg(long = "rerun-failed", alias = "rf")]
    pub rerun_failed: bool,

    /// 起始日期 (YYYY-MM-DD)，必须与 --end 同时提供
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// 结束日期 (YYYY-MM-DD)，必须与 --start 同时提供
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// 报表集定义文件 (TOML)，省略时使用内置五种报表
    #[arg(long = "report-config")]
    pub report_config: Option<PathBuf>,
}

/// 抓取日期区间，格式化为 YYYY-MM-DD 代入各报表 URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// 最大区间：固定起点到今天
    pub fn maximal(today: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(1965, 1, 1).expect("固定起始日期合法");
        Self { start, end: today }
    }

    /// 自定义区间，要求 start ≤ end
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ScrapeError::Config(format!(
                "起始日期 {} 晚于结束日期 {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// 程序配置
#[derive(Debug, Clone)]
pub struct Config {
    /// 股票清单目录
    pub input_dir: PathBuf,
    /// 各报表 CSV 输出目录
    pub download_dir: PathBuf,
    /// 合并结果输出目录
    pub final_output_dir: PathBuf,
    /// 失败清单目录
    pub failed_dir: PathBuf,
    /// 最大并发任务数
    pub max_workers: usize,
    /// 是否只重跑失败股票
    pub rerun_failed: bool,
    /// 抓取日期区间
    pub date_range: DateRange,
    /// 单次页面导航超时
    pub navigation_timeout: Duration,
    /// 报表集定义文件
    pub report_config: Option<PathBuf>,
}

impl Config {
    /// 从命令行参数构建配置并校验
    pub fn from_args(args: CliArgs) -> Result<Self> {
        if args.workers == 0 {
            return Err(ScrapeError::Config(
                "workers 必须大于 0".to_string(),
            ));
        }

        let date_range = match (args.start, args.end) {
            (None, None) => DateRange::maximal(Local::now().date_naive()),
            (Some(start), Some(end)) => DateRange::custom(start, end)?,
            _ => {
                return Err(ScrapeError::Config(
                    "--start 和 --end 必须同时提供，或都省略使用最大区间".to_string(),
                ))
            }
        };

        let data_dir = PathBuf::from(DATA_DIR);
        Ok(Self {
            input_dir: data_dir.join("input_stock"),
            download_dir: data_dir.join("downloaded_stock"),
            final_output_dir: data_dir.join("final_output"),
            failed_dir: data_dir.join("failed_stock"),
            max_workers: args.workers,
            rerun_failed: args.rerun_failed,
            date_range,
            navigation_timeout: Duration::from_secs(30),
            report_config: args.report_config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(workers: usize, start: Option<&str>, end: Option<&str>) -> CliArgs {
        CliArgs {
            workers,
            rerun_failed: false,
            start: start.map(|s| s.parse().unwrap()),
            end: end.map(|s| s.parse().unwrap()),
            report_config: None,
        }
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        let err = Config::from_args(args(0, None, None)).unwrap_err();
        assert!(matches!(err, ScrapeError::Config(_)));
    }

    #[test]
    fn single_date_flag_is_a_config_error() {
        assert!(Config::from_args(args(10, Some("2024-01-01"), None)).is_err());
        assert!(Config::from_args(args(10, None, Some("2024-12-31"))).is_err());
    }

    #[test]
    fn omitting_both_dates_uses_maximal_range() {
        let config = Config::from_args(args(10, None, None)).unwrap();
        assert_eq!(config.date_range.start_str(), "1965-01-01");
        assert_eq!(
            config.date_range.end,
            Local::now().date_naive()
        );
    }

    #[test]
    fn custom_range_requires_start_before_end() {
        let config = Config::from_args(args(10, Some("2020-01-01"), Some("2024-12-31"))).unwrap();
        assert_eq!(config.date_range.start_str(), "2020-01-01");
        assert_eq!(config.date_range.end_str(), "2024-12-31");

        assert!(Config::from_args(args(10, Some("2024-12-31"), Some("2020-01-01"))).is_err());
    }
}

//! 错误类型定义
//!
//! 分为三个层级：
//! - 运行级致命错误：`Config` / `Driver`，在调度开始前终止程序
//! - 任务级错误：`Navigation` / `NoData` / `Extract` / `Write`，
//!   只影响单个 (股票, 报表) 任务，记录日志后继续
//! - 合并级错误：`MissingFile` / `EmptyInput`，只跳过对应股票的合并

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// 抓取流程中所有可能的错误
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// 配置错误（参数非法），调度前致命
    #[error("配置错误: {0}")]
    Config(String),

    /// 浏览器驱动错误（启动/关闭失败），全程致命
    #[error("浏览器驱动错误: {0}")]
    Driver(String),

    /// 页面导航失败或超时
    #[error("页面导航失败 ({url}): {message}")]
    Navigation { url: String, message: String },

    /// 页面上找不到数据表格容器（该来源常见，不重试）
    #[error("页面无数据表格: {url}")]
    NoData { url: String },

    /// 表格 HTML 解析失败
    #[error("表格解析失败: {0}")]
    Extract(String),

    /// 写入输出文件失败
    #[error("写入文件失败 ({}): {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 合并时缺少必需的报表文件
    #[error("缺少报表文件: {0}")]
    MissingFile(String),

    /// 合并的任一侧为空表格（通常意味着上游环节出了问题）
    #[error("无法合并空表格")]
    EmptyInput,

    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),

    #[error("CSV 错误: {0}")]
    Csv(#[from] csv::Error),
}

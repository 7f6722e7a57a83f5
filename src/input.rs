//! 股票清单读取
//!
//! 从输入目录下的所有纯文本/CSV 文件读取股票代号，每行一个；
//! 若该行是逗号分隔的，取第一个字段。空行忽略。

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::Result;

/// 读取输入目录下所有文件中的股票代号
pub fn read_stock_numbers(dir: &Path) -> Result<Vec<String>> {
    let mut stocks = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("读取文件 {} 失败: {}", path.display(), e);
                continue;
            }
        };

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // 文件可能是 CSV 格式，取第一个字段
            let first = line.split(',').next().unwrap_or(line).trim();
            if !first.is_empty() {
                stocks.push(first.to_string());
            }
        }
    }

    Ok(stocks)
}

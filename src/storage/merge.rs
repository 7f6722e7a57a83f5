//! 报表合并
//!
//! 对一只已完整抓取的股票，把各报表表格按列拼接为合并输出。
//! 两表合并：按行号对齐，短的一侧用占位行 ["-"] 补齐，中间留一个
//! 空白分隔单元格；多于两张表时两两链式合并。每个分组（Prices /
//! Financials）独立合并并在最前面加上该分组各报表的固定表头行。

use std::fs;
use std::path::Path;

use tracing::{error, info};

use crate::error::{Result, ScrapeError};
use crate::extract::PLACEHOLDER;
use crate::report::{ReportSpec, SheetGroup, Table};
use crate::storage::csv_file::{read_csv, write_csv};

/// 两表按行号合并
///
/// 结果行数为 max(len(a), len(b))；任一侧为空表时返回 `EmptyInput`
/// （空表通常意味着上游环节有 bug，拒绝静默通过）。
pub fn merge_tables(a: &Table, b: &Table) -> Result<Table> {
    if a.is_empty() || b.is_empty() {
        return Err(ScrapeError::EmptyInput);
    }

    let placeholder = vec![PLACEHOLDER.to_string()];
    let rows = a.len().max(b.len());
    let mut merged = Vec::with_capacity(rows);
    for i in 0..rows {
        let left = a.get(i).unwrap_or(&placeholder);
        let right = b.get(i).unwrap_or(&placeholder);

        let mut row = Vec::with_capacity(left.len() + right.len() + 1);
        row.extend(left.iter().cloned());
        row.push(String::new()); // 左右两侧之间的空白分隔格
        row.extend(right.iter().cloned());
        merged.push(row);
    }
    Ok(merged)
}

/// 检查股票目录下每种报表的输出文件是否都在（按文件名关键字匹配）
fn check_required_files(stock_dir: &Path, reports: &[ReportSpec]) -> Result<()> {
    let mut file_names = Vec::new();
    for entry in fs::read_dir(stock_dir)? {
        file_names.push(entry?.file_name().to_string_lossy().to_lowercase());
    }

    for report in reports {
        let keyword = report.key.to_lowercase();
        if !file_names.iter().any(|name| name.contains(&keyword)) {
            return Err(ScrapeError::MissingFile(report.key.clone()));
        }
    }
    Ok(())
}

/// 合并单只股票的所有分组输出
pub fn combine_stock(
    download_dir: &Path,
    final_output_dir: &Path,
    stock: &str,
    reports: &[ReportSpec],
) -> Result<()> {
    let stock_dir = download_dir.join(stock);
    check_required_files(&stock_dir, reports)?;

    for group in SheetGroup::ALL {
        let group_reports: Vec<&ReportSpec> =
            reports.iter().filter(|r| r.sheet_group == group).collect();
        if group_reports.is_empty() {
            continue;
        }

        // 读各报表并附上固定表头，再两两链式合并
        let mut merged: Option<Table> = None;
        for report in group_reports {
            let mut table = report.header_block.clone();
            table.extend(read_csv(&stock_dir.join(report.output_file()))?);

            merged = Some(match merged {
                None => table,
                Some(acc) => merge_tables(&acc, &table)?,
            });
        }

        if let Some(table) = merged {
            let output = final_output_dir.join(group.output_file(stock));
            write_csv(&output, &table)?;
        }
    }
    Ok(())
}

/// 合并所有完整抓取的股票；单只股票合并失败只跳过该股票
///
/// 返回合并失败的股票清单。
pub fn combine_successful_stocks(
    stocks: &[String],
    download_dir: &Path,
    final_output_dir: &Path,
    reports: &[ReportSpec],
) -> Vec<String> {
    let mut failed = Vec::new();
    for stock in stocks {
        match combine_stock(download_dir, final_output_dir, stock, reports) {
            Ok(()) => info!("📑 已合并股票 {} 的数据", stock),
            Err(e) => {
                error!("合并股票 {} 失败: {}", stock, e);
                failed.push(stock.clone());
            }
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::default_report_set;

    fn table(rows: &[&[&str]]) -> Table {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn merged_row_count_is_max_of_both_sides() {
        let a = table(&[&["a1"], &["a2"], &["a3"]]);
        let b = table(&[&["b1"]]);
        let merged = merge_tables(&a, &b).unwrap();
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn short_side_is_padded_with_placeholder_row() {
        let a = table(&[&["a1", "a2"]]);
        let b = table(&[&["b1"], &["b2"], &["b3"]]);
        let merged = merge_tables(&a, &b).unwrap();

        assert_eq!(merged[0], vec!["a1", "a2", "", "b1"]);
        // a 长度之后的行，左侧用单格占位行 ["-"] 补齐
        assert_eq!(merged[1], vec!["-", "", "b2"]);
        assert_eq!(merged[2], vec!["-", "", "b3"]);
    }

    #[test]
    fn either_empty_side_is_refused() {
        let a = table(&[&["a1"]]);
        let empty: Table = Vec::new();
        assert!(matches!(
            merge_tables(&empty, &a),
            Err(ScrapeError::EmptyInput)
        ));
        assert!(matches!(
            merge_tables(&a, &empty),
            Err(ScrapeError::EmptyInput)
        ));
    }

    #[test]
    fn chained_merge_combines_three_tables() {
        let a = table(&[&["a"]]);
        let b = table(&[&["b"]]);
        let c = table(&[&["c"]]);
        let merged = merge_tables(&merge_tables(&a, &b).unwrap(), &c).unwrap();
        assert_eq!(merged[0], vec!["a", "", "b", "", "c"]);
    }

    fn write_stock_files(stock_dir: &Path, keys: &[&str]) {
        fs::create_dir_all(stock_dir).unwrap();
        for key in keys {
            fs::write(
                stock_dir.join(format!("{key}.csv")),
                "r1c1,r1c2\nr2c1,r2c2\n",
            )
            .unwrap();
        }
    }

    #[test]
    fn missing_report_file_names_the_absent_type() {
        let dir = tempfile::tempdir().unwrap();
        let reports = default_report_set();
        write_stock_files(
            &dir.path().join("2330"),
            &["per", "stockdata", "monthlyrevenue", "equity"],
        );

        let err = combine_stock(dir.path(), dir.path(), "2330", &reports).unwrap_err();
        match err {
            ScrapeError::MissingFile(key) => assert_eq!(key, "cashflow"),
            other => panic!("预期 MissingFile，得到 {other:?}"),
        }
    }

    #[test]
    fn combine_stock_writes_one_file_per_sheet_group() {
        let download = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let reports = default_report_set();
        write_stock_files(
            &download.path().join("1101"),
            &["per", "stockdata", "monthlyrevenue", "cashflow", "equity"],
        );

        combine_stock(download.path(), output.path(), "1101", &reports).unwrap();

        let prices = read_csv(&output.path().join("1101.csv")).unwrap();
        let financials = read_csv(&output.path().join("1101_2.csv")).unwrap();

        // Prices 组：per（3 行表头 + 2 行数据）与 stockdata 同长，合并后 5 行
        assert_eq!(prices.len(), 5);
        // per 的标签行出现在第 3 行开头
        assert_eq!(prices[2][0], "交易週別");
        // Financials 组三张表链式合并：monthlyrevenue(3+2) 对 cashflow(3+2) 对 equity(2+2)
        assert_eq!(financials.len(), 5);
        assert_eq!(financials[2][0], "月別");
    }

    #[test]
    fn combine_successful_stocks_isolates_per_stock_failures() {
        let download = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let reports = default_report_set();
        write_stock_files(
            &download.path().join("1101"),
            &["per", "stockdata", "monthlyrevenue", "cashflow", "equity"],
        );
        // 2330 缺 cashflow，应只有它合并失败
        write_stock_files(
            &download.path().join("2330"),
            &["per", "stockdata", "monthlyrevenue", "equity"],
        );

        let stocks = vec!["1101".to_string(), "2330".to_string()];
        let failed =
            combine_successful_stocks(&stocks, download.path(), output.path(), &reports);

        assert_eq!(failed, vec!["2330"]);
        assert!(output.path().join("1101.csv").exists());
        assert!(!output.path().join("2330.csv").exists());
    }
}

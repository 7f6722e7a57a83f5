//! 表格提取
//!
//! 把浏览器取回的表格容器 innerHTML 解析为二维字符串表。
//! 来源页面给的是 `<tr>`/`<td>` 片段，解析前先包一层 `<table>`。
//! 所有单元格都会规整化：去掉首尾空白，空白单元格统一写成 "-"，
//! 用来区分"无数据"和"缺列"。

use scraper::{Html, Selector};

use crate::error::{Result, ScrapeError};
use crate::report::Table;

/// 单元格占位符
pub const PLACEHOLDER: &str = "-";

/// 规整化一行单元格：trim 后为空的写成 "-"
pub fn canonicalize_row(row: Vec<String>) -> Vec<String> {
    row.into_iter()
        .map(|cell| {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                PLACEHOLDER.to_string()
            } else {
                trimmed.to_string()
            }
        })
        .collect()
}

/// 从表格容器的 innerHTML 提取二维表
///
/// - `max_columns`: 每行最多保留的列数，None 表示不限制
/// - `skip_header`: 是否丢弃第一行
pub fn extract_table(html: &str, max_columns: Option<usize>, skip_header: bool) -> Result<Table> {
    let wrapped = format!("<table>{html}</table>");
    let document = Html::parse_fragment(&wrapped);

    let row_selector =
        Selector::parse("tr").map_err(|e| ScrapeError::Extract(e.to_string()))?;
    let cell_selector =
        Selector::parse("td").map_err(|e| ScrapeError::Extract(e.to_string()))?;

    let mut data = Vec::new();
    for (index, row_element) in document.select(&row_selector).enumerate() {
        if skip_header && index == 0 {
            continue;
        }

        let mut row: Vec<String> = row_element
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>())
            .collect();
        if let Some(max) = max_columns {
            row.truncate(max);
        }

        let row = canonicalize_row(row);
        if !row.is_empty() {
            data.push(row);
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
<tr><td>交易週別</td><td>收盤價</td><td>漲跌價</td></tr>\
<tr><td>25W01</td><td> 1080 </td><td></td></tr>\
<tr><td>25W02</td><td>1100</td><td>20</td></tr>";

    #[test]
    fn extracts_rows_and_cells() {
        let table = extract_table(SAMPLE, None, false).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[2], vec!["25W02", "1100", "20"]);
    }

    #[test]
    fn skip_header_drops_first_row() {
        let table = extract_table(SAMPLE, None, true).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0][0], "25W01");
    }

    #[test]
    fn max_columns_truncates_each_row() {
        let table = extract_table(SAMPLE, Some(2), false).unwrap();
        for row in &table {
            assert!(row.len() <= 2);
        }
        assert_eq!(table[1], vec!["25W01", "1080"]);
    }

    #[test]
    fn empty_and_whitespace_cells_become_placeholder() {
        let table = extract_table(SAMPLE, None, false).unwrap();
        // 空单元格写成 "-"，非空单元格去掉首尾空白
        assert_eq!(table[1], vec!["25W01", "1080", "-"]);

        let row = canonicalize_row(vec!["  ".into(), " a ".into(), "".into()]);
        assert_eq!(row, vec!["-", "a", "-"]);
    }

    #[test]
    fn html_without_rows_yields_empty_table() {
        let table = extract_table("<p>no table here</p>", None, false).unwrap();
        assert!(table.is_empty());
    }
}

//! 报表类型定义
//!
//! 每种报表对应一个 URL 模板、一套列提取策略（最大列数、是否跳过表头）、
//! 一个所属分组和一组合并时附加的表头行。报表集本身是数据而不是逻辑：
//! 内置五种报表，也可以从 TOML 文件加载自定义的报表集。

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::DateRange;
use crate::error::{Result, ScrapeError};

/// 表格：行的有序序列，每行是字符串单元格的有序序列
pub type Table = Vec<Vec<String>>;

/// 合并输出分组
///
/// 每组独立合并为一个输出文件：
/// - `Prices`: per + stockdata → `{股票}.csv`
/// - `Financials`: monthlyrevenue + cashflow + equity → `{股票}_2.csv`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetGroup {
    Prices,
    Financials,
}

impl SheetGroup {
    pub const ALL: [SheetGroup; 2] = [SheetGroup::Prices, SheetGroup::Financials];

    /// 该分组的合并输出文件名
    pub fn output_file(&self, stock: &str) -> String {
        match self {
            SheetGroup::Prices => format!("{stock}.csv"),
            SheetGroup::Financials => format!("{stock}_2.csv"),
        }
    }
}

/// 单个报表类型的定义
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSpec {
    /// 报表标识，同时用作输出文件名和合并前的文件关键字
    pub key: String,
    /// URL 模板，占位符 {stock_id} / {start_date} / {end_date}
    pub url_template: String,
    /// 最多提取的列数，None 表示不限制
    #[serde(default)]
    pub max_columns: Option<usize>,
    /// 是否丢弃提取出的第一行（表头已由 header_block 表达）
    #[serde(default)]
    pub skip_header: bool,
    /// 所属合并分组
    pub sheet_group: SheetGroup,
    /// 合并时附加在数据前的表头行
    #[serde(default)]
    pub header_block: Vec<Vec<String>>,
}

impl ReportSpec {
    /// 代入股票代号和日期区间，生成抓取 URL
    pub fn build_url(&self, stock: &str, range: &DateRange) -> String {
        self.url_template
            .replace("{stock_id}", stock)
            .replace("{start_date}", &range.start_str())
            .replace("{end_date}", &range.end_str())
    }

    /// 该报表的单独输出文件名
    pub fn output_file(&self) -> String {
        format!("{}.csv", self.key)
    }
}

/// TOML 报表集文件的顶层结构
#[derive(Debug, Deserialize)]
struct ReportSetFile {
    report: Vec<ReportSpec>,
}

/// 从 TOML 文件加载报表集
pub fn load_report_set(path: &Path) -> Result<Vec<ReportSpec>> {
    let content = fs::read_to_string(path)?;
    let file: ReportSetFile = toml::from_str(&content)
        .map_err(|e| ScrapeError::Config(format!("报表集文件解析失败: {e}")))?;
    if file.report.is_empty() {
        return Err(ScrapeError::Config("报表集文件中没有任何报表定义".to_string()));
    }
    Ok(file.report)
}

fn rows(block: &[&[&str]]) -> Vec<Vec<String>> {
    block
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

/// 内置的五种报表定义
pub fn default_report_set() -> Vec<ReportSpec> {
    vec![
        ReportSpec {
            key: "per".to_string(),
            url_template: "https://goodinfo.tw/tw/ShowK_ChartFlow.asp?RPT_CAT=PER&STOCK_ID={stock_id}&CHT_CAT=WEEK&PRICE_ADJ=F&START_DT={start_date}&END_DT={end_date}".to_string(),
            // PER 页面只取前 6 列，且第一行是重复表头
            max_columns: Some(6),
            skip_header: true,
            sheet_group: SheetGroup::Prices,
            header_block: rows(&[
                &[""; 6],
                &[""; 6],
                &["交易週別", "收盤價", "漲跌價", "漲跌幅", "河流圖 EPS(元)", "目前 PER (倍)"],
            ]),
        },
        ReportSpec {
            key: "stockdata".to_string(),
            url_template: "https://goodinfo.tw/tw/ShowK_Chart.asp?STOCK_ID={stock_id}&CHT_CAT=WEEK&PRICE_ADJ=T&SHEET=%E5%80%8B%E8%82%A1%E8%82%A1%E5%83%B9%E3%80%81%E6%B3%95%E4%BA%BA%E8%B2%B7%E8%B3%A3%E5%8F%8A%E8%9E%8D%E8%B3%87%E5%88%B8&START_DT={start_date}&END_DT={end_date}".to_string(),
            max_columns: None,
            skip_header: false,
            sheet_group: SheetGroup::Prices,
            header_block: rows(&[
                &[""; 23],
                &[
                    "", "", "", "", "", "", "", "", "", "成交張數", "", "成交金額", "",
                    "法人買賣超(千張)", "", "", "", "", "融資(千張)", "", "融券(千張)", "", "",
                ],
                &[
                    "交易週別", "交易日數", "開盤", "最高", "最低", "收盤", "漲跌", "漲跌(%)",
                    "振幅(%)", "千張", "日均", "億元", "日均", "外資", "投信", "自營", "合計",
                    "外資持股(%)", "增減", "餘額", "增減", "餘額", "券資比(%)",
                ],
            ]),
        },
        ReportSpec {
            key: "monthlyrevenue".to_string(),
            url_template: "https://goodinfo.tw/tw/ShowSaleMonChart.asp?STOCK_ID={stock_id}&PRICE_ADJ=T&START_DT={start_date}&END_DT={end_date}".to_string(),
            max_columns: None,
            skip_header: false,
            sheet_group: SheetGroup::Financials,
            header_block: rows(&[
                &[
                    "", "當月股價", "", "", "", "", "", "營業收入", "", "", "", "",
                    "合併營業收入", "", "", "", "",
                ],
                &[
                    "", "", "", "", "", "", "", "單月", "", "", "累計", "", "", "", "", "", "",
                ],
                &[
                    "月別", "開盤", "收盤", "最高", "最低", "漲跌(元)", "漲跌(%)", "營收(億)",
                    "月增(%)", "年增(%)", "營收(億)", "年增(%)", "營收(億)", "月增(%)",
                    "年增(%)", "營收(億)", "年增(%)",
                ],
            ]),
        },
        ReportSpec {
            key: "cashflow".to_string(),
            url_template: "https://goodinfo.tw/tw/StockCashFlow.asp?STEP=DATA&STOCK_ID={stock_id}&RPT_CAT=M_QUAR&PRICE_ADJ=F&START_DT={start_date}&END_DT={end_date}".to_string(),
            max_columns: None,
            skip_header: false,
            sheet_group: SheetGroup::Financials,
            header_block: rows(&[
                &[""; 19],
                &[
                    "", "", "", "季度股價", "", "", "", "獲利(億)", "", "現金流量(億)", "", "",
                    "", "", "", "現金餘額(億)", "", "", "",
                ],
                &[
                    "季度", "平均股本(億)", "財報評分", "上期收盤", "本期收盤", "漲跌(元)",
                    "漲跌(%)", "稅前淨利", "稅後淨利", "營業活動", "投資活動", "融資活動",
                    "其他活動", "淨現金流", "自由金流", "期初餘額", "期末餘額", "現金流量(%)",
                    "稅後EPS(元)",
                ],
            ]),
        },
        ReportSpec {
            key: "equity".to_string(),
            url_template: "https://goodinfo.tw/tw/EquityDistributionClassHis.asp?STOCK_ID={stock_id}&PRICE_ADJ=T&START_DT={start_date}&END_DT={end_date}".to_string(),
            max_columns: None,
            skip_header: false,
            sheet_group: SheetGroup::Financials,
            header_block: rows(&[
                &[
                    "", "", "", "當週股價", "", "", "", "", "", "", "", "", "", "", "",
                ],
                &[
                    "週別", "統計日期", "收盤", "漲跌(元)", "漲跌(%)", "集保庫存(萬張)",
                    "≦10張", ">10張≦50張", ">50張≦100張", ">100張≦200張", ">200張≦400張",
                    ">400張≦800張", ">800張≦1000張", ">1000張",
                ],
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn range() -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        }
    }

    #[test]
    fn default_set_has_five_reports_in_two_groups() {
        let reports = default_report_set();
        assert_eq!(reports.len(), 5);

        let prices: Vec<_> = reports
            .iter()
            .filter(|r| r.sheet_group == SheetGroup::Prices)
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(prices, ["per", "stockdata"]);

        let financials: Vec<_> = reports
            .iter()
            .filter(|r| r.sheet_group == SheetGroup::Financials)
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(financials, ["monthlyrevenue", "cashflow", "equity"]);
    }

    #[test]
    fn build_url_substitutes_stock_and_dates() {
        let reports = default_report_set();
        let per = &reports[0];
        let url = per.build_url("2330", &range());
        assert!(url.contains("STOCK_ID=2330"));
        assert!(url.contains("START_DT=2020-01-01"));
        assert!(url.contains("END_DT=2024-12-31"));
        assert!(!url.contains('{'));
    }

    #[test]
    fn header_blocks_are_rectangular_with_label_row_last() {
        for report in default_report_set() {
            let block = &report.header_block;
            assert!(!block.is_empty(), "{} 缺少表头", report.key);
            let labels = block.last().unwrap();
            assert!(labels.iter().any(|cell| !cell.is_empty()));
        }
    }

    #[test]
    fn load_report_set_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[report]]
key = "per"
url_template = "https://example.com/per?id={{stock_id}}&from={{start_date}}&to={{end_date}}"
max_columns = 6
skip_header = true
sheet_group = "prices"
header_block = [["", ""], ["甲", "乙"]]
"#
        )
        .unwrap();

        let reports = load_report_set(file.path()).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].key, "per");
        assert_eq!(reports[0].max_columns, Some(6));
        assert!(reports[0].skip_header);
        assert_eq!(reports[0].sheet_group, SheetGroup::Prices);
        assert_eq!(reports[0].header_block[1], vec!["甲", "乙"]);
    }

    #[test]
    fn empty_report_set_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_report_set(file.path()).is_err());
    }
}

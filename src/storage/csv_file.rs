//! 表格的 CSV 读写
//!
//! 表格行宽不保证一致（表头行和数据行列数不同），读写都用
//! flexible 模式。

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::Result;
use crate::report::Table;

/// 读取整个 CSV 为二维表
pub fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut table = Vec::new();
    for record in reader.records() {
        let record = record?;
        table.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(table)
}

/// 把二维表写成 CSV
pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;
    for row in table {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

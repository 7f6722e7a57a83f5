//! 当日新鲜度判断
//!
//! 输出文件只要修改日期落在今天（本地时区）就视为有效，
//! 不做内容比对。用于让同一天内的重复运行可以跳过已完成的任务。

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate};

/// 判断文件的修改日期是否等于给定日期
///
/// 时间来源由调用方注入，便于测试。文件不存在时返回 false。
pub fn is_up_to_date(path: &Path, today: NaiveDate) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    DateTime::<Local>::from(modified).date_naive() == today
}

/// 判断文件是否当日已更新（本地时区的今天）
pub fn is_file_up_to_date(path: &Path) -> bool {
    is_up_to_date(path, Local::now().date_naive())
}

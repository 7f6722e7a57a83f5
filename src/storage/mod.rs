//! 存储层
//!
//! 各报表 CSV 的读写、当日新鲜度判断、失败清单持久化，
//! 以及按分组合并各报表为最终输出。

mod csv_file;
mod failed;
mod freshness;
mod merge;

pub use csv_file::{read_csv, write_csv};
pub use failed::{load_failed_stocks, save_failed_stocks};
pub use freshness::{is_file_up_to_date, is_up_to_date};
pub use merge::{combine_stock, combine_successful_stocks, merge_tables};

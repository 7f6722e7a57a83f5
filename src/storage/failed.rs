//! 失败股票清单持久化
//!
//! 运行结束时写入 failed.txt，供下次 `--rerun-failed` 只重跑失败的
//! 股票。清单为空时删除文件，避免陈旧的失败记录泄漏到后续重跑。

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Result;

const FAILED_FILE_NAME: &str = "failed.txt";

/// 把失败股票清单写入目录下的 failed.txt；空清单删除已有文件
pub fn save_failed_stocks(dir: &Path, stocks: &[String]) -> Result<()> {
    fs::create_dir_all(dir)?;
    let file_path = dir.join(FAILED_FILE_NAME);

    if stocks.is_empty() {
        match fs::remove_file(&file_path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        return Ok(());
    }

    fs::write(&file_path, stocks.join("\n"))?;
    Ok(())
}

/// 读取目录下的 failed.txt；文件不存在时返回空清单
pub fn load_failed_stocks(dir: &Path) -> Result<Vec<String>> {
    let file_path = dir.join(FAILED_FILE_NAME);
    let content = match fs::read_to_string(&file_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

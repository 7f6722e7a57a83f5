use anyhow::Result;
use clap::Parser;

use multi_stock_scraper::config::{CliArgs, Config};
use multi_stock_scraper::orchestrator::App;
use multi_stock_scraper::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 解析并校验命令行参数
    let config = Config::from_args(CliArgs::parse())?;

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}

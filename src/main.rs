use anyhow::{Context, Result};
use certificate_batch::cli::Cli;
use certificate_batch::utils::logging;
use certificate_batch::App;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 加载配置
    let config = cli.load_config().context("加载配置失败")?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let report = App::initialize(config, cli.paths())
        .await
        .context("初始化失败")?
        .run()
        .await?;

    if report.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

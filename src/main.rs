use anyhow::{Context, Result};
use clap::Parser;
use job_apply::cli::Cli;
use job_apply::{logger, App};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = cli.load_config().context("加载配置失败")?;

    // 初始化日志
    logger::init(config.verbose_logging);

    let query = cli.search_query()?;
    let blacklist = cli.blacklist();

    // 登录并运行
    let mut app = App::initialize(config, cli.credentials(), cli.resume.as_deref())
        .await
        .context("初始化失败")?;
    app.run(query, blacklist).await?;

    Ok(())
}

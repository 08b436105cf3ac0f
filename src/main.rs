use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use persona_research::cli::{Args, Command};
use persona_research::generator::context::GeneratorContext;
use persona_research::generator::workflow::launch;
use persona_research::llm::LLMClient;
use persona_research::server;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let command = args.command.clone();
    let config = args.into_config()?;

    // RUST_LOG优先，其次按verbose选择日志级别；日志写到stderr，stdout只输出结果
    let default_level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match command {
        Command::Run { request } => {
            let client = LLMClient::new(config.llm.clone())?;
            // 启动时检查模型连接
            client.check_connection().await?;

            let context = GeneratorContext::with_gateway(config, Arc::new(client));
            let outcome = launch(&context, &request).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Serve { .. } => server::serve(config).await?,
    }

    Ok(())
}

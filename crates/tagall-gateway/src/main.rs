use clap::Parser;
use tracing::info;

use tagall_core::config::TagallConfig;
use tagall_telegram::TelegramAdapter;

/// Mention every member of a Telegram group in batches.
#[derive(Debug, Parser)]
#[command(name = "tagall-gateway", version)]
struct Cli {
    /// Config file (default: ~/.tagall/tagall.toml).
    #[arg(long, env = "TAGALL_CONFIG")]
    config: Option<String>,

    /// Validate the configuration, print the delivery settings and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tagall_gateway=info,tagall_telegram=info,tagall_delivery=info".into()
            }),
        )
        .init();

    let cli = Cli::parse();

    // load config: --config / TAGALL_CONFIG > ~/.tagall/tagall.toml, then TAGALL_* env
    let config = TagallConfig::load(cli.config.as_deref())?;
    let delivery = config.delivery()?;

    if cli.check {
        println!("locale          = {:?}", config.locale);
        println!("default_message = {:?}", delivery.default_message);
        println!("delete          = {}", delivery.delete);
        println!("use_bot         = {}", delivery.use_bot);
        println!("timeout         = {}s", delivery.pause.as_secs_f64());
        println!("silent          = {}", delivery.silent);
        println!("batch_size      = {}", delivery.batch_size);
        return Ok(());
    }

    let adapter = TelegramAdapter::new(&config)?;
    info!(
        use_bot = delivery.use_bot,
        silent = delivery.silent,
        "TagAll gateway starting"
    );
    adapter.run().await?;
    Ok(())
}

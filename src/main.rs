use anyhow::Context;
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use blizzard_journal::blizzard::ApiClient;
use blizzard_journal::config::Config;
use blizzard_journal::gamedata;
use blizzard_journal::journal::{output, Crawler};

#[tokio::main]
async fn main() {
    // Logging: console + daily-rotated file.
    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix("blizzard-journal")
        .filename_suffix("log")
        .build("logs")
        .expect("initializing rolling file appender failed");

    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr.and(non_blocking))
        .with_ansi(true)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = if args.is_empty() {
        Cow::from("./config.toml")
    } else {
        Cow::from(args.remove(0))
    };
    let command = if args.is_empty() {
        "instances".to_string()
    } else {
        args.remove(0)
    };

    let config = match get_config(&*config_path).await {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return;
        }
    };

    if let Err(e) = run(&command, config).await {
        tracing::error!("{} failed: {}", command, e);
        tracing::error!("  {:?}", e);
    }
}

async fn run(command: &str, config: Config) -> anyhow::Result<()> {
    let client = Arc::new(ApiClient::new(&config.blizzard, &config.crawler));

    match command {
        "instances" => {
            let crawler = Crawler::new(Arc::clone(&client), &config);
            let report = crawler.run().await?;
            output::write_report(&report, &config.crawler.output_dir).await?;
        }
        "token" => {
            let copper = gamedata::token_price(&client, &config.blizzard).await?;
            println!("{} gold", copper / 10_000);
        }
        "classes" => {
            let classes = gamedata::classes_index(&client, &config.blizzard).await?;
            println!("{}", serde_json::to_string_pretty(&classes)?);
        }
        "races" => {
            let races = gamedata::races_index(&client, &config.blizzard).await?;
            println!("{}", serde_json::to_string_pretty(&races)?);
        }
        "guild" => {
            let guild = guild_config(&config)?;
            let summary = gamedata::guild_summary(&client, &config.blizzard, guild).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "roster" => {
            let guild = guild_config(&config)?;
            let roster = gamedata::guild_roster(&client, &config.blizzard, guild).await?;
            println!("{}", serde_json::to_string_pretty(&roster)?);
        }
        other => anyhow::bail!(
            "unknown command \"{}\" (expected instances, token, classes, races, guild or roster)",
            other
        ),
    }
    Ok(())
}

fn guild_config(config: &Config) -> anyhow::Result<&blizzard_journal::config::Guild> {
    config
        .guild
        .as_ref()
        .context("no [guild] section in config")
}

async fn get_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let mut f = File::open(path)
        .await
        .context("could not open config file")?;
    let mut toml = String::new();
    f.read_to_string(&mut toml)
        .await
        .context("could not read config file")?;
    let config = toml::from_str(&toml).context("could not parse config file")?;

    Ok(config)
}

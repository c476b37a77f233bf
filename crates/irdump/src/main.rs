mod cli;
mod spider;

// remote imports
use clap::Parser;
use cli::{Cli, Commands, TraceLevel};
use irdump_spider::config::Config;
use irdump_spider::roster::Roster;
use std::time::Duration;
use tracing::{subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

////////////////////////////////////////////////////////////////////////////

// install the tracing subscriber at the requested level
fn preprocess(trace_level: Level) -> anyhow::Result<()> {
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // set the trace level
    if let Some(trace_level) = cli.trace {
        preprocess(match trace_level {
            TraceLevel::DEBUG => Level::DEBUG,
            TraceLevel::ERROR => Level::ERROR,
            TraceLevel::INFO => Level::INFO,
            TraceLevel::TRACE => Level::TRACE,
            TraceLevel::WARN => Level::WARN,
        })?;
    }
    trace!("command line input recorded: {cli:?}");

    // if no trace level provided, use tui
    let tui = cli.trace.is_none();

    let mut config = Config::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_root(data_dir);
    }

    // read cli inputs
    match cli.command {
        // `irdump spider <Option<Vec<Company>>>`: scrape once
        Commands::Spider { companies } => spider::run(&config, companies, tui).await?,

        // `irdump schedule --every <hours>`: scrape forever
        Commands::Schedule { every } => {
            let secs = every
                .checked_mul(60 * 60)
                .ok_or_else(|| anyhow::anyhow!("--every {every} hours is too long"))?;
            spider::schedule(&config, Duration::from_secs(secs), tui).await?
        }

        // `irdump roster`: list the companies
        Commands::Roster => {
            for company in &Roster::fintech() {
                println!(
                    "{:<24} {:<6} {}",
                    company.name,
                    company.ticker.as_deref().unwrap_or("-"),
                    company.ir_url
                );
            }
        }
    }

    Ok(())
}

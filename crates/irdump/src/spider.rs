use colored::Colorize;
use irdump_spider as spider;
use spider::batch::{BatchReport, BatchRunner};
use spider::config::Config;
use spider::extract::Renderer;
use spider::fetch::HttpFetcher;
use spider::publish::LogPublisher;
use spider::roster::{Company, Roster};
use spider::scrape::Spider;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Build the batch runner from `config`, restricted to `companies` when given.
pub(crate) fn runner(
    config: &Config,
    companies: Option<Vec<String>>,
    tui: bool,
) -> anyhow::Result<BatchRunner<HttpFetcher, LogPublisher>> {
    trace!("building spider with {config:?}");
    let fetcher = HttpFetcher::new(config)?;
    let renderer = Renderer::detect(config);
    debug!("dynamic renderer: {renderer:?}");

    let spider = Spider::new(fetcher, &config.data_root).with_renderer(renderer);
    let roster = select(Roster::fintech(), companies)?;

    Ok(BatchRunner::new(roster, spider).with_tui(tui))
}

/// Run every selected company once.
pub(crate) async fn run(
    config: &Config,
    companies: Option<Vec<String>>,
    tui: bool,
) -> anyhow::Result<()> {
    let runner = runner(config, companies, tui)?;
    let report = runner.run().await?;
    if tui {
        print_report(&report);
    }
    Ok(())
}

/// Run the whole roster, sleep for `every`, repeat.
pub(crate) async fn schedule(config: &Config, every: Duration, tui: bool) -> anyhow::Result<()> {
    let runner = runner(config, None, tui)?;
    loop {
        let report = runner.run().await?;
        if tui {
            print_report(&report);
        }

        let next = chrono::Local::now() + chrono::Duration::from_std(every)?;
        info!("sleeping for {every:?}; next run at {}", next.format("%Y-%m-%d %H:%M"));
        if tui {
            println!("next run at {}", next.format("%Y-%m-%d %H:%M"));
        }
        tokio::time::sleep(every).await;
    }
}

/// Keep roster order; `names` match a display name or slug, case-insensitively.
fn select(roster: Roster, names: Option<Vec<String>>) -> anyhow::Result<Roster> {
    let Some(names) = names else {
        return Ok(roster);
    };

    let matches = |company: &Company, name: &str| {
        company.name.eq_ignore_ascii_case(name) || company.slug() == name.to_lowercase()
    };
    if let Some(unknown) = names
        .iter()
        .find(|name| !roster.iter().any(|company| matches(company, name)))
    {
        anyhow::bail!("{unknown} is not on the roster");
    }

    Ok(roster
        .iter()
        .filter(|company| names.iter().any(|name| matches(company, name)))
        .cloned()
        .collect::<Vec<_>>()
        .into())
}

fn print_report(report: &BatchReport) {
    println!(
        "{} completed, {} unreachable, {} without links, {} failed",
        report.completed.to_string().green(),
        report.page_unavailable.to_string().yellow(),
        report.no_links.to_string().yellow(),
        report.failed.len().to_string().red(),
    );
    for (company, reason) in &report.failed {
        println!("  {} {company}: {reason}", "x".red());
    }
    println!(
        "{} new files, {} failed downloads",
        report.downloaded.to_string().green(),
        report.download_failures
    );
}

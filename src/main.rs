use clap::Parser;
use close_pending::github::{GithubClient, resolve_token};
use close_pending::options::Options;
use close_pending::tracker::GithubTracker;
use close_pending::{logger, triage};
use tracing as log;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let opt = Options::parse();
    logger::init(opt.verbose);
    let config = opt.finalize()?;

    let gh = GithubClient::new_with_token(resolve_token(config.token)?)?;
    let tracker = GithubTracker::new(&gh, config.repo);
    // Every age in this run is relative to this one date.
    let today = chrono::Utc::now().date_naive();
    if config.dry_run {
        log::info!("dry run, {} will not be modified", tracker.repository());
    }

    let report = triage::run(
        &tracker,
        &config.policy,
        today,
        config.dry_run,
        &mut std::io::stdout().lock(),
    )
    .await?;
    log::info!(
        "{}: {} issue(s), {} label(s) cleared, {} closed",
        tracker.repository(),
        report.issues,
        report.labels_cleared,
        report.closed,
    );

    Ok(())
}

use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rivas_bot::booking::Orchestrator;
use rivas_bot::cli::Cli;
use rivas_bot::config::BotConfig;
use rivas_bot::holidays::{HolidayOracle, MadridCalendar, OverrideDir};
use rivas_bot::policy::DatePolicy;
use rivas_bot::retry::{RetryController, RunStatus};
use rivas_bot::webdriver::{WebDriverBrowser, WebDriverConfig};

/// Exit code for bad configuration, matching clap's usage errors.
const USAGE_ERROR: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    let date = cli.date_or(Local::now().date_naive());

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    info!(%date, webdriver = %config.webdriver_url, "rivas-bot starting");

    let browser = match WebDriverBrowser::new(
        WebDriverConfig::new(&config.webdriver_url).with_headless(config.headless),
    ) {
        Ok(browser) => browser,
        Err(e) => {
            error!(error = %e, "failed to create WebDriver client");
            return RunStatus::Failure.into();
        }
    };

    let holidays = HolidayOracle::new(MadridCalendar, OverrideDir::new(&config.holidays_dir));
    let orchestrator = Orchestrator::new(browser, DatePolicy::new(holidays), &config);

    RetryController::new(orchestrator).run(date).await.into()
}

//! Command-line arguments.

use chrono::NaiveDate;
use clap::Parser;

const ENVIRONMENT: &str = "\
Environment:
  GYM_USER, GYM_PASS       booking site credentials (needed if login is asked)
  WEBDRIVER_URL            WebDriver endpoint (default http://localhost:9515)
  RIVASBOT_HOLIDAYS_DIR    directory with festivos_rivas_<YEAR>.json files
  RIVASBOT_EVIDENCE_DIR    directory for screenshots
  RIVASBOT_HEADLESS        true/false (default true)
  RUST_LOG                 log filter (default info)";

/// Books the court slot for the given date.
#[derive(Debug, Parser)]
#[command(name = "rivas-bot", version, after_help = ENVIRONMENT)]
pub struct Cli {
    /// Date to book (default: today)
    #[arg(value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

impl Cli {
    /// The requested date, or `today` when none was given.
    pub fn date_or(&self, today: NaiveDate) -> NaiveDate {
        self.date.unwrap_or(today)
    }
}

fn parse_date(arg: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(arg, "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM-DD, got {arg:?}"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_today() {
        let cli = Cli::try_parse_from(["rivas-bot"]).unwrap();
        assert_eq!(cli.date, None);
        assert_eq!(cli.date_or(today()), today());
    }

    #[test]
    fn explicit_date() {
        let cli = Cli::try_parse_from(["rivas-bot", "2025-08-10"]).unwrap();
        assert_eq!(
            cli.date_or(today()),
            NaiveDate::from_ymd_opt(2025, 8, 10).unwrap()
        );
    }

    #[test]
    fn help_exits_cleanly() {
        for flag in ["--help", "-h"] {
            let err = Cli::try_parse_from(["rivas-bot", flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
            assert_eq!(err.exit_code(), 0);
        }
    }

    #[test]
    fn help_lists_environment() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("GYM_USER"));
        assert!(help.contains("RIVASBOT_HOLIDAYS_DIR"));
    }

    #[test]
    fn rejects_bad_dates() {
        for arg in ["10/08/2025", "2025-02-30"] {
            let err = Cli::try_parse_from(["rivas-bot", arg]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation);
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn rejects_extra_arguments() {
        for extra in [
            &["rivas-bot", "2025-08-10", "2025-08-11"][..],
            &["rivas-bot", "--verbose"][..],
        ] {
            let err = Cli::try_parse_from(extra.iter().copied()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownArgument);
            assert_eq!(err.exit_code(), 2);
        }
    }
}

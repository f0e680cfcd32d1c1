use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use exam_core::model::{BankOverview, QuestionCategory, SelectionPolicy};
use services::{AppServices, ExamConfig, ExamService};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPolicy { raw: String },
    InvalidPort { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPolicy { raw } => {
                write!(f, "invalid --policy value: {raw} (expected random or fixed)")
            }
            ArgsError::InvalidPort { raw } => write!(f, "invalid --port value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn exam(&self) -> Arc<ExamService> {
        self.services.exam()
    }

    fn bank_overview(&self) -> BankOverview {
        self.services.overview()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- gui   [--bank <dir>] [--policy random|fixed]");
    eprintln!("  cargo run -p app -- serve [--bank <dir>] [--policy random|fixed] [--host <host>] [--port <port>]");
    eprintln!("  cargo run -p app -- check [--bank <dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bank .  --policy random  --host 127.0.0.1  --port 5000");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!("  EXAM_BANK_DIR, EXAM_POLICY, EXAM_HOST, EXAM_PORT, EXAM_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Gui,
    Serve,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "gui" => Some(Self::Gui),
            "serve" => Some(Self::Serve),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

/// Command-line overrides layered on top of the environment config.
#[derive(Debug, Default)]
struct Overrides {
    bank_dir: Option<PathBuf>,
    policy: Option<SelectionPolicy>,
    host: Option<String>,
    port: Option<u16>,
}

impl Overrides {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut overrides = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => overrides.bank_dir = Some(require_value(args, "--bank")?.into()),
                "--policy" => {
                    let value = require_value(args, "--policy")?;
                    let policy = value
                        .parse::<SelectionPolicy>()
                        .map_err(|_| ArgsError::InvalidPolicy { raw: value.clone() })?;
                    overrides.policy = Some(policy);
                }
                "--host" => overrides.host = Some(require_value(args, "--host")?),
                "--port" => {
                    let value = require_value(args, "--port")?;
                    let port = value
                        .parse::<u16>()
                        .map_err(|_| ArgsError::InvalidPort { raw: value.clone() })?;
                    overrides.port = Some(port);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(overrides)
    }

    fn apply(self, mut config: ExamConfig) -> ExamConfig {
        if let Some(dir) = self.bank_dir {
            config = config.with_bank_dir(dir);
        }
        if let Some(policy) = self.policy {
            config = config.with_policy(policy);
        }
        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        config
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_overview(config: &ExamConfig, overview: &BankOverview) {
    println!("bank: {}", config.bank_dir.display());
    for category in QuestionCategory::ALL {
        let count = match category {
            QuestionCategory::SingleChoice => overview.single_choice,
            QuestionCategory::MultipleChoice => overview.multiple_choice,
            QuestionCategory::Judgment => overview.judgment,
        };
        println!("  {}: {count}", category.display_name());
    }
    println!("  total: {}", overview.total);
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the desktop window.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Gui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Gui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let overrides = Overrides::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let config = overrides.apply(ExamConfig::from_env()?);
    init_tracing(&config.log_filter);

    info!(bank = %config.bank_dir.display(), policy = %config.policy, "loading question bank");
    let services = AppServices::load(config).await?;

    match cmd {
        Command::Check => {
            print_overview(services.config(), &services.overview());
            Ok(())
        }
        Command::Serve => {
            web::serve(services).await?;
            Ok(())
        }
        Command::Gui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("考试系统")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> impl Iterator<Item = String> {
        raw.iter().map(|s| (*s).to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn overrides_replace_env_values() {
        let overrides = Overrides::parse(&mut args(&[
            "--bank", "data", "--policy", "fixed", "--port", "8080",
        ]))
        .unwrap();
        let config = overrides.apply(ExamConfig::default());
        assert_eq!(config.bank_dir, PathBuf::from("data"));
        assert_eq!(config.policy, SelectionPolicy::FixedSequence);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            Overrides::parse(&mut args(&["--policy", "shuffle"])),
            Err(ArgsError::InvalidPolicy { .. })
        ));
        assert!(matches!(
            Overrides::parse(&mut args(&["--port", "99999"])),
            Err(ArgsError::InvalidPort { .. })
        ));
        assert!(matches!(
            Overrides::parse(&mut args(&["--bank"])),
            Err(ArgsError::MissingValue { flag: "--bank" })
        ));
        assert!(matches!(
            Overrides::parse(&mut args(&["--verbose"])),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn subcommands_are_recognised() {
        assert_eq!(Command::from_arg("serve"), Some(Command::Serve));
        assert_eq!(Command::from_arg("check"), Some(Command::Check));
        assert_eq!(Command::from_arg("ui"), None);
    }
}

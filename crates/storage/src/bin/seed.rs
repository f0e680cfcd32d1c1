use std::fmt;
use std::path::PathBuf;

use exam_core::model::QuestionCategory;
use storage::sample::sample_records;
use storage::write_bank_file;

#[derive(Debug, Clone)]
struct Args {
    dir: PathBuf,
    force: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDir { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDir { raw } => write!(f, "invalid --dir value: {raw:?}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut dir = std::env::var("EXAM_BANK_DIR").map_or_else(|_| PathBuf::from("."), PathBuf::from);
        let mut force = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dir" => {
                    let value = require_value(&mut args, "--dir")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDir { raw: value });
                    }
                    dir = PathBuf::from(value);
                }
                "--force" => force = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { dir, force })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --dir <path>      Directory to write the bank files into (default: .)");
    eprintln!("  --force           Overwrite existing bank files");
    eprintln!("  -h, --help        Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  EXAM_BANK_DIR");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    tokio::fs::create_dir_all(&args.dir).await?;

    let mut written = 0usize;
    for category in QuestionCategory::ALL {
        let path = args.dir.join(storage::bank_file_name(category));
        if !args.force && tokio::fs::try_exists(&path).await? {
            println!("Skipping existing {}", path.display());
            continue;
        }
        let records = sample_records(category);
        let path = write_bank_file(&args.dir, category, &records).await?;
        println!("Wrote {} {} questions to {}", records.len(), category.display_name(), path.display());
        written += 1;
    }

    println!("Seeded {written} bank file(s) into {}", args.dir.display());
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

use std::env;
use std::path::PathBuf;

use chrono::Local;
use colored::Colorize;
use cost_summary::billing::AwsCliClient;
use cost_summary::config::Config;
use cost_summary::errors::CostError;
use cost_summary::{init, report};

struct Args {
    config_path: PathBuf,
    plain: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, CostError> {
    let mut config_path = Config::default_path();
    let mut plain = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args.next().ok_or_else(|| {
                    CostError::Config("--config requires a path argument".into())
                })?;
                config_path = PathBuf::from(value);
            }
            "--plain" => plain = true,
            other => {
                return Err(CostError::Config(format!(
                    "unknown argument `{other}` (expected --config <path> or --plain)"
                )));
            }
        }
    }
    Ok(Args { config_path, plain })
}

fn run() -> Result<String, CostError> {
    let args = parse_args(env::args().skip(1))?;
    let config = Config::load(&args.config_path)?;
    let client = AwsCliClient::new();
    let today = Local::now().date_naive();
    report::run_report(&client, &config, today, !args.plain)
}

fn main() {
    init();

    match run() {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            eprintln!("{} {err}", "Error:".bright_red());
            std::process::exit(1);
        }
    }
}

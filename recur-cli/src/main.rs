use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use recur_core::normalize;
use recur_report::ReportFormat;
use std::path::PathBuf;

mod config;
mod pipeline;

use config::{AccountSource, Config, DEFAULT_CONFIG_FILE, load_config, parse_account_arg};

#[derive(Parser, Debug)]
#[command(name = "recur", version, about = "Summarize recurring charges across bank exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize every configured account, then all of them together
    Run(RunArgs),

    /// Print the grouping key for each description
    Normalize {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Write a starter config file
    InitConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Config file (defaults apply when it does not exist)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// NAME=PATH; repeatable, replaces the configured accounts
    #[arg(long = "account", value_parser = parse_account_arg)]
    accounts: Vec<AccountSource>,

    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Similarity cutoff within one account (0..=1)
    #[arg(long)]
    account_cutoff: Option<f64>,

    /// Similarity cutoff for the combined pass (0..=1)
    #[arg(long)]
    combined_cutoff: Option<f64>,

    /// Skip the combined report
    #[arg(long)]
    no_combined: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => ReportFormat::Csv,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

impl RunArgs {
    fn into_config(self) -> Result<Config> {
        let mut cfg = load_config(&self.config)?;
        if !self.accounts.is_empty() {
            cfg.accounts = self.accounts;
        }
        if let Some(dir) = self.output {
            cfg.output_dir = dir;
        }
        if let Some(f) = self.format {
            cfg.format = f.into();
        }
        if let Some(c) = self.account_cutoff {
            cfg.cutoffs.account = c;
        }
        if let Some(c) = self.combined_cutoff {
            cfg.cutoffs.combined = c;
        }
        if self.no_combined {
            cfg.combined = false;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let cfg = args.into_config()?;
            if cfg.accounts.is_empty() {
                bail!("no accounts configured (add [[accounts]] to the config or pass --account NAME=PATH)");
            }

            let outcome = pipeline::run(&cfg)?;

            for a in &outcome.accounts {
                let recurring = a.charges.iter().filter(|(_, b)| b.is_recurring()).count();
                println!(
                    "{}: {} groups, {} recurring, {} rows skipped → {}",
                    a.name,
                    a.charges.len(),
                    recurring,
                    a.skipped.total(),
                    a.report.display()
                );
            }
            for name in &outcome.missing {
                println!("{name}: input not found, skipped");
            }
            if let Some((combined, path)) = &outcome.combined {
                let recurring = combined.iter().filter(|(_, b)| b.is_recurring()).count();
                println!(
                    "{}: {} groups, {} recurring → {}",
                    pipeline::COMBINED_NAME,
                    combined.len(),
                    recurring,
                    path.display()
                );
            }
        }

        Command::Normalize { text } => {
            for raw in &text {
                println!("{raw}\t{}", normalize(raw));
            }
        }

        Command::InitConfig { config } => {
            config::init_config(&config)?;
        }
    }

    Ok(())
}

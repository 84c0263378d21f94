use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crashscope::cli::{self, SearchArgs};
use crashscope::config;
use crashscope::render::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "crashscope")]
#[command(about = "Search vehicle collision records and chart what comes back")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one search against the accident service and print the result
    Search(SearchFlags),
    /// Serve the browser dashboard
    Web {
        /// Address to bind (default from config: 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Summarize past searches from the query log
    History {
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check service reachability and local files
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Args)]
struct SearchFlags {
    /// Vehicle body type, e.g. "Sedan"
    #[arg(long)]
    vehicle_type: Option<String>,
    /// Make code, upper-cased before sending (e.g. FORD, NISS)
    #[arg(long)]
    make: Option<String>,
    /// Model name, upper-cased before sending
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    year: Option<String>,
    /// Driver sex: M or F
    #[arg(long)]
    sex: Option<String>,
    #[arg(long)]
    license_status: Option<String>,
    /// Registration state, e.g. NY
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    direction: Option<String>,
    /// Earliest crash date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,
    /// Latest crash date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
    /// View: detail (default from config) or analytics
    #[arg(long)]
    view: Option<String>,
    /// Output format: table (default), json, csv
    #[arg(long, default_value = "table")]
    format: String,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default ~/.crashscope/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `service.base_url`
    Set { key: String, value: String },
    /// Restore the default configuration file
    Reset,
}

impl SearchFlags {
    fn into_args(self) -> Result<SearchArgs> {
        let view = match self.view.as_deref() {
            Some(raw) => Some(
                config::parse_view(raw)
                    .ok_or_else(|| anyhow::anyhow!("unknown view '{raw}' (expected detail or analytics)"))?,
            ),
            None => None,
        };

        Ok(SearchArgs {
            filters: [
                self.vehicle_type,
                self.make,
                self.model,
                self.year,
                self.sex,
                self.license_status,
                self.state,
                self.direction,
                self.from,
                self.to,
            ],
            view,
            format: OutputFormat::from_str_opt(Some(&self.format)),
        })
    }
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Search(flags) => {
            let succeeded = cli::run_search(flags.into_args()?)?;
            if !succeeded {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Web { addr } => cli::run_web(addr.as_deref()),
        Commands::History { days, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_history(fmt, days)
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sshmon_core::{Dataset, DashboardConfig, Selection, Session, apply, export_path};

/// Dataset read when no input file is given.
const DEFAULT_DATASET: &str = "dataset_ssh.csv";

#[derive(Parser)]
#[command(name = "sshmon")]
#[command(about = "Summarize, filter and export SSH authentication events from CSV")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the dashboard views for a filter selection and print them as JSON
    ///
    /// Prints summary metrics, alert status, top source IPs, event-type
    /// distribution, attempts histogram, and (when the columns exist) daily
    /// series and map points.
    Report {
        /// CSV file with at least SourceIP and EventId columns
        #[arg(default_value = DEFAULT_DATASET)]
        input: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        config: ConfigArgs,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List the values available to each filter (event IDs, IPs, users)
    Options {
        /// CSV file with at least SourceIP and EventId columns
        #[arg(default_value = DEFAULT_DATASET)]
        input: PathBuf,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Write the filtered events to CSV with a derived Critique column
    Export {
        /// CSV file with at least SourceIP and EventId columns
        #[arg(default_value = DEFAULT_DATASET)]
        input: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output path (defaults to the configured export file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Keep only this event ID
    #[arg(short, long)]
    event: Option<String>,

    /// Keep only events from this source IP (can be specified multiple times)
    #[arg(long = "ip")]
    ips: Vec<String>,

    /// Keep only events for this user (can be specified multiple times)
    #[arg(short, long = "user")]
    users: Vec<String>,
}

impl FilterArgs {
    fn selection(&self) -> Selection {
        let mut selection = Selection::all();
        if let Some(ref event) = self.event {
            selection = selection.with_event(event.clone());
        }
        if !self.ips.is_empty() {
            selection = selection.with_source_ips(self.ips.iter().cloned());
        }
        if !self.users.is_empty() {
            selection = selection.with_users(self.users.iter().cloned());
        }
        selection
    }
}

#[derive(Args)]
struct ConfigArgs {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Event ID counted as critical (can be specified multiple times; replaces the configured list)
    #[arg(long = "critical-id")]
    critical_ids: Vec<String>,

    /// Critical-event count at which the status becomes critical
    #[arg(long)]
    critical_at: Option<usize>,

    /// Number of entries in the top source IP ranking
    #[arg(long)]
    top_k: Option<usize>,
}

impl ConfigArgs {
    fn resolve(&self) -> DashboardConfig {
        let mut config = match self.config {
            Some(ref path) => match DashboardConfig::from_path(path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error loading config {}: {e}", path.display());
                    process::exit(1);
                }
            },
            None => DashboardConfig::default(),
        };

        if !self.critical_ids.is_empty() {
            config.critical_event_ids = self.critical_ids.clone();
        }
        if let Some(n) = self.critical_at {
            config.status.critical_at = n;
        }
        if let Some(k) = self.top_k {
            config.top_k = k;
        }

        if let Err(e) = config.validate() {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        config
    }
}

/// Filter choices offered by a dataset.
#[derive(Serialize)]
struct FilterOptions {
    event_ids: Vec<String>,
    source_ips: Vec<String>,
    users: Vec<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            input,
            filters,
            config,
            pretty,
        } => cmd_report(input, filters, config, pretty),
        Commands::Options { input, pretty } => cmd_options(input, pretty),
        Commands::Export {
            input,
            filters,
            config,
            output,
        } => cmd_export(input, filters, config, output),
    }
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_report(input: PathBuf, filters: FilterArgs, config: ConfigArgs, pretty: bool) {
    let mut session = Session::new(config.resolve());
    load_dataset(&mut session, &input);

    let selection = filters.selection();
    log::debug!("selection: {selection:?}");

    match session.render(&selection) {
        Ok(Some(report)) => print_json(&report, pretty),
        Ok(None) => warn_no_results(),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn cmd_options(input: PathBuf, pretty: bool) {
    let mut session = Session::default();
    let dataset = load_dataset(&mut session, &input);

    let options = FilterOptions {
        event_ids: dataset.event_ids(),
        source_ips: dataset.source_ips(),
        users: dataset.users(),
    };
    print_json(&options, pretty);
}

fn cmd_export(input: PathBuf, filters: FilterArgs, config: ConfigArgs, output: Option<PathBuf>) {
    let mut session = Session::new(config.resolve());
    let dataset = load_dataset(&mut session, &input);
    let config = session.config();

    let view = apply(&dataset, &filters.selection());
    if view.is_empty() {
        warn_no_results();
        return;
    }

    let output = output.unwrap_or_else(|| PathBuf::from(&config.export_file_name));
    match export_path(&view, &config.critical_set(), &output) {
        Ok(rows) => eprintln!("Exported {rows} events to {}", output.display()),
        Err(e) => {
            eprintln!("Error writing {}: {e}", output.display());
            process::exit(1);
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_dataset(session: &mut Session, path: &Path) -> Arc<Dataset> {
    match session.load_path(path) {
        Ok(dataset) => {
            eprintln!("Loaded {} events from {}", dataset.len(), path.display());
            dataset
        }
        Err(e) => {
            eprintln!("Error loading {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn warn_no_results() {
    eprintln!("Warning: no events match the current filters.");
}

fn print_json(value: &impl Serialize, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match json {
        Ok(j) => println!("{j}"),
        Err(e) => {
            eprintln!("JSON serialization error: {e}");
            process::exit(1);
        }
    }
}

use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pravaah_api::StationClient;
use pravaah_core::amenities::{AmenityState, NO_AMENITIES_MESSAGE, StatusKind};
use pravaah_core::catalog::{self, Route, ToolAction, ToolDescriptor};
use pravaah_core::config::{Config, expand_path};
use pravaah_core::dispatch::{run_search, run_toggle};
use pravaah_core::print_banner;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Resolve global arguments into a [`Config`].
pub fn build_config(args: &ArgMatches) -> Config {
    let mut config = Config::default();
    if let Some(url) = args.get_one::<Url>("api-base") {
        config.api_base = url.as_str().to_string();
    }
    config.timeout = args
        .get_one::<u64>("timeout")
        .map(|secs| Duration::from_secs(*secs));
    config.tools_file = args
        .get_one::<String>("tools-file")
        .map(|path| expand_path(path));
    config
}

/// Whether the banner goes out before dispatch. The dashboard draws its own
/// header, and `open` decides once it knows the target.
pub fn prints_banner(args: &ArgMatches) -> bool {
    !args.get_flag("quiet")
        && !matches!(
            args.subcommand(),
            None | Some(("ui", _)) | Some(("open", _))
        )
}

/// Install the global tracing subscriber. `RUST_LOG` overrides `default_level`.
/// With a `log_file`, output is appended there instead of stderr.
pub fn init_logging(default_level: &str, log_file: Option<&Path>) -> Result<(), String> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    format!("Failed to create log directory {}: {}", parent.display(), e)
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| e.to_string())
        }
        None => builder
            .with_writer(io::stderr)
            .try_init()
            .map_err(|e| e.to_string()),
    }
}

fn log_level(verbose: bool, default: &'static str) -> &'static str {
    if verbose { "debug" } else { default }
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "✗".red().bold(), message);
    std::process::exit(1);
}

fn load_client(config: &Config) -> StationClient {
    config.client().unwrap_or_else(|e| fail(e))
}

fn load_tools(config: &Config) -> Vec<ToolDescriptor> {
    config.tools().unwrap_or_else(|e| fail(e))
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    pb
}

/// Plain-text rendering of the tool catalog.
pub fn format_tool_listing(tools: &[ToolDescriptor]) -> String {
    let mut listing = String::new();
    for tool in tools {
        let target = if tool.is_external {
            format!("{} ↗", tool.url).cyan().to_string()
        } else {
            format!("{} (in app)", tool.url).green().to_string()
        };
        listing.push_str(&format!(
            "  {}  {}\n    {}\n    [{}]\n\n",
            tool.title.bright_white().bold(),
            target,
            tool.description,
            tool.call_to_action()
        ));
    }
    listing
}

/// Plain-text rendering of the loaded station's amenities.
pub fn format_amenity_report(state: &AmenityState) -> String {
    let mut report = String::new();
    report.push_str(&format!("# {}\n", state.title()));

    if state.result().is_none() {
        return report;
    }

    let rows = state.amenities();
    if rows.is_empty() {
        report.push_str(&format!("  {}\n", NO_AMENITIES_MESSAGE));
        return report;
    }

    let visible = rows.iter().filter(|r| r.visible).count();
    report.push_str(&format!(
        "  {} amenities ({} visible)\n\n",
        rows.len(),
        visible
    ));

    let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    for row in rows {
        let flag = if row.visible {
            format!("✓ {:<7}", row.visibility_label()).green()
        } else {
            format!("✗ {:<7}", row.visibility_label()).bright_black()
        };
        report.push_str(&format!(
            "  {}  {:<width$}  ID: {}\n",
            flag,
            row.label,
            row.id,
            width = width
        ));
    }
    report
}

pub fn handle_ui(config: &Config, start: Route, verbose: bool) {
    let log_file = config.log_file();
    if let Err(e) = init_logging(log_level(verbose, "info"), Some(&log_file)) {
        eprintln!("{} {}", "⚠".yellow().bold(), e);
    }

    let client = load_client(config);
    let tools = load_tools(config);
    info!(
        "Starting dashboard at {} against {}",
        start.path(),
        client.base_url()
    );

    if let Err(e) = pravaah_tui::run(client, tools, start) {
        fail(format!("Error running TUI: {}", e));
    }
}

pub fn handle_tools(config: &Config) {
    let tools = load_tools(config);

    print_divider();
    println!("{}", "  DASHBOARD TOOLS".bright_white().bold());
    print_divider();
    println!();
    print!("{}", format_tool_listing(&tools));
}

/// Perform a catalog entry's action. Internal routes launch the dashboard;
/// the banner is only printed for external links.
pub fn handle_open(config: &Config, title: &str, quiet: bool, verbose: bool) {
    let tools = load_tools(config);
    let Some(tool) = catalog::find_tool(&tools, title) else {
        let titles: Vec<&str> = tools.iter().map(|t| t.title.as_str()).collect();
        fail(format!(
            "No tool named '{}'. Available: {}",
            title,
            titles.join(", ")
        ));
    };

    match tool.action() {
        Ok(ToolAction::OpenExternal(url)) => match catalog::open_external(&url) {
            Ok(()) => {
                if !quiet {
                    print_banner();
                }
                println!(
                    "{} Opened {} at {}",
                    "✓".green().bold(),
                    tool.title.bright_white(),
                    url.as_str().cyan()
                )
            }
            Err(e) => fail(e),
        },
        Ok(ToolAction::Navigate(route)) => handle_ui(config, route, verbose),
        Err(e) => fail(e),
    }
}

pub async fn handle_search(config: &Config, station: &str, verbose: bool) {
    if let Err(e) = init_logging(log_level(verbose, "warn"), None) {
        eprintln!("{} {}", "⚠".yellow().bold(), e);
    }

    let client = load_client(config);
    debug!("Searching '{}' against {}", station, client.base_url());
    let mut state = AmenityState::new();
    state.set_search_key(station);

    let pb = spinner(format!("Searching for {}...", station.trim()));
    let submitted = run_search(&client, &mut state).await;
    pb.finish_and_clear();

    if !submitted || state.result().is_none() {
        fail(state.last_error().unwrap_or("Search failed"));
    }

    println!();
    print!("{}", format_amenity_report(&state));
    println!();
}

pub async fn handle_toggle(config: &Config, station: &str, vertex_id: &str, verbose: bool) {
    if let Err(e) = init_logging(log_level(verbose, "warn"), None) {
        eprintln!("{} {}", "⚠".yellow().bold(), e);
    }

    let client = load_client(config);
    let mut state = AmenityState::new();
    state.set_search_key(station);

    let pb = spinner(format!("Searching for {}...", station.trim()));
    run_search(&client, &mut state).await;
    if state.result().is_none() {
        pb.finish_and_clear();
        fail(state.last_error().unwrap_or("Search failed"));
    }

    pb.set_message(format!("Updating vertex {}...", vertex_id));
    let sent = run_toggle(&client, &mut state, vertex_id).await;
    pb.finish_and_clear();

    if !sent {
        let station = state.result().map(|r| r.name.as_str()).unwrap_or_default();
        warn!("Vertex {} is not an amenity of {}", vertex_id, station);
        fail(format!(
            "Vertex '{}' is not an amenity of {}",
            vertex_id, station
        ));
    }

    match state.last_update_status() {
        Some(status) if status.kind == StatusKind::Success => {
            println!("{} {}", "✓".green().bold(), status.message);
            if let Some(row) = state.amenities().into_iter().find(|r| r.id == vertex_id) {
                println!(
                    "  {} is now {}",
                    row.label.bright_white(),
                    row.visibility_label().cyan()
                );
            }
        }
        Some(status) => fail(&status.message),
        None => fail("No response from server"),
    }
}

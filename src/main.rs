//! ScriptDeck - run categorized local scripts from the terminal
//!
//! A thin front end over the `scriptdeck` library: lists the catalog, selects
//! entries by name and runs them (or their undo counterparts) as one batch,
//! printing output as it arrives.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use scriptdeck::config::loader::{ConfigLoader, LoadOptions, CONFIG_ENV_VAR};
use scriptdeck::platform::Platform;
use scriptdeck::{
    BatchObserver, Config, ConfirmRequest, ConfirmationPort, LaunchOutcome, Launcher, ScriptEntry,
};

/// What to do once the catalog is loaded
#[derive(Debug, Clone, PartialEq)]
enum Action {
    /// Print categories and entries
    List,
    /// Run the named entries
    Run(Vec<String>),
    /// Run every entry
    RunAll,
    /// Run the undo counterparts of the named entries
    Undo(Vec<String>),
    /// Show the configured interpreter and the ones found on this machine
    Interpreters,
    /// Write a default configuration file
    InitConfig(Option<PathBuf>),
}

/// Command line problems, reported before anything is loaded
#[derive(Debug, thiserror::Error, PartialEq)]
enum ArgsError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("{0} needs a path")]
    MissingValue(&'static str),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("{0} needs at least one script name")]
    MissingNames(&'static str),
}

/// Command line arguments
#[derive(Debug)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug mode
    debug: bool,
    /// Answer yes to every confirmation
    assume_yes: bool,
    /// Application root override
    root: Option<PathBuf>,
    /// Requested action
    action: Action,
}

impl Default for AppArgs {
    fn default() -> Self {
        Self {
            config_path: None,
            debug: false,
            assume_yes: false,
            root: None,
            action: Action::List,
        }
    }
}

impl AppArgs {
    /// Parse command line arguments
    fn parse() -> std::result::Result<Self, ArgsError> {
        Self::parse_from(env::args().skip(1))
    }

    fn parse_from<I>(args: I) -> std::result::Result<Self, ArgsError>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let mut app_args = AppArgs::default();
        let mut command: Option<String> = None;
        let mut names = Vec::new();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    i += 1;
                    let path = args.get(i).ok_or(ArgsError::MissingValue("--config"))?;
                    app_args.config_path = Some(PathBuf::from(path));
                }
                "--root" | "-r" => {
                    i += 1;
                    let path = args.get(i).ok_or(ArgsError::MissingValue("--root"))?;
                    app_args.root = Some(PathBuf::from(path));
                }
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--yes" | "-y" => {
                    app_args.assume_yes = true;
                }
                "--help" | "-h" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("ScriptDeck v{}", scriptdeck::VERSION);
                    process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    return Err(ArgsError::UnknownOption(arg.to_string()));
                }
                arg if command.is_none() => command = Some(arg.to_string()),
                arg => names.push(arg.to_string()),
            }
            i += 1;
        }

        app_args.action = match command.as_deref() {
            None | Some("list") => Action::List,
            Some("run") if names.is_empty() => return Err(ArgsError::MissingNames("run")),
            Some("run") => Action::Run(names),
            Some("run-all") => Action::RunAll,
            Some("undo") if names.is_empty() => return Err(ArgsError::MissingNames("undo")),
            Some("undo") => Action::Undo(names),
            Some("interpreters") => Action::Interpreters,
            Some("init-config") => Action::InitConfig(names.first().map(PathBuf::from)),
            Some(other) => return Err(ArgsError::UnknownCommand(other.to_string())),
        };

        Ok(app_args)
    }
}

/// Print help information
fn print_help() {
    println!("ScriptDeck - run categorized local scripts");
    println!();
    println!("USAGE:");
    println!("    scriptdeck [OPTIONS] [COMMAND] [NAMES...]");
    println!();
    println!("COMMANDS:");
    println!("    list                   List categories and scripts (default)");
    println!("    run <NAMES...>         Run the named scripts in catalog order");
    println!("    run-all                Run every script");
    println!("    undo <NAMES...>        Run the undo scripts of the named scripts");
    println!("    interpreters           Show configured and detected interpreters");
    println!("    init-config [PATH]     Write a default configuration file");
    println!();
    println!("    A name is a script name, <category>/<name> or a path.");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Path to configuration file");
    println!("    -r, --root <PATH>      Application root holding scripts/ and logs/");
    println!("    -y, --yes              Do not ask for confirmation");
    println!("    -d, --debug            Enable debug logging");
    println!("    -h, --help             Print this help message");
    println!("    -V, --version          Print version information");
    println!();
    println!("ENVIRONMENT:");
    println!("    SCRIPTDECK_CONFIG      Path to configuration file");
    println!("    SCRIPTDECK_DEBUG       Enable debug mode (1 or true)");
    println!("    RUST_LOG               Set logging level (error, warn, info, debug, trace)");
}

/// Asks on stdin; anything but `y`/`yes` declines
///
/// `prompting` is set while waiting for an answer so Ctrl-C can exit instead
/// of cancelling a batch that has not started.
struct StdinConfirm {
    prompting: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl StdinConfirm {
    fn decide(&self, answer: &str) -> bool {
        !self.cancel.is_cancelled() && matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

impl ConfirmationPort for StdinConfirm {
    fn confirm(&self, request: &ConfirmRequest) -> bool {
        print!("{} [y/N] ", request.prompt());
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        self.prompting.store(true, Ordering::SeqCst);
        let read = io::stdin().lock().read_line(&mut answer);
        self.prompting.store(false, Ordering::SeqCst);
        read.is_ok() && self.decide(&answer)
    }
}

/// Prints batch progress to stdout
struct ConsoleObserver;

impl BatchObserver for ConsoleObserver {
    fn on_status(&self, text: &str) {
        println!("== {}", text);
    }

    fn on_output_append(&self, text: &str) {
        println!("{}", text.trim_end());
    }

    fn on_progress(&self, fraction: f64) {
        println!("   [{:>3.0}%]", fraction * 100.0);
    }

    fn on_batch_end(&self) {
        println!("== Done");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        print_help();
        process::exit(2);
    });

    let log_level = if args.debug
        || env::var("SCRIPTDECK_DEBUG").map_or(false, |v| v == "1" || v.to_lowercase() == "true")
    {
        "debug"
    } else {
        "warn"
    };
    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from(env_filter))
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    debug!("Arguments: {:?}", args);

    if let Action::InitConfig(path) = &args.action {
        return init_config(path.as_deref());
    }

    let config = load_configuration(&args)?;
    if args.action == Action::Interpreters {
        print_interpreters(&config);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let prompting = Arc::new(AtomicBool::new(false));
    let confirmation: Box<dyn ConfirmationPort> = Box::new(StdinConfirm {
        prompting: Arc::clone(&prompting),
        cancel: cancel.clone(),
    });
    let mut launcher = Launcher::new(config, confirmation);

    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            if prompting.load(Ordering::SeqCst) {
                println!();
                process::exit(130);
            }
            warn!("Interrupted; stopping after the current script");
            on_ctrl_c.cancel();
        }
    });

    let outcome = match &args.action {
        Action::List | Action::Interpreters | Action::InitConfig(_) => {
            print_catalog(&launcher);
            return Ok(());
        }
        Action::Run(names) => {
            select_by_name(&mut launcher, names)?;
            launcher.run_selected(&ConsoleObserver, &cancel).await?
        }
        Action::RunAll => launcher.run_all(&ConsoleObserver, &cancel).await?,
        Action::Undo(names) => {
            select_by_name(&mut launcher, names)?;
            launcher.restore_selected(&ConsoleObserver, &cancel).await?
        }
    };

    report(&outcome);
    match outcome {
        LaunchOutcome::Completed(summary) if summary.failed > 0 || summary.cancelled => {
            process::exit(1)
        }
        _ => Ok(()),
    }
}

/// Load configuration from file or use defaults, then apply overrides
fn load_configuration(args: &AppArgs) -> Result<Config> {
    let config = match &args.config_path {
        Some(path) => ConfigLoader::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            let mut loader = ConfigLoader::new();
            match loader.load_from_search_paths(&LoadOptions::default()) {
                Ok(config) => config,
                Err(e) if loader.explicit_path().is_some() => {
                    return Err(e).with_context(|| format!("loading {}", CONFIG_ENV_VAR));
                }
                Err(e) => {
                    warn!("Failed to load configuration: {}. Using defaults", e);
                    Config::default()
                }
            }
        }
    };

    let mut config = match &args.root {
        Some(root) => config.with_app_root(root),
        None => config,
    };
    if args.assume_yes {
        config.runner.confirm = false;
    }

    info!(
        "Using scripts from {} and logs in {}",
        config.scripts_dir().display(),
        config.logs_dir().display()
    );
    Ok(config)
}

/// Write the default configuration, never overwriting an existing file
fn init_config(path: Option<&Path>) -> Result<()> {
    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(ConfigLoader::default_config_path);
    if target.exists() {
        bail!("{} already exists", target.display());
    }

    ConfigLoader::new().save_to_path(&Config::default(), &target)?;
    println!("Wrote default configuration to {}", target.display());
    Ok(())
}

fn print_interpreters(config: &Config) {
    let interpreter = &config.interpreter;
    println!(
        "Configured: {} {} <script>.{}",
        interpreter.program.display(),
        interpreter.args.join(" "),
        interpreter.extension
    );

    let detected = Platform::interpreter().detect_interpreters();
    if detected.is_empty() {
        println!("No known interpreters detected");
    }
    for (name, path) in detected {
        println!("    {:<10} {}", name, path.display());
    }
}

fn print_catalog(launcher: &Launcher) {
    let categories = launcher.categories();
    if categories.is_empty() {
        println!(
            "No scripts found under {}",
            launcher.config().scripts_dir().display()
        );
        return;
    }

    for category in categories {
        println!("{}", category.name);
        for entry in &category.entries {
            let marker = if entry.has_undo { " (undo)" } else { "" };
            println!("    {}{}", entry.display_name, marker);
        }
    }
}

/// Select every entry matching one of `names`
fn select_by_name(launcher: &mut Launcher, names: &[String]) -> Result<()> {
    let mut picked = Vec::new();
    for name in names {
        let matches: Vec<PathBuf> = launcher
            .entries()
            .filter(|entry| entry_matches(entry, name))
            .map(|entry| entry.path.clone())
            .collect();
        if matches.is_empty() {
            error!("No script matches '{}'", name);
            bail!("no script matches '{}'", name);
        }
        picked.extend(matches);
    }

    for path in picked {
        launcher.selection_mut().select(path);
    }
    Ok(())
}

fn entry_matches(entry: &ScriptEntry, name: &str) -> bool {
    entry.display_name == name
        || format!("{}/{}", entry.category, entry.display_name) == name
        || entry.path == PathBuf::from(name)
}

fn report(outcome: &LaunchOutcome) {
    match outcome {
        LaunchOutcome::NothingSelected => println!("No scripts selected."),
        LaunchOutcome::NothingToUndo => println!("No undo scripts found for the selected scripts."),
        LaunchOutcome::Declined => println!("Cancelled."),
        LaunchOutcome::Completed(summary) => println!(
            "{} of {} script(s) succeeded, {} failed{}",
            summary.succeeded(),
            summary.total,
            summary.failed,
            if summary.cancelled {
                format!(", {} skipped", summary.skipped())
            } else {
                String::new()
            }
        ),
    }
}

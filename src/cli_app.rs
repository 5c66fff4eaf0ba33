//! Top-level CLI definition and dispatch.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use job_posting_board::core::config::Config;
use job_posting_board::core::errors::JpbError;
use job_posting_board::logger::jsonl::{EventType, JsonlWriter, LogEntry, Severity};
use job_posting_board::source::JsonFileSource;
use job_posting_board::view::columns::{COLUMNS, ColumnKind};
use job_posting_board::view::{
    BoardModel, BoardSession, DEPARTMENT_OPTIONS, SortDirection, SortField,
};

/// Widest a table cell may grow before it is truncated.
const MAX_CELL_WIDTH: usize = 40;

/// Job Posting Board: browse open positions by department and date.
#[derive(Debug, Parser)]
#[command(
    name = "jpb",
    author,
    version,
    about = "Job Posting Board - filter, sort, and page through open positions",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Load postings and print the current page.
    List(ListArgs),
    /// Print the department filter options.
    Departments,
    /// Print the posting table columns.
    Columns,
    /// Interactive session driven by commands on stdin.
    Browse(BrowseArgs),
    /// View and validate configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct ListArgs {
    /// Department value to filter on (empty for all departments).
    #[arg(long, value_name = "DEPARTMENT")]
    department: Option<String>,
    /// Sort column field name (Name or Open_Date__c).
    #[arg(long, value_name = "FIELD")]
    sort: Option<String>,
    /// Sort direction (asc or desc).
    #[arg(long, value_name = "DIRECTION")]
    direction: Option<String>,
    /// Press "show more" this many times before printing.
    #[arg(long, default_value_t = 0, value_name = "N")]
    more: usize,
    /// Postings JSON file (overrides source.path).
    #[arg(long, value_name = "PATH")]
    source: Option<PathBuf>,
}

#[derive(Debug, Clone, Args, Default)]
struct BrowseArgs {
    /// Postings JSON file (overrides source.path).
    #[arg(long, value_name = "PATH")]
    source: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print resolved config file path.
    Path,
    /// Print effective merged configuration.
    Show,
    /// Validate configuration and exit.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<JpbError> for CliError {
    fn from(error: JpbError) -> Self {
        match error {
            JpbError::InvalidConfig { .. }
            | JpbError::MissingConfig { .. }
            | JpbError::ConfigParse { .. } => Self::User(error.to_string()),
            JpbError::Serialization { .. } => Self::Internal(error.to_string()),
            JpbError::Fetch(_) | JpbError::Io { .. } => Self::Runtime(error.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::List(args) => run_list(cli, args),
        Command::Departments => run_departments(cli),
        Command::Columns => run_columns(cli),
        Command::Browse(args) => run_browse(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Board commands
// ---------------------------------------------------------------------------

fn run_list(cli: &Cli, args: &ListArgs) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let mut session = open_session(&config, args.source.clone())?;
    let sort = resolve_sort(
        args.sort.as_deref(),
        args.direction.as_deref(),
        session.model().sort_field(),
    )?;

    if let Some(failure) = session.load() {
        session.flush();
        return Err(JpbError::from(failure).into());
    }
    if let Some(department) = &args.department {
        session.change_department(department.clone());
    }
    if let Some((field, direction)) = sort {
        session.change_sort(field, direction);
    }
    for _ in 0..args.more {
        if !session.model().show_more_button_visible() {
            break;
        }
        session.show_more();
    }
    session.flush();

    render_board(output_mode(cli), "list", session.model())
}

fn run_browse(cli: &Cli, args: &BrowseArgs) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    let mode = output_mode(cli);
    let mut session = open_session(&config, args.source.clone())?;

    if let Some(failure) = session.load() {
        report_fetch_failure(&JpbError::from(failure));
    }
    render_board(mode, "browse", session.model())?;

    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive && mode == OutputMode::Human {
            print!("> ");
            io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let command = match parse_browse_command(&line, session.model().sort_field()) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("jpb: {message} (type `help` for commands)");
                continue;
            }
        };
        match command {
            BrowseCommand::Empty => continue,
            BrowseCommand::Quit => break,
            BrowseCommand::Help => {
                print_browse_help(session.model().page_size());
                continue;
            }
            BrowseCommand::Department(department) => session.change_department(department),
            BrowseCommand::Sort(field, direction) => session.change_sort(field, direction),
            BrowseCommand::More => session.show_more(),
            BrowseCommand::Reload => {
                if let Some(failure) = session.load() {
                    report_fetch_failure(&JpbError::from(failure));
                }
            }
            BrowseCommand::Show => {}
        }
        render_board(mode, "browse", session.model())?;
    }

    session.flush();
    Ok(())
}

fn open_session(
    config: &Config,
    source_override: Option<PathBuf>,
) -> Result<BoardSession<JsonFileSource>, CliError> {
    let defaults = config.view_defaults()?;
    let path = source_override.unwrap_or_else(|| config.source.path.clone());

    let mut log = if config.logging.enabled {
        JsonlWriter::open(config.jsonl_config())
    } else {
        JsonlWriter::disabled()
    };
    let mut entry = LogEntry::new(EventType::ConfigLoaded, Severity::Info);
    entry.details = Some(config.paths.config_file.display().to_string());
    log.write_entry(&entry);

    Ok(BoardSession::new(JsonFileSource::new(path), defaults, log))
}

/// Resolve `--sort`/`--direction` into a sort event, if either was given.
///
/// A direction alone re-sorts the current column; a column alone sorts
/// ascending.
fn resolve_sort(
    field: Option<&str>,
    direction: Option<&str>,
    current: SortField,
) -> Result<Option<(SortField, SortDirection)>, CliError> {
    if field.is_none() && direction.is_none() {
        return Ok(None);
    }
    let field = match field {
        Some(raw) => parse_sort_field(raw).map_err(CliError::User)?,
        None => current,
    };
    let direction = match direction {
        Some(raw) => parse_sort_direction(raw).map_err(CliError::User)?,
        None => SortDirection::Ascending,
    };
    Ok(Some((field, direction)))
}

fn parse_sort_field(raw: &str) -> Result<SortField, String> {
    SortField::from_field_name(raw).ok_or_else(|| {
        let sortable: Vec<&str> = COLUMNS
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.field_name)
            .collect();
        format!(
            "cannot sort by {raw:?}; sortable columns: {}",
            sortable.join(", ")
        )
    })
}

fn parse_sort_direction(raw: &str) -> Result<SortDirection, String> {
    SortDirection::parse(raw)
        .ok_or_else(|| format!("invalid sort direction {raw:?}; expected asc or desc"))
}

fn report_fetch_failure(error: &JpbError) {
    let hint = if error.is_retryable() {
        " (type `reload` to retry)"
    } else {
        ""
    };
    eprintln!(
        "{} {error}; showing previously loaded postings{hint}",
        "warning:".yellow().bold()
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Department(String),
    Sort(SortField, SortDirection),
    More,
    Reload,
    Show,
    Help,
    Quit,
    Empty,
}

fn parse_browse_command(line: &str, current: SortField) -> Result<BrowseCommand, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    match verb {
        "" => Ok(BrowseCommand::Empty),
        "dept" | "department" => Ok(BrowseCommand::Department(rest.to_owned())),
        "sort" => {
            let mut parts = rest.split_whitespace();
            let field = match parts.next() {
                Some(raw) => parse_sort_field(raw)?,
                None => current,
            };
            let direction = match parts.next() {
                Some(raw) => parse_sort_direction(raw)?,
                None => SortDirection::Ascending,
            };
            if parts.next().is_some() {
                return Err("usage: sort <field> [asc|desc]".to_owned());
            }
            Ok(BrowseCommand::Sort(field, direction))
        }
        "more" => Ok(BrowseCommand::More),
        "reload" => Ok(BrowseCommand::Reload),
        "show" => Ok(BrowseCommand::Show),
        "help" | "?" => Ok(BrowseCommand::Help),
        "quit" | "exit" | "q" => Ok(BrowseCommand::Quit),
        other => Err(format!("unknown command {other:?}")),
    }
}

fn print_browse_help(page_size: usize) {
    println!("Commands:");
    println!("  dept <value>              filter by department (no value for all)");
    println!("  sort <field> [asc|desc]   sort by Name or Open_Date__c");
    println!("  more                      reveal {page_size} more postings");
    println!("  reload                    fetch postings again");
    println!("  show                      print the current page");
    println!("  quit                      leave the session");
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_board(mode: OutputMode, command: &str, model: &BoardModel) -> Result<(), CliError> {
    match mode {
        OutputMode::Human => {
            print_board_human(model);
            Ok(())
        }
        OutputMode::Json => {
            let payload = json!({
                "command": command,
                "department": model.selected_department(),
                "sort_field": model.sort_field().field_name(),
                "sort_direction": model.sort_direction().as_str(),
                "reveal_count": model.reveal_count(),
                "total_count": model.all_records().len(),
                "filtered_count": model.filtered_records().len(),
                "show_more": model.show_more_button_visible(),
                "last_error": model.last_error().map(ToString::to_string),
                "postings": serde_json::to_value(model.displayed_records())?,
            });
            write_json_line(&payload)
        }
    }
}

fn print_board_human(model: &BoardModel) {
    let displayed = model.displayed_records();
    println!(
        "{} {} of {} postings ({})",
        "Showing".bold(),
        displayed.len(),
        model.filtered_records().len(),
        department_label(model.selected_department()),
    );
    if displayed.is_empty() {
        println!("  (no postings)");
        return;
    }

    let rows: Vec<Vec<String>> = displayed
        .iter()
        .map(|posting| {
            COLUMNS
                .iter()
                .map(|column| truncate_cell(&column.cell(posting), MAX_CELL_WIDTH))
                .collect()
        })
        .collect();
    let headers: Vec<String> = COLUMNS
        .iter()
        .map(|column| {
            if column.sort_field() == Some(model.sort_field()) {
                let arrow = match model.sort_direction() {
                    SortDirection::Ascending => "^",
                    SortDirection::Descending => "v",
                };
                format!("{} {arrow}", column.label)
            } else {
                column.label.to_string()
            }
        })
        .collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!("{header:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header_line.bold());
    for row in &rows {
        let line = row
            .iter()
            .zip(COLUMNS.iter().zip(&widths))
            .map(|(cell, (column, width))| match column.kind {
                ColumnKind::Number => format!("{cell:>width$}"),
                _ => format!("{cell:<width$}"),
            })
            .collect::<Vec<_>>()
            .join("  ");
        println!("{line}");
    }

    if model.show_more_button_visible() {
        let hidden = model.filtered_records().len() - displayed.len();
        println!("  ... {hidden} more (show more)");
    }
}

fn run_departments(cli: &Cli) -> Result<(), CliError> {
    match output_mode(cli) {
        OutputMode::Human => {
            for option in &DEPARTMENT_OPTIONS {
                if option.value.is_empty() {
                    println!("{:<24} {}", option.label, "(no filter)".dimmed());
                } else {
                    println!("{:<24} {}", option.label, option.value);
                }
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "departments",
                "options": serde_json::to_value(DEPARTMENT_OPTIONS)?,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_columns(cli: &Cli) -> Result<(), CliError> {
    match output_mode(cli) {
        OutputMode::Human => {
            println!(
                "{}",
                format!("{:<16} {:<28} {:<8} {}", "Label", "Field", "Kind", "Sortable").bold()
            );
            for column in &COLUMNS {
                println!(
                    "{:<16} {:<28} {:<8} {}",
                    column.label,
                    column.field_name,
                    column_kind_label(column.kind),
                    if column.sortable { "yes" } else { "no" },
                );
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": "columns",
                "columns": serde_json::to_value(COLUMNS)?,
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

const fn column_kind_label(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Text => "text",
        ColumnKind::Number => "number",
        ColumnKind::Date => "date",
        ColumnKind::Url => "url",
    }
}

fn department_label(value: &str) -> &str {
    DEPARTMENT_OPTIONS
        .iter()
        .find(|option| option.value == value)
        .map_or(value, |option| option.label)
}

fn truncate_cell(cell: &str, max_len: usize) -> String {
    if cell.chars().count() <= max_len {
        cell.to_string()
    } else {
        let kept: String = cell.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = Config::load(cli.config.as_deref())?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Internal(format!("serialize config: {e}")))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config show",
                        "config": serde_json::to_value(&config)?,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match Config::load(cli.config.as_deref()) {
            Ok(config) => {
                let hash = config.stable_hash()?;

                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("{}", "Configuration is valid.".green());
                        println!("  Source: {}", config.paths.config_file.display());
                        println!("  Hash: {hash}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.paths.config_file.to_string_lossy(),
                            "hash": hash,
                        });
                        write_json_line(&payload)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => {
                        eprintln!("{} {e}", "Configuration is INVALID:".red());
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": false,
                            "code": e.code(),
                            "error": e.to_string(),
                        });
                        write_json_line(&payload)?;
                    }
                }
                Err(CliError::User(format!("invalid config: {e}")))
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Output plumbing
// ---------------------------------------------------------------------------

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("JPB_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}

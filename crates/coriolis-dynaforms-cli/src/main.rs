// crates/coriolis-dynaforms-cli/src/main.rs
// ============================================================================
// Module: Dynaforms CLI Entry Point
// Description: Command-line tooling for dynaform template authors.
// Purpose: Validate templates, preview bound fields and format answers.
// Dependencies: clap, coriolis-dynaforms, serde_json, tracing-subscriber
// ============================================================================

//! ## Overview
//! The `dynaforms` binary wraps the form engine for people writing templates:
//! `template check` reports every violation at once, `template fields` and
//! `template layout` print what a presentation layer would receive, and
//! `answers format` shows how a stored answer set reads in emails and exports.
//!
//! All files read from disk are size-capped before parsing. Output messages go
//! through the localized catalog; JSON payloads go to stdout, diagnostics and
//! logs to stderr.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use coriolis_dynaforms::Dynaform;
use coriolis_dynaforms::DynaformError;
use coriolis_dynaforms::DynaformsConfig;
use coriolis_dynaforms::RenderContext;
use coriolis_dynaforms::config::MAX_TEMPLATE_BYTES_LIMIT;
use coriolis_dynaforms::get_pretty_answers;
use coriolis_dynaforms::template_schema;
use coriolis_dynaforms_cli::i18n::Locale;
use coriolis_dynaforms_cli::i18n::set_locale;
use coriolis_dynaforms_cli::t;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a template file read from disk.
const MAX_TEMPLATE_FILE_BYTES: usize = MAX_TEMPLATE_BYTES_LIMIT;
/// Maximum size of an answers JSON file.
const MAX_ANSWERS_BYTES: usize = 4 * 1024 * 1024;
/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "DYNAFORMS_LANG";
/// Environment variable holding the tracing filter directives.
const LOG_ENV: &str = "DYNAFORMS_LOG";
/// Filter used when [`LOG_ENV`] is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "dynaforms", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `DYNAFORMS_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Optional config file path (defaults to dynaforms.toml or env override).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Template authoring utilities.
    Template {
        /// Selected template subcommand.
        #[command(subcommand)]
        command: TemplateCommand,
    },
    /// Answer formatting utilities.
    Answers {
        /// Selected answers subcommand.
        #[command(subcommand)]
        command: AnswersCommand,
    },
    /// Print the JSON schema describing dynaform templates.
    Schema,
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Template subcommands.
#[derive(Subcommand, Debug)]
enum TemplateCommand {
    /// Parse and validate a template, reporting every violation.
    Check(TemplateInputArgs),
    /// Print the bound runtime fields as JSON.
    Fields(TemplateRenderCommand),
    /// Print the layout directives as JSON.
    Layout(TemplateRenderCommand),
}

/// Answers subcommands.
#[derive(Subcommand, Debug)]
enum AnswersCommand {
    /// Print an answer set as `label -> display string` JSON.
    Format(AnswersFormatCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a dynaforms configuration file.
    Validate,
}

/// Template file and form name shared by template-driven commands.
#[derive(Args, Debug)]
struct TemplateInputArgs {
    /// Path to the template JSON file.
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,
    /// Form name used to build the field prefix.
    #[arg(long, value_name = "NAME")]
    name: Option<String>,
}

/// Arguments for `template fields` and `template layout`.
#[derive(Args, Debug)]
struct TemplateRenderCommand {
    /// Template input.
    #[command(flatten)]
    input: TemplateInputArgs,
    /// Locale used to resolve labels (defaults to the configured locale).
    #[arg(long, value_name = "LOCALE")]
    locale: Option<String>,
}

/// Arguments for `answers format`.
#[derive(Args, Debug)]
struct AnswersFormatCommand {
    /// Template input.
    #[command(flatten)]
    input: TemplateInputArgs,
    /// Path to the answers JSON object.
    #[arg(value_name = "ANSWERS")]
    answers: PathBuf,
    /// Locale used to resolve labels (defaults to the configured locale).
    #[arg(long, value_name = "LOCALE")]
    locale: Option<String>,
    /// Answers use unprefixed keys, as persisted.
    #[arg(long, action = ArgAction::SetTrue)]
    stored: bool,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Polish.
    Pl,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Errors raised while reading size-capped inputs.
enum ReadLimitError {
    /// I/O failure while reading.
    Io(std::io::Error),
    /// Input exceeded the configured size limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    init_logging()?;

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    let config_path = cli.config.as_deref();

    match command {
        Commands::Template {
            command,
        } => command_template(&command, config_path),
        Commands::Answers {
            command,
        } => command_answers(&command, config_path),
        Commands::Schema => command_schema(),
        Commands::Config {
            command,
        } => command_config(&command, config_path),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Installs the stderr tracing subscriber.
fn init_logging() -> CliResult<()> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| CliError::new(t!("logging.init_failed", error = err)))
}

// ============================================================================
// SECTION: Template Commands
// ============================================================================

/// Dispatches template subcommands.
fn command_template(command: &TemplateCommand, config_path: Option<&Path>) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    match command {
        TemplateCommand::Check(input) => command_template_check(input, &config),
        TemplateCommand::Fields(command) => {
            let form = load_template(&command.input, &config)?;
            let locale = config.locale_context(command.locale.as_deref());
            let renderer = config.markdown_renderer();
            let ctx = RenderContext::new(&locale, &renderer);
            write_json(&form.get_fields(&ctx))?;
            Ok(ExitCode::SUCCESS)
        }
        TemplateCommand::Layout(command) => {
            let form = load_template(&command.input, &config)?;
            let locale = config.locale_context(command.locale.as_deref());
            let renderer = config.markdown_renderer();
            let ctx = RenderContext::new(&locale, &renderer);
            write_json(&form.get_layout_objects(&ctx))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Executes `template check`.
fn command_template_check(
    input: &TemplateInputArgs,
    config: &DynaformsConfig,
) -> CliResult<ExitCode> {
    let form = load_template(input, config)?;
    let message = t!(
        "template.check.ok",
        fields = form.form_element_names().len(),
        nodes = form.fields().len()
    );
    write_stdout_line(&message).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Reads and builds the template named by `input`.
fn load_template(input: &TemplateInputArgs, config: &DynaformsConfig) -> CliResult<Dynaform> {
    let kind = t!("input.kind.template");
    let text = read_text_with_limit(&input.template, &kind, MAX_TEMPLATE_FILE_BYTES)?;
    Dynaform::build_with_limits(input.name.as_deref(), &text, &config.template_limits())
        .map_err(|err| template_error(&input.template, &err))
}

/// Formats a template failure, listing every violation on its own line.
fn template_error(path: &Path, error: &DynaformError) -> CliError {
    match error {
        DynaformError::Validation(validation) => {
            let violations = validation.violations();
            let mut message =
                t!("template.invalid", path = path.display(), count = violations.len());
            for violation in violations {
                message.push('\n');
                message.push_str(&t!(
                    "template.violation",
                    field = violation.field,
                    rule = violation.rule
                ));
            }
            CliError::new(message)
        }
        other => CliError::new(t!("template.parse_failed", path = path.display(), error = other)),
    }
}

// ============================================================================
// SECTION: Answers Commands
// ============================================================================

/// Dispatches answers subcommands.
fn command_answers(command: &AnswersCommand, config_path: Option<&Path>) -> CliResult<ExitCode> {
    match command {
        AnswersCommand::Format(command) => command_answers_format(command, config_path),
    }
}

/// Executes `answers format`.
fn command_answers_format(
    command: &AnswersFormatCommand,
    config_path: Option<&Path>,
) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let form = load_template(&command.input, &config)?;
    let answers = read_answers(&command.answers)?;
    let answers = if command.stored { form.add_prefix(&answers) } else { answers };
    let locale = config.locale_context(command.locale.as_deref());
    let renderer = config.markdown_renderer();
    let ctx = RenderContext::new(&locale, &renderer);
    let fields = form.get_fields(&ctx);
    write_json(&get_pretty_answers(&answers, &fields, &locale))?;
    Ok(ExitCode::SUCCESS)
}

/// Reads an answers file as an ordered JSON object.
fn read_answers(path: &Path) -> CliResult<IndexMap<String, Value>> {
    let kind = t!("input.kind.answers");
    let text = read_text_with_limit(path, &kind, MAX_ANSWERS_BYTES)?;
    let value: Value = serde_json::from_str(&text).map_err(|err| {
        CliError::new(t!("answers.parse_failed", path = path.display(), error = err))
    })?;
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(CliError::new(t!("answers.not_object", path = path.display()))),
    }
}

// ============================================================================
// SECTION: Schema Command
// ============================================================================

/// Executes `schema`.
fn command_schema() -> CliResult<ExitCode> {
    write_json(&template_schema())?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand, config_path: Option<&Path>) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => {
            let _config = load_config(config_path)?;
            write_stdout_line(&t!("config.validate.ok"))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Loads configuration from `path`, the env override or the default file.
fn load_config(path: Option<&Path>) -> CliResult<DynaformsConfig> {
    let config = DynaformsConfig::load(path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    debug!(
        locale = %config.locale.default,
        max_fields = config.limits.max_fields,
        "config loaded"
    );
    Ok(config)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Reads a size-capped UTF-8 file, labelling failures with `kind`.
fn read_text_with_limit(path: &Path, kind: &str, max_bytes: usize) -> CliResult<String> {
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(t!("input.read_failed", kind = kind, path = path.display(), error = err))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    String::from_utf8(bytes).map_err(|err| {
        CliError::new(t!("input.read_failed", kind = kind, path = path.display(), error = err))
    })
}

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

/// Converts CLI language selections into locales.
impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Pl => Self::Pl,
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes `value` to stdout as pretty-printed JSON.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.serialize_failed", error = err)))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

//! contacts: command-line client for a contact manager backend.
//!
//! Every command drives the same event router the page uses: it loads the
//! collection, replays the clicks and keystrokes a user would make, and
//! prints the resulting view.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use cm_common::{format_error_human, ContactId, Error, OutputFormat, StructuredError};
use cm_config::{load_config, validate_config, ClientConfig, LoadedConfig, ValidationError};
use cm_core::exit_codes::ExitCode;
use cm_core::logging::{init_logging, LogConfig, LogLevel};
use cm_core::output::{format_contact, format_listing, format_tags, OUTPUT_SCHEMA_VERSION};
use cm_core::{App, AssumeYes, Confirm, FormManager, HttpApi, Outcome, PromptConfirm, UiEvent};
use cm_view::{FieldName, PageOptions, PageRenderer};
use tracing::{debug, error, info};

/// Contact manager command-line client
#[derive(Parser)]
#[command(name = "contacts")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "CM_API_URL")]
    api_url: Option<String>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every contact
    List,

    /// List contacts whose name matches a pattern (case-insensitive)
    Search {
        /// Regular expression matched anywhere in the full name
        pattern: String,
    },

    /// List contacts carrying a tag
    Tag {
        /// Exact, case-sensitive tag
        tag: String,
    },

    /// Show one contact
    Show {
        id: ContactId,
    },

    /// List the tags in use
    Tags,

    /// Add a contact
    Add(AddArgs),

    /// Edit a contact
    Edit(EditArgs),

    /// Delete a contact
    Delete {
        id: ContactId,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Render the page as HTML
    Render(RenderArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    full_name: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// Check an existing tag (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Add a tag not yet in use and check it (repeatable)
    #[arg(long = "new-tag")]
    new_tags: Vec<String>,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: ContactId,

    #[arg(long)]
    full_name: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    email: Option<String>,

    /// Check an existing tag in addition to the current ones (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Add a tag not yet in use and check it (repeatable)
    #[arg(long = "new-tag")]
    new_tags: Vec<String>,

    /// Uncheck every current tag first
    #[arg(long)]
    clear_tags: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Write the page to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Render with the tag filter applied
    #[arg(long, conflicts_with_all = ["search", "add", "edit"])]
    tag: Option<String>,

    /// Render with the search filter applied
    #[arg(long, conflicts_with_all = ["add", "edit"])]
    search: Option<String>,

    /// Render with the add form open
    #[arg(long, conflicts_with = "edit")]
    add: bool,

    /// Render with the edit form open for a contact
    #[arg(long)]
    edit: Option<ContactId>,

    /// Minify the HTML
    #[arg(long)]
    minify: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective configuration and where it came from
    Show,

    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the resolved config)
        path: Option<PathBuf>,
    },
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            std::process::exit(code.as_i32());
        }
    };

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet),
        None,
    )
    .with_color(!cli.global.no_color);
    init_logging(&log_config);

    let exit_code = match &cli.command {
        Commands::List => run_list(&cli.global),
        Commands::Search { pattern } => run_search(&cli.global, pattern),
        Commands::Tag { tag } => run_tag(&cli.global, tag),
        Commands::Show { id } => run_show(&cli.global, *id),
        Commands::Tags => run_tags(&cli.global),
        Commands::Add(args) => run_add(&cli.global, args),
        Commands::Edit(args) => run_edit(&cli.global, args),
        Commands::Delete { id, yes } => {
            if *yes {
                run_delete(&cli.global, *id, AssumeYes)
            } else {
                run_delete(&cli.global, *id, PromptConfirm::stdio())
            }
        }
        Commands::Render(args) => run_render(&cli.global, args),
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => run_config_show(&cli.global),
            ConfigCommands::Validate { path } => run_config_validate(&cli.global, path.as_deref()),
        },
    };

    if exit_code.is_success() {
        debug!(exit_code = %exit_code, "Command finished");
    } else if exit_code.is_user_error() {
        info!(exit_code = %exit_code, "Command rejected");
    } else if exit_code.is_internal_error() {
        error!(exit_code = %exit_code, "Command failed");
    } else {
        info!(exit_code = %exit_code, "Command stopped");
    }
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Shared plumbing
// ============================================================================

fn use_color(global: &GlobalOpts) -> bool {
    !global.no_color && std::io::stderr().is_terminal()
}

/// Report an error in the requested format and map it to an exit code.
fn report(global: &GlobalOpts, err: &Error) -> ExitCode {
    report_as(global, err, ExitCode::from_error(err))
}

fn report_as(global: &GlobalOpts, err: &Error, code: ExitCode) -> ExitCode {
    match global.format {
        OutputFormat::Json => {
            let structured = StructuredError::from(err).with_context("exit_code", code.as_i32());
            println!("{}", structured.to_json());
        }
        OutputFormat::Md | OutputFormat::Summary => {
            eprintln!("{}", format_error_human(err, use_color(global)));
        }
    }
    code
}

fn args_error(message: &str) -> ExitCode {
    eprintln!("error: {}", message);
    ExitCode::ArgsError
}

/// A search term that is not a valid regex is an argument error.
fn bad_pattern(global: &GlobalOpts, pattern: String) -> ExitCode {
    let err = Error::InvalidPattern {
        pattern,
        reason: "not a valid regular expression".to_string(),
    };
    report_as(global, &err, ExitCode::ArgsError)
}

fn emit(global: &GlobalOpts, rendered: cm_common::Result<String>) -> ExitCode {
    match rendered {
        Ok(text) => {
            println!("{}", text);
            ExitCode::Clean
        }
        Err(e) => report(global, &e),
    }
}

fn config_error(err: ValidationError) -> Error {
    match err {
        ValidationError::IoError(msg) | ValidationError::ParseError(msg) => Error::Config(msg),
        other => Error::InvalidConfig(other.to_string()),
    }
}

/// Resolve the config and apply `--api-url`.
fn load(global: &GlobalOpts) -> Result<LoadedConfig, Error> {
    let mut loaded = load_config(global.config.as_deref()).map_err(config_error)?;
    if let Some(url) = &global.api_url {
        loaded.config = loaded.config.with_base_url(url.clone());
        validate_config(&loaded.config).map_err(config_error)?;
    }
    debug!(
        source = %loaded.source,
        base_url = %loaded.config.api.base_url,
        "Configuration loaded"
    );
    Ok(loaded)
}

/// Build the app against the configured backend and load the collection.
fn start<C: Confirm>(config: &ClientConfig, confirm: C) -> Result<App<HttpApi, C>, Error> {
    let form = FormManager::new(config.form.phone_pattern.as_deref())?;
    let mut app = App::new(HttpApi::new(config.api.clone()), confirm, form);
    app.init()?;
    Ok(app)
}

fn start_from_global<C: Confirm>(
    global: &GlobalOpts,
    confirm: C,
) -> Result<(LoadedConfig, App<HttpApi, C>), ExitCode> {
    let loaded = load(global).map_err(|e| report(global, &e))?;
    let app = start(&loaded.config, confirm).map_err(|e| report(global, &e))?;
    Ok((loaded, app))
}

/// Surface the first swallowed backend failure, if any.
fn check_failures<C: Confirm>(global: &GlobalOpts, app: &mut App<HttpApi, C>) -> Option<ExitCode> {
    app.take_failures()
        .first()
        .map(|err| report(global, err))
}

// ============================================================================
// Listing commands
// ============================================================================

fn run_list(global: &GlobalOpts) -> ExitCode {
    let (_, app) = match start_from_global(global, AssumeYes) {
        Ok(started) => started,
        Err(code) => return code,
    };
    emit(global, format_listing(app.ui(), global.format))
}

fn run_search(global: &GlobalOpts, pattern: &str) -> ExitCode {
    let (_, mut app) = match start_from_global(global, AssumeYes) {
        Ok(started) => started,
        Err(code) => return code,
    };
    if let Outcome::BadPattern { pattern } = app.handle(UiEvent::search(pattern)) {
        return bad_pattern(global, pattern);
    }
    emit(global, format_listing(app.ui(), global.format))
}

fn run_tag(global: &GlobalOpts, tag: &str) -> ExitCode {
    let (_, mut app) = match start_from_global(global, AssumeYes) {
        Ok(started) => started,
        Err(code) => return code,
    };
    app.handle(UiEvent::click_tag(tag));
    emit(global, format_listing(app.ui(), global.format))
}

fn run_show(global: &GlobalOpts, id: ContactId) -> ExitCode {
    let (_, app) = match start_from_global(global, AssumeYes) {
        Ok(started) => started,
        Err(code) => return code,
    };
    match app.contacts().by_id(id) {
        Some(contact) => emit(global, format_contact(contact, global.format)),
        None => report(global, &Error::ContactNotFound { id }),
    }
}

fn run_tags(global: &GlobalOpts) -> ExitCode {
    let (_, app) = match start_from_global(global, AssumeYes) {
        Ok(started) => started,
        Err(code) => return code,
    };
    emit(global, format_tags(app.tags().tags(), global.format))
}

// ============================================================================
// Form commands
// ============================================================================

/// Add `new_tags` through the add-tag button, then leave exactly `checked`
/// plus `new_tags` ticked.
fn apply_tags<C: Confirm>(
    app: &mut App<HttpApi, C>,
    checked: &[String],
    new_tags: &[String],
) -> Result<(), String> {
    for tag in new_tags {
        app.handle(UiEvent::input_add_tag(tag));
        app.handle(UiEvent::click_add_tag(tag));
    }

    let current: Vec<String> = app
        .ui()
        .form()
        .tag_boxes()
        .iter()
        .map(|b| b.value.clone())
        .collect();
    for tag in &current {
        app.handle(UiEvent::toggle_tag(tag, false));
    }

    for tag in checked.iter().chain(new_tags) {
        if app.handle(UiEvent::toggle_tag(tag, true)) == Outcome::Ignored {
            return Err(format!("unknown tag '{}'; use --new-tag to add it", tag));
        }
    }
    Ok(())
}

fn fill_fields<C: Confirm>(
    app: &mut App<HttpApi, C>,
    full_name: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
) {
    let fields = [
        (FieldName::FullName, full_name),
        (FieldName::PhoneNumber, phone),
        (FieldName::Email, email),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            app.handle(UiEvent::input(field, value));
        }
    }
}

/// Submit the form and report the outcome.
fn submit<C: Confirm>(global: &GlobalOpts, app: &mut App<HttpApi, C>) -> ExitCode {
    let outcome = app.handle(UiEvent::submit());
    if let Outcome::Invalid { fields } = &outcome {
        for field in fields {
            if let Some(message) = app.ui().form().error(*field) {
                eprintln!("{}: {}", field.name(), message);
            }
        }
        let err = Error::FormInvalid {
            fields: fields.iter().map(|f| f.name().to_string()).collect(),
        };
        return report(global, &err);
    }

    if let Some(code) = check_failures(global, app) {
        return code;
    }
    info!(?outcome, "Contact saved");
    emit(global, format_listing(app.ui(), global.format))
}

fn run_add(global: &GlobalOpts, args: &AddArgs) -> ExitCode {
    let (_, mut app) = match start_from_global(global, AssumeYes) {
        Ok(started) => started,
        Err(code) => return code,
    };

    app.handle(UiEvent::click_add_contact());
    if let Err(message) = apply_tags(&mut app, &args.tags, &args.new_tags) {
        return args_error(&message);
    }
    fill_fields(
        &mut app,
        Some(args.full_name.as_deref().unwrap_or("")),
        Some(args.phone.as_deref().unwrap_or("")),
        Some(args.email.as_deref().unwrap_or("")),
    );
    submit(global, &mut app)
}

fn run_edit(global: &GlobalOpts, args: &EditArgs) -> ExitCode {
    let (_, mut app) = match start_from_global(global, AssumeYes) {
        Ok(started) => started,
        Err(code) => return code,
    };

    if let Outcome::NotFound { id } = app.handle(UiEvent::click_edit(args.id)) {
        return report(global, &Error::ContactNotFound { id });
    }

    let mut checked: Vec<String> = if args.clear_tags {
        Vec::new()
    } else {
        app.ui()
            .form()
            .checked_tags()
            .into_iter()
            .map(str::to_string)
            .collect()
    };
    for tag in &args.tags {
        if !checked.contains(tag) {
            checked.push(tag.clone());
        }
    }
    if let Err(message) = apply_tags(&mut app, &checked, &args.new_tags) {
        return args_error(&message);
    }
    fill_fields(
        &mut app,
        args.full_name.as_deref(),
        args.phone.as_deref(),
        args.email.as_deref(),
    );
    submit(global, &mut app)
}

fn run_delete<C: Confirm>(global: &GlobalOpts, id: ContactId, confirm: C) -> ExitCode {
    let (_, mut app) = match start_from_global(global, confirm) {
        Ok(started) => started,
        Err(code) => return code,
    };

    match app.handle(UiEvent::click_delete(id)) {
        Outcome::NotFound { id } => report(global, &Error::ContactNotFound { id }),
        Outcome::Declined { id } => report(global, &Error::DeleteDeclined { id }),
        _ => {
            if let Some(code) = check_failures(global, &mut app) {
                return code;
            }
            emit(global, format_listing(app.ui(), global.format))
        }
    }
}

// ============================================================================
// Page rendering
// ============================================================================

fn run_render(global: &GlobalOpts, args: &RenderArgs) -> ExitCode {
    let (loaded, mut app) = match start_from_global(global, AssumeYes) {
        Ok(started) => started,
        Err(code) => return code,
    };

    if let Some(tag) = &args.tag {
        app.handle(UiEvent::click_tag(tag));
    } else if let Some(term) = &args.search {
        if let Outcome::BadPattern { pattern } = app.handle(UiEvent::search(term)) {
            return bad_pattern(global, pattern);
        }
    } else if args.add {
        app.handle(UiEvent::click_add_contact());
    } else if let Some(id) = args.edit {
        if let Outcome::NotFound { id } = app.handle(UiEvent::click_edit(id)) {
            return report(global, &Error::ContactNotFound { id });
        }
    }

    let renderer = PageRenderer::new(PageOptions {
        title: loaded.config.view.title.clone(),
        phone_pattern: loaded.config.form.phone_pattern.clone(),
        minify: loaded.config.view.minify || args.minify,
    });
    let html = match renderer.render(app.ui()) {
        Ok(html) => html,
        Err(e) => {
            let err: Error = e.into();
            return report(global, &err);
        }
    };

    match &args.output {
        Some(path) => match std::fs::write(path, &html) {
            Ok(()) => {
                info!(path = %path.display(), bytes = html.len(), "Page written");
                ExitCode::Clean
            }
            Err(e) => report(global, &Error::Io(e)),
        },
        None => {
            print!("{}", html);
            ExitCode::Clean
        }
    }
}

// ============================================================================
// Configuration commands
// ============================================================================

fn run_config_show(global: &GlobalOpts) -> ExitCode {
    let loaded = match load(global) {
        Ok(loaded) => loaded,
        Err(e) => return report(global, &e),
    };
    let path = loaded.path.as_ref().map(|p| p.display().to_string());

    let rendered = match global.format {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "schema_version": OUTPUT_SCHEMA_VERSION,
            "source": {
                "kind": loaded.source.to_string(),
                "path": path,
                "hash": loaded.hash,
                "using_defaults": loaded.path.is_none(),
            },
            "config": loaded.config,
        }))
        .map_err(Error::from),
        OutputFormat::Summary => Ok(format!(
            "config: {} ({})",
            path.as_deref().unwrap_or("built-in defaults"),
            loaded.config.api.contacts_url()
        )),
        OutputFormat::Md => Ok(format!(
            "# Configuration\n\n- **Source:** {}\n- **Path:** {}\n- **Contacts URL:** {}\n- **Phone pattern:** {}\n- **Title:** {}\n",
            loaded.source,
            path.as_deref().unwrap_or("(none)"),
            loaded.config.api.contacts_url(),
            loaded.config.form.phone_pattern.as_deref().unwrap_or("(none)"),
            loaded.config.view.title
        )),
    };
    emit(global, rendered)
}

fn run_config_validate(global: &GlobalOpts, path: Option<&Path>) -> ExitCode {
    let target = path.or(global.config.as_deref());
    let loaded = match load_config(target) {
        Ok(loaded) => loaded,
        Err(e) => return report(global, &config_error(e)),
    };
    let path = loaded.path.as_ref().map(|p| p.display().to_string());

    let rendered = match global.format {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "schema_version": OUTPUT_SCHEMA_VERSION,
            "valid": true,
            "path": path,
            "hash": loaded.hash,
        }))
        .map_err(Error::from),
        OutputFormat::Md | OutputFormat::Summary => Ok(format!(
            "config valid: {}",
            path.as_deref().unwrap_or("built-in defaults")
        )),
    };
    emit(global, rendered)
}

pub mod builder;
pub mod config;

mod prompt;
mod wizard;

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use form_runtime::{FillSession, FormBackend, MockBackend};
use form_spec::{
    AnswerSet, FormBuilder, FormSchema, Route, StoredForm, ValidationResult, build_fill_payload,
    render_fill_json, render_fill_text, validate_answers, validate_schema,
};
use schemars::schema_for;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use builder::BuilderShell;
use config::CliConfig;
use wizard::{FillWizard, Verbosity, prefill};

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Terminal form builder and form filler",
    long_about = "Compose question lists, fill forms and validate answers against a mocked forms backend"
)]
struct Cli {
    /// Base URL used in share links (overrides FORMKIT_BASE_URL).
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum RenderMode {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive form builder.
    Build {
        /// Initial form title.
        #[arg(long)]
        title: Option<String>,
        /// Resume editing an exported schema JSON file.
        #[arg(long, value_name = "SCHEMA")]
        from: Option<PathBuf>,
        /// Write the schema JSON here on every save.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Fill the form with the given id and submit the answers.
    Fill {
        /// Form identifier from the share link.
        id: String,
        #[command(flatten)]
        options: FillOptions,
    },
    /// Open a view by path: /build or /forms/<id>.
    Open {
        /// Path portion of a link, e.g. /forms/1234.
        path: String,
        #[command(flatten)]
        options: FillOptions,
    },
    /// Validate a schema and, optionally, answers against it.
    Validate {
        /// Path to the schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Path to the answers JSON file.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
    },
    /// Render the fill view of a schema without prompting.
    Render {
        /// Path to the schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Optional answers JSON to show as current values.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Form id shown in the output.
        #[arg(long, default_value = "preview")]
        id: String,
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Print the JSON Schema describing form schema files.
    Schema,
}

#[derive(clap::Args, Clone, Default)]
struct FillOptions {
    /// Serve this exported schema instead of asking the backend.
    #[arg(long, value_name = "SCHEMA")]
    schema: Option<PathBuf>,
    /// JSON file with answers to apply before prompting.
    #[arg(long, value_name = "ANSWERS")]
    answers: Option<PathBuf>,
    /// How to show the loaded form before prompting.
    #[arg(long, value_enum, default_value_t = RenderMode::Text)]
    format: RenderMode,
    /// Show progress after every answer.
    #[arg(long)]
    verbose: bool,
    /// Also print the submitted answers as CBOR hex.
    #[arg(long)]
    cbor: bool,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formkit=info,form_runtime=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .init();
}

#[tokio::main]
async fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = CliConfig::from_env(cli.base_url);
    debug!(?config, "resolved configuration");

    match cli.command {
        Command::Build { title, from, out } => run_build(&config, title, from, out).await,
        Command::Fill { id, options } => run_fill(&config, &id, &options).await,
        Command::Open { path, options } => run_open(&config, &path, &options).await,
        Command::Validate { schema, answers } => run_validate(&schema, answers.as_deref()),
        Command::Render {
            schema,
            answers,
            id,
            format,
        } => run_render(&schema, answers.as_deref(), &id, format),
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&schema_for!(FormSchema))?);
            Ok(())
        }
    }
}

async fn run_open(config: &CliConfig, path: &str, options: &FillOptions) -> CliResult<()> {
    match Route::parse(path)? {
        Route::Build => run_build(config, None, None, None).await,
        Route::Fill { id } => run_fill(config, &id, options).await,
    }
}

async fn run_build(
    config: &CliConfig,
    title: Option<String>,
    from: Option<PathBuf>,
    out: Option<PathBuf>,
) -> CliResult<()> {
    let mut builder = match &from {
        Some(path) => FormBuilder::from_schema(read_schema(path)?)?,
        None => FormBuilder::new(),
    };
    if let Some(title) = title {
        builder.set_title(title);
    }

    let backend = MockBackend::new(config.mock());
    let links = config.links()?;
    let mut shell = BuilderShell::new(builder, &backend, &links).export_to(out);
    let stdin = io::stdin();
    let saved = shell.run(stdin.lock(), io::stdout()).await?;
    if saved.is_none() && !shell.builder().is_empty() {
        println!("Leaving without saving.");
    }
    Ok(())
}

async fn run_fill(config: &CliConfig, id: &str, options: &FillOptions) -> CliResult<()> {
    let mut backend = MockBackend::new(config.mock());
    if let Some(path) = &options.schema {
        let schema = read_schema(path)?;
        ensure_valid_schema(&schema)?;
        backend = backend.with_form(StoredForm {
            id: id.to_string(),
            schema,
        });
    }
    let backend: Arc<dyn FormBackend> = Arc::new(backend);

    println!("Loading form...");
    let mut session = FillSession::load(backend, id).await?;
    info!(form_id = id, title = %session.form().schema.title, "form loaded");

    if let Some(path) = &options.answers {
        let answers = read_answers(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        prefill(&mut session, &answers, base_dir)?;
    }

    match options.format {
        RenderMode::Text => println!("{}", render_fill_text(&session.payload())),
        RenderMode::Json => println!(
            "{}",
            serde_json::to_string_pretty(&render_fill_json(&session.payload()))?
        ),
    }

    let stdin = io::stdin();
    let mut wizard = FillWizard::new(
        stdin.lock(),
        io::stdout(),
        Verbosity::from_verbose(options.verbose),
    );
    wizard.collect(&mut session)?;
    let submitted = session.submit().await?;
    wizard.show_completion(&submitted, options.cbor)?;
    Ok(())
}

fn run_validate(schema_path: &Path, answers_path: Option<&Path>) -> CliResult<()> {
    let schema = read_schema(schema_path)?;
    let report = validate_schema(&schema);
    println!(
        "Schema: {}",
        if report.valid { "valid" } else { "invalid" }
    );
    for issue in &report.issues {
        println!("  {} - {} ({})", issue.field_id, issue.message, issue.code);
    }

    let mut valid = report.valid;
    if let Some(path) = answers_path {
        let answers = read_answers(path)?;
        let result = validate_answers(&schema, &answers);
        println!(
            "Answers: {}",
            if result.valid { "valid" } else { "invalid" }
        );
        describe_validation(&result);
        valid &= result.valid;
    }

    if valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("Errors:");
        for error in &result.errors {
            println!("  {} - {}", error.path, error.message);
        }
    }
    if !result.unknown_fields.is_empty() {
        println!(
            "Unknown answer fields: {}",
            result.unknown_fields.join(", ")
        );
    }
}

fn run_render(
    schema_path: &Path,
    answers_path: Option<&Path>,
    id: &str,
    format: RenderMode,
) -> CliResult<()> {
    let form = StoredForm {
        id: id.to_string(),
        schema: read_schema(schema_path)?,
    };
    let answers = match answers_path {
        Some(path) => read_answers(path)?,
        None => AnswerSet::new(),
    };
    let payload = build_fill_payload(&form, &answers, &Default::default());
    match format {
        RenderMode::Text => println!("{}", render_fill_text(&payload)),
        RenderMode::Json => println!(
            "{}",
            serde_json::to_string_pretty(&render_fill_json(&payload))?
        ),
    }
    Ok(())
}

fn ensure_valid_schema(schema: &FormSchema) -> CliResult<()> {
    let report = validate_schema(schema);
    if report.valid {
        return Ok(());
    }
    let details = report
        .issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field_id, issue.message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(format!("schema is invalid ({})", details).into())
}

fn read_schema(path: &Path) -> CliResult<FormSchema> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("cannot read schema {}: {}", path.display(), err))?;
    Ok(serde_json::from_str(&contents)?)
}

fn read_answers(path: &Path) -> CliResult<AnswerSet> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("cannot read answers {}: {}", path.display(), err))?;
    Ok(serde_json::from_str(&contents)?)
}

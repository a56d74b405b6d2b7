use clap::{Parser, Subcommand, command};
use formwright::{
    Error, FormBuilder, FormData, FormPreview, FormSchema, FormValue, FormwrightConfig,
    SchemaRepository, config::StorageConfig, eval::formula, schema_issues,
    storage::LocalFileSchemaRepository,
};
use formwright_cli::{
    config::{load_config, resolve_store_dir},
    input::{parse_assignment, read_json_file},
    output::{self, OutputFormat, SchemaSummary},
};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the saved forms file
    #[arg(long, env = "FORMWRIGHT_STORE", global = true)]
    store: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, default_value = "formwright.json", global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved forms
    List,

    /// Print a saved form as JSON
    Show {
        /// Form id
        id: String,
    },

    /// Check a form schema file for broken references, duplicates and cycles
    Check {
        /// Path to a form schema JSON file
        file: PathBuf,
    },

    /// Save a form schema file under a new id
    Save {
        /// Path to a form schema JSON file
        file: PathBuf,

        /// Name to save the form under
        #[arg(short, long)]
        name: String,
    },

    /// Fill in a saved form and show derived values and errors
    Preview {
        /// Form id
        id: String,

        /// JSON file with values keyed by field id
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Set a field value (FIELD_ID=VALUE), applied after --data
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(String, FormValue)>,
    },

    /// Evaluate a derivation formula
    Formula {
        /// Formula text, e.g. "{Price} * {Quantity}"
        text: String,

        /// Placeholder value (LABEL=VALUE)
        #[arg(long = "var", value_parser = parse_assignment)]
        vars: Vec<(String, FormValue)>,
    },
}

struct Context {
    config: FormwrightConfig,
    repo: LocalFileSchemaRepository,
    output: OutputFormat,
}

impl Context {
    fn initialize(cli: &Cli) -> Result<Self, Error> {
        let loaded = load_config(&cli.config).map_err(|e| Error::Config(e.to_string()))?;
        let base_dir = resolve_store_dir(cli.store.as_deref(), loaded.as_ref())
            .map_err(|e| Error::Config(e.to_string()))?;
        let config = loaded.unwrap_or_default();
        debug!("using store {}", base_dir.display());

        let repo = LocalFileSchemaRepository::new(StorageConfig {
            base_dir,
            ..config.storage.clone()
        });
        Ok(Self {
            config,
            repo,
            output: cli.output,
        })
    }
}

fn read_schema(path: &Path) -> Result<FormSchema, Error> {
    read_json_file(path).map_err(Error::Internal)
}

fn print_json<T: serde::Serialize>(data: &T) -> Result<(), Error> {
    println!("{}", output::to_json(data).map_err(Error::Internal)?);
    Ok(())
}

async fn list_forms(ctx: &Context) -> Result<(), Error> {
    let schemas = ctx.repo.list().await?;
    match ctx.output {
        OutputFormat::Json => {
            let summaries: Vec<SchemaSummary> = schemas.iter().map(SchemaSummary::from).collect();
            print_json(&summaries)
        }
        OutputFormat::Table => {
            println!("{}", output::schema_table(&schemas));
            Ok(())
        }
    }
}

async fn show_form(ctx: &Context, id: &str) -> Result<(), Error> {
    let schema = ctx.repo.load(id).await?;
    print_json(&schema)
}

fn check_file(ctx: &Context, file: &Path) -> Result<(), Error> {
    let schema = read_schema(file)?;
    let issues = schema_issues(&schema);
    match ctx.output {
        OutputFormat::Json => {
            let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
            print_json(&messages)?;
        }
        OutputFormat::Table if issues.is_empty() => println!("No issues found"),
        OutputFormat::Table => {
            for issue in &issues {
                println!("- {}", issue);
            }
        }
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::internal(format!(
            "{} has {} issue(s)",
            file.display(),
            issues.len()
        )))
    }
}

async fn save_file(ctx: &Context, file: &Path, name: &str) -> Result<(), Error> {
    let schema = read_schema(file)?;
    if let Some(issue) = schema_issues(&schema).into_iter().next() {
        return Err(issue.into());
    }

    let mut builder = FormBuilder::new();
    builder.load_saved_forms(&ctx.repo).await?;
    for field in schema.fields {
        builder.add_field(field)?;
    }
    let saved = builder.save_form(name, &ctx.repo).await?;
    match ctx.output {
        OutputFormat::Json => print_json(&SchemaSummary::from(&saved)),
        OutputFormat::Table => {
            println!("{}", saved.id);
            Ok(())
        }
    }
}

async fn preview_form(
    ctx: &Context,
    id: &str,
    data: Option<&Path>,
    set: &[(String, FormValue)],
) -> Result<(), Error> {
    let schema = ctx.repo.load(id).await?;
    let mut preview = FormPreview::with_config(schema.fields, &ctx.config.preview);

    let initial: FormData = match data {
        Some(path) => read_json_file(path).map_err(Error::Internal)?,
        None => FormData::new(),
    };
    for (field_id, value) in initial.into_iter().chain(set.iter().cloned()) {
        preview.set_value(&field_id, value)?;
    }

    match ctx.output {
        OutputFormat::Json => print_json(&output::PreviewReport::from(&preview)),
        OutputFormat::Table => {
            println!("{}", output::preview_table(&preview));
            Ok(())
        }
    }
}

fn evaluate(text: &str, vars: &[(String, FormValue)]) -> Result<(), Error> {
    let bindings: Vec<(&str, String)> = vars
        .iter()
        .map(|(label, value)| (label.as_str(), value.to_formula_text()))
        .collect();
    let substituted = formula::substitute_placeholders(text, &bindings);
    debug!("evaluating {}", substituted);
    let value = formula::evaluate_formula(&substituted)?;
    println!("{}", output::formula_result(&value));
    Ok(())
}

async fn run(cli: &Cli) -> Result<(), Error> {
    if let Commands::Formula { text, vars } = &cli.command {
        return evaluate(text, vars);
    }

    let ctx = Context::initialize(cli)?;
    match &cli.command {
        Commands::List => list_forms(&ctx).await,
        Commands::Show { id } => show_form(&ctx, id).await,
        Commands::Check { file } => check_file(&ctx, file),
        Commands::Save { file, name } => save_file(&ctx, file, name).await,
        Commands::Preview { id, data, set } => preview_form(&ctx, id, data.as_deref(), set).await,
        Commands::Formula { text, vars } => evaluate(text, vars),
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

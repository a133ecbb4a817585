use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use projgen_codegen::{emit, fetch_schema, CodeGen, CodeGenConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// projgen — typed GraphQL projection builders from a schema
#[derive(Debug, Parser)]
#[command(name = "projgen", version, about)]
struct Cli {
    /// Log at debug level (overridden by $RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate projection types from schema files.
    Generate(GenerateArgs),
    /// Fetch a schema via introspection and print it as SDL.
    FetchSchema(FetchArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Schema file(s), concatenated in order.
    #[arg(long = "schema", required = true)]
    schemas: Vec<PathBuf>,
    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory.
    #[arg(long)]
    out: PathBuf,
    /// Override `package_name` from the config.
    #[arg(long)]
    package_name: Option<String>,
    /// Override `query_module` from the config.
    #[arg(long)]
    query_module: Option<String>,
    /// Override `projection_module` from the config.
    #[arg(long)]
    projection_module: Option<String>,
}

#[derive(Debug, Args)]
struct FetchArgs {
    /// GraphQL endpoint URL.
    #[arg(long)]
    url: String,
    /// Extra request header, as `Name: value`. Repeatable.
    #[arg(long = "header")]
    headers: Vec<String>,
    /// Write SDL here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => generate(args),
        Command::FetchSchema(args) => fetch(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => CodeGenConfig::load(path)?,
        None => CodeGenConfig::default(),
    };
    if let Some(package_name) = args.package_name {
        config.package_name = package_name;
    }
    if let Some(query_module) = args.query_module {
        config.query_module = query_module;
    }
    if let Some(projection_module) = args.projection_module {
        config.projection_module = projection_module;
    }

    let schemas = args
        .schemas
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read schema {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<String>>>()?;

    let codegen = CodeGen::from_schemas(config, &schemas);
    let result = codegen.generate();
    let files = emit::render(&result, codegen.config()).context("failed to render projections")?;
    emit::write_files(&files, &args.out)?;

    println!(
        "Generated {} query type(s) and {} projection(s) in {}",
        result.query_types.len(),
        result.projections.len(),
        args.out.display()
    );
    Ok(())
}

fn fetch(args: FetchArgs) -> anyhow::Result<()> {
    let headers = args
        .headers
        .iter()
        .map(String::as_str)
        .map(parse_header)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let sdl = fetch_schema::fetch_and_convert(&args.url, &headers)?;
    match args.out {
        Some(path) => std::fs::write(&path, sdl)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", sdl),
    }
    Ok(())
}

fn parse_header(raw: &str) -> anyhow::Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .with_context(|| format!("invalid header `{}`, expected `Name: value`", raw))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

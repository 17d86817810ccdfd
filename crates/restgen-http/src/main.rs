//! CLI for `restgen-http`.
//!
//! ```text
//! # List the methods an interface file declares
//! restgen describe --interface api.yaml
//!
//! # Call one of them and print the result as JSON
//! restgen call --config client.yaml --interface api.yaml getListWithIdAndQuery 55 couch
//! restgen call --config client.yaml --interface api.yaml addListWithIdAndData 55 --body '{"a":1}'
//! ```

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use restgen::{Args, Interface};
use restgen_http::{ClientConfig, InterfaceFile};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Call REST methods declared in a YAML interface file.
#[derive(Parser)]
#[command(name = "restgen", version, about)]
enum Cli {
    /// Invoke one method and print its result.
    Call(CallArgs),

    /// Print the methods of an interface file.
    Describe(DescribeArgs),
}

#[derive(Parser)]
struct CallArgs {
    /// Path to a client config YAML file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the interface YAML file.
    #[arg(short, long)]
    interface: PathBuf,

    /// Override the endpoint prefix from the config file.
    #[arg(long)]
    endpoint: Option<String>,

    /// Method name.
    method: String,

    /// Positional arguments. URL arguments are passed verbatim; later ones as JSON when valid.
    args: Vec<String>,

    /// Request body (JSON), placed after the URL arguments.
    #[arg(long)]
    body: Option<String>,
}

#[derive(Parser)]
struct DescribeArgs {
    /// Path to the interface YAML file.
    #[arg(short, long)]
    interface: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse() {
        Cli::Call(args) => run_call(args).await,
        Cli::Describe(args) => run_describe(&args),
    }
}

async fn run_call(args: CallArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }

    let interface = load_interface(&args.interface)?;
    let descriptor = interface
        .get(&args.method)
        .with_context(|| format!("No method '{}' in {}", args.method, interface.name()))?;

    let call_args = build_args(
        &args.args,
        args.body.as_deref(),
        descriptor.url().placeholder_count(),
    )?;

    let adapter = config.build_adapter().context("Failed to build HTTP client")?;
    let service = adapter.create(&interface);
    let result = service
        .method(&args.method)?
        .call(call_args)?
        .await
        .with_context(|| format!("{} failed", args.method))?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_describe(args: &DescribeArgs) -> anyhow::Result<()> {
    let interface = load_interface(&args.interface)?;

    println!("{} ({} methods)", interface.name(), interface.len());
    for (name, descriptor) in interface.methods() {
        println!(
            "  {name:<32} {:<9} {}  [{} args]",
            descriptor.verb().as_str(),
            descriptor.url(),
            descriptor.url().placeholder_count(),
        );
    }
    Ok(())
}

fn load_interface(path: &Path) -> anyhow::Result<Interface> {
    InterfaceFile::load(path)
        .and_then(|file| file.to_interface())
        .with_context(|| format!("Failed to load interface: {}", path.display()))
}

/// Positional arguments. The first `placeholders` are URL text and pass
/// through verbatim; later ones are parsed as JSON. The body (if any) is
/// padded to the slot after the URL arguments.
fn build_args(raw: &[String], body: Option<&str>, placeholders: usize) -> anyhow::Result<Args> {
    let mut args = raw.iter().enumerate().fold(Args::new(), |args, (index, text)| {
        if index < placeholders {
            args.arg(text.as_str())
        } else {
            args.arg(parse_arg(text))
        }
    });

    if let Some(body) = body {
        if raw.len() > placeholders {
            bail!(
                "--body conflicts with positional argument {} (the method takes {placeholders} URL arguments)",
                placeholders + 1,
            );
        }
        let body: Value = serde_json::from_str(body).context("--body is not valid JSON")?;
        for _ in raw.len()..placeholders {
            args = args.missing();
        }
        args = args.arg(body);
    }

    Ok(args)
}

fn parse_arg(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#![warn(
    clippy::pedantic,
    noop_method_call,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_op_in_unsafe_fn,
    unused_lifetimes,
    unused_qualifications
)]
#![allow(clippy::needless_pass_by_value)]

fn main() -> process::ExitCode {
    init_logging();

    if let Err(e) = try_main() {
        report_error(e.as_ref());
        return process::ExitCode::FAILURE;
    }
    process::ExitCode::SUCCESS
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Seal, open and expire session cookies using a deployment's configuration
#[derive(Debug, clap::Parser)]
struct Args {
    /// Path to the configuration file, instead of the one in the user's config directory
    #[clap(short, long)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    Seal(SealArgs),
    Open(OpenArgs),
    Clear(ClearArgs),
    CheckConfig,
}

/// Seal a JSON session into a `Set-Cookie` header value
#[derive(Debug, clap::Parser)]
struct SealArgs {
    /// The session, as JSON
    json: String,

    /// The host the cookie is being set for, which decides its `Secure` and `Domain` attributes
    #[clap(long)]
    host: Option<String>,
}

/// Verify and decrypt a session cookie, printing the JSON it holds
#[derive(Debug, clap::Parser)]
struct OpenArgs {
    /// The cookie value, optionally prefixed with `name=`
    value: String,
}

/// Print the `Set-Cookie` header value that removes the session cookie
#[derive(Debug, clap::Parser)]
struct ClearArgs {
    #[clap(long)]
    host: Option<String>,
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => ProjectDirs::from("", "", "sealed-cookies")
            .context("no home directory")?
            .config_dir()
            .join("config.toml"),
    };
    let config = config::load(&config_path)?;

    let start = Instant::now();
    let manager = config
        .session_manager()
        .context("configuration cannot protect cookies")?;
    let derivation_time = start.elapsed();

    match args.command {
        Command::Seal(args) => seal(&manager, args),
        Command::Open(args) => open(&manager, args),
        Command::Clear(args) => clear(&manager, args),
        Command::CheckConfig => {
            println!(
                "ok: cookie `{}`, {} iterations, keys derived in {derivation_time:?}",
                manager.cookie_name(),
                config.iterations,
            );
            Ok(())
        }
    }
}

fn seal(manager: &SessionManager, args: SealArgs) -> anyhow::Result<()> {
    let session = serde_json::from_str::<serde_json::Value>(&args.json)
        .context("session is not valid JSON")?;

    let request = request_to(args.host.as_deref(), None)?;
    let mut headers = HeaderMap::new();
    let cookie = manager.update(&mut headers, &request, &session)?;

    tracing::info!(len = cookie.value().len(), "sealed session");
    println!("{cookie}");
    Ok(())
}

fn open(manager: &SessionManager, args: OpenArgs) -> anyhow::Result<()> {
    let value = match args.value.split_once('=') {
        Some((name, value)) if name == manager.cookie_name() => value,
        _ => &*args.value,
    };

    let pair = format!("{}={value}", manager.cookie_name());
    let request = request_to(None, Some(&pair))?;
    let session = manager
        .store()
        .get::<serde_json::Value, _>(&request, manager.cookie_name())?;

    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}

fn clear(manager: &SessionManager, args: ClearArgs) -> anyhow::Result<()> {
    let request = request_to(args.host.as_deref(), None)?;
    let cookie = manager.clear(&mut HeaderMap::new(), &request);
    println!("{cookie}");
    Ok(())
}

fn request_to(host: Option<&str>, cookie: Option<&str>) -> anyhow::Result<Request<()>> {
    let mut request = Request::builder();
    if let Some(host) = host {
        request = request.header(header::HOST, host);
    }
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    request.body(()).context("invalid request")
}

mod config;

use error_reporting::report_error;
mod error_reporting;

use anyhow::Context as _;
use clap::Parser as _;
use directories::ProjectDirs;
use http::header;
use http::HeaderMap;
use http::Request;
use sealed_cookies::SessionManager;
use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

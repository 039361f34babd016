use anyhow::{bail, Context};
use clap::Parser;
use ignore_ip::{ConfigLoader, Destination, IgnoreRule, PortConfig, UrlDestination};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ignore-check")]
#[command(about = "Check a destination against a proxy ignore rule")]
struct Args {
    /// Ignore rule: address, network/prefix, network/netmask or address:port
    #[arg(long, short = 'r')]
    rule: String,

    /// Destination: URL, socket address or bare IP address
    destination: String,

    /// Config file path
    #[arg(long, short = 'c', env = "IGNORE_IP_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let env_filter = if args.verbose {
        EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::DEBUG.into())
    } else {
        EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let config = ConfigLoader::load_or_default(args.config.clone())
        .context("Failed to load configuration")?;

    let destination = parse_destination(&args.destination, &config.ports)?;

    let Some(rule) = IgnoreRule::parse(&args.rule) else {
        println!("rule {:?} is not an IP rule: no match", args.rule);
        return Ok(false);
    };

    let Some(destination) = destination else {
        println!("{}: destination has no resolved address: no match", rule);
        return Ok(false);
    };

    let matched = rule.matches(&destination);
    println!(
        "{} against {}: {}",
        rule,
        destination,
        if matched { "match" } else { "no match" }
    );
    Ok(matched)
}

/// Accepts a URL, `addr:port`, `[v6]:port` or a bare address (port 0)
fn parse_destination(input: &str, ports: &PortConfig) -> anyhow::Result<Option<Destination>> {
    if input.contains("://") {
        let url = UrlDestination::parse(input, ports)?;
        tracing::debug!(url = %url.url(), host = url.host(), "Parsed URL destination");
        return Ok(Destination::from_provider(&url));
    }

    if let Ok(addr) = input.parse::<SocketAddr>() {
        return Ok(Some(addr.into()));
    }

    if let Ok(ip) = input.parse::<IpAddr>() {
        return Ok(Some(Destination::new(ip, 0)));
    }

    bail!("Invalid destination: {}. Use a URL, address:port or an IP address", input)
}

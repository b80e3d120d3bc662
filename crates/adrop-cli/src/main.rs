use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tokio::net::{TcpListener, TcpStream};
use tracing_subscriber::{fmt, EnvFilter};

use adrop_core::{FsSink, Receiver, SendItem, SendOutcome, Sender, TransferConfig};
use mdns_core::{browse_window, resolve, Advertiser, PeerRecord, ResolveError};

#[derive(Parser, Debug)]
#[command(name = "adrop", version, about = "ADrop Client")]
struct Cli {
    /// Set log level: error,warn,info,debug,trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send text and/or files to a discovered peer
    Send {
        /// Text to send
        #[arg(short, long)]
        text: Option<String>,

        /// Files to send
        #[arg(short, long, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Advertise this device and accept one incoming transfer
    Receive {
        /// Name of this device
        #[arg(short = 'n', long)]
        device_name: Option<String>,
    },

    /// Print discovery events until interrupted
    Scan,

    /// Alias of scan
    Scanall,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::new(&cli.log_level))
        .with_target(false)
        .init();

    match cli.cmd {
        Commands::Send { text, files } => send(text, files).await,
        Commands::Receive { device_name } => receive(device_name).await,
        Commands::Scan | Commands::Scanall => mdns_core::scan_all(),
    }
}

async fn send(text: Option<String>, files: Vec<PathBuf>) -> Result<()> {
    let mut items = Vec::new();
    if let Some(text) = text {
        items.push(SendItem::Text(text));
    }
    items.extend(files.into_iter().map(SendItem::File));
    if items.is_empty() {
        anyhow::bail!("one of --text and --files must be specified");
    }

    let cfg = TransferConfig::default();

    println!("Scanning...");
    let peers = browse_window(cfg.browse_window)?;
    if peers.is_empty() {
        println!("Cannot find another endpoint...");
        return Ok(());
    }

    let peer = select_peer(&peers)?;

    let addr = match resolve(&peer.fullname, cfg.resolve_timeout) {
        Ok(addr) => addr,
        Err(err @ (ResolveError::Timeout(_) | ResolveError::Empty(_))) => {
            println!("{}", err);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let stream = TcpStream::connect(addr.socket_addr())
        .await
        .with_context(|| format!("connecting to {}", addr.socket_addr()))?;
    tracing::debug!("connected to {}", addr.socket_addr());

    match Sender::new(stream).run(&items).await? {
        SendOutcome::Completed => println!("Request completed"),
        SendOutcome::Rejected => println!("Request is rejected."),
    }
    Ok(())
}

async fn receive(device_name: Option<String>) -> Result<()> {
    let device_name = match device_name {
        Some(name) => name,
        None => hostname::get()
            .context("reading machine name")?
            .to_string_lossy()
            .into_owned(),
    };

    let listener = TcpListener::bind(("0.0.0.0", 0))
        .await
        .context("binding listen socket")?;
    let port = listener.local_addr()?.port();
    tracing::info!("listening on ephemeral port {}", port);

    let advertiser = Advertiser::register(&device_name, port)?;
    println!("Waiting for a peer as '{}'...", advertiser.fullname());

    // Single-use: exactly one inbound connection per session, then the
    // advertisement is withdrawn.
    let (stream, peer_addr) = listener.accept().await.context("accepting connection")?;
    drop(advertiser);
    println!("{} connected, receiving metadata.", peer_addr);

    let cfg = TransferConfig::default();
    let sink = FsSink::new(cfg.output_dir);
    let delivered = Receiver::new(stream).run(&sink).await?;
    println!("Received {} item(s)", delivered);
    Ok(())
}

/// Numbered menu on stdout; reads a 1-based selection from stdin.
fn select_peer(peers: &[PeerRecord]) -> Result<&PeerRecord> {
    println!("Select an endpoint");
    println!();
    for (i, peer) in peers.iter().enumerate() {
        println!("{}. {}", i + 1, peer.fullname);
    }
    print!("Input:");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let index =
        parse_selection(&line, peers.len()).ok_or_else(|| anyhow::anyhow!("Invalid input..."))?;
    Ok(&peers[index])
}

/// 1-based selection to 0-based index; None when out of range or not a number.
fn parse_selection(input: &str, count: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    if n == 0 || n > count {
        return None;
    }
    Some(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_is_one_based_and_bounded() {
        assert_eq!(parse_selection("1\n", 3), Some(0));
        assert_eq!(parse_selection(" 3 ", 3), Some(2));
        assert_eq!(parse_selection("0", 3), None);
        assert_eq!(parse_selection("4", 3), None);
        assert_eq!(parse_selection("abc", 3), None);
        assert_eq!(parse_selection("", 3), None);
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::net::TcpStream;

#[derive(Parser)]
#[command(name = "redserve")]
#[command(about = "A CLI client for redserve", long_about = None)]
struct Cli {
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    #[arg(short, long, default_value = "6389")]
    port: u16,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a PING command
    Ping,
    /// Set a key-value pair
    Set { key: String, value: String },
    /// Get a value by key
    Get { key: String },
    /// Delete one or more keys
    Del { keys: Vec<String> },
    /// Increment a counter
    Incr { key: String },
    /// LPUSH to a list
    Lpush { list: String, values: Vec<String> },
    /// RPUSH to a list
    Rpush { list: String, values: Vec<String> },
    /// LRANGE on a list
    Lrange { list: String, start: i64, stop: i64 },
    /// Blocking pop from a list, waiting up to `timeout` seconds (0 = forever)
    Brpop { key: String, timeout: u64 },
    /// Publish a message to a channel
    Publish { channel: String, message: String },
    /// Subscribe to channels and print messages until interrupted
    Subscribe { channels: Vec<String> },
    /// Stream the server's command trace until interrupted
    Monitor,
    /// Add members to a sorted set at a score
    Zadd { key: String, score: i64, values: Vec<String> },
    /// Index range of a sorted set
    Zrange { key: String, start: i64, stop: i64 },
}

fn encode(parts: &[&str]) -> String {
    let mut cmd = format!("*{}\r\n", parts.len());
    for part in parts {
        cmd.push_str(&format!("${}\r\n{}\r\n", part.len(), part));
    }
    cmd
}

/// Sends one command and prints the first response chunk.
fn send_once(host: &str, port: u16, parts: &[&str]) -> Result<()> {
    let mut stream = TcpStream::connect((host, port))?;
    stream.write_all(encode(parts).as_bytes())?;
    let mut buf = [0; 4096];
    let n = stream.read(&mut buf)?;
    print!("{}", String::from_utf8_lossy(&buf[..n]));
    Ok(())
}

/// Sends one command and keeps printing whatever the server streams back.
fn stream_replies(host: &str, port: u16, parts: &[&str]) -> Result<()> {
    let mut stream = TcpStream::connect((host, port))?;
    stream.write_all(encode(parts).as_bytes())?;
    let mut buf = [0; 4096];
    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Ok(());
        }
        print!("{}", String::from_utf8_lossy(&buf[..n]));
        std::io::stdout().flush()?;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let (host, port) = (cli.host.as_str(), cli.port);
    match &cli.command {
        Commands::Ping => send_once(host, port, &["PING"]),
        Commands::Set { key, value } => send_once(host, port, &["SET", key, value]),
        Commands::Get { key } => send_once(host, port, &["GET", key]),
        Commands::Del { keys } => {
            let mut parts = vec!["DEL"];
            parts.extend(keys.iter().map(String::as_str));
            send_once(host, port, &parts)
        }
        Commands::Incr { key } => send_once(host, port, &["INCR", key]),
        Commands::Lpush { list, values } => {
            let mut parts = vec!["LPUSH", list];
            parts.extend(values.iter().map(String::as_str));
            send_once(host, port, &parts)
        }
        Commands::Rpush { list, values } => {
            let mut parts = vec!["RPUSH", list];
            parts.extend(values.iter().map(String::as_str));
            send_once(host, port, &parts)
        }
        Commands::Lrange { list, start, stop } => {
            let (start, stop) = (start.to_string(), stop.to_string());
            send_once(host, port, &["LRANGE", list, &start, &stop])
        }
        Commands::Brpop { key, timeout } => {
            let timeout = timeout.to_string();
            send_once(host, port, &["BRPOP", key, &timeout])
        }
        Commands::Publish { channel, message } => {
            send_once(host, port, &["PUBLISH", channel, message])
        }
        Commands::Subscribe { channels } => {
            let mut parts = vec!["SUBSCRIBE"];
            parts.extend(channels.iter().map(String::as_str));
            stream_replies(host, port, &parts)
        }
        Commands::Monitor => stream_replies(host, port, &["MONITOR"]),
        Commands::Zadd { key, score, values } => {
            let score = score.to_string();
            let mut parts = vec!["ZADD", key, &score];
            parts.extend(values.iter().map(String::as_str));
            send_once(host, port, &parts)
        }
        Commands::Zrange { key, start, stop } => {
            let (start, stop) = (start.to_string(), stop.to_string());
            send_once(host, port, &["ZRANGE", key, &start, &stop])
        }
    }
}

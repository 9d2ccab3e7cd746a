use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::process::ExitCode;

use graph_mail_client::auth::oauth::{GRAPH_DEFAULT_SCOPE, acquire_token_for_client};
use graph_mail_client::auth::{credentials_from_config, token_store};
use graph_mail_client::config::load_config;
use graph_mail_client::graph::{GraphClient, ReqwestTransport};
use graph_mail_client::session::{print_chats, print_messages, run_default_sequence};

#[derive(Parser)]
#[command(name = "graph_mail_client")]
#[command(about = "Read and send mailbox messages and list chats through Microsoft Graph", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch emails, send a test email to the mailbox owner, then list chats (default)
    Run,

    /// List messages in the configured mailbox
    Messages,

    /// List chats of the configured user
    Chats,

    /// Send a plain-text email from the configured mailbox
    Send {
        #[arg(long = "to", required = true)]
        to: Vec<String>,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        body: String,
    },

    /// Store the app registration's client secret in the keyring
    SetClientSecret {
        #[arg(long)]
        client_id: String,
    },
}

fn main() -> ExitCode {
    // Before env_logger, so RUST_LOG may come from .env.
    let dotenv = dotenvy::dotenv();
    env_logger::init();
    match dotenv {
        Ok(path) => log::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("ignoring unreadable .env file: {e}"),
    }

    let cli = Cli::parse();

    match run(cli.cmd.unwrap_or(Command::Run)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("An error occurred: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cmd: Command) -> Result<()> {
    match cmd {
        Command::SetClientSecret { client_id } => {
            eprintln!("Paste client secret (end with Ctrl-D):");
            let mut secret = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut secret)?;
            token_store::save_client_secret(&client_id, secret.trim())?;
            println!("Saved client secret for client_id {}", client_id);
            Ok(())
        }

        Command::Messages => print_messages(&connect()?, &mut std::io::stdout().lock()),

        Command::Chats => print_chats(&connect()?, &mut std::io::stdout().lock()),

        Command::Send { to, subject, body } => {
            connect()?.send_mail(&subject, &body, &to)?;
            println!("Email sent successfully!");
            Ok(())
        }

        Command::Run => {
            let graph = connect()?;
            let mut out = std::io::stdout().lock();
            let result = run_default_sequence(&graph, &mut out);
            out.flush()?;
            result
        }
    }
}

fn connect() -> Result<GraphClient<ReqwestTransport>> {
    let cfg = load_config().context("Configuration error")?;
    log::debug!("using {cfg:?}");

    let credentials = credentials_from_config(&cfg)?;
    let token = acquire_token_for_client(&credentials, &[GRAPH_DEFAULT_SCOPE])?;

    let graph = GraphClient::new(
        ReqwestTransport::new()?,
        &cfg.graph_api_url,
        cfg.user_email.clone(),
        token,
    )?
    .with_page_size(cfg.page_size)
    .with_max_pages(cfg.max_pages);
    Ok(graph)
}

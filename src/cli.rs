// command line interface

use crate::output::Output;
use crate::{ChatClient, Config, Server, flatten_export};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cloudsage", about = "Ask your DevOps knowledge base")]
struct Cli {
    /// base url of the chat api
    #[arg(
        long,
        env = "NEXT_PUBLIC_API_BASE_URL",
        default_value = "http://127.0.0.1:3000",
        global = true
    )]
    api_url: String,

    /// debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// start the chat relay server
    Serve {
        /// port number
        #[arg(long, short, default_value = "3000")]
        port: u16,

        /// host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// send one message and print the answer
    Ask {
        message: String,

        /// print the json reply as-is
        #[arg(long)]
        raw: bool,
    },

    /// flatten a jira/confluence json export for indexing
    Flatten {
        /// export file (array of records or a single record)
        path: std::path::PathBuf,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, host }) => {
            init_tracing(cli.verbose);
            let config = Config::from_env();
            Server::run(config, &host, port).await.into_diagnostic()
        }

        Some(Commands::Ask { message, raw }) => {
            init_tracing(cli.verbose);
            let client = ChatClient::new(&cli.api_url);
            let reply = client.send(&message).await.into_diagnostic()?;
            if raw {
                Output::raw(&reply);
            } else {
                Output::pretty(&reply);
            }
            Ok(())
        }

        Some(Commands::Flatten { path }) => {
            let input = std::fs::read_to_string(&path).into_diagnostic()?;
            println!("{}", flatten_export(&input).into_diagnostic()?);
            Ok(())
        }

        // the tui owns the terminal, so no log output here
        None => crate::tui::run(ChatClient::new(&cli.api_url))
            .await
            .into_diagnostic(),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "cloudsage=debug,tower_http=debug"
    } else {
        "cloudsage=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

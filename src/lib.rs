// cloudsage library - moderated, search-grounded chat relay

pub mod cli;
mod config;
mod core;
mod error;
mod output;
mod server;
pub mod tui;

pub use config::{Config, Settings};
pub use self::core::{
    AppInsights, AzureOpenAi, ChatClient, ChatReply, Completer, Completion, ContentSafety,
    Moderator, NoTelemetry, Relay, Telemetry, flatten_description, flatten_export,
    flatten_record,
};
pub use error::Error;
pub use server::Server;
pub use tui::{ChatSession, Entry, Role};

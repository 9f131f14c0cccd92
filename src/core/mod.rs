// core logic - remote service clients and the relay that chains them

mod client;
mod completion;
mod ingest;
mod moderation;
mod relay;
mod telemetry;

pub use client::ChatClient;
pub use completion::{AzureOpenAi, Completer, Completion};
pub use ingest::{flatten_description, flatten_export, flatten_record};
pub use moderation::{ContentSafety, Moderator};
pub use relay::{ChatReply, Relay};
pub use telemetry::{AppInsights, NoTelemetry, Telemetry};

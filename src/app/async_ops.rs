//! Network work spawned off the UI loop.
//!
//! The loop never awaits a request. It queues an [`AsyncCommand`], the
//! dispatcher runs it on the runtime, and the outcome comes back through the
//! channel as a [`CommandResult`] on a later tick.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::api::ApiClient;
use crate::models::{Event, EventDraft, Society, User};
use crate::utils::error::AppError;

#[derive(Debug)]
pub enum AsyncCommand {
    /// `seq` tags the fetch so the directory can drop superseded results.
    FetchEvents { seq: u64 },
    FetchSocieties,
    VerifySociety { society_id: i64 },
    PublishEvent { draft: EventDraft },
    Login { username: String, password: String },
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// Fire-and-forget; produces no result.
    ReportInterest { event_id: i64, interested: bool },
}

#[derive(Debug)]
pub enum CommandResult {
    Events {
        seq: u64,
        result: Result<Vec<Event>, AppError>,
    },
    Societies(Result<Vec<Society>, AppError>),
    Verified(Result<(), AppError>),
    Published(Result<(), AppError>),
    Auth(Result<User, AppError>),
}

/// Spawns one command and posts its result back to the event loop. The send
/// only fails when the loop is already gone, so the error is ignored.
pub fn dispatch(
    client: Arc<ApiClient>,
    command: AsyncCommand,
    tx: UnboundedSender<CommandResult>,
) {
    tokio::spawn(async move {
        let result = match command {
            AsyncCommand::FetchEvents { seq } => Some(CommandResult::Events {
                seq,
                result: client.list_events().await,
            }),
            AsyncCommand::FetchSocieties => {
                Some(CommandResult::Societies(client.list_societies().await))
            }
            AsyncCommand::VerifySociety { society_id } => {
                Some(CommandResult::Verified(client.verify_society(society_id).await))
            }
            AsyncCommand::PublishEvent { draft } => {
                Some(CommandResult::Published(client.create_event(&draft).await))
            }
            AsyncCommand::Login { username, password } => {
                Some(CommandResult::Auth(client.login(&username, &password).await))
            }
            AsyncCommand::Register {
                username,
                email,
                password,
            } => Some(CommandResult::Auth(
                client.register(&username, &email, &password).await,
            )),
            AsyncCommand::ReportInterest {
                event_id,
                interested,
            } => {
                client.report_interest(event_id, interested).await;
                None
            }
        };
        if let Some(result) = result {
            let _ = tx.send(result);
        }
    });
}

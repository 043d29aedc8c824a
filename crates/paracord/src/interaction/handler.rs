//! Traits for defining handler logic for command interactions

use std::{fmt, sync::Arc};

use super::{command::CommandInfo, response, visitor};

pub use visitor::CommandVisitor;

/// Helper trait for constructing an error response
pub trait IntoErr<E> {
    /// Convert this value into an error, attaching the given message
    fn into_err(self, msg: &'static str) -> E;
}

/// A set of handlers from which a [`Registry`](super::Registry) can be created
#[derive(Debug)]
pub struct Handlers<C> {
    /// Command interaction handlers
    pub commands: Vec<Arc<dyn CommandHandler<C>>>,
    /// Handler for commands with no registered handler
    pub fallback: Option<Arc<dyn FallbackHandler<C>>>,
}

impl<C> Default for Handlers<C> {
    fn default() -> Self {
        Self {
            commands: vec![],
            fallback: None,
        }
    }
}

/// An error arising from handling an interaction
#[derive(Debug, thiserror::Error)]
pub enum HandlerError<'a> {
    /// A visitor extractor returned an error
    #[error("Error parsing interaction data: {0}")]
    Parse(#[from] visitor::Error),
    /// A custom response was dispatched to the user
    #[error("Bot responded with error: {0}")]
    User(&'static str, response::AckedResponder<'a>),
    /// An unhandled error occurred
    #[error("Unexpected error: {0}")]
    Other(#[from] anyhow::Error),
}

impl<'a> IntoErr<HandlerError<'a>> for response::CreatedResponder<'a> {
    fn into_err(self, msg: &'static str) -> HandlerError<'a> {
        HandlerError::User(msg, self.into())
    }
}

/// Return type for the command interaction handler method
pub type CommandResult<'a> = Result<response::AckedResponder<'a>, HandlerError<'a>>;
/// Responder type provided to command interaction handlers
pub type CommandResponder<'a> = response::BorrowingResponder<'a>;

/// A handler for a command interaction
#[async_trait::async_trait]
pub trait CommandHandler<C>: fmt::Debug + Send + Sync {
    /// Provide registration data for this command within the global context
    fn register_global(&self) -> CommandInfo;

    /// Respond to a command interaction
    async fn respond<'a>(
        &self,
        ctx: &C,
        visitor: &mut CommandVisitor<'_>,
        responder: CommandResponder<'a>,
    ) -> CommandResult<'a>;
}

/// A handler for commands that no registered [`CommandHandler`] claims
#[async_trait::async_trait]
pub trait FallbackHandler<C>: fmt::Debug + Send + Sync {
    /// Respond to an unrecognized command interaction
    async fn respond<'a>(
        &self,
        ctx: &C,
        visitor: &mut CommandVisitor<'_>,
        responder: CommandResponder<'a>,
    ) -> CommandResult<'a>;
}

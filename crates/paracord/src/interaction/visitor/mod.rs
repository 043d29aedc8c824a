//! Types for extracting data from interaction invocations in a type-safe manner

mod command;

use std::fmt;

pub use command::{CommandVisitor, Lookup, OptionValueType, OptionVisitor};
use serenity::model::{guild::Member, id::GuildId};

/// An error caused by performing an invalid extraction
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input data does not match the shape Discord documents
    #[error("Received data was invalid: {0}")]
    Malformed(&'static str),

    /// A chat input data extractor was used on a non-chat-input command
    #[error("Attempted to read options for a non-slash command")]
    NotChatInput,
    /// An argument extractor was used on a subcommand invocation
    #[error("Tried to read arguments for subcommand {0:?}")]
    UnhandledSubcommand(String),

    // Option visitor errors
    /// An argument was required but not present in the input
    #[error("Required command option {0:?} missing or already visited")]
    MissingOption(String),
    /// An argument was present in the input but its value was not of the
    /// correct type
    #[error("Type mismatch in value of command option {0:?} - expected {1}, found {2:?}")]
    BadOptionValueType(String, &'static str, OptionValueType),
    /// A trailing argument was left in the visitor after the handler completed
    #[error("Trailing arguments: {0:?}")]
    Trailing(Vec<String>),

    // Guild visitor errors
    /// The guild ID extractor was used on an interaction invoked outside of a
    /// guild
    #[error("Guild-only interaction run inside DM")]
    GuildRequired,
}

trait Describe {
    type Desc: fmt::Debug;

    fn describe(&self) -> Self::Desc;
}

type Result<T> = std::result::Result<T, Error>;

/// Visitor for the source guild of an interaction
#[derive(Debug, Clone, Copy)]
#[repr(transparent)]
pub struct GuildVisitor<'a>(Option<(GuildId, &'a Member)>);

impl<'a> GuildVisitor<'a> {
    /// Extract the guild ID and member info, returning `None` if no guild data
    /// is present
    #[inline]
    #[must_use]
    pub fn optional(self) -> Option<(GuildId, &'a Member)> { self.0 }

    /// Extract the guild ID and member info
    ///
    /// # Errors
    /// This method returns an error if no guild data is present.
    #[inline]
    pub fn required(self) -> Result<(GuildId, &'a Member)> { self.0.ok_or(Error::GuildRequired) }
}

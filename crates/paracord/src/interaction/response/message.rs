use serenity::{
    builder::{CreateAllowedMentions, CreateInteractionResponseMessage},
    utils::{Content, MessageBuilder},
};

/// Options to provide when creating a message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageOpts {
    ephemeral: bool,
}

impl MessageOpts {
    /// Set whether this message should be a private temporary response
    #[must_use]
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }
}

/// A message sent as an interaction response
///
/// Messages never allow mentions to ping anyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    content: String,
    opts: MessageOpts,
}

impl Message {
    /// Construct a new rich-text message using the given closure
    #[inline]
    pub fn rich(f: impl FnOnce(&mut MessageBuilder) -> &mut MessageBuilder) -> Self {
        let mut content = MessageBuilder::new();
        f(&mut content);
        Self {
            content: content.build(),
            opts: MessageOpts::default(),
        }
    }

    /// Construct a new plaintext message
    #[inline]
    pub fn plain(c: impl Into<Content>) -> Self { Self::rich(|mb| mb.push_safe(c)) }

    /// Set whether this message should be a private temporary response
    #[inline]
    #[must_use]
    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.opts = self.opts.ephemeral(ephemeral);
        self
    }

    /// Get the rendered content of this message
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str { &self.content }

    /// Get the options for this message
    #[inline]
    #[must_use]
    pub fn opts(&self) -> MessageOpts { self.opts }
}

impl From<Message> for CreateInteractionResponseMessage {
    fn from(value: Message) -> Self {
        let Message {
            content,
            opts: MessageOpts { ephemeral },
        } = value;

        Self::new()
            .content(content)
            .ephemeral(ephemeral)
            .allowed_mentions(CreateAllowedMentions::new())
    }
}

use serenity::{
    builder::CreateCommandOption,
    model::{application::CommandOptionType, channel::ChannelType},
};

/// Metadata for a chat input command parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub(super) desc: String,
    pub(super) required: bool,
    pub(super) ty: ArgType,
}

impl Arg {
    /// Construct a new parameter description
    #[inline]
    pub fn new(desc: impl Into<String>, required: bool, ty: ArgType) -> Self {
        let desc = desc.into();
        Self { desc, required, ty }
    }

    pub(super) fn build(self, name: String) -> CreateCommandOption {
        let Self { desc, required, ty } = self;
        let opt = CreateCommandOption::new(ty.kind(), name, desc).required(required);

        match ty {
            ArgType::StringChoice(choices) => choices
                .into_iter()
                .fold(opt, |o, Choice { name, val }| o.add_string_choice(name, val)),
            ArgType::Channel(types) if !types.is_empty() => opt.channel_types(types),
            ArgType::String
            | ArgType::Int
            | ArgType::Bool
            | ArgType::User
            | ArgType::Channel(_)
            | ArgType::Role => opt,
        }
    }
}

/// Metadata describing the type of a chat input command parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgType {
    /// A freeform string
    String,
    /// A string chosen from a fixed list of options
    StringChoice(Vec<Choice<String>>),
    /// A freeform integer
    Int,
    /// A Boolean parameter
    Bool,
    /// A handle for a user
    User,
    /// A handle for a channel conforming to the list of channel types given
    ///
    /// **NOTE:** If the list provided is empty, all types are assumed to be
    /// valid.
    Channel(Vec<ChannelType>),
    /// A handle for a role within a guild
    Role,
}

impl ArgType {
    fn kind(&self) -> CommandOptionType {
        match self {
            Self::String | Self::StringChoice(_) => CommandOptionType::String,
            Self::Int => CommandOptionType::Integer,
            Self::Bool => CommandOptionType::Boolean,
            Self::User => CommandOptionType::User,
            Self::Channel(_) => CommandOptionType::Channel,
            Self::Role => CommandOptionType::Role,
        }
    }
}

/// A single entry for one of the `...Choice` [parameter types](ArgType)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub(super) name: String,
    pub(super) val: T,
}

impl<T> Choice<T> {
    /// Construct a new parameter option
    #[inline]
    pub fn new(name: impl Into<String>, val: T) -> Self {
        let name = name.into();
        Self { name, val }
    }
}

impl<N: Into<String>, V: Into<String>> From<(N, V)> for Choice<String> {
    fn from((name, val): (N, V)) -> Self { Self::new(name, val.into()) }
}

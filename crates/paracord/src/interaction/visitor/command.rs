use std::collections::HashMap;

use serenity::model::{
    application::{CommandInteraction, CommandType, ResolvedOption, ResolvedValue},
    channel::PartialChannel,
    guild::{PartialMember, Role},
    id::InteractionId,
    user::User,
};

use super::{Describe, Error, GuildVisitor, Result};

/// A description of the value type carried by a command option, used for
/// error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionValueType {
    /// A string value
    String,
    /// An integer value
    Integer,
    /// A Boolean value
    Boolean,
    /// A user handle
    User,
    /// A channel handle
    Channel,
    /// A role handle
    Role,
    /// A floating-point value
    Number,
    /// An attachment
    Attachment,
    /// A partially-typed autocomplete value
    Autocomplete,
    /// A subcommand or subcommand group
    Subcommand,
    /// An entity handle missing from the resolved data
    Unresolved,
    /// Any other value
    Unknown,
}

impl Describe for ResolvedValue<'_> {
    type Desc = OptionValueType;

    fn describe(&self) -> Self::Desc {
        match self {
            Self::String(_) => OptionValueType::String,
            Self::Integer(_) => OptionValueType::Integer,
            Self::Boolean(_) => OptionValueType::Boolean,
            Self::User(..) => OptionValueType::User,
            Self::Channel(_) => OptionValueType::Channel,
            Self::Role(_) => OptionValueType::Role,
            Self::Number(_) => OptionValueType::Number,
            Self::Attachment(_) => OptionValueType::Attachment,
            Self::Autocomplete { .. } => OptionValueType::Autocomplete,
            Self::SubCommand(_) | Self::SubCommandGroup(_) => OptionValueType::Subcommand,
            Self::Unresolved(_) => OptionValueType::Unresolved,
            _ => OptionValueType::Unknown,
        }
    }
}

type OptionMap<'a> = HashMap<&'a str, ResolvedOption<'a>>;

#[derive(Debug)]
enum VisitorState<'a> {
    Init,
    SlashCommand(OptionMap<'a>),
}

/// A visitor for extracting data from a command invocation
#[derive(Debug)]
pub struct CommandVisitor<'a> {
    int: &'a CommandInteraction,
    state: VisitorState<'a>,
}

macro_rules! visit_basic {
    () => {};

    (
        #[doc = $desc:literal]
        $vis:vis fn $name:ident() -> $ty:ty { $var:ident($($val:pat),*) => $expr:expr }
        $($tt:tt)*
    ) => {
        #[doc = concat!("Visit ", $desc, " argument")]
        ///
        /// # Errors
        /// This method returns an error if the command does not take arguments.
        $vis fn $name(&mut self, name: &'a str) -> Result<OptionVisitor<'a, $ty>> {
            let value = match self.visit_opt(name)? {
                Some(opt) => match opt.value {
                    ResolvedValue::$var($($val),*) => Lookup::Found($expr),
                    v => Lookup::Mismatch(v.describe()),
                },
                None => Lookup::Absent,
            };

            Ok(OptionVisitor { name, expected: $desc, value })
        }

        visit_basic! { $($tt)* }
    };
}

impl<'a> CommandVisitor<'a> {
    /// Wrap a reference to an interaction in a new visitor
    #[must_use]
    pub fn new(int: &'a CommandInteraction) -> Self {
        Self {
            int,
            state: VisitorState::Init,
        }
    }

    /// Get the name of the invoked command
    #[inline]
    #[must_use]
    pub fn command_name(&self) -> &'a str { &self.int.data.name }

    /// Visit the source guild information for this interaction
    ///
    /// # Errors
    /// This method returns an error if the input data is non-conformant.
    #[inline]
    pub fn guild(&self) -> Result<GuildVisitor<'a>> {
        if self.int.guild_id.is_some() != self.int.member.is_some() {
            return Err(Error::Malformed(
                "Guild ID and member info presence desynced",
            ));
        }

        Ok(GuildVisitor(
            self.int.guild_id.zip(self.int.member.as_deref()),
        ))
    }

    /// Visit the invoking user information for this interaction
    #[inline]
    #[must_use]
    pub fn user(&self) -> &'a User { &self.int.user }

    /// Get the ID used by Discord to identify this interaction
    #[inline]
    #[must_use]
    pub fn id(&self) -> InteractionId { self.int.id }

    visit_basic! {
        ///a string
        pub fn visit_string() -> &'a str { String(s) => s }

        ///an integer
        pub fn visit_i64() -> i64 { Integer(i) => i }

        ///a Boolean
        pub fn visit_bool() -> bool { Boolean(b) => b }

        ///a user
        pub fn visit_user() -> (&'a User, Option<&'a PartialMember>) {
            User(u, m) => (u, m)
        }

        ///a channel
        pub fn visit_channel() -> &'a PartialChannel { Channel(c) => c }

        ///a role
        pub fn visit_role() -> &'a Role { Role(r) => r }
    }

    fn visit_opts(&mut self) -> Result<&mut OptionMap<'a>> {
        if let VisitorState::SlashCommand(ref mut m) = self.state {
            return Ok(m);
        }

        if self.int.data.kind != CommandType::ChatInput {
            return Err(Error::NotChatInput);
        }

        let mut map = OptionMap::new();
        for opt in self.int.data.options() {
            if let ResolvedValue::SubCommand(_) | ResolvedValue::SubCommandGroup(_) = opt.value {
                return Err(Error::UnhandledSubcommand(opt.name.into()));
            }

            if map.insert(opt.name, opt).is_some() {
                return Err(Error::Malformed("Duplicate command option name"));
            }
        }

        self.state = VisitorState::SlashCommand(map);
        let VisitorState::SlashCommand(ref mut m) = self.state else {
            unreachable!();
        };
        Ok(m)
    }

    #[inline]
    fn visit_opt(&mut self, name: &'a str) -> Result<Option<ResolvedOption<'a>>> {
        Ok(self.visit_opts()?.remove(name))
    }

    /// Check that every option passed to the command was visited
    ///
    /// # Errors
    /// This method returns an error listing any options left unvisited.
    pub fn finish(self) -> Result<()> {
        let Self { int, state } = self;

        match state {
            VisitorState::Init => {
                if int.data.kind == CommandType::ChatInput && !int.data.options.is_empty() {
                    return Err(Error::Trailing(
                        int.data.options.iter().map(|o| o.name.clone()).collect(),
                    ));
                }
            },
            VisitorState::SlashCommand(m) => {
                if !m.is_empty() {
                    let mut names: Vec<String> = m.into_keys().map(Into::into).collect();
                    names.sort_unstable();
                    return Err(Error::Trailing(names));
                }
            },
        }

        Ok(())
    }
}

/// The result of looking up a single command option
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<T> {
    /// The option was present with a value of the requested type
    Found(T),
    /// The option was present but held a value of another type
    Mismatch(OptionValueType),
    /// The option was not present
    Absent,
}

impl<T> Lookup<T> {
    /// Return the value if it was found with the requested type
    #[inline]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::Mismatch(_) | Self::Absent => None,
        }
    }
}

/// A visitor for a single command option
#[derive(Debug)]
pub struct OptionVisitor<'a, T> {
    name: &'a str,
    expected: &'static str,
    value: Lookup<T>,
}

impl<T> OptionVisitor<'_, T> {
    /// Get the raw lookup result for this option
    #[inline]
    pub fn lookup(self) -> Lookup<T> { self.value }

    /// Extract the option value, returning `None` if it was not present
    ///
    /// # Errors
    /// This method returns an error if the option held a value of another
    /// type.
    pub fn optional(self) -> Result<Option<T>> {
        match self.value {
            Lookup::Found(v) => Ok(Some(v)),
            Lookup::Mismatch(t) => Err(Error::BadOptionValueType(
                self.name.into(),
                self.expected,
                t,
            )),
            Lookup::Absent => Ok(None),
        }
    }

    /// Extract the option value
    ///
    /// # Errors
    /// This method returns an error if the option was not present or held a
    /// value of another type.
    pub fn required(self) -> Result<T> {
        let name = self.name;
        self.optional()?
            .ok_or_else(|| Error::MissingOption(name.into()))
    }
}

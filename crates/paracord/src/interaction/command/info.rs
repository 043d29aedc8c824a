use serenity::{builder::CreateCommand, model::application::CommandType};

use super::{Arg, ArgBuilder, TryFromError};

/// Metadata for a chat input application command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub(super) name: String,
    pub(super) desc: String,
    pub(super) args: Args,
}

impl CommandInfo {
    /// Construct a new description of a chat input command
    #[inline]
    pub fn slash(name: impl Into<String>, desc: impl Into<String>, args: Args) -> Self {
        let name = name.into();
        let desc = desc.into();
        Self { name, desc, args }
    }

    /// Construct a new description of a chat input command using the given
    /// closure to build the parameter data
    ///
    /// # Errors
    /// This method returns an error if invoking the closure results in an
    /// [`ArgBuilder`] with an invalid state.
    #[inline]
    pub fn build_slash(
        name: impl Into<String>,
        desc: impl Into<String>,
        f: impl FnOnce(ArgBuilder) -> ArgBuilder,
    ) -> Result<Self, TryFromError> {
        Ok(Self::slash(name, desc, f(ArgBuilder::default()).build()?))
    }

    /// Get the unique, non-localized name of this command
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str { &self.name }
}

impl From<CommandInfo> for CreateCommand {
    fn from(value: CommandInfo) -> Self {
        let CommandInfo {
            name,
            desc,
            args: Args(args),
        } = value;

        Self::new(name)
            .kind(CommandType::ChatInput)
            .description(desc)
            .set_options(
                args.into_iter()
                    .map(|(name, arg)| arg.build(name))
                    .collect(),
            )
    }
}

/// Metadata for chat input command parameters, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(pub(super) Vec<(String, Arg)>);

#[cfg(test)]
mod tests {
    use serenity::{builder::CreateCommand, model::channel::ChannelType};

    use super::CommandInfo;

    #[test]
    fn builds_chat_input_command() {
        let info = CommandInfo::build_slash("pick", "Pick something", |a| {
            a.channel("channel", "Where", true, [ChannelType::Voice])
                .string_choice("thing", "What", true, [
                    ("One", "one"),
                    ("Two", "two"),
                    ("Three", "three"),
                    ("Four", "four"),
                ])
        })
        .unwrap();

        assert_eq!(info.name(), "pick");

        let json = serde_json::to_value(CreateCommand::from(info)).unwrap();
        assert_eq!(json["name"], "pick");
        assert_eq!(json["description"], "Pick something");
        assert_eq!(json["type"], 1);

        let opts = json["options"].as_array().unwrap();
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0]["name"], "channel");
        assert_eq!(opts[0]["type"], 7);
        assert_eq!(opts[0]["required"], true);
        assert_eq!(opts[0]["channel_types"], serde_json::json!([2]));
        assert_eq!(opts[1]["name"], "thing");
        assert_eq!(opts[1]["type"], 3);
        assert_eq!(opts[1]["choices"].as_array().unwrap().len(), 4);
        assert_eq!(opts[1]["choices"][2]["value"], "three");
    }

    #[test]
    fn builds_command_without_options() {
        let info = CommandInfo::build_slash("hello", "Say hello", |a| a).unwrap();
        let json = serde_json::to_value(CreateCommand::from(info)).unwrap();

        assert!(json["options"].as_array().map_or(true, Vec::is_empty));
    }
}

use serenity::model::channel::ChannelType;

use super::{Arg, ArgType, Args, Choice, TryFromError};

/// Helper for constructing chat input command parameters
#[derive(Debug, Default)]
pub struct ArgBuilder(ArgBuilderState);

#[derive(Debug, Default)]
enum ArgBuilderState {
    #[default]
    Default,
    Args(Vec<(String, Arg)>),
    Error(&'static str),
}

impl ArgBuilder {
    #[inline]
    fn arg_parts(
        self,
        name: impl Into<String>,
        desc: impl Into<String>,
        required: bool,
        ty: ArgType,
    ) -> Self {
        self.arg(name, Arg::new(desc, required, ty))
    }

    /// Construct a new chat input command signature from this builder
    ///
    /// # Errors
    /// This method returns an error if the builder state is invalid (e.g. if
    /// two parameters share a name or a required parameter follows an optional
    /// one).
    pub fn build(self) -> Result<Args, TryFromError> {
        match self.0 {
            ArgBuilderState::Default => Ok(Args::default()),
            ArgBuilderState::Args(args) => Ok(Args(args)),
            ArgBuilderState::Error(e) => Err(TryFromError(e)),
        }
    }

    /// Add a new parameter to this command
    ///
    /// **NOTE:** The builder state will become invalid if a parameter with the
    /// same name was already added, or if a required parameter is added after
    /// an optional one.
    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, arg: Arg) -> Self {
        let name = name.into();
        match &mut self.0 {
            s @ ArgBuilderState::Default => *s = ArgBuilderState::Args(vec![(name, arg)]),
            ArgBuilderState::Args(v) => {
                if v.iter().any(|(n, _)| *n == name) {
                    self.0 = ArgBuilderState::Error("Duplicate argument name added");
                } else if arg.required && v.last().is_some_and(|(_, a)| !a.required) {
                    self.0 = ArgBuilderState::Error("Required argument added after optional one");
                } else {
                    v.push((name, arg));
                }
            },
            ArgBuilderState::Error(_) => (),
        }

        self
    }

    /// Add a new string parameter to this command
    ///
    /// See [`arg`](Self::arg) for more details.
    #[must_use]
    pub fn string(self, name: impl Into<String>, desc: impl Into<String>, required: bool) -> Self {
        self.arg_parts(name, desc, required, ArgType::String)
    }

    /// Add a new string choice parameter to this command
    ///
    /// See [`arg`](Self::arg) for more details.
    #[must_use]
    pub fn string_choice<C: IntoIterator>(
        self,
        name: impl Into<String>,
        desc: impl Into<String>,
        required: bool,
        choices: C,
    ) -> Self
    where
        C::Item: Into<Choice<String>>,
    {
        let choices: Vec<_> = choices.into_iter().map(Into::into).collect();

        if choices.is_empty() {
            return Self(ArgBuilderState::Error("String choice argument has no choices"));
        }

        self.arg_parts(name, desc, required, ArgType::StringChoice(choices))
    }

    /// Add a new integer parameter to this command
    ///
    /// See [`arg`](Self::arg) for more details.
    #[must_use]
    pub fn int(self, name: impl Into<String>, desc: impl Into<String>, required: bool) -> Self {
        self.arg_parts(name, desc, required, ArgType::Int)
    }

    /// Add a new Boolean parameter to this command
    ///
    /// See [`arg`](Self::arg) for more details.
    #[must_use]
    pub fn bool(self, name: impl Into<String>, desc: impl Into<String>, required: bool) -> Self {
        self.arg_parts(name, desc, required, ArgType::Bool)
    }

    /// Add a new user handle parameter to this command
    ///
    /// See [`arg`](Self::arg) for more details.
    #[must_use]
    pub fn user(self, name: impl Into<String>, desc: impl Into<String>, required: bool) -> Self {
        self.arg_parts(name, desc, required, ArgType::User)
    }

    /// Add a new channel handle parameter to this command
    ///
    /// See [`arg`](Self::arg) for more details.
    #[must_use]
    pub fn channel(
        self,
        name: impl Into<String>,
        desc: impl Into<String>,
        required: bool,
        types: impl IntoIterator<Item = ChannelType>,
    ) -> Self {
        let types = types.into_iter().collect();
        self.arg_parts(name, desc, required, ArgType::Channel(types))
    }

    /// Add a new role handle parameter to this command
    ///
    /// See [`arg`](Self::arg) for more details.
    #[must_use]
    pub fn role(self, name: impl Into<String>, desc: impl Into<String>, required: bool) -> Self {
        self.arg_parts(name, desc, required, ArgType::Role)
    }
}

//! REST calls used to keep the registered command set in sync

use serenity::{builder::CreateCommand, http::Http};

/// The subset of the Discord REST API needed to register global commands
#[async_trait::async_trait]
pub trait CommandRest: Send + Sync {
    /// List the names of the currently registered global commands
    async fn global_command_names(&self) -> Result<Vec<String>, serenity::Error>;

    /// Replace every registered global command with the given set, returning
    /// the number of commands now registered
    async fn overwrite_global_commands(
        &self,
        commands: Vec<CreateCommand>,
    ) -> Result<usize, serenity::Error>;
}

#[async_trait::async_trait]
impl CommandRest for Http {
    async fn global_command_names(&self) -> Result<Vec<String>, serenity::Error> {
        Ok(self
            .get_global_commands()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    async fn overwrite_global_commands(
        &self,
        commands: Vec<CreateCommand>,
    ) -> Result<usize, serenity::Error> {
        self.create_global_commands(&commands)
            .await
            .map(|v| v.len())
    }
}

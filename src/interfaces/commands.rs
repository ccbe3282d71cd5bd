use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::usecases::RegistrationOutcome;
use crate::application::AppContext;
use crate::domain::Notification;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    Notify,
}

#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub args: &'static [&'static str],
    pub kind: CommandKind,
}

pub const COMMANDS: &[CommandSpec] = &[CommandSpec {
    name: "notify",
    args: &["collection", "floor_price"],
    kind: CommandKind::Notify,
}];

pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// Turns chat text into core calls and builds the reply.
pub struct CommandRouter {
    ctx: Arc<AppContext>,
    prefix: String,
}

impl CommandRouter {
    pub fn new(ctx: Arc<AppContext>, prefix: impl Into<String>) -> Self {
        Self {
            ctx,
            prefix: prefix.into(),
        }
    }

    /// `None` means the text is not addressed to us and gets no reply.
    pub async fn route(&self, user_id: &str, content: &str) -> Option<Notification> {
        if !content.starts_with(self.prefix.as_str()) {
            return None;
        }
        // the command name must follow the prefix directly: "--notify", not "-- notify"
        let mut parts = content.split_whitespace();
        let name = parts.next()?.strip_prefix(self.prefix.as_str())?;
        let spec = find_command(name)?;
        let args: Vec<&str> = parts.collect();

        if args.len() < spec.args.len() {
            debug!(user_id, command = name, given = args.len(), "not enough arguments");
            return Some(Notification::usage_error(
                &self.ctx.theme,
                &self.prefix,
                spec.name,
                spec.args,
            ));
        }

        let reply = match spec.kind {
            CommandKind::Notify => self.notify(user_id, args[0], args[1]).await,
        };
        Some(reply)
    }

    async fn notify(&self, user_id: &str, collection: &str, floor_price: &str) -> Notification {
        let theme = &self.ctx.theme;
        match self
            .ctx
            .register()
            .execute(user_id, collection, floor_price)
            .await
        {
            Ok(RegistrationOutcome::Registered(watch)) => Notification::registered(theme, &watch),
            Ok(RegistrationOutcome::AlreadySatisfied {
                collection,
                current_price,
                target_price,
            }) => Notification::already_satisfied(
                theme,
                &collection,
                current_price,
                target_price.value(),
            ),
            Err(e) => {
                warn!(user_id, collection, error = %e, "notify command failed");
                Notification::command_failed(theme, e.to_string())
            }
        }
    }
}

use crate::application::errors::CommandError;
use crate::domain::entities::{Command, CommandRegistry, Content, Message};

/// Service for managing and executing built-in commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        self.registry.register(command);
    }

    pub fn register_defaults(&mut self) {
        // Help command
        self.register(Command::new("help")
            .with_description("Show help message")
            .with_usage("/help [command]"));

        // Version command
        self.register(Command::new("version")
            .with_description("Show bot version")
            .with_handler(|_| {
                Ok(format!("glyph-bot v{}", env!("CARGO_PKG_VERSION")))
            }));
    }

    pub fn handle(&self, message: &Message) -> Result<Option<String>, CommandError> {
        let Content::Command { name, args } = &message.content else {
            return Ok(None);
        };

        // Find command (without prefix)
        let cmd = self.registry.find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        if cmd.name == "help" {
            return Ok(Some(self.get_help(args.first().map(|s| s.as_str()))));
        }

        // Execute handler
        if let Some(handler) = &cmd.handler {
            Ok(Some(handler(message.clone())?))
        } else {
            Ok(Some(format!("Command {} not implemented", cmd.name)))
        }
    }

    pub fn get_help(&self, command: Option<&str>) -> String {
        if let Some(name) = command {
            if let Some(cmd) = self.registry.find(name) {
                let mut help = format!("/{} - {}", cmd.name, cmd.description.as_deref().unwrap_or("No description"));
                if let Some(usage) = &cmd.usage {
                    help.push_str(&format!("\nUsage: {}", usage));
                }
                return help;
            }
            return format!("Command /{} not found", name);
        }

        // List all commands
        let mut help = "Available commands:\n".to_string();
        let mut lines: Vec<String> = self
            .registry
            .all()
            .map(|cmd| format!("  /{} - {}", cmd.name, cmd.description.as_deref().unwrap_or("")))
            .collect();
        lines.sort();
        help.push_str(&lines.join("\n"));
        help
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_command_errors() {
        let mut service = CommandService::new("/");
        service.register_defaults();
        let msg = Message::from_command("chat", "bogus", vec![]);
        assert!(matches!(service.handle(&msg), Err(CommandError::NotFound(_))));
    }

    #[test]
    fn version_reports_crate_version() {
        let mut service = CommandService::new("/");
        service.register_defaults();
        let msg = Message::from_command("chat", "version", vec![]);
        let reply = service.handle(&msg).unwrap().unwrap();
        assert!(reply.starts_with("glyph-bot v"));
    }

    #[test]
    fn help_lists_registered_commands() {
        let mut service = CommandService::new("/");
        service.register_defaults();
        let help = service.get_help(None);
        assert!(help.contains("/help"));
        assert!(help.contains("/version"));
    }
}

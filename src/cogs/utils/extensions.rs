//! Extension management cog
//!
//! Command surface over the lifecycle manager: load, unload, reload and
//! list extensions at runtime. Explicit unload targets are checked against
//! the denylist before anything else happens; a hit aborts the whole
//! request with no units touched.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::errors::{CommandError, SetupError};
use crate::application::services::{Action, LifecycleManager, Wildcard};
use crate::cogs::{Cog, CogContext, MANAGER_UNIT};
use crate::domain::entities::{Embed, Message, Reply};

const USAGE: &str = "Load, unload, reload, and list extensions.\n\
    \n\
    Usage:\n\
    /extensions load <extension...|*|**>\n\
    /extensions unload <extension...|*|**>\n\
    /extensions reload <extension...|*|**>\n\
    /extensions list\n\
    \n\
    `*` targets the extensions relevant to the action; `**` targets every known extension.";

/// Extension management commands.
pub struct ExtensionsCog {
    manager: Arc<LifecycleManager>,
}

pub fn setup(ctx: &Arc<CogContext>) -> Result<Arc<dyn Cog>, SetupError> {
    let manager = ctx
        .manager()
        .ok_or_else(|| SetupError::new("ConfigError", "lifecycle manager is not initialised"))?;
    Ok(Arc::new(ExtensionsCog { manager }))
}

impl ExtensionsCog {
    async fn manage(&self, action: Action, args: &[String]) -> Result<Reply, CommandError> {
        if args.is_empty() {
            return Ok(Reply::Text(USAGE.to_string()));
        }

        // Resolve names first so bad input aborts before any action runs.
        // `**` wins over `*` when both appear.
        let mut wildcard: Option<Wildcard> = None;
        let mut explicit: Vec<String> = Vec::new();
        for arg in args {
            match Wildcard::parse(arg) {
                Some(Wildcard::All) => wildcard = Some(Wildcard::All),
                Some(Wildcard::Relevant) => {
                    if wildcard.is_none() {
                        wildcard = Some(Wildcard::Relevant);
                    }
                }
                None => explicit.push(self.manager.resolve_name(arg)?),
            }
        }

        // Denylist check precedes wildcard expansion.
        if action == Action::Unload {
            let blocked = self.manager.blocked_unload_targets(&explicit);
            if !blocked.is_empty() {
                return Ok(Reply::Embed(Embed::error(format!(
                    "The following extension(s) may not be unloaded:```\n{}```",
                    blocked.join("\n")
                ))));
            }
        }

        let units: Vec<String> = match wildcard {
            Some(wildcard) => self
                .manager
                .resolve_wildcard_targets(wildcard, action, &explicit)
                .into_iter()
                .collect(),
            None => {
                let mut seen = BTreeSet::new();
                explicit
                    .into_iter()
                    .filter(|unit| seen.insert(unit.clone()))
                    .collect()
            }
        };

        if units.is_empty() {
            return Ok(Reply::Text(format!("No extensions to {}.", action.verb())));
        }

        let report = self.manager.apply_batch(action, &units).await;
        let embed = if report.failed() {
            Embed::error(report.message)
        } else {
            Embed::confirmation(report.message)
        };
        Ok(Reply::Embed(embed))
    }

    /// All known extensions with their loaded status, grouped by category.
    fn list(&self) -> Reply {
        let categories = self.manager.group_by_category();

        let lines: Vec<String> = categories
            .iter()
            .map(|(category, entries)| {
                format!("**{}**\n{}\n", title_case(category), entries.join("\n"))
            })
            .collect();

        debug!("returning a list of all extensions");
        Reply::Embed(
            Embed::info()
                .with_title(format!("Extensions ({})", self.manager.known().len()))
                .with_description(lines.join("\n")),
        )
    }
}

#[async_trait]
impl Cog for ExtensionsCog {
    fn unit_id(&self) -> &'static str {
        MANAGER_UNIT
    }

    fn commands(&self) -> &'static [&'static str] {
        &["extensions", "ext", "exts", "cog", "cogs"]
    }

    async fn handle(&self, message: &Message) -> Result<Reply, CommandError> {
        let args = message.args();
        let Some(subcommand) = args.first() else {
            return Ok(Reply::Text(USAGE.to_string()));
        };

        let rest = &args[1..];
        match subcommand.to_lowercase().as_str() {
            "load" | "l" => self.manage(Action::Load, rest).await,
            "unload" | "ul" => self.manage(Action::Unload, rest).await,
            "reload" | "r" => self.manage(Action::Reload, rest).await,
            "list" | "all" => Ok(self.list()),
            _ => Ok(Reply::Text(USAGE.to_string())),
        }
    }
}

/// Title-case a category name for display: `"emojis"` becomes `"Emojis"`,
/// underscores become spaces.
fn title_case(s: &str) -> String {
    s.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_words_and_underscores() {
        assert_eq!(title_case("emojis"), "Emojis");
        assert_eq!(title_case("server_icons"), "Server Icons");
        assert_eq!(title_case("a - b"), "A - B");
    }
}

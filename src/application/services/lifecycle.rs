//! Extension lifecycle management
//!
//! Applies load/unload/reload actions to extension units through the
//! [`ExtensionHost`] seam, one unit at a time or in batch, and summarizes
//! the results. A single unit's failure never aborts the rest of a batch;
//! the only eager abort is the denylist check on explicit unload targets,
//! which runs before any unit is touched.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

use crate::application::errors::{CommandError, HostError};
use crate::domain::traits::ExtensionHost;

/// Marker for a loaded unit in status listings.
pub const STATUS_LOADED: &str = "\u{25cf}";
/// Marker for an unloaded unit in status listings.
pub const STATUS_UNLOADED: &str = "\u{25cb}";

/// Bucket for units whose path carries no category segment.
pub const UNCATEGORISED: &str = "uncategorised";

/// A lifecycle action, dispatched to the corresponding host operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Unload,
    Reload,
}

impl Action {
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Load => "load",
            Action::Unload => "unload",
            Action::Reload => "reload",
        }
    }

    pub fn verbed(&self) -> String {
        format!("{}ed", self.verb())
    }
}

/// Scope-expansion token for batch commands.
///
/// `*` selects the units currently relevant to the action; `**` widens to
/// the full known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wildcard {
    Relevant,
    All,
}

impl Wildcard {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "*" => Some(Wildcard::Relevant),
            "**" => Some(Wildcard::All),
            _ => None,
        }
    }
}

/// Per-unit result of applying an action.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub unit: String,
    pub message: String,
    pub error: Option<String>,
}

impl ActionOutcome {
    fn success(unit: &str, message: String) -> Self {
        Self {
            unit: unit.to_string(),
            message,
            error: None,
        }
    }

    fn failure(unit: &str, message: String, error: String) -> Self {
        Self {
            unit: unit.to_string(),
            message,
            error: Some(error),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate result of one batch invocation.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub total: usize,
    pub failures: Vec<(String, String)>,
    pub message: String,
}

impl BatchReport {
    fn from_single(outcome: ActionOutcome) -> Self {
        let failures = match &outcome.error {
            Some(error) => vec![(outcome.unit.clone(), error.clone())],
            None => Vec::new(),
        };
        Self {
            total: 1,
            failures,
            message: outcome.message,
        }
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn success_count(&self) -> usize {
        self.total - self.failures.len()
    }

    pub fn failed(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Applies lifecycle actions to extension units and reports the results.
///
/// The known-unit set and the unload denylist are fixed at construction.
/// Loaded state is owned by the host and read fresh per invocation.
pub struct LifecycleManager {
    host: Arc<dyn ExtensionHost>,
    known: BTreeSet<String>,
    denylist: BTreeSet<String>,
    root_depth: usize,
}

impl LifecycleManager {
    pub fn new(
        host: Arc<dyn ExtensionHost>,
        known: BTreeSet<String>,
        denylist: BTreeSet<String>,
        root_depth: usize,
    ) -> Self {
        Self {
            host,
            known,
            denylist,
            root_depth,
        }
    }

    pub fn known(&self) -> &BTreeSet<String> {
        &self.known
    }

    pub fn denylist(&self) -> &BTreeSet<String> {
        &self.denylist
    }

    /// Apply an action to a single unit and return its outcome.
    ///
    /// "Already in target state" resolves to a non-fatal success message.
    /// Reloading a unit that is not loaded falls back to a fresh load, once.
    /// Any other host failure is captured; nothing propagates to the caller.
    pub async fn apply_single(&self, action: Action, unit: &str) -> ActionOutcome {
        let mut action = action;
        loop {
            let result = match action {
                Action::Load => self.host.load(unit).await,
                Action::Unload => self.host.unload(unit).await,
                Action::Reload => self.host.reload(unit).await,
            };
            let verb = action.verb();

            return match result {
                Ok(()) => {
                    debug!("successfully {} extension {}", action.verbed(), unit);
                    ActionOutcome::success(
                        unit,
                        format!("Extension successfully {}: `{}`.", action.verbed(), unit),
                    )
                }
                Err(HostError::AlreadyLoaded(_)) | Err(HostError::NotLoaded(_)) => {
                    if action == Action::Reload {
                        // A reload means "ensure loaded with fresh code"; with
                        // nothing loaded, a fresh load satisfies that.
                        action = Action::Load;
                        continue;
                    }
                    debug!("extension {} is already {}", unit, action.verbed());
                    ActionOutcome::success(
                        unit,
                        format!("Extension `{}` is already {}.", unit, action.verbed()),
                    )
                }
                Err(err) => {
                    let error = err.failure_text();
                    debug!("extension {} failed to {}: {}", unit, verb, error);
                    ActionOutcome::failure(
                        unit,
                        format!("Failed to {} extension `{}`:\n```\n{}```", verb, unit, error),
                        error,
                    )
                }
            };
        }
    }

    /// Apply an action to every unit in input order and aggregate the results.
    ///
    /// A single-unit batch defers to [`apply_single`](Self::apply_single) so
    /// its message wording is preserved. Failures never short-circuit the
    /// remaining units.
    pub async fn apply_batch(&self, action: Action, units: &[String]) -> BatchReport {
        if units.len() == 1 {
            let outcome = self.apply_single(action, &units[0]).await;
            return BatchReport::from_single(outcome);
        }

        let mut failures = Vec::new();
        for unit in units {
            let outcome = self.apply_single(action, unit).await;
            if let Some(error) = outcome.error {
                failures.push((outcome.unit, error));
            }
        }

        let mut message = format!(
            "{} / {} extensions {}.",
            units.len() - failures.len(),
            units.len(),
            action.verbed()
        );
        if !failures.is_empty() {
            let listed = failures
                .iter()
                .map(|(unit, error)| format!("{}\n    {}", unit, error))
                .collect::<Vec<_>>()
                .join("\n");
            message.push_str(&format!("\n\n**Failures:**```\n{}```", listed));
        }

        debug!("batch {} extensions", action.verbed());
        BatchReport {
            total: units.len(),
            failures,
            message,
        }
    }

    /// Expand a wildcard token into concrete unit ids for an action.
    ///
    /// Reads the host's loaded set at call time; results are not cached.
    /// Explicitly named units alongside a `*` reload are always kept, even
    /// when currently unloaded.
    pub fn resolve_wildcard_targets(
        &self,
        wildcard: Wildcard,
        action: Action,
        explicit: &[String],
    ) -> BTreeSet<String> {
        let loaded = self.host.loaded();
        match (action, wildcard) {
            (Action::Load, _) => self.known.difference(&loaded).cloned().collect(),
            (Action::Unload, _) => loaded.difference(&self.denylist).cloned().collect(),
            (Action::Reload, Wildcard::Relevant) => {
                loaded.into_iter().chain(explicit.iter().cloned()).collect()
            }
            (Action::Reload, Wildcard::All) => self.known.clone(),
        }
    }

    /// Explicit unload targets intersecting the denylist, in sorted order.
    ///
    /// Checked before wildcard expansion; a non-empty result must abort the
    /// whole request with no units touched.
    pub fn blocked_unload_targets(&self, explicit: &[String]) -> Vec<String> {
        self.denylist
            .iter()
            .filter(|unit| explicit.contains(unit))
            .cloned()
            .collect()
    }

    /// Group every known unit into a display category with a status marker.
    ///
    /// The category is derived from the unit's dotted path after stripping
    /// the fixed root depth: more than one remaining segment means all but
    /// the last, joined with `" - "`; otherwise the unit is uncategorised.
    /// Entries are sorted within each category; the map itself is ordered by
    /// category name. Every known unit appears exactly once.
    pub fn group_by_category(&self) -> BTreeMap<String, Vec<String>> {
        let loaded = self.host.loaded();
        let mut categories: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for unit in &self.known {
            let status = if loaded.contains(unit) {
                STATUS_LOADED
            } else {
                STATUS_UNLOADED
            };

            let path: Vec<&str> = unit.split('.').collect();
            let category = if path.len() > self.root_depth + 1 {
                path[self.root_depth..path.len() - 1].join(" - ")
            } else {
                UNCATEGORISED.to_string()
            };
            let short_name = path.last().copied().unwrap_or(unit.as_str());

            categories
                .entry(category)
                .or_default()
                .push(format!("{}  {}", status, short_name));
        }

        for entries in categories.values_mut() {
            entries.sort();
        }
        categories
    }

    /// Resolve a user-supplied name to a known unit id.
    ///
    /// Accepts the full dotted id or any unambiguous trailing-segment
    /// suffix, e.g. `twemoji` or `emojis.twemoji`.
    pub fn resolve_name(&self, name: &str) -> Result<String, CommandError> {
        if self.known.contains(name) {
            return Ok(name.to_string());
        }

        let lower = name.to_lowercase();
        let suffix = format!(".{}", lower);
        let matches: Vec<&String> = self
            .known
            .iter()
            .filter(|unit| unit.to_lowercase().ends_with(&suffix))
            .collect();

        match matches.as_slice() {
            [unit] => Ok((*unit).clone()),
            [] => Err(CommandError::InvalidArgs(format!(
                "Could not identify extension `{}`.",
                name
            ))),
            _ => Err(CommandError::InvalidArgs(format!(
                "`{}` is ambiguous: {}",
                name,
                matches
                    .iter()
                    .map(|u| u.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

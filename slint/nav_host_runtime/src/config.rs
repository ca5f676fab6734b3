//! Host settings read from `NAVSTACK_*` environment variables.

use crate::holder::DEFAULT_PENDING_BATCH_CAP;

pub const DEFAULT_SID: &str = "S1";
pub const DEFAULT_OUTBOUND_QUEUE_CAP: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub sid: String,
    pub outbound_queue_cap: usize,
    pub pending_batch_cap: usize,
    /// Pushes beyond this depth are refused by the stack host.
    pub max_stack_depth: Option<usize>,
    /// View names the factory can build. Empty accepts any name.
    pub views: Vec<String>,
    /// External unit targets that resolve to a handler.
    pub units: Vec<String>,
    pub continue_on_error: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            sid: DEFAULT_SID.to_string(),
            outbound_queue_cap: DEFAULT_OUTBOUND_QUEUE_CAP,
            pending_batch_cap: DEFAULT_PENDING_BATCH_CAP,
            max_stack_depth: None,
            views: Vec::new(),
            units: Vec::new(),
            continue_on_error: false,
        }
    }
}

impl HostConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. Unset or malformed
    /// values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            sid: lookup("NAVSTACK_SID")
                .filter(|sid| !sid.is_empty())
                .unwrap_or(defaults.sid),
            outbound_queue_cap: parse_positive(lookup("NAVSTACK_OUTBOUND_QUEUE_CAP"))
                .unwrap_or(defaults.outbound_queue_cap),
            pending_batch_cap: parse_positive(lookup("NAVSTACK_PENDING_BATCH_CAP"))
                .unwrap_or(defaults.pending_batch_cap),
            max_stack_depth: parse_positive(lookup("NAVSTACK_MAX_STACK_DEPTH")),
            views: parse_list(lookup("NAVSTACK_VIEWS")),
            units: parse_list(lookup("NAVSTACK_UNITS")),
            continue_on_error: lookup("NAVSTACK_CONTINUE_ON_ERROR")
                .map(|raw| parse_flag(&raw))
                .unwrap_or(defaults.continue_on_error),
        }
    }
}

fn parse_positive(raw: Option<String>) -> Option<usize> {
    raw.and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}

fn parse_list(raw: Option<String>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> HostConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        HostConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config_from(&[]), HostConfig::default());
    }

    #[test]
    fn reads_every_setting() {
        let config = config_from(&[
            ("NAVSTACK_SID", "S9"),
            ("NAVSTACK_OUTBOUND_QUEUE_CAP", "8"),
            ("NAVSTACK_PENDING_BATCH_CAP", "4"),
            ("NAVSTACK_MAX_STACK_DEPTH", "12"),
            ("NAVSTACK_VIEWS", "home, details,,settings "),
            ("NAVSTACK_UNITS", "browser"),
            ("NAVSTACK_CONTINUE_ON_ERROR", "TRUE"),
        ]);

        assert_eq!(config.sid, "S9");
        assert_eq!(config.outbound_queue_cap, 8);
        assert_eq!(config.pending_batch_cap, 4);
        assert_eq!(config.max_stack_depth, Some(12));
        assert_eq!(config.views, ["home", "details", "settings"]);
        assert_eq!(config.units, ["browser"]);
        assert!(config.continue_on_error);
    }

    #[test]
    fn zero_and_garbage_capacities_fall_back() {
        let config = config_from(&[
            ("NAVSTACK_OUTBOUND_QUEUE_CAP", "0"),
            ("NAVSTACK_PENDING_BATCH_CAP", "lots"),
            ("NAVSTACK_MAX_STACK_DEPTH", "-3"),
            ("NAVSTACK_CONTINUE_ON_ERROR", "maybe"),
        ]);

        assert_eq!(config.outbound_queue_cap, DEFAULT_OUTBOUND_QUEUE_CAP);
        assert_eq!(config.pending_batch_cap, DEFAULT_PENDING_BATCH_CAP);
        assert_eq!(config.max_stack_depth, None);
        assert!(!config.continue_on_error);
    }
}

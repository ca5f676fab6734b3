use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A navigable destination.
///
/// `key` names the entry in the host stack and is what `BackTo` matches on, so
/// it must stay the same every time the same logical destination is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub key: String,
    pub destination: Destination,
}

/// How a screen is shown: pushed in place, or handed off as a separate unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    View(ViewSpec),
    External(LaunchSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
    pub name: String,
    #[serde(default)]
    pub params: Value,
}

/// Description of an external unit (a new top-level window, another process).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchSpec {
    pub target: String,
    #[serde(default)]
    pub params: Value,
}

impl Screen {
    pub fn view(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            destination: Destination::View(ViewSpec {
                name: name.into(),
                params: Value::Null,
            }),
        }
    }

    pub fn external(key: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            destination: Destination::External(LaunchSpec {
                target: target.into(),
                params: Value::Null,
            }),
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        match &mut self.destination {
            Destination::View(spec) => spec.params = params,
            Destination::External(spec) => spec.params = params,
        }
        self
    }

    pub fn launch_spec(&self) -> Option<&LaunchSpec> {
        match &self.destination {
            Destination::External(spec) => Some(spec),
            Destination::View(_) => None,
        }
    }
}

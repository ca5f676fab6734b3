use crate::screen::Screen;
use serde::{Deserialize, Serialize};

/// A single navigation intent. Batches of these are applied in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum Command {
    /// Open `screen` on top of the current one.
    Forward { screen: Screen },
    /// Close the current screen, or leave the flow when already at the root.
    Back,
    /// Swap the current screen for `screen`.
    Replace { screen: Screen },
    /// Return to `screen`, or to the root when `None`.
    BackTo {
        #[serde(default)]
        screen: Option<Screen>,
    },
}

impl Command {
    pub fn forward(screen: Screen) -> Self {
        Command::Forward { screen }
    }

    pub fn replace(screen: Screen) -> Self {
        Command::Replace { screen }
    }

    pub fn back_to(screen: Screen) -> Self {
        Command::BackTo {
            screen: Some(screen),
        }
    }

    pub fn back_to_root() -> Self {
        Command::BackTo { screen: None }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Forward { .. } => "forward",
            Command::Back => "back",
            Command::Replace { .. } => "replace",
            Command::BackTo { .. } => "back_to",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_mixed_batch_in_order() {
        let batch: Vec<Command> = serde_json::from_value(json!([
            {"t": "forward", "screen": {"key": "a", "destination": {"kind": "view", "name": "a"}}},
            {"t": "back"},
            {"t": "back_to"},
            {"t": "back_to", "screen": {"key": "a", "destination": {"kind": "view", "name": "a"}}}
        ]))
        .expect("decode batch");

        let names: Vec<_> = batch.iter().map(Command::name).collect();
        assert_eq!(names, ["forward", "back", "back_to", "back_to"]);
        assert_eq!(batch[2], Command::back_to_root());
        assert_eq!(batch[3], Command::back_to(Screen::view("a", "a")));
    }

    #[test]
    fn encodes_back_as_bare_tag() {
        let value = serde_json::to_value(Command::Back).expect("encode back");
        assert_eq!(value, json!({"t": "back"}));
    }
}

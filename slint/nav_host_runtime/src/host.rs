//! What the navigator needs from the host.

use crate::error::HostError;
use crate::screen::{LaunchSpec, Screen};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A layered stack of named views owned by the host toolkit.
///
/// Mutations may be staged by the host and only become visible to
/// [`StackHost::named_entries`] after [`StackHost::flush_pending`].
pub trait StackHost {
    type View;

    fn flush_pending(&mut self) -> Result<(), HostError>;

    /// Names of every entry currently in the stack, bottom to top.
    fn named_entries(&self) -> Vec<String>;

    fn push_named(
        &mut self,
        key: &str,
        view: Self::View,
        style: &TransitionStyle,
    ) -> Result<(), HostError>;

    fn pop_top(&mut self) -> Result<(), HostError>;

    /// Pop down to the topmost entry named `key`, removing it too when
    /// `inclusive` is set.
    fn pop_to_marker(&mut self, key: &str, inclusive: bool) -> Result<(), HostError>;

    fn pop_all(&mut self) -> Result<(), HostError>;
}

/// Launches and terminates units outside the in-place stack.
pub trait UnitHost {
    type Handler;

    fn resolve_handler(&self, spec: &LaunchSpec) -> Option<Self::Handler>;

    fn launch(
        &mut self,
        handler: Self::Handler,
        spec: &LaunchSpec,
        options: Option<&LaunchOptions>,
    ) -> Result<(), HostError>;

    /// Close the unit hosting the stack, ending the navigation flow.
    fn terminate_current_unit(&mut self) -> Result<(), HostError>;
}

pub trait ViewFactory<V> {
    fn create_view(&mut self, screen: &Screen) -> Option<V>;
}

impl<V, F> ViewFactory<V> for F
where
    F: FnMut(&Screen) -> Option<V>,
{
    fn create_view(&mut self, screen: &Screen) -> Option<V> {
        self(screen)
    }
}

/// Host styling applied to a push (animations, shared elements, ordering).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionStyle {
    #[serde(default)]
    pub enter: Option<String>,
    #[serde(default)]
    pub exit: Option<String>,
    #[serde(default)]
    pub shared_elements: Vec<(String, String)>,
    #[serde(default)]
    pub reordering_allowed: bool,
}

/// Opaque options handed to the unit host with a launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchOptions(pub Value);

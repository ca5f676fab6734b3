//! Host-specific decisions the navigator defers to.
//!
//! Every method has a default matching the stock behavior; a host binding
//! overrides only what it needs.

use crate::command::Command;
use crate::error::NavError;
use crate::host::{LaunchOptions, TransitionStyle};
use crate::screen::{LaunchSpec, Screen};

/// What to do when `BackTo` names a screen that is not in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackToFallback {
    Root,
    Stay,
}

/// What to do on `Back` with nothing left to pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootExit {
    TerminateUnit,
    Ignore,
}

/// Whether a batch keeps going after one of its commands failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    Abort,
    Continue,
}

pub trait NavigationPolicy {
    /// Styling for pushing `next`. `current` is the entry `next` will sit on;
    /// for `Replace` that is the screen below the replaced one.
    fn transition_style(
        &self,
        _command: &Command,
        _current: Option<&str>,
        _next: &Screen,
    ) -> TransitionStyle {
        TransitionStyle::default()
    }

    fn launch_options(&self, _command: &Command, _spec: &LaunchSpec) -> Option<LaunchOptions> {
        None
    }

    /// No unit host can open `spec`. The screen is not shown.
    fn unresolved_external(&self, _screen: &Screen, _spec: &LaunchSpec) {}

    /// The view factory returned nothing for `screen`. The command fails
    /// after this returns.
    fn view_creation_failed(&self, _screen: &Screen) {}

    fn unresolved_back_to(&self, _screen: &Screen) -> BackToFallback {
        BackToFallback::Root
    }

    fn root_exit(&self) -> RootExit {
        RootExit::TerminateUnit
    }

    fn command_failed(&self, _command: &Command, _error: &NavError) -> ErrorAction {
        ErrorAction::Abort
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl NavigationPolicy for DefaultPolicy {}

//! Applies command batches to a host stack.

use crate::command::Command;
use crate::error::{BatchError, HostError, NavError};
use crate::holder::CommandSink;
use crate::host::{StackHost, UnitHost, ViewFactory};
use crate::mirror::StackMirror;
use crate::policy::{BackToFallback, DefaultPolicy, ErrorAction, NavigationPolicy, RootExit};
use crate::screen::{Destination, LaunchSpec, Screen};
use tracing::{debug, trace, warn};

/// Command executor for a single host stack.
///
/// Owns the stack mirror. Each call to [`Navigator::apply_commands`] starts by
/// flushing the host and re-reading its entries, so changes made to the stack
/// outside the navigator (a system back press, for instance) are picked up
/// before the batch runs.
pub struct Navigator<S, U, F, P = DefaultPolicy> {
    stack: S,
    units: U,
    views: F,
    policy: P,
    mirror: StackMirror,
}

impl<S, U, F> Navigator<S, U, F, DefaultPolicy>
where
    S: StackHost,
    U: UnitHost,
    F: ViewFactory<S::View>,
{
    pub fn new(stack: S, units: U, views: F) -> Self {
        Self {
            stack,
            units,
            views,
            policy: DefaultPolicy,
            mirror: StackMirror::default(),
        }
    }
}

impl<S, U, F, P> Navigator<S, U, F, P>
where
    S: StackHost,
    U: UnitHost,
    F: ViewFactory<S::View>,
    P: NavigationPolicy,
{
    pub fn with_policy<Q: NavigationPolicy>(self, policy: Q) -> Navigator<S, U, F, Q> {
        Navigator {
            stack: self.stack,
            units: self.units,
            views: self.views,
            policy,
            mirror: self.mirror,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn unit_host(&self) -> &U {
        &self.units
    }

    /// Apply `batch` in order.
    ///
    /// Stops at the first failing command unless the policy asks to continue.
    /// Host changes made by earlier commands are kept either way.
    pub fn apply_commands(&mut self, batch: &[Command]) -> Result<(), BatchError> {
        self.sync_mirror().map_err(BatchError::Sync)?;

        for (index, command) in batch.iter().enumerate() {
            trace!(index, command = command.name(), "applying navigation command");

            let Err(err) = self.apply_command(command) else {
                continue;
            };

            match self.policy.command_failed(command, &err) {
                ErrorAction::Abort => {
                    debug!(index, error = %err, "aborting navigation batch");
                    return Err(BatchError::Command { index, source: err });
                }
                ErrorAction::Continue => {
                    warn!(index, error = %err, "navigation command failed; continuing batch");
                }
            }
        }

        debug!(
            depth = self.mirror.len(),
            stack = ?self.mirror.keys(),
            "navigation batch applied"
        );
        Ok(())
    }

    fn sync_mirror(&mut self) -> Result<(), HostError> {
        self.stack.flush_pending()?;
        self.mirror.sync_from(self.stack.named_entries());
        Ok(())
    }

    fn apply_command(&mut self, command: &Command) -> Result<(), NavError> {
        match command {
            Command::Forward { screen } => self.forward(command, screen),
            Command::Back => self.back(),
            Command::Replace { screen } => self.replace(command, screen),
            Command::BackTo { screen: None } => self.back_to_root(),
            Command::BackTo {
                screen: Some(screen),
            } => self.back_to(screen),
        }
    }

    fn forward(&mut self, command: &Command, screen: &Screen) -> Result<(), NavError> {
        if let Destination::External(spec) = &screen.destination {
            return self.launch(command, screen, spec);
        }

        let view = self.create_view(screen)?;
        self.push_view(command, screen, view)
    }

    fn back(&mut self) -> Result<(), NavError> {
        if self.mirror.is_empty() {
            return self.exit_root();
        }

        self.stack.pop_top()?;
        self.mirror.pop();
        Ok(())
    }

    fn replace(&mut self, command: &Command, screen: &Screen) -> Result<(), NavError> {
        if let Destination::External(spec) = &screen.destination {
            self.launch(command, screen, spec)?;
            self.units.terminate_current_unit()?;
            return Ok(());
        }

        let view = self.create_view(screen)?;

        if !self.mirror.is_empty() {
            self.stack.pop_top()?;
            self.mirror.pop();
        }

        self.push_view(command, screen, view)
    }

    fn back_to(&mut self, target: &Screen) -> Result<(), NavError> {
        let Some(index) = self.mirror.position(&target.key) else {
            return match self.policy.unresolved_back_to(target) {
                BackToFallback::Root => {
                    debug!(key = %target.key, "back_to target not in stack; returning to root");
                    self.back_to_root()
                }
                BackToFallback::Stay => Ok(()),
            };
        };

        let removed = self.mirror.truncate_above(index)?;
        trace!(key = %target.key, removed, "popping to marker");
        self.stack.pop_to_marker(&target.key, false)?;
        Ok(())
    }

    fn back_to_root(&mut self) -> Result<(), NavError> {
        self.stack.pop_all()?;
        self.mirror.clear();
        Ok(())
    }

    fn exit_root(&mut self) -> Result<(), NavError> {
        match self.policy.root_exit() {
            RootExit::TerminateUnit => {
                debug!("back at root; terminating hosting unit");
                self.units.terminate_current_unit()?;
            }
            RootExit::Ignore => {}
        }
        Ok(())
    }

    fn launch(
        &mut self,
        command: &Command,
        screen: &Screen,
        spec: &LaunchSpec,
    ) -> Result<(), NavError> {
        let Some(handler) = self.units.resolve_handler(spec) else {
            debug!(key = %screen.key, target = %spec.target, "no handler for external unit");
            self.policy.unresolved_external(screen, spec);
            return Ok(());
        };

        let options = self.policy.launch_options(command, spec);
        self.units.launch(handler, spec, options.as_ref())?;
        Ok(())
    }

    fn create_view(&mut self, screen: &Screen) -> Result<S::View, NavError> {
        match self.views.create_view(screen) {
            Some(view) => Ok(view),
            None => {
                self.policy.view_creation_failed(screen);
                Err(NavError::ViewCreation {
                    key: screen.key.clone(),
                })
            }
        }
    }

    fn push_view(
        &mut self,
        command: &Command,
        screen: &Screen,
        view: S::View,
    ) -> Result<(), NavError> {
        let style = self.policy.transition_style(command, self.mirror.top(), screen);
        self.stack.push_named(&screen.key, view, &style)?;
        self.mirror.push(screen.key.clone());
        Ok(())
    }
}

impl<S, U, F, P> CommandSink for Navigator<S, U, F, P>
where
    S: StackHost,
    U: UnitHost,
    F: ViewFactory<S::View>,
    P: NavigationPolicy,
{
    fn apply_commands(&mut self, batch: &[Command]) -> Result<(), BatchError> {
        Navigator::apply_commands(self, batch)
    }
}

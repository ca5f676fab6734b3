//! Unit host and policy that report to the producer over the outbound queue.

use navstack_host_runtime::protocol::error_envelope;
use navstack_host_runtime::{
    Command, ErrorAction, HostEnvelope, HostError, LaunchOptions, LaunchSpec, NavError,
    NavigationPolicy, Screen, UnitHost,
};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::mpsc::{SyncSender, TrySendError};
use tracing::warn;

/// External units are launched by asking the producer to open them.
pub struct ChannelUnitHost {
    sid: String,
    targets: HashSet<String>,
    outbound: SyncSender<HostEnvelope>,
    terminated: Rc<Cell<bool>>,
}

impl ChannelUnitHost {
    pub fn new(
        sid: String,
        targets: impl IntoIterator<Item = String>,
        outbound: SyncSender<HostEnvelope>,
        terminated: Rc<Cell<bool>>,
    ) -> Self {
        Self {
            sid,
            targets: targets.into_iter().collect(),
            outbound,
            terminated,
        }
    }
}

impl UnitHost for ChannelUnitHost {
    type Handler = String;

    fn resolve_handler(&self, spec: &LaunchSpec) -> Option<String> {
        self.targets.get(&spec.target).cloned()
    }

    fn launch(
        &mut self,
        handler: String,
        spec: &LaunchSpec,
        options: Option<&LaunchOptions>,
    ) -> Result<(), HostError> {
        let envelope = HostEnvelope::Launch {
            sid: self.sid.clone(),
            target: handler,
            params: spec.params.clone(),
            options: options.map(|options| options.0.clone()),
        };

        self.outbound
            .send(envelope)
            .map_err(|_| HostError::new("launch", "outbound queue closed"))
    }

    fn terminate_current_unit(&mut self) -> Result<(), HostError> {
        self.terminated.set(true);
        Ok(())
    }
}

pub struct HostPolicy {
    sid: String,
    outbound: SyncSender<HostEnvelope>,
    queue_capacity: usize,
    continue_on_error: bool,
}

impl HostPolicy {
    pub fn new(
        sid: String,
        outbound: SyncSender<HostEnvelope>,
        queue_capacity: usize,
        continue_on_error: bool,
    ) -> Self {
        Self {
            sid,
            outbound,
            queue_capacity,
            continue_on_error,
        }
    }
}

impl NavigationPolicy for HostPolicy {
    fn unresolved_external(&self, screen: &Screen, spec: &LaunchSpec) {
        send_envelope(
            &self.outbound,
            error_envelope(
                self.sid.clone(),
                None,
                "unresolved_unit",
                format!("no unit for '{}' (screen '{}')", spec.target, screen.key),
            ),
            self.queue_capacity,
        );
    }

    fn view_creation_failed(&self, screen: &Screen) {
        warn!(key = %screen.key, "no view registered for screen");
    }

    fn command_failed(&self, command: &Command, error: &NavError) -> ErrorAction {
        if self.continue_on_error {
            warn!(command = command.name(), %error, "skipping failed navigation command");
            ErrorAction::Continue
        } else {
            ErrorAction::Abort
        }
    }
}

/// Queue `envelope` for the writer, waiting when the queue is full.
pub fn send_envelope(tx: &SyncSender<HostEnvelope>, envelope: HostEnvelope, queue_capacity: usize) {
    match tx.try_send(envelope) {
        Ok(()) => {}
        Err(TrySendError::Full(envelope)) => {
            warn!(
                capacity = queue_capacity,
                "outbound queue full; waiting to enqueue envelope"
            );
            if tx.send(envelope).is_err() {
                warn!("failed to enqueue envelope; writer has stopped");
            }
        }
        Err(TrySendError::Disconnected(_envelope)) => {
            warn!("failed to enqueue envelope; writer has stopped");
        }
    }
}

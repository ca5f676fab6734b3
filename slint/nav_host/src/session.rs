//! Producer session: routes inbound envelopes to the navigator and reports
//! the resulting stack.

use crate::host::{ChannelUnitHost, HostPolicy, send_envelope};
use navstack_host_runtime::protocol::error_envelope;
use navstack_host_runtime::{
    BatchError, CommandBuffer, CommandSink, HostConfig, HostEnvelope, Navigator, NavigatorHolder,
    ProducerEnvelope, SlintStackHost, StackHost, ViewRegistry,
};
use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::sync::mpsc::SyncSender;
use tracing::{debug, warn};

pub struct Session {
    sid: String,
    buffer: CommandBuffer,
    detached: Option<Box<dyn CommandSink>>,
    stack: SlintStackHost,
    terminated: Rc<Cell<bool>>,
    outbound: SyncSender<HostEnvelope>,
    queue_capacity: usize,
}

impl Session {
    pub fn new(
        config: &HostConfig,
        outbound: SyncSender<HostEnvelope>,
    ) -> Result<Self, BatchError> {
        let stack = SlintStackHost::new(config.max_stack_depth);
        let terminated = Rc::new(Cell::new(false));

        let units = ChannelUnitHost::new(
            config.sid.clone(),
            config.units.iter().cloned(),
            outbound.clone(),
            terminated.clone(),
        );
        let policy = HostPolicy::new(
            config.sid.clone(),
            outbound.clone(),
            config.outbound_queue_cap,
            config.continue_on_error,
        );
        let views = ViewRegistry::new(config.views.clone());
        let navigator = Navigator::new(stack.clone(), units, views).with_policy(policy);

        let mut buffer = CommandBuffer::new(config.pending_batch_cap);
        buffer.set_navigator(Box::new(navigator))?;

        Ok(Self {
            sid: config.sid.clone(),
            buffer,
            detached: None,
            stack,
            terminated,
            outbound,
            queue_capacity: config.outbound_queue_cap,
        })
    }

    /// Handle one inbound envelope. Breaks once the hosting unit terminated.
    pub fn handle(&mut self, envelope: ProducerEnvelope) -> ControlFlow<()> {
        if envelope.sid() != self.sid {
            let message = format!("expected sid {}, got {}", self.sid, envelope.sid());
            self.send(error_envelope(self.sid.clone(), None, "sid_mismatch", message));
            return ControlFlow::Continue(());
        }

        match envelope {
            ProducerEnvelope::Commands { batch, commands, .. } => {
                debug!(batch, len = commands.len(), "received navigation batch");
                let result = self.buffer.execute(commands);
                self.report(Some(batch), result);
            }
            ProducerEnvelope::Sync { .. } => {
                if self.buffer.is_attached() {
                    let result = self.buffer.execute(Vec::new());
                    self.report(None, result);
                } else {
                    self.publish_stack(None);
                }
            }
            ProducerEnvelope::Detach { .. } => {
                if let Some(navigator) = self.buffer.remove_navigator() {
                    self.detached = Some(navigator);
                }
            }
            ProducerEnvelope::Attach { .. } => {
                if let Some(navigator) = self.detached.take() {
                    let result = self.buffer.set_navigator(navigator).map(|()| true);
                    self.report(None, result);
                }
            }
        }

        if self.terminated.get() {
            self.send(HostEnvelope::Exit {
                sid: self.sid.clone(),
            });
            return ControlFlow::Break(());
        }

        ControlFlow::Continue(())
    }

    fn report(&mut self, batch: Option<u64>, result: Result<bool, BatchError>) {
        match result {
            Ok(true) => self.publish_stack(batch),
            Ok(false) => debug!(?batch, "navigator detached; batch queued"),
            Err(err) => {
                self.send(error_envelope(
                    self.sid.clone(),
                    batch,
                    err.code(),
                    err.to_string(),
                ));
                self.publish_stack(batch);
            }
        }
    }

    fn publish_stack(&mut self, batch: Option<u64>) {
        if let Err(err) = self.stack.flush_pending() {
            warn!(%err, "failed to commit stack before snapshot");
        }

        self.send(HostEnvelope::Stack {
            sid: self.sid.clone(),
            batch,
            entries: self.stack.named_entries(),
        });
    }

    fn send(&self, envelope: HostEnvelope) {
        send_envelope(&self.outbound, envelope, self.queue_capacity);
    }
}

mod host;
mod logging;
mod session;

use crate::session::Session;
use navstack_host_runtime::HostConfig;
use navstack_host_runtime::protocol::{reader_loop, ready_envelope, writer_loop};
use std::io;
use std::process;
use std::sync::mpsc;
use std::thread;
use tracing::{error, info, warn};

fn main() {
    logging::init();

    if let Err(err) = run(HostConfig::from_env()) {
        error!(%err, "nav_host fatal error");
        process::exit(1);
    }
}

fn run(config: HostConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (outbound_tx, outbound_rx) = mpsc::sync_channel(config.outbound_queue_cap);
    let (inbound_tx, inbound_rx) = mpsc::channel();

    let writer_handle = thread::spawn(move || writer_loop(outbound_rx, io::stdout().lock()));

    outbound_tx
        .send(ready_envelope(config.sid.clone()))
        .map_err(|_| "failed to queue ready envelope")?;

    let reader_handle = thread::spawn(move || {
        let read_result = reader_loop(io::stdin().lock(), |envelope| {
            if inbound_tx.send(envelope).is_err() {
                warn!("session stopped; dropping inbound envelope");
            }
        });

        if let Err(err) = &read_result {
            warn!(%err, "reader loop terminated with error");
        }

        read_result
    });

    // The Slint model is not `Send`, so the session lives on this thread and
    // is the only thing that touches the stack.
    let mut session = Session::new(&config, outbound_tx.clone())?;
    info!(sid = %config.sid, "nav_host ready");

    for envelope in inbound_rx {
        if session.handle(envelope).is_break() {
            info!("hosting unit terminated");
            break;
        }
    }

    // Drop every outbound sender so the writer drains and exits.
    drop(session);
    drop(outbound_tx);

    match writer_handle.join() {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(%err, "writer thread returned error"),
        Err(err) => warn!(?err, "writer thread join failed"),
    }

    if reader_handle.is_finished() {
        match reader_handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(%err, "reader thread returned error"),
            Err(err) => warn!(?err, "reader thread join failed"),
        }
    } else {
        // Avoid hanging process exit on a blocked stdin read.
        warn!("reader thread still active during shutdown; skipping join");
    }

    Ok(())
}

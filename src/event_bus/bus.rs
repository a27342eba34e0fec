use std::sync::{Arc, Mutex};
use tokio::{sync::oneshot, task};

use super::event::WorkflowEvent;
use super::sink::{EventSink, StdOutSink};

/// Receives workflow events and broadcasts them to the registered sinks.
///
/// The listener runs as a background tokio task. It drains any queued events
/// before shutting down, so `stop_listener` is a flush point: once it
/// returns, every event sent before the call has been handed to the sinks.
pub struct EventBus {
    sinks: Arc<Mutex<Vec<Box<dyn EventSink>>>>,
    channel: (flume::Sender<WorkflowEvent>, flume::Receiver<WorkflowEvent>),
    listener: Arc<Mutex<Option<ListenerState>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_sink(StdOutSink::default())
    }
}

impl EventBus {
    /// Create an event bus with a single sink.
    pub fn with_sink<T>(sink: T) -> Self
    where
        T: EventSink + 'static,
    {
        Self::with_sinks(vec![Box::new(sink)])
    }

    /// Create an event bus with multiple sinks.
    pub fn with_sinks(sinks: Vec<Box<dyn EventSink>>) -> Self {
        Self {
            sinks: Arc::new(Mutex::new(sinks)),
            channel: flume::unbounded(),
            listener: Arc::new(Mutex::new(None)),
        }
    }

    /// Get a clone of the sender side so producers can emit events.
    pub fn get_sender(&self) -> flume::Sender<WorkflowEvent> {
        self.channel.0.clone()
    }

    /// Spawn the background listener task.
    /// Idempotent: calling multiple times has no effect.
    pub fn listen_for_events(&self) {
        let mut guard = self.listener.lock().expect("listener poisoned");
        if guard.is_some() {
            return;
        }

        let receiver = self.channel.1.clone();
        let sinks = self.sinks.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let handle = task::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        // Flush whatever is still queued before exiting.
                        while let Ok(event) = receiver.try_recv() {
                            broadcast(&sinks, &event);
                        }
                        break;
                    }
                    recv = receiver.recv_async() => match recv {
                        Err(_) => break, // all senders dropped
                        Ok(event) => broadcast(&sinks, &event),
                    }
                }
            }
        });

        *guard = Some(ListenerState {
            shutdown_tx,
            handle,
        });
    }

    /// Stop the background listener, draining pending events first.
    pub async fn stop_listener(&self) {
        let state = {
            let mut guard = self.listener.lock().expect("listener poisoned");
            guard.take()
        };
        if let Some(state) = state {
            let _ = state.shutdown_tx.send(());
            let _ = state.handle.await;
        }
    }
}

fn broadcast(sinks: &Arc<Mutex<Vec<Box<dyn EventSink>>>>, event: &WorkflowEvent) {
    let mut guard = sinks.lock().expect("sinks poisoned");
    for sink in guard.iter_mut() {
        if let Err(e) = sink.handle(event) {
            tracing::warn!(error = %e, "event sink error");
        }
    }
}

impl Drop for EventBus {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.listener.lock() {
            if let Some(state) = guard.take() {
                let _ = state.shutdown_tx.send(());
                state.handle.abort();
            }
        }
    }
}

struct ListenerState {
    shutdown_tx: oneshot::Sender<()>,
    handle: task::JoinHandle<()>,
}

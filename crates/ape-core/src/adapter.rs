//! Adapter contract and the per-message event sink.
//!
//! An adapter is a transport: it turns platform input into [`Event`]s and
//! implements [`Provider::send`] for replies. It hands every event to an
//! [`EventSink`], which owns the invocation boundary:
//!
//! ```text
//! ┌───────────┐  emit()   ┌──────────────────────────┐
//! │  Adapter  │──────────▶│ task: catch_unwind(      │
//! │ (terminal)│──────────▶│   router.handle(event))  │──▶ at most one handler
//! └───────────┘           └──────────────────────────┘
//! ```
//!
//! [`EventSink::emit`] spawns one task per message so a slow handler never
//! blocks ingestion. [`EventSink::deliver`] runs inline for transports that
//! need to keep arrival order. Either way a panicking handler is logged and
//! contained; it never takes down the adapter or other in-flight events.
//!
//! [`Event`]: crate::Event

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{error, trace};

use crate::error::AdapterResult;
use crate::event::BoxedEvent;
use crate::handler::{BoxedHandler, Handler};
use crate::identity::BotIdentity;
use crate::provider::Provider;

/// A running transport.
#[async_trait]
pub trait Adapter: Provider {
    /// Reads inbound input and feeds events to `sink` until the input ends.
    async fn run(self: Arc<Self>, sink: EventSink) -> AdapterResult<()>;

    /// Releases transport resources. Called once by the runtime on stop.
    async fn shutdown(&self) -> AdapterResult<()> {
        Ok(())
    }
}

/// A shared adapter trait object.
pub type BoxedAdapter = Arc<dyn Adapter>;

/// An adapter that can be built from its own section of the configuration.
///
/// ```toml
/// [adapters.terminal]   # <- ConfigurableAdapter::adapter_name()
/// prompt = "ape> "
/// ```
pub trait ConfigurableAdapter: Adapter + Sized + 'static {
    /// The adapter's configuration section.
    type Config: DeserializeOwned + Default + Send;

    /// Key of this adapter's section under `adapters`.
    fn adapter_name() -> &'static str;

    /// Creates the adapter. `identity` carries the names used for
    /// direct-address detection.
    fn from_config(config: Self::Config, identity: &BotIdentity) -> AdapterResult<Arc<Self>>;
}

/// Where adapters hand off parsed events.
#[derive(Clone)]
pub struct EventSink {
    handler: BoxedHandler,
}

impl EventSink {
    /// Creates a sink that delivers to `handler`, usually a router.
    pub fn new<H: Handler + 'static>(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Creates a sink from an already shared handler.
    pub fn from_boxed(handler: BoxedHandler) -> Self {
        Self { handler }
    }

    /// Dispatches `event` on its own task and returns immediately.
    ///
    /// No ordering is guaranteed between events emitted this way.
    pub fn emit(&self, event: BoxedEvent) -> JoinHandle<bool> {
        let handler = Arc::clone(&self.handler);
        tokio::spawn(async move { invoke_isolated(handler.as_ref(), event).await })
    }

    /// Dispatches `event` on the current task and waits for the handler.
    ///
    /// Returns `false` if the handler panicked.
    pub async fn deliver(&self, event: BoxedEvent) -> bool {
        invoke_isolated(self.handler.as_ref(), event).await
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink").finish_non_exhaustive()
    }
}

async fn invoke_isolated(handler: &dyn Handler, event: BoxedEvent) -> bool {
    let provider = event.provider().name().to_owned();
    let channel = event.channel().to_owned();

    trace!(provider = %provider, channel = %channel, "Delivering event");

    match AssertUnwindSafe(handler.handle(event, Vec::new()))
        .catch_unwind()
        .await
    {
        Ok(()) => true,
        Err(payload) => {
            error!(
                provider = %provider,
                channel = %channel,
                panic = %panic_message(payload.as_ref()),
                "Handler panicked, event dropped"
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::SendResult;
    use crate::handler::handler_fn;
    use crate::message::Message;

    struct Silent;

    #[async_trait]
    impl Provider for Silent {
        fn name(&self) -> &str {
            "silent"
        }

        async fn send(&self, _to: &str, _message: &str) -> SendResult<()> {
            Ok(())
        }
    }

    fn event(text: &str) -> BoxedEvent {
        Arc::new(
            Message::builder(Arc::new(Silent))
                .channel("#test")
                .parse_addressed(text),
        )
    }

    #[tokio::test]
    async fn test_emit_runs_handler_on_task() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let sink = EventSink::new(handler_fn(move |_event, _args| {
            let c = Arc::clone(&count_clone);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        }));

        let first = sink.emit(event("a"));
        let second = sink.emit(event("b"));

        assert!(first.await.unwrap());
        assert!(second.await.unwrap());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_panicking_handler_is_isolated() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let sink = EventSink::new(handler_fn(move |event: BoxedEvent, _args| {
            let c = Arc::clone(&count_clone);
            async move {
                if event.command() == "boom" {
                    panic!("handler exploded");
                }
                c.fetch_add(1, Ordering::SeqCst);
            }
        }));

        let crashed = sink.emit(event("boom"));
        let survived = sink.emit(event("fine"));

        assert!(!crashed.await.unwrap());
        assert!(survived.await.unwrap());
        assert!(!sink.deliver(event("boom")).await);
        assert!(sink.deliver(event("fine")).await);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sink_passes_no_extra_args() {
        let sink = EventSink::new(handler_fn(|_event, args: Vec<String>| async move {
            assert!(args.is_empty());
        }));
        assert!(sink.deliver(event("ping with args")).await);
    }

    #[test]
    fn test_panic_message_variants() {
        let s: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");
        let s: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(s.as_ref()), "owned");
        let s: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(s.as_ref()), "<non-string panic payload>");
    }
}

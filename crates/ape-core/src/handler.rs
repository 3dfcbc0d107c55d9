//! Handler contract.
//!
//! A [`Handler`] processes one event together with the arguments the router
//! extracted for it: the pattern captures for a pattern route, or the
//! event's own `args()` for a command route. There is no return status; a
//! handler that wants to report failure does so through
//! [`Event::reply`](crate::Event::reply).
//!
//! Stateful handlers implement the trait directly. Plain async functions and
//! closures are wrapped with [`handler_fn`]:
//!
//! ```rust,ignore
//! use ape_core::{BoxedEvent, handler_fn};
//!
//! let ping = handler_fn(|event: BoxedEvent, _args: Vec<String>| async move {
//!     let _ = event.reply("pong").await;
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::event::BoxedEvent;

/// Something that can process an event and a list of extracted arguments.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handles `event`. `args` are the extracted arguments described in the
    /// module docs, not necessarily `event.args()`.
    async fn handle(&self, event: BoxedEvent, args: Vec<String>);
}

/// A shared handler trait object.
pub type BoxedHandler = Arc<dyn Handler>;

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn handle(&self, event: BoxedEvent, args: Vec<String>) {
        (**self).handle(event, args).await;
    }
}

/// Adapts an async function of `(event, args)` into a [`Handler`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> HandlerFn<F> {
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(BoxedEvent, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn handle(&self, event: BoxedEvent, args: Vec<String>) {
        (self.f)(event, args).await;
    }
}

/// Wraps an async function or closure as a [`Handler`].
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(BoxedEvent, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    HandlerFn::new(f)
}

impl<F> std::fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::error::SendResult;
    use crate::message::Message;
    use crate::provider::Provider;

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
        Arc::new(Message::builder(Arc::new(Silent)).parse_addressed(text))
    }

    struct Counter {
        calls: AtomicUsize,
        last_args: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Handler for Counter {
        async fn handle(&self, _event: BoxedEvent, args: Vec<String>) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_args.lock() = args;
        }
    }

    #[tokio::test]
    async fn test_handler_fn_receives_args() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let handler = handler_fn(move |event: BoxedEvent, args: Vec<String>| {
            let seen = Arc::clone(&seen_clone);
            async move {
                seen.lock().push((event.command().to_string(), args));
            }
        });

        handler.handle(event("echo hi"), vec!["x".into()]).await;

        assert_eq!(
            *seen.lock(),
            vec![("echo".to_string(), vec!["x".to_string()])]
        );
    }

    #[tokio::test]
    async fn test_stateful_handler_through_arc() {
        let counter = Arc::new(Counter {
            calls: AtomicUsize::new(0),
            last_args: Mutex::new(Vec::new()),
        });
        let boxed: BoxedHandler = counter.clone();

        boxed.handle(event("a"), vec!["1".into()]).await;
        Arc::clone(&counter).handle(event("b"), vec!["2".into()]).await;

        assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
        assert_eq!(*counter.last_args.lock(), vec!["2".to_string()]);
    }
}

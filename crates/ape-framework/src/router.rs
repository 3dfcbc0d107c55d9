//! The dispatch engine.
//!
//! A [`Router`] holds three registration structures and picks at most one
//! handler per event:
//!
//! 1. Pattern routes are scanned in registration order against the event's
//!    full text. The first match wins and receives the captures (whole match
//!    first). This happens whether or not the bot was addressed.
//! 2. Otherwise, if the event is directly addressed, its `command()` is looked
//!    up in the command map. A hit receives `event.args()`.
//! 3. An addressed event with an unknown command goes to the default handler,
//!    if one is set, again with `event.args()`.
//!
//! Anything else is dropped silently. Not answering unaddressed or unknown
//! messages is intended; there is no error reply.
//!
//! ```rust,ignore
//! use ape_framework::Router;
//! use regex::Regex;
//!
//! let router = Router::new();
//! router.add_pattern_route(Regex::new(r"^weather in (\w+)$")?, WeatherHandler);
//! router.add_command_fn("ping", |event, _args| async move {
//!     let _ = event.reply("pong").await;
//! });
//! router.set_default_fn(|event, _args| async move {
//!     let _ = event.reply("unknown command").await;
//! });
//!
//! router.dispatch(event).await;
//! ```
//!
//! # Registration semantics
//!
//! - Pattern routes append; overlapping patterns resolve to the first added.
//! - Registering a command name again replaces the previous handler.
//! - Setting the default again replaces the previous default.
//!
//! None of these are reported as errors.
//!
//! # Thread Safety
//!
//! `Router` is `Send + Sync`. Registration normally happens once during
//! setup, but the structures sit behind a read-write lock so registering
//! while events are being dispatched is safe: a dispatch sees either the old
//! or the new state, never a partial update. The lock is only held while
//! selecting a handler, never while the handler runs.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;
use tracing::{Instrument, Level, debug, span, trace};

use crate::route::PatternRoute;
use ape_core::{BoxedEvent, BoxedHandler, Event, Handler, handler_fn};

/// Which routing strategy selected a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// The pattern route at `index` (registration order) matched.
    Pattern {
        /// Position of the route in registration order.
        index: usize,
    },
    /// The event's command had a registered handler.
    Command,
    /// The event was addressed but its command was unknown.
    Default,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern { index } => write!(f, "pattern#{index}"),
            Self::Command => f.write_str("command"),
            Self::Default => f.write_str("default"),
        }
    }
}

/// The handler selected for an event and the arguments it will receive.
#[derive(Clone)]
pub struct Route {
    /// How the handler was selected.
    pub kind: RouteKind,
    /// The selected handler.
    pub handler: BoxedHandler,
    /// Pattern captures, or the event's own args for command/default routes.
    pub args: Vec<String>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("kind", &self.kind)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Outcome of [`Router::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A handler was invoked.
    Handled(RouteKind),
    /// No handler wanted the event.
    Dropped,
}

impl Dispatched {
    /// Returns `true` if a handler was invoked.
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

#[derive(Default)]
struct RouterInner {
    routes: Vec<PatternRoute>,
    commands: HashMap<String, BoxedHandler>,
    default: Option<BoxedHandler>,
}

/// Routes events to pattern, command and default handlers.
#[derive(Default)]
pub struct Router {
    inner: RwLock<RouterInner>,
}

impl Router {
    /// Creates a router with no routes, no commands and no default.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Appends a pattern route. Earlier routes take precedence.
    pub fn add_pattern_route<H>(&self, pattern: Regex, handler: H)
    where
        H: Handler + 'static,
    {
        debug!(pattern = pattern.as_str(), "Registered pattern route");
        self.inner
            .write()
            .routes
            .push(PatternRoute::new(pattern, Arc::new(handler)));
    }

    /// Appends a pattern route handled by an async function.
    pub fn add_pattern_route_fn<F, Fut>(&self, pattern: Regex, f: F)
    where
        F: Fn(BoxedEvent, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add_pattern_route(pattern, handler_fn(f));
    }

    /// Registers the handler for command `name`, replacing any previous one.
    pub fn add_command<H>(&self, name: impl Into<String>, handler: H)
    where
        H: Handler + 'static,
    {
        let name = name.into();
        let replaced = self
            .inner
            .write()
            .commands
            .insert(name.clone(), Arc::new(handler))
            .is_some();
        debug!(command = %name, replaced, "Registered command");
    }

    /// Registers an async function for command `name`, replacing any
    /// previous handler.
    pub fn add_command_fn<F, Fut>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(BoxedEvent, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add_command(name, handler_fn(f));
    }

    /// Sets the handler for addressed events with an unknown command,
    /// replacing any previous default.
    pub fn set_default<H>(&self, handler: H)
    where
        H: Handler + 'static,
    {
        let replaced = self
            .inner
            .write()
            .default
            .replace(Arc::new(handler))
            .is_some();
        debug!(replaced, "Registered default handler");
    }

    /// Sets an async function as the default handler.
    pub fn set_default_fn<F, Fut>(&self, f: F)
    where
        F: Fn(BoxedEvent, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.set_default(handler_fn(f));
    }

    /// Appends a pattern route (builder pattern).
    pub fn with_pattern_route<H>(self, pattern: Regex, handler: H) -> Self
    where
        H: Handler + 'static,
    {
        self.add_pattern_route(pattern, handler);
        self
    }

    /// Registers a command handler (builder pattern).
    pub fn with_command<H>(self, name: impl Into<String>, handler: H) -> Self
    where
        H: Handler + 'static,
    {
        self.add_command(name, handler);
        self
    }

    /// Sets the default handler (builder pattern).
    pub fn with_default<H>(self, handler: H) -> Self
    where
        H: Handler + 'static,
    {
        self.set_default(handler);
        self
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Returns the number of pattern routes.
    pub fn route_count(&self) -> usize {
        self.inner.read().routes.len()
    }

    /// Returns the number of registered commands.
    pub fn command_count(&self) -> usize {
        self.inner.read().commands.len()
    }

    /// Returns whether a handler is registered for command `name`.
    pub fn has_command(&self, name: &str) -> bool {
        self.inner.read().commands.contains_key(name)
    }

    /// Returns whether a default handler is set.
    pub fn has_default(&self) -> bool {
        self.inner.read().default.is_some()
    }

    /// Returns the registered command names, sorted.
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().commands.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Selects the handler for `event` without invoking it.
    ///
    /// Returns `None` when the event would be dropped.
    pub fn resolve(&self, event: &dyn Event) -> Option<Route> {
        let inner = self.inner.read();

        for (index, route) in inner.routes.iter().enumerate() {
            if let Some(args) = route.captures(event.text()) {
                return Some(Route {
                    kind: RouteKind::Pattern { index },
                    handler: Arc::clone(route.handler()),
                    args,
                });
            }
        }

        if !event.is_directly_addressed() {
            return None;
        }

        let (kind, handler) = match inner.commands.get(event.command()) {
            Some(handler) => (RouteKind::Command, handler),
            None => (RouteKind::Default, inner.default.as_ref()?),
        };

        Some(Route {
            kind,
            handler: Arc::clone(handler),
            args: event.args().to_vec(),
        })
    }

    /// Routes `event` to at most one handler and waits for it to finish.
    ///
    /// This never fails. The handler runs on the caller's task; spawn the
    /// call (see `EventSink::emit`) to avoid waiting on slow handlers.
    pub async fn dispatch(&self, event: BoxedEvent) -> Dispatched {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            provider = event.provider().name(),
            channel = event.channel(),
            command = event.command(),
        );

        async move {
            let Some(route) = self.resolve(event.as_ref()) else {
                trace!(
                    addressed = event.is_directly_addressed(),
                    "No route matched, event dropped"
                );
                return Dispatched::Dropped;
            };

            debug!(route = %route.kind, args = route.args.len(), "Invoking handler");
            route.handler.handle(event, route.args).await;
            Dispatched::Handled(route.kind)
        }
        .instrument(span)
        .await
    }
}

/// A router is itself a handler, so routers can be nested or handed to an
/// `EventSink`. The extra arguments are not consulted; the router derives
/// arguments from the event and its own routes.
#[async_trait]
impl Handler for Router {
    async fn handle(&self, event: BoxedEvent, _extra_args: Vec<String>) {
        self.dispatch(event).await;
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Router")
            .field("routes", &inner.routes)
            .field("commands", &inner.commands.len())
            .field("has_default", &inner.default.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ape_core::{Message, Provider, SendResult};
    use parking_lot::Mutex;

    use super::*;

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

    fn addressed(text: &str) -> BoxedEvent {
        Arc::new(Message::builder(Arc::new(Silent)).parse_addressed(text))
    }

    fn overheard(text: &str) -> BoxedEvent {
        Arc::new(Message::builder(Arc::new(Silent)).parse_overheard(text))
    }

    /// Records every invocation as `(text, args)`.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl Recorder {
        fn count(&self) -> usize {
            self.calls.lock().len()
        }

        fn args(&self, i: usize) -> Vec<String> {
            self.calls.lock()[i].1.clone()
        }
    }

    #[async_trait]
    impl Handler for Recorder {
        async fn handle(&self, event: BoxedEvent, args: Vec<String>) {
            self.calls.lock().push((event.text().to_string(), args));
        }
    }

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    #[tokio::test]
    async fn test_first_pattern_wins() {
        let p1 = Arc::new(Recorder::default());
        let p2 = Arc::new(Recorder::default());
        let router = Router::new()
            .with_pattern_route(re("hello"), Arc::clone(&p1))
            .with_pattern_route(re("hello world"), Arc::clone(&p2));

        let outcome = router.dispatch(overheard("hello world")).await;

        assert_eq!(outcome, Dispatched::Handled(RouteKind::Pattern { index: 0 }));
        assert_eq!(p1.count(), 1);
        assert_eq!(p2.count(), 0);
    }

    #[tokio::test]
    async fn test_pattern_fires_without_addressing() {
        let pattern = Arc::new(Recorder::default());
        let router = Router::new().with_pattern_route(re("^deploy"), Arc::clone(&pattern));

        router.dispatch(overheard("deploy now")).await;
        router.dispatch(addressed("deploy later")).await;

        assert_eq!(pattern.count(), 2);
    }

    #[tokio::test]
    async fn test_pattern_takes_precedence_over_command() {
        let pattern = Arc::new(Recorder::default());
        let command = Arc::new(Recorder::default());
        let router = Router::new()
            .with_pattern_route(re("^ping$"), Arc::clone(&pattern))
            .with_command("ping", Arc::clone(&command));

        router.dispatch(addressed("ping")).await;

        assert_eq!(pattern.count(), 1);
        assert_eq!(command.count(), 0);
    }

    #[tokio::test]
    async fn test_command_requires_addressing() {
        let ping = Arc::new(Recorder::default());
        let router = Router::new().with_command("ping", Arc::clone(&ping));

        let dropped = router.dispatch(overheard("ping")).await;
        assert_eq!(dropped, Dispatched::Dropped);
        assert_eq!(ping.count(), 0);

        let handled = router.dispatch(addressed("ping")).await;
        assert_eq!(handled, Dispatched::Handled(RouteKind::Command));
        assert_eq!(ping.count(), 1);
        assert!(ping.args(0).is_empty());
    }

    #[tokio::test]
    async fn test_command_receives_event_args() {
        let echo = Arc::new(Recorder::default());
        let router = Router::new().with_command("echo", Arc::clone(&echo));

        router.dispatch(addressed("echo  hello   world")).await;

        assert_eq!(echo.args(0), vec!["hello", "world"]);
    }

    #[tokio::test]
    async fn test_unknown_command_falls_to_default() {
        let fallback = Arc::new(Recorder::default());
        let router = Router::new()
            .with_command("ping", Recorder::default())
            .with_default(Arc::clone(&fallback));

        let outcome = router.dispatch(addressed("xyz a b")).await;

        assert_eq!(outcome, Dispatched::Handled(RouteKind::Default));
        assert_eq!(fallback.count(), 1);
        assert_eq!(fallback.args(0), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_unknown_command_without_default_is_silent() {
        let ping = Arc::new(Recorder::default());
        let router = Router::new().with_command("ping", Arc::clone(&ping));

        let outcome = router.dispatch(addressed("xyz")).await;

        assert_eq!(outcome, Dispatched::Dropped);
        assert_eq!(ping.count(), 0);
    }

    #[tokio::test]
    async fn test_default_ignores_unaddressed() {
        let fallback = Arc::new(Recorder::default());
        let router = Router::new().with_default(Arc::clone(&fallback));

        assert_eq!(router.dispatch(overheard("xyz")).await, Dispatched::Dropped);
        assert_eq!(fallback.count(), 0);
    }

    #[tokio::test]
    async fn test_empty_text_is_an_ordinary_miss() {
        let fallback = Arc::new(Recorder::default());
        let router = Router::new().with_default(Arc::clone(&fallback));

        let outcome = router.dispatch(addressed("")).await;

        assert_eq!(outcome, Dispatched::Handled(RouteKind::Default));
        assert_eq!(fallback.calls.lock()[0], (String::new(), Vec::new()));
    }

    #[tokio::test]
    async fn test_empty_command_can_be_registered() {
        let blank = Arc::new(Recorder::default());
        let router = Router::new().with_command("", Arc::clone(&blank));

        router.dispatch(addressed("   ")).await;

        assert_eq!(blank.count(), 1);
    }

    #[tokio::test]
    async fn test_reregistering_command_replaces_handler() {
        let h1 = Arc::new(Recorder::default());
        let h2 = Arc::new(Recorder::default());
        let router = Router::new();
        router.add_command("ping", Arc::clone(&h1));
        router.add_command("ping", Arc::clone(&h2));

        router.dispatch(addressed("ping")).await;
        router.dispatch(addressed("ping")).await;

        assert_eq!(router.command_count(), 1);
        assert_eq!(h1.count(), 0);
        assert_eq!(h2.count(), 2);
    }

    #[tokio::test]
    async fn test_reregistering_default_replaces_handler() {
        let d1 = Arc::new(Recorder::default());
        let d2 = Arc::new(Recorder::default());
        let router = Router::new()
            .with_default(Arc::clone(&d1))
            .with_default(Arc::clone(&d2));

        router.dispatch(addressed("xyz")).await;

        assert_eq!(d1.count(), 0);
        assert_eq!(d2.count(), 1);
    }

    #[tokio::test]
    async fn test_weather_scenario() {
        let weather = Arc::new(Recorder::default());
        let command = Arc::new(Recorder::default());
        let router = Router::new()
            .with_pattern_route(re(r"^weather in (\w+)$"), Arc::clone(&weather))
            .with_command("weather", Arc::clone(&command));

        router.dispatch(overheard("weather in Boston")).await;

        assert_eq!(weather.count(), 1);
        assert_eq!(weather.args(0), vec!["weather in Boston", "Boston"]);
        assert_eq!(command.count(), 0);
    }

    #[test]
    fn test_resolve_without_invoking() {
        let router = Router::new()
            .with_pattern_route(re(r"^weather in (\w+)$"), Recorder::default())
            .with_command("ping", Recorder::default());

        let route = router.resolve(overheard("weather in Oslo").as_ref()).unwrap();
        assert_eq!(route.kind, RouteKind::Pattern { index: 0 });
        assert_eq!(route.args, vec!["weather in Oslo", "Oslo"]);

        let route = router.resolve(addressed("ping x").as_ref()).unwrap();
        assert_eq!(route.kind, RouteKind::Command);
        assert_eq!(route.args, vec!["x"]);

        assert!(router.resolve(overheard("ping").as_ref()).is_none());
    }

    #[tokio::test]
    async fn test_function_handlers() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new();

        let h = Arc::clone(&hits);
        router.add_command_fn("ping", move |_event, args: Vec<String>| {
            let h = Arc::clone(&h);
            async move {
                assert!(args.is_empty());
                h.fetch_add(1, Ordering::SeqCst);
            }
        });
        let h = Arc::clone(&hits);
        router.add_pattern_route_fn(re("^!(\\w+)"), move |_event, args: Vec<String>| {
            let h = Arc::clone(&h);
            async move {
                assert_eq!(args[1], "bang");
                h.fetch_add(10, Ordering::SeqCst);
            }
        });
        let h = Arc::clone(&hits);
        router.set_default_fn(move |_event, _args| {
            let h = Arc::clone(&h);
            async move {
                h.fetch_add(100, Ordering::SeqCst);
            }
        });

        router.dispatch(addressed("ping")).await;
        router.dispatch(overheard("!bang")).await;
        router.dispatch(addressed("what")).await;

        assert_eq!(hits.load(Ordering::SeqCst), 111);
    }

    #[tokio::test]
    async fn test_nested_router_as_handler() {
        let inner_ping = Arc::new(Recorder::default());
        let inner = Router::new().with_command("ping", Arc::clone(&inner_ping));
        let outer = Router::new().with_default(inner);

        outer.dispatch(addressed("ping")).await;

        assert_eq!(inner_ping.count(), 1);
    }

    #[test]
    fn test_inspection() {
        let router = Router::new()
            .with_pattern_route(re("a"), Recorder::default())
            .with_command("zeta", Recorder::default())
            .with_command("alpha", Recorder::default());

        assert_eq!(router.route_count(), 1);
        assert_eq!(router.command_names(), vec!["alpha", "zeta"]);
        assert!(router.has_command("alpha"));
        assert!(!router.has_command("beta"));
        assert!(!router.has_default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_registration_during_concurrent_dispatch() {
        let router = Arc::new(Router::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for i in 0..64 {
            let router = Arc::clone(&router);
            let hits = Arc::clone(&hits);
            tasks.push(tokio::spawn(async move {
                if i % 8 == 0 {
                    let hits = Arc::clone(&hits);
                    router.add_command_fn(format!("cmd{i}"), move |_event, _args| {
                        let hits = Arc::clone(&hits);
                        async move {
                            hits.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
                router.dispatch(addressed(&format!("cmd{}", i - i % 8))).await
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(router.command_count(), 8);
        // Every dispatch after its command was registered is handled; the
        // registering task itself always is.
        assert!(hits.load(Ordering::SeqCst) >= 8);
    }
}

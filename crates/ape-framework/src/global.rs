//! Process-wide router.
//!
//! Small programs that don't want to pass a [`Router`] around can register
//! on a shared instance instead. The instance is created on first use and
//! lives for the rest of the process; every function here has exactly the
//! semantics of the matching [`Router`] method.
//!
//! ```rust,ignore
//! use ape_framework::global;
//!
//! global::add_command_fn("ping", |event, _args| async move {
//!     let _ = event.reply("pong").await;
//! });
//!
//! // Hand the shared router to the runtime.
//! let runtime = ApeRuntime::builder().router(global::router()).build()?;
//! ```
//!
//! Register during setup, before adapters start. Late registration is safe
//! (see [`Router`]) but events dispatched earlier won't see it.

use std::future::Future;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::router::{Dispatched, Router};
use ape_core::{BoxedEvent, Handler};

static ROUTER: LazyLock<Arc<Router>> = LazyLock::new(|| Arc::new(Router::new()));

/// Returns the shared router.
pub fn router() -> Arc<Router> {
    Arc::clone(&ROUTER)
}

/// Appends a pattern route to the shared router.
pub fn add_pattern_route<H: Handler + 'static>(pattern: Regex, handler: H) {
    ROUTER.add_pattern_route(pattern, handler);
}

/// Appends a function-backed pattern route to the shared router.
pub fn add_pattern_route_fn<F, Fut>(pattern: Regex, f: F)
where
    F: Fn(BoxedEvent, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    ROUTER.add_pattern_route_fn(pattern, f);
}

/// Registers a command on the shared router, replacing any previous one.
pub fn add_command<H: Handler + 'static>(name: impl Into<String>, handler: H) {
    ROUTER.add_command(name, handler);
}

/// Registers a function-backed command on the shared router.
pub fn add_command_fn<F, Fut>(name: impl Into<String>, f: F)
where
    F: Fn(BoxedEvent, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    ROUTER.add_command_fn(name, f);
}

/// Sets the shared router's default handler.
pub fn set_default<H: Handler + 'static>(handler: H) {
    ROUTER.set_default(handler);
}

/// Sets a function as the shared router's default handler.
pub fn set_default_fn<F, Fut>(f: F)
where
    F: Fn(BoxedEvent, Vec<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    ROUTER.set_default_fn(f);
}

/// Dispatches `event` through the shared router.
pub async fn dispatch(event: BoxedEvent) -> Dispatched {
    ROUTER.dispatch(event).await
}

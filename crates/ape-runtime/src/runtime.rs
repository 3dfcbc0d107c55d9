//! Runtime orchestration.
//!
//! The runtime owns the configuration, a [`Router`] and the registered
//! adapters. Running it starts every adapter on its own task with an
//! [`EventSink`] that feeds the router, then waits for a shutdown signal or
//! for all adapters to finish.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ape_runtime::ApeRuntime;
//!
//! // Auto-loads ape.toml from the current directory
//! let runtime = ApeRuntime::new();
//!
//! // Custom configuration path
//! let runtime = ApeRuntime::builder()
//!     .config_file("config/ape.toml")
//!     .build()?;
//!
//! // Pre-loaded config
//! let config = load_config()?;
//! let runtime = ApeRuntime::from_config(&config);
//! ```

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::signal;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::{ApeConfig, ConfigLoader, LoggingConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;
use ape_core::{AdapterResult, BotIdentity, BoxedAdapter, ConfigurableAdapter, EventSink};
use ape_framework::Router;

type AdapterTasks = JoinSet<(String, AdapterResult<()>)>;

/// The Ape runtime.
///
/// ```rust,ignore
/// let runtime = ApeRuntime::new();
///
/// runtime.router().add_command_fn("ping", |event, _| async move {
///     let _ = event.reply("pong").await;
/// });
/// runtime.register_adapter::<TerminalAdapter>().await?;
/// runtime.run().await?;
/// ```
pub struct ApeRuntime {
    config: ApeConfig,
    router: Arc<Router>,
    adapters: RwLock<Vec<BoxedAdapter>>,
    running: AtomicBool,
}

impl ApeRuntime {
    /// Creates a runtime from the configuration found in the default
    /// locations, falling back to defaults if it cannot be loaded.
    pub fn new() -> Self {
        match ConfigLoader::new().with_current_dir().load() {
            Ok(config) => Self::from_config(&config),
            Err(e) => {
                logging::init_from_config(&LoggingConfig::default());
                warn!(error = %e, "Failed to load configuration, using defaults");
                Self::from_config(&ApeConfig::default())
            }
        }
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from `config` with a fresh router.
    ///
    /// Installs the logging subscriber described by `config.logging` unless
    /// one is already installed.
    pub fn from_config(config: &ApeConfig) -> Self {
        Self::with_router(config, Arc::new(Router::new()))
    }

    /// Creates a runtime that dispatches into an existing router, such as
    /// [`ape_framework::global::router`].
    pub fn with_router(config: &ApeConfig, router: Arc<Router>) -> Self {
        logging::init_from_config(&config.logging);

        info!(
            bot = %config.bot.name,
            log_level = %config.logging.level,
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
            router,
            adapters: RwLock::new(Vec::new()),
            running: AtomicBool::new(false),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ApeConfig {
        &self.config
    }

    /// Returns the names the bot answers to.
    pub fn identity(&self) -> &BotIdentity {
        &self.config.bot
    }

    /// Returns the router events are dispatched to.
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Returns a sink feeding this runtime's router.
    pub fn sink(&self) -> EventSink {
        EventSink::new(Arc::clone(&self.router))
    }

    /// Builds adapter `A` from `adapters.<A::adapter_name()>` and registers it.
    ///
    /// A missing section means `A::Config::default()`.
    pub async fn register_adapter<A>(&self) -> RuntimeResult<()>
    where
        A: ConfigurableAdapter,
    {
        let adapter_name = A::adapter_name();

        let config: A::Config = match self.config.adapters.get(adapter_name) {
            Some(value) => value.deserialize().map_err(|e| {
                RuntimeError::AdapterConfigDeserialize(format!(
                    "Failed to deserialize config for adapter '{adapter_name}': {e}"
                ))
            })?,
            None => {
                debug!(
                    adapter = adapter_name,
                    "No configuration found for adapter, using default"
                );
                A::Config::default()
            }
        };

        let adapter = A::from_config(config, &self.config.bot)?;
        self.add_adapter(adapter).await;
        Ok(())
    }

    /// Registers an already constructed adapter.
    pub async fn add_adapter(&self, adapter: BoxedAdapter) {
        info!(adapter = adapter.name(), "Registered adapter");
        self.adapters.write().await.push(adapter);
    }

    /// Returns the number of registered adapters.
    pub async fn adapter_count(&self) -> usize {
        self.adapters.read().await.len()
    }

    /// Returns whether the runtime is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs until Ctrl+C, SIGTERM, or every adapter has finished.
    pub async fn run(&self) -> RuntimeResult<()> {
        info!("Ape runtime is now running. Press Ctrl+C to stop.");
        self.run_until(wait_for_shutdown()).await
    }

    /// Runs until `shutdown` resolves or every adapter has finished.
    ///
    /// Adapters are then shut down in registration order and any adapter
    /// task still running is aborted. Adapter errors are logged, not
    /// returned.
    pub async fn run_until<F>(&self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Runtime is already running");
            return Err(RuntimeError::AlreadyRunning);
        }

        let adapters = self.adapters.read().await.clone();
        if adapters.is_empty() {
            warn!("No adapters registered");
        }

        let sink = self.sink();
        let mut tasks = AdapterTasks::new();
        for adapter in &adapters {
            let name = adapter.name().to_owned();
            let run = Arc::clone(adapter).run(sink.clone());
            debug!(adapter = %name, "Starting adapter");
            tasks.spawn(async move { (name, run.await) });
        }

        info!(adapters = adapters.len(), "Runtime started");

        tokio::pin!(shutdown);
        tokio::select! {
            _ = &mut shutdown => info!("Shutdown requested"),
            _ = drain(&mut tasks) => info!("All adapters finished"),
        }

        for adapter in &adapters {
            if let Err(e) = adapter.shutdown().await {
                error!(adapter = adapter.name(), error = %e, "Error during adapter shutdown");
            }
        }
        tasks.shutdown().await;

        self.running.store(false, Ordering::SeqCst);
        info!("Runtime stopped");
        Ok(())
    }
}

impl Default for ApeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

async fn drain(tasks: &mut AdapterTasks) {
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((name, Ok(()))) => info!(adapter = %name, "Adapter finished"),
            Ok((name, Err(e))) => error!(adapter = %name, error = %e, "Adapter failed"),
            Err(e) => error!(error = %e, "Adapter task panicked"),
        }
    }
}

async fn wait_for_ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to listen for Ctrl+C");
            futures::future::pending::<()>().await;
        }
    }
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = wait_for_ctrl_c() => {}
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to register SIGTERM handler");
                wait_for_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for an [`ApeRuntime`] with custom configuration.
///
/// ```rust,ignore
/// let runtime = ApeRuntime::builder()
///     .config_file("config/ape.toml")
///     .profile("production")
///     .router(ape_framework::global::router())
///     .build()?;
/// ```
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    router: Option<Arc<Router>>,
}

impl RuntimeBuilder {
    /// Creates a builder searching the current directory.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
            router: None,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Enables loading environment variables (enabled by default).
    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: ApeConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Dispatches into `router` instead of a fresh one.
    pub fn router(mut self, router: Arc<Router>) -> Self {
        self.router = Some(router);
        self
    }

    /// Loads the configuration and builds the runtime.
    pub fn build(self) -> RuntimeResult<ApeRuntime> {
        let config = self.config_loader.load()?;
        let router = self.router.unwrap_or_default();
        Ok(ApeRuntime::with_router(&config, router))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

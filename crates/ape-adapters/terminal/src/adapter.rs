//! The terminal adapter.
//!
//! # Configuration-Based Usage
//!
//! ```rust,ignore
//! use ape_adapter_terminal::TerminalAdapter;
//! use ape_runtime::ApeRuntime;
//!
//! let runtime = ApeRuntime::new();
//! runtime.register_adapter::<TerminalAdapter>().await?;
//! runtime.run().await?;
//! ```
//!
//! # Programmatic Usage
//!
//! ```rust,ignore
//! let adapter = TerminalAdapter::with_io(config, identity, input, output);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ape_core::{
    Adapter, AdapterResult, BotIdentity, BoxedEvent, ConfigurableAdapter, EventSink, Message,
    Provider, SendError, SendResult,
};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::config::TerminalConfig;

type Input = Box<dyn AsyncBufRead + Send + Unpin>;
type Output = Box<dyn AsyncWrite + Send + Unpin>;

/// Line-oriented transport over a reader and a writer, stdio by default.
pub struct TerminalAdapter {
    config: TerminalConfig,
    identity: BotIdentity,
    input: Mutex<Input>,
    output: Mutex<Output>,
    closed: AtomicBool,
}

impl TerminalAdapter {
    /// Creates an adapter over stdin and stdout.
    pub fn new(config: TerminalConfig, identity: BotIdentity) -> Self {
        Self::with_io(
            config,
            identity,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
    }

    /// Creates an adapter over custom streams.
    pub fn with_io<R, W>(config: TerminalConfig, identity: BotIdentity, input: R, output: W) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            config,
            identity,
            input: Mutex::new(Box::new(input)),
            output: Mutex::new(Box::new(output)),
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the adapter configuration.
    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// Returns the names this adapter treats as addressing the bot.
    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    /// Builds the event for one input line.
    fn event(self: &Arc<Self>, line: &str) -> Message {
        Message::builder(self.clone())
            .channel(self.config.channel.as_str())
            .nick(self.config.nick.as_str())
            .parse(line, &self.identity)
    }

    async fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut output = self.output.lock().await;
        output.write_all(line.as_bytes()).await?;
        output.flush().await
    }
}

#[async_trait]
impl Provider for TerminalAdapter {
    fn name(&self) -> &str {
        "terminal"
    }

    async fn send(&self, to: &str, message: &str) -> SendResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SendError::Closed);
        }
        self.write_line(&format!("{to}: {message}\n")).await?;
        Ok(())
    }
}

#[async_trait]
impl Adapter for TerminalAdapter {
    async fn run(self: Arc<Self>, sink: EventSink) -> AdapterResult<()> {
        info!(
            channel = %self.config.channel,
            ordered = self.config.ordered,
            "Terminal adapter reading input"
        );

        let mut input = self.input.lock().await;
        let mut buf = Vec::new();
        let mut in_flight: Vec<JoinHandle<bool>> = Vec::new();

        while !self.closed.load(Ordering::SeqCst) {
            if !self.config.prompt.is_empty() {
                self.write_line(&self.config.prompt).await?;
            }

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                debug!("Terminal input closed");
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            let text = line.trim_end_matches(['\r', '\n']);
            trace!(line = %text, "Read line");

            let event: BoxedEvent = Arc::new(self.event(text));
            if self.config.ordered {
                sink.deliver(event).await;
            } else {
                in_flight.retain(|handle| !handle.is_finished());
                in_flight.push(sink.emit(event));
            }
        }

        // Emitted events finish before run returns, so their replies precede shutdown.
        for handle in in_flight {
            let _ = handle.await;
        }

        Ok(())
    }

    async fn shutdown(&self) -> AdapterResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.output.lock().await.flush().await?;
        debug!("Terminal adapter shut down");
        Ok(())
    }
}

impl ConfigurableAdapter for TerminalAdapter {
    type Config = TerminalConfig;

    fn adapter_name() -> &'static str {
        "terminal"
    }

    fn from_config(config: Self::Config, identity: &BotIdentity) -> AdapterResult<Arc<Self>> {
        Ok(Arc::new(Self::new(config, identity.clone())))
    }
}

impl std::fmt::Debug for TerminalAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalAdapter")
            .field("config", &self.config)
            .field("identity", &self.identity)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

//! # Message Dispatcher
//!
//! Routes the typed payloads of decoded packets to handlers registered per
//! [`MessageKind`].
//!
//! # Architecture
//!
//! Several handlers may listen to the same kind; each one sees every
//! message of that kind in wire order. A failing handler is logged and
//! does not stop the remaining handlers or messages.
//!
//! # Example
//!
//! ```ignore
//! let mut dispatcher = MessageDispatcher::new();
//!
//! dispatcher.register(MessageKind::Event, |message| {
//!     println!("event {}", message.code());
//!     Ok(())
//! });
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use photon_core::MessageKind;
use photon_protocol::{Message, Packet};

/// Type for message handler functions
pub type HandlerFunction = Arc<dyn Fn(&Message) -> anyhow::Result<()> + Send + Sync>;

/// Registry of message handlers
pub struct MessageDispatcher {
    /// Map from message kind to its handlers, in registration order
    handlers: HashMap<MessageKind, Vec<HandlerFunction>>,
}

impl MessageDispatcher {
    #[inline]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for one message kind
    pub fn register<F>(&mut self, kind: MessageKind, handler: F)
    where
        F: Fn(&Message) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        tracing::debug!("Registered handler for {} messages", kind);
        self.handlers.entry(kind).or_default().push(Arc::new(handler));
    }

    /// Check if any handler listens to a message kind
    pub fn has_handler(&self, kind: MessageKind) -> bool {
        self.handlers.get(&kind).is_some_and(|list| !list.is_empty())
    }

    /// Get the number of registered handlers across all kinds
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Hand every message of a packet to the handlers of its kind
    ///
    /// # Returns
    /// The number of handler invocations that succeeded
    pub fn dispatch(&self, packet: &Packet) -> usize {
        let mut delivered = 0;

        for message in packet.messages() {
            let Some(handlers) = self.handlers.get(&message.kind()) else {
                continue;
            };
            for handler in handlers {
                match handler(message) {
                    Ok(()) => delivered += 1,
                    Err(e) => tracing::warn!(
                        "Handler for {} {} failed: {}",
                        message.kind(),
                        message.code(),
                        e
                    ),
                }
            }
        }

        delivered
    }
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

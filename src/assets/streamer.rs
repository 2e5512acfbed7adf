//! Asynchronous asset acquisition.
//!
//! A streamer never touches the scene. It reports through a [`StreamSink`],
//! which forwards messages over a channel to whoever issued the request; the
//! requester drains that channel on its own thread (see
//! [`VisualItem::poll`](crate::item::VisualItem::poll)).
//!
//! Cancellation is cooperative: the requester flips the shared
//! [`LoadTicket`] (or drops the receiver) and every later send becomes a
//! no-op. Streamers may also check [`StreamSink::is_cancelled`] to stop work
//! early.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rustc_hash::FxHashMap;

use crate::assets::subtree::VisualSubtree;
use crate::errors::Error;

/// Byte counts reported by a progress tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: u64,
}

impl LoadProgress {
    /// Completion in percent. An unknown total (zero) reports 0.
    #[must_use]
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.loaded as f64 / self.total as f64 * 100.0) as f32
        }
    }
}

#[derive(Debug)]
pub enum StreamMessage {
    Progress(LoadProgress),
    Completed(VisualSubtree),
    Failed(Error),
}

/// Shared cancellation flag for one load request.
#[derive(Debug, Clone, Default)]
pub struct LoadTicket(Arc<AtomicBool>);

impl LoadTicket {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Sending half of a load request.
#[derive(Debug, Clone)]
pub struct StreamSink {
    reference: String,
    sender: flume::Sender<StreamMessage>,
    ticket: LoadTicket,
}

impl StreamSink {
    /// Creates a sink for `reference` and the receiver that observes it.
    #[must_use]
    pub fn channel(reference: &str) -> (Self, flume::Receiver<StreamMessage>) {
        let (sender, receiver) = flume::unbounded();
        let sink = Self {
            reference: reference.to_string(),
            sender,
            ticket: LoadTicket::new(),
        };
        (sink, receiver)
    }

    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    #[must_use]
    pub fn ticket(&self) -> &LoadTicket {
        &self.ticket
    }

    /// True once the requester cancelled or stopped listening.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.ticket.is_cancelled() || self.sender.is_disconnected()
    }

    /// Reports a progress tick. Returns `false` if nobody is listening.
    pub fn progress(&self, loaded: u64, total: u64) -> bool {
        self.send(StreamMessage::Progress(LoadProgress { loaded, total }))
    }

    /// Delivers the loaded subtree. Consumes the sink: a request completes
    /// at most once.
    pub fn complete(self, subtree: VisualSubtree) -> bool {
        self.send(StreamMessage::Completed(subtree))
    }

    /// Reports a failure. Consumes the sink.
    pub fn fail(self, error: Error) -> bool {
        self.send(StreamMessage::Failed(error))
    }

    fn send(&self, message: StreamMessage) -> bool {
        if self.ticket.is_cancelled() {
            return false;
        }
        self.sender.send(message).is_ok()
    }
}

/// Source of streamed visuals.
///
/// `load` must return promptly; the result arrives later through `sink`.
pub trait AssetStreamer {
    fn load(&self, reference: &str, sink: StreamSink);
}

/// Streamer backed by subtrees registered up front.
///
/// Answers on the calling thread (one full progress tick, then completion),
/// which the requester still only observes on its next poll. Unknown
/// references fail with [`Error::AssetLoad`].
#[derive(Debug, Default)]
pub struct MemoryStreamer {
    entries: FxHashMap<String, (VisualSubtree, u64)>,
}

impl MemoryStreamer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `subtree` under `reference`; `byte_size` is what progress
    /// ticks report as the total.
    pub fn insert(&mut self, reference: &str, subtree: VisualSubtree, byte_size: u64) {
        self.entries.insert(reference.to_string(), (subtree, byte_size));
    }

    #[must_use]
    pub fn contains(&self, reference: &str) -> bool {
        self.entries.contains_key(reference)
    }
}

impl AssetStreamer for MemoryStreamer {
    fn load(&self, reference: &str, sink: StreamSink) {
        match self.entries.get(reference) {
            Some((subtree, size)) => {
                sink.progress(*size, *size);
                sink.complete(subtree.clone());
            }
            None => {
                sink.fail(Error::AssetLoad {
                    reference: reference.to_string(),
                    reason: "not registered".to_string(),
                });
            }
        }
    }
}

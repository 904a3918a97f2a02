//! Async hand-off of per-frame uniforms to the renderer.
//!
//! The producer evaluates frames; the renderer only ever wants the newest
//! one, so a bounded channel that drops the oldest frame keeps the
//! producer from ever waiting on a slow consumer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::FrameUniforms;

/// Configuration for the uniform channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformChannelConfig {
    /// Optional buffer size. `None` makes the channel unbounded; `Some(0)`
    /// is raised to a capacity of one frame.
    pub buffer_size: Option<usize>,

    /// When the buffer is full: `true` drops the oldest queued frame,
    /// `false` reports `ChannelError::Full` from `try_publish`.
    pub drop_oldest_on_full: bool,
}

impl Default for UniformChannelConfig {
    /// Keep the two newest frames and drop older ones.
    fn default() -> Self {
        Self {
            buffer_size: Some(2),
            drop_oldest_on_full: true,
        }
    }
}

impl UniformChannelConfig {
    pub fn new(buffer_size: Option<usize>, drop_oldest_on_full: bool) -> Self {
        Self {
            buffer_size,
            drop_oldest_on_full,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None, false)
    }

    /// Queue at most `size` frames. A size of 0 holds one frame, since a
    /// rendezvous channel would make `try_publish` always fail.
    pub fn bounded(size: usize) -> Self {
        Self::new(Some(size), false)
    }

    pub fn bounded_with_drop_oldest(size: usize) -> Self {
        Self::new(Some(size), true)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Uniform channel is closed")]
    Closed,

    #[error("Uniform channel is full")]
    Full(Box<FrameUniforms>),
}

/// Create a connected sender/receiver pair.
pub fn uniform_channel(config: UniformChannelConfig) -> (UniformSender, UniformReceiver) {
    let (sender, receiver) = match config.buffer_size {
        Some(size) => async_channel::bounded(size.max(1)),
        None => async_channel::unbounded(),
    };
    let sender = UniformSender {
        sender,
        evictor: Arc::new(receiver.clone()),
        config,
        published: Arc::new(AtomicU64::new(0)),
        dropped: Arc::new(AtomicU64::new(0)),
    };
    let receiver = UniformReceiver {
        receiver,
        received: Arc::new(AtomicU64::new(0)),
    };
    (sender, receiver)
}

/// Producer side.
#[derive(Debug, Clone)]
pub struct UniformSender {
    sender: async_channel::Sender<FrameUniforms>,
    // Second handle on the queue, used only to evict the oldest frame.
    // Shared between clones so it counts as exactly one receiver.
    evictor: Arc<async_channel::Receiver<FrameUniforms>>,
    config: UniformChannelConfig,
    published: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
}

impl UniformSender {
    // The evictor keeps one receiver alive, so "closed" means no consumer
    // handle is left besides it.
    fn consumer_gone(&self) -> bool {
        self.sender.is_closed() || self.sender.receiver_count() <= 1
    }

    /// Publish without waiting.
    pub fn try_publish(&self, frame: FrameUniforms) -> Result<(), ChannelError> {
        if self.consumer_gone() {
            return Err(ChannelError::Closed);
        }
        let mut frame = frame;
        loop {
            match self.sender.try_send(frame) {
                Ok(()) => {
                    self.published.fetch_add(1, Ordering::Relaxed);
                    return Ok(());
                }
                Err(async_channel::TrySendError::Full(rejected)) => {
                    if !self.config.drop_oldest_on_full {
                        return Err(ChannelError::Full(Box::new(rejected)));
                    }
                    if let Ok(stale) = self.evictor.try_recv() {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        tracing::trace!(frame = stale.frame, "dropped stale uniform frame");
                    }
                    frame = rejected;
                }
                Err(async_channel::TrySendError::Closed(_)) => return Err(ChannelError::Closed),
            }
        }
    }

    /// Publish, waiting for space when the channel is full and not
    /// configured to drop.
    pub async fn publish(&self, frame: FrameUniforms) -> Result<(), ChannelError> {
        if self.config.drop_oldest_on_full {
            return self.try_publish(frame);
        }
        if self.consumer_gone() {
            return Err(ChannelError::Closed);
        }
        self.sender.send(frame).await.map_err(|_| ChannelError::Closed)?;
        self.published.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn pending_count(&self) -> usize {
        self.sender.len()
    }

    pub fn configuration(&self) -> &UniformChannelConfig {
        &self.config
    }

    pub fn close(&self) -> bool {
        self.sender.close()
    }
}

/// Consumer side.
#[derive(Debug)]
pub struct UniformReceiver {
    receiver: async_channel::Receiver<FrameUniforms>,
    received: Arc<AtomicU64>,
}

impl UniformReceiver {
    /// Wait for the next frame. `None` once the channel is closed and drained.
    pub async fn next_frame(&self) -> Option<FrameUniforms> {
        let frame = self.receiver.recv().await.ok()?;
        self.received.fetch_add(1, Ordering::Relaxed);
        Some(frame)
    }

    /// Drain everything queued and return the newest frame, if any.
    pub fn try_latest(&self) -> Option<FrameUniforms> {
        let mut latest = None;
        while let Ok(frame) = self.receiver.try_recv() {
            self.received.fetch_add(1, Ordering::Relaxed);
            latest = Some(frame);
        }
        latest
    }

    pub fn received_count(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.receiver.is_closed()
    }

    /// Consume the receiver as a stream of frames, still counting them.
    pub fn into_stream(self) -> impl futures::Stream<Item = FrameUniforms> {
        futures::stream::unfold(self, |rx| async move {
            let frame = rx.next_frame().await?;
            Some((frame, rx))
        })
    }
}

// The sender's evictor is also a receiver, so the queue would stay open
// without an explicit close when the consumer goes away.
impl Drop for UniformReceiver {
    fn drop(&mut self) {
        self.receiver.close();
    }
}

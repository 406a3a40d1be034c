//! Peer-connection state shared between the radio stack and the sample loop.
//!
//! The radio stack delivers connect/disconnect/write callbacks on its own
//! execution context, concurrently with the sample loop. The only state the
//! two sides share is one boolean — "is a peer connected right now" — so a
//! single atomic word carries it. [`PeerLink`] is injected into both sides
//! rather than living in a global, which keeps the ownership explicit and
//! the whole contract testable without a radio.

use core::sync::atomic::{AtomicBool, Ordering};

use log::info;

/// At most this many inbound bytes appear in a log line.
pub const INBOUND_PREVIEW_MAX: usize = 32;

// ───────────────────────────────────────────────────────────────
// Observer trait
// ───────────────────────────────────────────────────────────────

/// Capability interface for radio lifecycle events.
///
/// The platform integration layer (Bluedroid callbacks on device,
/// `sim_*` hooks in tests) is the only code that invokes these. Methods
/// take `&self` — they run on the radio stack's context and must not
/// require exclusive access.
pub trait LinkObserver: Send + Sync {
    /// A peer connected. Idempotent: a duplicate connect is a no-op.
    fn on_peer_connected(&self);

    /// The peer disconnected. Idempotent like [`on_peer_connected`].
    ///
    /// [`on_peer_connected`]: LinkObserver::on_peer_connected
    fn on_peer_disconnected(&self);

    /// The peer wrote to the RX endpoint. Payload is opaque bytes.
    fn on_peer_write(&self, data: &[u8]);
}

// ───────────────────────────────────────────────────────────────
// PeerLink
// ───────────────────────────────────────────────────────────────

/// Binary peer-connection flag.
///
/// One writer context (the radio stack), one reader (the sample loop).
/// There are no intermediate states — a reconnect is simply another
/// connect event.
#[derive(Debug, Default)]
pub struct PeerLink {
    connected: AtomicBool,
}

impl PeerLink {
    pub const fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
        }
    }

    /// Whether a peer is connected right now.
    ///
    /// Pairs with the release stores in the observer methods so the sample
    /// loop always sees a recently written value.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

impl LinkObserver for PeerLink {
    fn on_peer_connected(&self) {
        if !self.connected.swap(true, Ordering::AcqRel) {
            info!("link: peer connected");
        }
    }

    fn on_peer_disconnected(&self) {
        if self.connected.swap(false, Ordering::AcqRel) {
            info!("link: peer disconnected");
        }
    }

    fn on_peer_write(&self, data: &[u8]) {
        // The RX endpoint exists because UART-style clients require one.
        // Inbound bytes carry no commands: bound-check, log, discard.
        let shown = data.len().min(INBOUND_PREVIEW_MAX);
        info!(
            "link: RX <- {} bytes {:02x?}{}",
            data.len(),
            &data[..shown],
            if data.len() > shown { " (truncated)" } else { "" },
        );
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

//! Byte-level link to the board.

/// A full-duplex byte channel to the board.
///
/// Both primitives are try-once: they report whether a byte moved and
/// never block internally. The bus layer retries them forever with no
/// backoff and no timeout; the link is assumed reliable once opened,
/// so a persistent failure surfaces as a hang rather than silent data
/// loss. There is at most one outstanding request on the wire: every
/// request byte is answered with exactly one reply byte before the
/// next request is issued.
pub trait ByteLink {
    /// Try to push one byte towards the board. `false` means the byte
    /// was not accepted and must be offered again.
    fn send_byte(&mut self, byte: u8) -> bool;

    /// Try to pull one byte from the board. `None` means nothing has
    /// arrived yet.
    fn recv_byte(&mut self) -> Option<u8>;

    /// Block until the outbound buffer has been flushed to the wire.
    /// Used once during the safe-shutdown sequence.
    fn drain(&mut self) {}
}

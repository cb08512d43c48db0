//! Round state types.

/// Round state.
///
/// `Idle` means no bet is active; `Playing` means cards are dealt and the
/// player may act. Transitions happen only through table operations, which
/// is the only concurrency discipline a single-seat table needs: at most
/// one round is ever in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundState {
    /// No bet is active.
    #[default]
    Idle,
    /// Cards are dealt and the player may act.
    Playing,
}

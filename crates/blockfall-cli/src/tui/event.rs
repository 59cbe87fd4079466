use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// Time to advance the application (every tick interval).
    Tick,
    /// Time to redraw, because something changed since the last frame.
    Render,
    /// Key input, resize and other terminal events.
    Crossterm(CrosstermEvent),
}

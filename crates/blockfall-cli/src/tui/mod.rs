//! Terminal application runtime.
//!
//! [`Runtime`] owns the event loop: it produces ticks at the configured rate,
//! redraws after anything changed, and forwards terminal input. The running
//! [`Screen`] reacts to those and decides when to switch to another screen or
//! exit.

pub use self::{
    app::App,
    runtime::Runtime,
    screen::{Screen, ScreenSwitcher, ScreenTransition},
};

mod app;
mod event;
mod event_loop;
mod runtime;
mod screen;

pub mod timers;
pub mod event_loop;

pub use timers::{TimerId, TimerTask, Timers};
pub use event_loop::{AppEvent, EventHandler, EventLoop};

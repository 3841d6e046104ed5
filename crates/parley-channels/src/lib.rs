//! Front ends that turn external events into session calls.
//!
//! # Main types
//!
//! - [`Channel`]: Trait for delivering replies to a platform.
//! - [`DiscordChannel`]: Discord REST delivery.
//! - [`CommandDispatcher`]: Maps chat commands onto a [`parley_session::SharedSession`].
//! - [`TerminalChannel`]: Interactive stdin/stdout loop.

/// Core channel trait and message types.
pub mod channel;
/// Discord channel integration.
pub mod discord;
/// Command parsing and dispatch.
pub mod dispatch;
/// Interactive terminal front end.
pub mod terminal;

pub use channel::{Channel, ChannelEvent, ChannelMessage};
pub use discord::DiscordChannel;
pub use dispatch::{Command, CommandDispatcher};
pub use terminal::TerminalChannel;

//! Built-in demo routes.
//!
//! Small on purpose: they exist to give the lifecycle middleware something to
//! measure, including a handler-signalled `render` event.

pub mod echo;
pub mod users;

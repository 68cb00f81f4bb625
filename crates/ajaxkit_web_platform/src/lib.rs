//! Web platform primitives
//!
//! The updater runs on a single-threaded, cooperative event loop: a tokio current-thread runtime
//! driving a [`tokio::task::LocalSet`]. This crate provides the timers (`setTimeout` /
//! `setInterval` style) and the callback type used to schedule work on that loop. Everything in
//! here must be used from within a `LocalSet`.

pub mod callback;
pub mod timers;

pub use callback::{Callback, FutureExecutor, TokioExecutor};
pub use timers::{TimerId, WebTimers};

//! Content updater
//!
//! Fetches remote content and splices it into a document at a named location:
//!
//! ```ignore
//! let updater = ContentUpdater::new(document, fetcher, timers);
//!
//! // append the body of /data.html to the element with id "list"
//! let text = updater.update("/data.html", "bottom#list", None)?.await?;
//!
//! // refresh every five seconds until cancelled
//! let timer = updater.periodic_update(5000, "/data.html", "list", Some("inside".into()))?;
//! updater.cancel(timer);
//! ```
//!
//! Targets and strategy names are validated before anything goes over the wire. The fetch and the
//! insertion run on the local event loop, so every future and timer here needs a
//! tokio `LocalSet`.

pub mod effects;
pub mod insertion;
pub mod settings;
pub mod target;
pub mod updater;

pub use effects::{Effect, Effects, HighlightColor};
pub use insertion::InsertionStrategy;
pub use settings::UpdaterSettings;
pub use target::Target;
pub use updater::{ContentUpdater, UpdateFuture};

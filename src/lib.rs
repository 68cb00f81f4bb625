//! Ajaxkit
//!
//! Fetches remote content and splices it into a document at a named location, optionally
//! followed by a short visual effect on the updated node.
//!
//! The work is split over a few crates, re-exported here:
//!
//! - [`shared`]: node handles, colours, errors and the `Dom` / `TextFetcher` collaborator traits
//! - [`config`]: the settings store
//! - [`web_platform`]: callbacks and timers on the local event loop
//! - [`dom`]: an in-memory document
//! - [`net`]: the http(s) and file fetcher
//! - [`updater`]: the content updater and its effects

pub use ajaxkit_config as config;
pub use ajaxkit_dom as dom;
pub use ajaxkit_net as net;
pub use ajaxkit_shared as shared;
pub use ajaxkit_updater as updater;
pub use ajaxkit_web_platform as web_platform;

pub mod prelude;

pub use ajaxkit_dom::Document;
pub use ajaxkit_net::http::fetcher::Fetcher;
pub use ajaxkit_shared::document::DocumentHandle;
pub use ajaxkit_shared::errors::Error;
pub use ajaxkit_shared::node::NodeId;
pub use ajaxkit_shared::traits::dom::{Dom, Insertion};
pub use ajaxkit_shared::traits::fetch::TextFetcher;
pub use ajaxkit_shared::types::Result;
pub use ajaxkit_updater::{ContentUpdater, Effect, Effects, HighlightColor, InsertionStrategy, Target};
pub use ajaxkit_web_platform::{TimerId, WebTimers};

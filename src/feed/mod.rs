//! Feed document construction.
//!
//! # Data Flow
//! ```text
//! Vec<ChallengeRecord>
//!     → render.rs (sort by date, newest first)
//!     → render.rs (one <item> per record: title, link, guid, pubDate)
//!         → html.rs (sanitize + tag-safe truncate of requirements)
//!     → RSS 2.0 XML string
//! ```
//!
//! # Design Decisions
//! - Rendering is pure: same records and config give byte-identical output
//! - No lastBuildDate, so cached and fresh documents are indistinguishable
//! - Missing fields drop their description line instead of printing a placeholder

pub mod html;
pub mod record;
pub mod render;

pub use record::{ChallengeDetails, ChallengeRecord, RecordSource};
pub use render::FeedRenderer;

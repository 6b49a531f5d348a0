//! External tools used by the research agents
//!
//! - [`search`](crate::tools::search) - Web lookup backing search tasks (DuckDuckGo via daedra)

/// Web lookup for search tasks.
pub mod search;

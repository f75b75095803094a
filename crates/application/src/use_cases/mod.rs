//! Application use cases (business logic orchestration).

mod check_snippets;
mod list_snippets;
mod load_config;
mod process_snippet;
mod search_snippets;

pub use check_snippets::*;
pub use list_snippets::*;
pub use load_config::*;
pub use process_snippet::*;
pub use search_snippets::*;

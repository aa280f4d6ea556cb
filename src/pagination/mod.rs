//! Cursor-driven pagination
//!
//! Drives repeated executor waves, one page per round, tracking a cursor
//! per subject. After each round a caller-supplied decision continues or
//! aborts each subject independently; subjects finish in as many rounds as
//! their data requires.

mod cursor;
mod types;

pub use cursor::CursorPaginator;
pub use types::{decode_page, Page, PageResult, PageShape};

mod posted_links;

pub use posted_links::{PersistError, PostedLinks};

//! Utility functions for message text.
//!
//! - **Text processing**: markup stripping, character-based truncation, hashtags
//! - **URL validation**: only absolute http(s) URLs are handed to the channel API
//!
//! # Examples
//!
//! ```
//! use feedcast::util::{clean_markup, truncate_chars};
//!
//! assert_eq!(clean_markup("<p>Hello&nbsp;World</p>"), "Hello World");
//! assert_eq!(truncate_chars("Hello World", 5), "Hello...");
//! ```

mod text;
mod url_validator;

pub use text::{clean_markup, hashtag, truncate_chars};
pub use url_validator::{validate_media_url, UrlValidationError};

pub mod authors;
pub mod listing;
pub mod normalize;
pub mod output;

pub use authors::{select_authors, AuthorSource, CLASSIC_AUTHORS};
pub use listing::{parse_listing_page, ExtractError, FetchError, Fetcher, DEFAULT_MAX_BOOKS};

pub mod book;
pub mod catalog;
pub mod tally;

pub use book::*;
pub use catalog::*;
pub use tally::*;

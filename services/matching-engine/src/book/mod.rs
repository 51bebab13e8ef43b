//! Side books and their FIFO price levels
//!
//! `BidBook` and `AskBook` only index order ids by price; the orders
//! themselves are owned by `OrderBook`'s arena.

pub mod price_level;
pub mod bid_book;
pub mod ask_book;

pub use price_level::PriceLevel;
pub use bid_book::BidBook;
pub use ask_book::AskBook;

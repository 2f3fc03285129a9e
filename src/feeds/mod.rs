//! External collaborators at their boundary: the indexer, the price feed
//! and the delivery channel. Everything network-shaped lives in this tree;
//! the classification core receives resolved values only.

pub mod chronik;
pub mod price;
pub mod retry;
pub mod telegram;

pub use chronik::IndexerClient;
pub use price::PriceClient;
pub use telegram::TelegramSink;

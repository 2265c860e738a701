//! # Order Book Core
//!
//! A single-symbol, in-memory limit order book matching engine.
//!
//! The book is kept as three synchronized indices: an order directory
//! keyed by id, a price ladder per side holding FIFO queues of ids, and a
//! cached aggregate volume per price level. Matching follows price-time
//! priority: an incoming order sweeps the opposite ladder from the best
//! price outward, filling resting orders in arrival order at each level,
//! then rests any unfilled residual at its own price.
//!
//! ## Example
//!
//! ```rust
//! use order_book_core::{Orderbook, Order, Side};
//!
//! let mut book = Orderbook::new();
//!
//! let resting = Order::new(1, 100, 10, Side::Buy);
//! assert_eq!(book.match_order(&resting), 0); // nothing to cross, rests
//!
//! let incoming = Order::new(2, 100, 4, Side::Sell);
//! assert_eq!(book.match_order(&incoming), 1); // fills against order 1
//! assert_eq!(book.get_volume_at_level(Side::Buy, 100), 6);
//! ```

pub mod diagnostics;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod order_book;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;

pub use order_book::Orderbook;
pub use types::{Order, OrderBookError, OrderId, Price, Quantity, Side, MAX_ORDERS, PRICE_LEVELS};

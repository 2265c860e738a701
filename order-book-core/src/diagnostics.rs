//! Plain-text diagnostic dumps of orders and book state, for debugging and
//! for the CLI's `book`/`depth` commands. Not part of the matching engine's
//! contract: formatting here may change at any time.

use crate::types::Side;
use crate::{Order, Orderbook};

/// Prints a single order's fields on one line.
pub fn print_order(order: &Order) {
    println!(
        "order {{ id: {}, side: {:?}, price: {}, quantity: {} }}",
        order.id, order.side, order.price, order.quantity
    );
}

/// Prints every populated price level of `book`, sells highest-to-lowest
/// above the buy levels, buys highest-to-lowest below, one line per level.
pub fn print_orderbook(book: &Orderbook) {
    println!("-- sell side --");
    for (price, volume) in book.levels(Side::Sell).rev() {
        println!("  {price} x {volume}");
    }
    println!("-- buy side --");
    for (price, volume) in book.levels(Side::Buy).rev() {
        println!("  {price} x {volume}");
    }
}

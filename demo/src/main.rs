//! # Order Book Demo
//!
//! Walks through the matching engine's core scenarios against a fresh
//! book each time: non-crossing rests, exact and partial fills, price
//! and time priority, lazy deletion after a cancel, a quantity increase
//! that preserves time priority, and a multi-level aggressive sweep.

use order_book_core::{Order, Orderbook, Side};

fn main() {
    println!("=== Limit Order Book Demo ===\n");

    demo_basic_matching(&mut Orderbook::new());
    demo_partial_fills(&mut Orderbook::new());
    demo_price_time_priority(&mut Orderbook::new());
    demo_cancel_and_lazy_deletion(&mut Orderbook::new());
    demo_modify_preserves_time_priority(&mut Orderbook::new());
    demo_complex_scenario(&mut Orderbook::new());
}

/// A buy order at a price matches exactly with a sell order at the same
/// price.
fn demo_basic_matching(book: &mut Orderbook) {
    println!("-----------------------");
    println!("1. Basic Matching Demo:");
    println!("-----------------------");

    submit(book, Order::new(1, 100, 10, Side::Buy));
    print_book_state(book);

    submit(book, Order::new(2, 100, 10, Side::Sell));
    print_book_state(book);
}

/// Orders only partially matched leave remaining quantity in the book.
fn demo_partial_fills(book: &mut Orderbook) {
    println!("---------------------");
    println!("2. Partial Fill Demo:");
    println!("---------------------");

    submit(book, Order::new(1, 100, 15, Side::Buy));

    submit(book, Order::new(2, 100, 10, Side::Sell));
    print_book_state(book);

    submit(book, Order::new(3, 100, 10, Side::Sell));
    print_book_state(book);
}

/// Orders match first by best price, then by arrival time within a level.
fn demo_price_time_priority(book: &mut Orderbook) {
    println!("----------------------------");
    println!("3. Price-Time Priority Demo:");
    println!("----------------------------");

    submit(book, Order::new(1, 99, 10, Side::Buy));
    submit(book, Order::new(2, 100, 10, Side::Buy));
    submit(book, Order::new(3, 100, 10, Side::Buy));

    print_book_state(book);

    submit(book, Order::new(4, 99, 25, Side::Sell));

    print_book_state(book);
}

/// Cancelling a resting order leaves its id in the ladder queue until a
/// later traversal reaches and drops it; the cached volume reflects the
/// cancel immediately either way.
fn demo_cancel_and_lazy_deletion(book: &mut Orderbook) {
    println!("-----------------------------");
    println!("4. Cancel / Lazy Delete Demo:");
    println!("-----------------------------");

    submit(book, Order::new(1, 100, 5, Side::Sell));
    submit(book, Order::new(2, 100, 5, Side::Sell));
    print_book_state(book);

    println!("--Cancelling order 1");
    book.modify_order_by_id(1, 0);
    println!("--Volume at sell 100 is already {} (queue still holds the stale id)",
        book.get_volume_at_level(Side::Sell, 100));

    submit(book, Order::new(3, 100, 5, Side::Buy));
    print_book_state(book);
}

/// Increasing a resting order's quantity adjusts the cached volume but
/// never re-queues it: an order that arrived first still fills first.
fn demo_modify_preserves_time_priority(book: &mut Orderbook) {
    println!("----------------------------------");
    println!("5. Modify Preserves Priority Demo:");
    println!("----------------------------------");

    submit(book, Order::new(1, 100, 5, Side::Buy));
    submit(book, Order::new(2, 100, 5, Side::Buy));

    println!("--Increasing order 1's quantity from 5 to 10");
    book.modify_order_by_id(1, 10);
    println!("--Volume at buy 100 is now {}", book.get_volume_at_level(Side::Buy, 100));

    submit(book, Order::new(3, 100, 7, Side::Sell));
    print_book_state(book);
}

/// Aggressive orders that cross the spread and sweep multiple price
/// levels, illustrating realistic market behavior.
fn demo_complex_scenario(book: &mut Orderbook) {
    println!("---------------------------");
    println!("6. Complex Market Scenario:");
    println!("---------------------------");

    println!("Building initial order book:");
    submit(book, Order::new(1, 98, 20, Side::Buy));
    submit(book, Order::new(2, 99, 15, Side::Buy));
    submit(book, Order::new(3, 100, 10, Side::Buy));
    submit(book, Order::new(4, 101, 10, Side::Sell));
    submit(book, Order::new(5, 102, 15, Side::Sell));
    submit(book, Order::new(6, 103, 20, Side::Sell));

    print_book_state(book);

    println!("\nLarge aggressive BUY order crosses spread:");
    submit(book, Order::new(7, 102, 30, Side::Buy));
    print_book_state(book);

    println!("\nLarge aggressive SELL order:");
    submit(book, Order::new(8, 98, 40, Side::Sell));
    print_book_state(book);
}

fn submit(book: &mut Orderbook, order: Order) {
    println!(
        "--Placing {:?} order: ID={}, Price={}, Qty={}",
        order.side, order.id, order.price, order.quantity
    );
    let matches = book.match_order(&order);
    if matches == 0 {
        println!("----No trades executed");
    } else {
        println!("----Matched {matches} resting order(s)");
    }
}

fn print_book_state(book: &Orderbook) {
    println!("--Book state:");
    match book.levels(Side::Buy).next_back() {
        Some((price, volume)) => println!("----Best BUY:  {volume} @ {price}"),
        None => println!("----Best BUY:  None"),
    }
    match book.levels(Side::Sell).next() {
        Some((price, volume)) => println!("----Best SELL: {volume} @ {price}"),
        None => println!("----Best SELL: None"),
    }
    println!();
}

#![cfg(test)]

use crate::types::{Order, OrderId, Price, Quantity, Side};
use crate::Orderbook;

pub(crate) fn new_book() -> Orderbook {
    Orderbook::new()
}

pub(crate) fn buy(id: OrderId, price: Price, quantity: Quantity) -> Order {
    Order::new(id, price, quantity, Side::Buy)
}

pub(crate) fn sell(id: OrderId, price: Price, quantity: Quantity) -> Order {
    Order::new(id, price, quantity, Side::Sell)
}

//! C-callable ABI over [`crate::Orderbook`], for hosts embedding the engine
//! from outside Rust. Thin `unsafe` wrappers only; all matching logic lives
//! in the safe core.

use crate::types::{Order, OrderId, Price, Quantity, Side};
use crate::Orderbook;
use std::process;

/// `#[repr(C)]` mirror of [`Side`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiSide {
    Buy = 0,
    Sell = 1,
}

impl From<FfiSide> for Side {
    fn from(side: FfiSide) -> Self {
        match side {
            FfiSide::Buy => Side::Buy,
            FfiSide::Sell => Side::Sell,
        }
    }
}

impl From<Side> for FfiSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Buy => FfiSide::Buy,
            Side::Sell => FfiSide::Sell,
        }
    }
}

/// `#[repr(C)]` mirror of [`Order`]. Field order and width match the
/// original ABI's packed layout note: trailing padding after `side` is
/// implementation-defined and must not be relied on by callers.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiOrder {
    pub id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
    pub side: FfiSide,
}

impl From<FfiOrder> for Order {
    fn from(order: FfiOrder) -> Self {
        Order::new(order.id, order.price, order.quantity, order.side.into())
    }
}

impl From<Order> for FfiOrder {
    fn from(order: Order) -> Self {
        FfiOrder {
            id: order.id,
            price: order.price,
            quantity: order.quantity,
            side: order.side.into(),
        }
    }
}

/// Allocates a new, empty orderbook and returns an owning pointer to it.
/// The caller must eventually pass the pointer to [`destroy_orderbook`]
/// exactly once.
#[unsafe(no_mangle)]
pub extern "C" fn create_orderbook() -> *mut Orderbook {
    Box::into_raw(Box::new(Orderbook::new()))
}

/// Frees an orderbook previously returned by [`create_orderbook`]. Passing
/// a null pointer is a no-op; passing any other pointer not obtained from
/// [`create_orderbook`], or calling this twice on the same pointer, is
/// undefined behavior.
///
/// # Safety
///
/// `book` must be either null or a pointer previously returned by
/// [`create_orderbook`] that has not already been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn destroy_orderbook(book: *mut Orderbook) {
    if book.is_null() {
        return;
    }
    drop(unsafe { Box::from_raw(book) });
}

/// # Safety
///
/// `book` must be a non-null pointer obtained from [`create_orderbook`]
/// and not yet destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn match_order(book: *mut Orderbook, order: FfiOrder) -> u32 {
    debug_assert!(!book.is_null());
    let book = unsafe { &mut *book };
    book.match_order(&order.into())
}

/// # Safety
///
/// `book` must be a non-null pointer obtained from [`create_orderbook`]
/// and not yet destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn modify_order_by_id(
    book: *mut Orderbook,
    id: OrderId,
    new_quantity: Quantity,
) {
    debug_assert!(!book.is_null());
    let book = unsafe { &mut *book };
    book.modify_order_by_id(id, new_quantity);
}

/// # Safety
///
/// `book` must be a non-null pointer obtained from [`create_orderbook`]
/// and not yet destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn get_volume_at_level(
    book: *const Orderbook,
    side: FfiSide,
    price: Price,
) -> u32 {
    debug_assert!(!book.is_null());
    let book = unsafe { &*book };
    book.get_volume_at_level(side.into(), price)
}

/// Looks up an order by id. Aborts the process if no live order with that
/// id exists, matching the original ABI's trap-on-missing-id contract
/// (there is no exception mechanism to propagate across an `extern "C"`
/// boundary).
///
/// # Safety
///
/// `book` must be a non-null pointer obtained from [`create_orderbook`]
/// and not yet destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lookup_order_by_id(book: *const Orderbook, id: OrderId) -> FfiOrder {
    debug_assert!(!book.is_null());
    let book = unsafe { &*book };
    match book.lookup_order_by_id(id) {
        Ok(order) => order.into(),
        Err(_) => process::abort(),
    }
}

/// # Safety
///
/// `book` must be a non-null pointer obtained from [`create_orderbook`]
/// and not yet destroyed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn order_exists(book: *const Orderbook, id: OrderId) -> bool {
    debug_assert!(!book.is_null());
    let book = unsafe { &*book };
    book.order_exists(id)
}

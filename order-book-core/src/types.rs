use derive_more::Display;
use std::collections::VecDeque;

/// Unique identifier for a resting or incoming order.
pub type OrderId = u32;

/// Price in ticks. Valid range is `[0, PRICE_LEVELS)`.
pub type Price = u16;

/// Resting quantity. Zero means "no resting quantity".
pub type Quantity = u16;

/// Number of distinct tick price levels each side of the book can hold.
pub const PRICE_LEVELS: usize = 1024;

/// Working-set size the engine is designed around. Ids are not required
/// to stay below this bound (`OrderId` is a full `u32`), but a host
/// embedding the engine in a fixed-capacity arena should provision for
/// this many simultaneously-resting orders.
pub const MAX_ORDERS: usize = 20_000;

/// Side of an order: buy (bid) or sell (ask).
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "cli", value(rename_all = "lower"))]
pub enum Side {
    /// Buy order (bid) - willing to buy at the specified price or lower.
    Buy,
    /// Sell order (ask) - willing to sell at the specified price or higher.
    Sell,
}

impl Side {
    /// The side an incoming order of `self` crosses against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// A single limit order. Fixed layout: callers cannot add fields to this
/// type (see the engine's data model).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// Unique identifier for the order.
    pub id: OrderId,
    /// Price per unit, in ticks.
    pub price: Price,
    /// Number of units still resting / to be matched.
    pub quantity: Quantity,
    /// Buy or sell.
    pub side: Side,
}

impl Order {
    /// Creates a new order with the given attributes.
    pub fn new(id: OrderId, price: Price, quantity: Quantity, side: Side) -> Self {
        Order {
            id,
            price,
            quantity,
            side,
        }
    }
}

/// Error type for order book query operations.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBookError {
    /// No live order with this id exists in the directory.
    #[display("order {} not found", _0)]
    NotFound(OrderId),
}

/// One populated price level: the FIFO queue of resting order ids at this
/// price, plus the cached aggregate resting volume.
///
/// `queue` may contain stale ids whose directory entry has already been
/// removed (lazy deletion). Stale ids are skipped and dropped the next
/// time a matcher traversal reaches them; `volume` never counts a stale
/// id, and is adjusted eagerly by every mutation that changes a live
/// order's quantity, so a volume query never needs to walk the queue.
#[derive(Debug, Default)]
pub(crate) struct PriceLevel {
    pub(crate) queue: VecDeque<OrderId>,
    pub(crate) volume: u32,
}

impl PriceLevel {
    pub(crate) fn new() -> Self {
        PriceLevel {
            queue: VecDeque::new(),
            volume: 0,
        }
    }

    /// Appends an id to the tail of the queue and adds to the cached volume.
    pub(crate) fn push(&mut self, id: OrderId, quantity: Quantity) {
        self.queue.push_back(id);
        self.volume += quantity as u32;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

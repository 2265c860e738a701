use crate::types::{Order, OrderBookError, OrderId, Price, PriceLevel, Quantity, Side, PRICE_LEVELS};
use std::collections::{BTreeMap, HashMap};

/// The limit order book: an order directory plus a buy and a sell price
/// ladder, kept in sync by every mutating operation below.
///
/// `directory` is the single source of truth for "is this id live, and
/// what are its attributes". The ladders hold only ids, in FIFO arrival
/// order per price; an id's presence in a ladder queue without a matching
/// directory entry means the order was cancelled or fully filled and is
/// waiting to be lazily dropped by the next traversal that reaches it.
pub struct Orderbook {
    directory: HashMap<OrderId, Order>,
    buy_ladder: BTreeMap<Price, PriceLevel>,
    sell_ladder: BTreeMap<Price, PriceLevel>,
}

impl Orderbook {
    /// Returns a freshly initialized, empty book.
    pub fn new() -> Self {
        Orderbook {
            directory: HashMap::new(),
            buy_ladder: BTreeMap::new(),
            sell_ladder: BTreeMap::new(),
        }
    }

    fn ladder(&self, side: Side) -> &BTreeMap<Price, PriceLevel> {
        match side {
            Side::Buy => &self.buy_ladder,
            Side::Sell => &self.sell_ladder,
        }
    }

    fn ladder_mut(&mut self, side: Side) -> &mut BTreeMap<Price, PriceLevel> {
        match side {
            Side::Buy => &mut self.buy_ladder,
            Side::Sell => &mut self.sell_ladder,
        }
    }

    /// Matches `incoming` against the opposite ladder under price-time
    /// priority, then rests any unfilled residual. Returns the number of
    /// distinct resting orders that received a nonzero fill.
    ///
    /// The caller guarantees `incoming.id` is not currently live in the
    /// book; passing a duplicate live id is undefined behavior (debug
    /// asserted, not checked in release).
    pub fn match_order(&mut self, incoming: &Order) -> u32 {
        debug_assert!(
            !self.directory.contains_key(&incoming.id),
            "match_order called with an id already live in the book"
        );
        debug_assert!((incoming.price as usize) < PRICE_LEVELS);

        let mut working = *incoming;
        let mut match_count = 0u32;
        let opposite = incoming.side.opposite();

        let crossing_prices: Vec<Price> = match incoming.side {
            // BUY: sweep sell ladder from lowest price upward while price <= working.price.
            Side::Buy => self
                .ladder(opposite)
                .range(..=working.price)
                .map(|(price, _)| *price)
                .collect(),
            // SELL: sweep buy ladder from highest price downward while price >= working.price.
            Side::Sell => self
                .ladder(opposite)
                .range(working.price..)
                .rev()
                .map(|(price, _)| *price)
                .collect(),
        };

        for price in crossing_prices {
            if working.quantity == 0 {
                break;
            }
            match_count += self.drain_level(opposite, price, &mut working);
        }

        if working.quantity > 0 {
            self.rest(working);
        }

        match_count
    }

    /// Walks one price level's FIFO queue from the head, matching resting
    /// orders against `working` until the level is exhausted or `working`
    /// is filled. Removes the level from its ladder if it empties.
    fn drain_level(&mut self, side: Side, price: Price, working: &mut Order) -> u32 {
        let mut match_count = 0u32;

        {
            let level = match self.ladder_mut(side).get_mut(&price) {
                Some(level) => level,
                None => return 0,
            };

            while working.quantity > 0 {
                let head_id = match level.queue.front().copied() {
                    Some(id) => id,
                    None => break,
                };

                let resting = match self.directory.get_mut(&head_id) {
                    Some(order) => order,
                    None => {
                        // stale id, lazily dropped, does not count as a match
                        level.queue.pop_front();
                        continue;
                    }
                };

                let trade = working.quantity.min(resting.quantity);
                working.quantity -= trade;
                resting.quantity -= trade;
                level.volume -= trade as u32;
                match_count += 1;

                if resting.quantity == 0 {
                    level.queue.pop_front();
                    self.directory.remove(&head_id);
                }
            }
        }

        let level_empty = self
            .ladder(side)
            .get(&price)
            .map(|level| level.is_empty())
            .unwrap_or(false);
        if level_empty {
            self.ladder_mut(side).remove(&price);
        }

        match_count
    }

    /// Inserts a still-live working order as resting liquidity.
    fn rest(&mut self, order: Order) {
        let id = order.id;
        let quantity = order.quantity;
        let price = order.price;
        self.ladder_mut(order.side)
            .entry(price)
            .or_insert_with(PriceLevel::new)
            .push(id, quantity);
        self.directory.insert(id, order);
    }

    /// Applies a quantity change or cancellation to a resting order.
    ///
    /// An unknown id is a silent no-op. `new_quantity == 0` cancels: the
    /// directory entry is removed and the level's cached volume is
    /// decremented immediately, but the stale id is left in the ladder
    /// queue for lazy cleanup. Otherwise the quantity is updated in place
    /// and the cached volume is adjusted by the signed delta; time
    /// priority is never affected by a modification.
    pub fn modify_order_by_id(&mut self, id: OrderId, new_quantity: Quantity) {
        let Some(order) = self.directory.get_mut(&id) else {
            return;
        };
        let (side, price, old_quantity) = (order.side, order.price, order.quantity);

        if new_quantity == 0 {
            self.directory.remove(&id);
        } else {
            order.quantity = new_quantity;
        }

        if let Some(level) = self.ladder_mut(side).get_mut(&price) {
            level.volume = (level.volume as i64 + new_quantity as i64 - old_quantity as i64) as u32;
        }
    }

    /// Returns the cached aggregate resting volume at `(side, price)`, or
    /// 0 if no orders rest there.
    pub fn get_volume_at_level(&self, side: Side, price: Price) -> u32 {
        self.ladder(side).get(&price).map_or(0, |level| level.volume)
    }

    /// Returns a copy of the live order with this id.
    ///
    /// # Errors
    ///
    /// Returns [`OrderBookError::NotFound`] if `id` is not currently live.
    pub fn lookup_order_by_id(&self, id: OrderId) -> Result<Order, OrderBookError> {
        self.directory
            .get(&id)
            .copied()
            .ok_or(OrderBookError::NotFound(id))
    }

    /// Returns whether `id` is currently live in the directory.
    pub fn order_exists(&self, id: OrderId) -> bool {
        self.directory.contains_key(&id)
    }

    /// Iterates populated price levels on `side`, lowest price first, as
    /// `(price, cached_volume)` pairs. Intended for diagnostics and depth
    /// reporting, not the matching path.
    pub fn levels(&self, side: Side) -> impl DoubleEndedIterator<Item = (Price, u32)> + '_ {
        self.ladder(side).iter().map(|(price, level)| (*price, level.volume))
    }
}

impl Default for Orderbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    // --- spec.md §8 concrete end-to-end scenarios ---

    #[test]
    fn scenario_1_non_crossing_rest() {
        let mut book = new_book();
        let matches = book.match_order(&buy(1, 100, 10));
        assert_eq!(matches, 0);
        assert_eq!(book.get_volume_at_level(Side::Buy, 100), 10);
        assert!(book.order_exists(1));
    }

    #[test]
    fn scenario_2_exact_cross() {
        let mut book = new_book();
        book.match_order(&buy(1, 100, 10));
        let matches = book.match_order(&sell(2, 100, 10));
        assert_eq!(matches, 1);
        assert!(!book.order_exists(1));
        assert!(!book.order_exists(2));
        assert_eq!(book.get_volume_at_level(Side::Buy, 100), 0);
    }

    #[test]
    fn scenario_3_partial_fill_leaves_resting_incoming() {
        let mut book = new_book();
        book.match_order(&buy(1, 100, 5));
        book.match_order(&buy(2, 100, 5));
        let matches = book.match_order(&sell(3, 100, 12));

        assert_eq!(matches, 2);
        assert!(!book.order_exists(1));
        assert!(!book.order_exists(2));
        assert!(book.order_exists(3));
        assert_eq!(book.lookup_order_by_id(3).unwrap().quantity, 2);
        assert_eq!(book.get_volume_at_level(Side::Sell, 100), 2);
        assert_eq!(book.get_volume_at_level(Side::Buy, 100), 0);
    }

    #[test]
    fn scenario_4_price_priority_across_levels() {
        let mut book = new_book();
        book.match_order(&sell(1, 101, 5));
        book.match_order(&sell(2, 100, 5));
        let matches = book.match_order(&buy(3, 101, 8));

        assert_eq!(matches, 2);
        assert_eq!(book.lookup_order_by_id(1).unwrap().quantity, 2);
        assert!(!book.order_exists(2));
        assert!(!book.order_exists(3));
        assert_eq!(book.get_volume_at_level(Side::Sell, 101), 2);
        assert_eq!(book.get_volume_at_level(Side::Sell, 100), 0);
    }

    #[test]
    fn scenario_5_time_priority_within_level() {
        let mut book = new_book();
        book.match_order(&sell(10, 100, 3));
        book.match_order(&sell(11, 100, 3));
        let matches = book.match_order(&buy(12, 100, 4));

        assert_eq!(matches, 2);
        assert!(!book.order_exists(10));
        assert_eq!(book.lookup_order_by_id(11).unwrap().quantity, 2);
    }

    #[test]
    fn scenario_6_lazy_deletion_correctness() {
        let mut book = new_book();
        book.match_order(&sell(1, 100, 5));
        book.match_order(&sell(2, 100, 5));
        book.modify_order_by_id(1, 0);

        let matches = book.match_order(&buy(3, 100, 5));
        assert_eq!(matches, 1);
        assert_eq!(book.get_volume_at_level(Side::Sell, 100), 0);
    }

    #[test]
    fn scenario_7_modify_preserves_time_priority() {
        let mut book = new_book();
        book.match_order(&buy(1, 100, 5));
        book.match_order(&buy(2, 100, 5));
        book.modify_order_by_id(1, 10);

        let matches = book.match_order(&sell(3, 100, 7));
        assert_eq!(matches, 1);
        assert_eq!(book.lookup_order_by_id(1).unwrap().quantity, 3);
        assert_eq!(book.lookup_order_by_id(2).unwrap().quantity, 5);
    }

    // --- edge cases from spec.md §4.1 ---

    #[test]
    fn zero_quantity_incoming_is_a_no_op() {
        let mut book = new_book();
        let matches = book.match_order(&buy(1, 100, 0));
        assert_eq!(matches, 0);
        assert!(!book.order_exists(1));
        assert_eq!(book.get_volume_at_level(Side::Buy, 100), 0);
    }

    #[test]
    fn no_crossing_levels_rests_whole_order() {
        let mut book = new_book();
        book.match_order(&sell(1, 200, 10));
        let matches = book.match_order(&buy(2, 100, 10));
        assert_eq!(matches, 0);
        assert!(book.order_exists(2));
        assert_eq!(book.get_volume_at_level(Side::Buy, 100), 10);
    }

    // --- round-trip / idempotence laws from spec.md §8 ---

    #[test]
    fn modify_is_idempotent() {
        let mut book = new_book();
        book.match_order(&buy(1, 100, 10));
        book.modify_order_by_id(1, 7);
        let after_first = book.lookup_order_by_id(1).unwrap();
        let volume_after_first = book.get_volume_at_level(Side::Buy, 100);

        book.modify_order_by_id(1, 7);
        assert_eq!(book.lookup_order_by_id(1).unwrap(), after_first);
        assert_eq!(book.get_volume_at_level(Side::Buy, 100), volume_after_first);
    }

    #[test]
    fn cancel_then_exists_is_false() {
        let mut book = new_book();
        book.match_order(&buy(1, 100, 10));
        book.modify_order_by_id(1, 0);
        assert!(!book.order_exists(1));
    }

    #[test]
    fn non_crossing_order_round_trips_through_lookup() {
        let mut book = new_book();
        let order = buy(1, 100, 10);
        let matches = book.match_order(&order);
        assert_eq!(matches, 0);
        assert_eq!(book.lookup_order_by_id(1).unwrap(), order);
    }

    // --- directory / modifier details ---

    #[test]
    fn modify_unknown_id_is_silent_no_op() {
        let mut book = new_book();
        book.modify_order_by_id(999, 5);
        assert!(!book.order_exists(999));
    }

    #[test]
    fn lookup_missing_id_errs() {
        let book = new_book();
        assert_eq!(book.lookup_order_by_id(1), Err(OrderBookError::NotFound(1)));
    }

    #[test]
    fn volume_query_on_empty_level_is_zero() {
        let book = new_book();
        assert_eq!(book.get_volume_at_level(Side::Buy, 500), 0);
    }

    #[test]
    fn modify_quantity_increase_adjusts_volume_and_keeps_priority() {
        let mut book = new_book();
        book.match_order(&sell(1, 100, 5));
        book.modify_order_by_id(1, 8);
        assert_eq!(book.get_volume_at_level(Side::Sell, 100), 8);
        assert_eq!(book.lookup_order_by_id(1).unwrap().quantity, 8);
    }

    #[test]
    fn aggressive_sweep_across_multiple_levels_and_sides() {
        let mut book = new_book();
        book.match_order(&sell(1, 100, 10));
        book.match_order(&sell(2, 101, 20));
        book.match_order(&sell(3, 102, 30));

        let matches = book.match_order(&buy(4, 101, 25));
        assert_eq!(matches, 2);
        assert_eq!(book.get_volume_at_level(Side::Sell, 100), 0);
        assert_eq!(book.get_volume_at_level(Side::Sell, 101), 5);
        assert_eq!(book.get_volume_at_level(Side::Sell, 102), 30);
        assert!(!book.order_exists(1));
        assert!(book.order_exists(2));
        assert_eq!(book.lookup_order_by_id(2).unwrap().quantity, 5);
    }

    /// Minimal xorshift PRNG, seeded for reproducibility. No dependency on
    /// any property-testing crate is introduced for this.
    struct Xorshift32(u32);

    impl Xorshift32 {
        fn next_u32(&mut self) -> u32 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            x
        }

        fn next_below(&mut self, bound: u32) -> u32 {
            self.next_u32() % bound
        }
    }

    /// Checks, against the book's private state directly, the invariants a
    /// correct implementation must hold after every operation:
    ///
    /// 1. a live id appears in exactly one ladder queue, at the side and
    ///    price recorded for it in the directory, and nowhere else;
    /// 2. a level's cached volume is exactly the sum of the live resting
    ///    quantities of the ids in its queue (stale ids excluded);
    /// 3. no populated ladder entry has an empty queue;
    /// 5. within a level's queue, live ids appear in arrival order — in
    ///    this test arrival order is id order, since ids are handed out by
    ///    a monotonically increasing counter.
    fn assert_invariants(book: &Orderbook) {
        for (&id, order) in &book.directory {
            let (own_ladder, other_ladder) = match order.side {
                Side::Buy => (&book.buy_ladder, &book.sell_ladder),
                Side::Sell => (&book.sell_ladder, &book.buy_ladder),
            };

            let at_own_price = own_ladder
                .get(&order.price)
                .map_or(0, |level| level.queue.iter().filter(|&&qid| qid == id).count());
            assert_eq!(at_own_price, 1, "id {id} must appear exactly once at its own side/price");

            let at_other_prices: usize = own_ladder
                .iter()
                .filter(|&(&price, _)| price != order.price)
                .map(|(_, level)| level.queue.iter().filter(|&&qid| qid == id).count())
                .sum();
            assert_eq!(at_other_prices, 0, "id {id} must not appear at another price on its own side");

            let on_other_side: usize = other_ladder
                .values()
                .map(|level| level.queue.iter().filter(|&&qid| qid == id).count())
                .sum();
            assert_eq!(on_other_side, 0, "id {id} must not appear on the opposite side");
        }

        for ladder in [&book.buy_ladder, &book.sell_ladder] {
            for level in ladder.values() {
                assert!(!level.is_empty(), "no populated ladder entry may have an empty queue");

                let live_sum: u32 = level
                    .queue
                    .iter()
                    .filter_map(|qid| book.directory.get(qid))
                    .map(|order| order.quantity as u32)
                    .sum();
                assert_eq!(level.volume, live_sum, "cached volume must equal the sum of live resting quantities");

                let live_ids_in_order: Vec<OrderId> = level
                    .queue
                    .iter()
                    .copied()
                    .filter(|qid| book.directory.contains_key(qid))
                    .collect();
                assert!(
                    live_ids_in_order.windows(2).all(|w| w[0] < w[1]),
                    "time priority violated: live ids within a level must stay in arrival order"
                );
            }
        }
    }

    #[test]
    fn randomized_workload_preserves_invariants() {
        let mut book = new_book();
        let mut rng = Xorshift32(0x9e3779b9);
        let mut live_ids = Vec::new();
        let mut next_id: OrderId = 1;

        for _ in 0..5000 {
            let op = rng.next_below(4);
            match op {
                0 | 1 => {
                    let side = if rng.next_below(2) == 0 { Side::Buy } else { Side::Sell };
                    let price = rng.next_below(32) as Price;
                    let quantity = (rng.next_below(50) + 1) as Quantity;
                    let id = next_id;
                    next_id += 1;
                    let order = Order::new(id, price, quantity, side);

                    book.match_order(&order);

                    if book.order_exists(id) {
                        live_ids.push(id);
                    }
                }
                2 => {
                    if !live_ids.is_empty() {
                        let idx = rng.next_below(live_ids.len() as u32) as usize;
                        let id = live_ids[idx];
                        let new_quantity = rng.next_below(60) as Quantity;
                        book.modify_order_by_id(id, new_quantity);
                        if new_quantity == 0 {
                            live_ids.swap_remove(idx);
                        }
                    }
                }
                _ => {
                    if !live_ids.is_empty() {
                        let idx = rng.next_below(live_ids.len() as u32) as usize;
                        let id = live_ids[idx];
                        assert!(book.order_exists(id));
                        assert!(book.lookup_order_by_id(id).is_ok());
                    }
                }
            }

            assert_invariants(&book);
        }

        live_ids.retain(|id| book.order_exists(*id));
        for id in live_ids {
            assert!(book.lookup_order_by_id(id).is_ok());
        }
    }
}

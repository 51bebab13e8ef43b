//! Trade execution logic
//!
//! Turns a maker/taker fill into an immutable `Trade` with a monotonic id.

use types::ids::{Tick, TradeId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::{Counterparty, Trade};

/// Match executor for handling trade generation
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    sequence_counter: u64,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Sequence number the next trade will receive
    pub fn peek_sequence(&self) -> u64 {
        self.sequence_counter
    }

    /// Execute a trade between maker and taker orders
    ///
    /// `price` is the maker's price; `aggressor` is the taker's side.
    pub fn execute_trade(
        &mut self,
        aggressor: Side,
        maker: Counterparty,
        taker: Counterparty,
        price: Price,
        quantity: Quantity,
        tick: Tick,
    ) -> Trade {
        let trade_id = TradeId::new(self.next_sequence());
        Trade::new(trade_id, aggressor, maker, taker, price, quantity, tick)
    }
}

impl Default for MatchExecutor {
    fn default() -> Self {
        Self::new(1)
    }
}

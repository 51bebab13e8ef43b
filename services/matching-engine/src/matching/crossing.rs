//! Crossing detection logic
//!
//! Determines when a bid and ask can match based on price compatibility.
//! Crossing is the trigger for execution, never an error state.

use types::numeric::Price;
use types::order::Side;

/// Check if a bid and ask can match at given prices
///
/// For a buy order to match with a sell order the buy price must be >= the
/// sell price.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Check if an incoming order can match against resting order
///
/// Returns true if the incoming limit crosses the resting order price
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::BUY => can_match(incoming_price, resting_price),
        Side::SELL => can_match(resting_price, incoming_price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_match_exact() {
        let price = Price::from_u64(100);
        assert!(can_match(price, price), "Equal prices should match");
    }

    #[test]
    fn test_can_match_no_cross() {
        assert!(!can_match(Price::from_u64(99), Price::from_u64(100)));
    }

    #[test]
    fn test_incoming_buy_can_match() {
        assert!(incoming_can_match(Side::BUY, Price::from_u64(100), Price::from_u64(99)));
        assert!(!incoming_can_match(Side::BUY, Price::from_u64(98), Price::from_u64(99)));
    }

    #[test]
    fn test_incoming_sell_can_match() {
        assert!(incoming_can_match(Side::SELL, Price::from_u64(99), Price::from_u64(100)));
        assert!(!incoming_can_match(Side::SELL, Price::from_u64(101), Price::from_u64(100)));
    }
}

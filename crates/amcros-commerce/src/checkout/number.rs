//! Order number generation.

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix on every order number.
pub const ORDER_NUMBER_PREFIX: &str = "AMC";

/// Produces the human-facing order number for a new order.
pub trait OrderNumberGenerator: Send + Sync {
    fn next_number(&self) -> String;
}

/// `AMC` followed by a random six-digit suffix (100000-999999).
///
/// Collisions are possible; nothing checks for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderNumbers;

impl OrderNumberGenerator for RandomOrderNumbers {
    fn next_number(&self) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(100_000..=999_999);
        format!("{}{}", ORDER_NUMBER_PREFIX, suffix)
    }
}

/// Numeric part of an `AMC` order number.
pub fn order_number_value(number: &str) -> Option<u64> {
    let digits = number.trim().strip_prefix(ORDER_NUMBER_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `AMC` followed by a zero-padded counter.
///
/// The counter lives in memory; seed it with [`SequentialOrderNumbers::after`]
/// from the numbers already stored so a restart does not reuse them.
#[derive(Debug)]
pub struct SequentialOrderNumbers {
    next: AtomicU64,
}

impl SequentialOrderNumbers {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl SequentialOrderNumbers {
    /// Continue after the highest number in `issued`. Numbers without the
    /// `AMC` prefix are ignored.
    pub fn after<'a>(issued: impl IntoIterator<Item = &'a str>) -> Self {
        let last = issued
            .into_iter()
            .filter_map(order_number_value)
            .max()
            .unwrap_or(0);
        Self::starting_at(last.saturating_add(1))
    }
}

impl Default for SequentialOrderNumbers {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl OrderNumberGenerator for SequentialOrderNumbers {
    fn next_number(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{:06}", ORDER_NUMBER_PREFIX, n)
    }
}

//! Key generation port.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use winechain_core::ProductKey;

/// Hands out candidate keys for new products.
///
/// Uniqueness against the store is still enforced by the create-only put;
/// a generator only has to avoid handing out the same key twice itself.
pub trait KeyGenerator: Send + Sync {
    fn next_key(&self) -> ProductKey;
}

impl<G> KeyGenerator for Arc<G>
where
    G: KeyGenerator + ?Sized,
{
    fn next_key(&self) -> ProductKey {
        (**self).next_key()
    }
}

/// Atomic counter starting at a configurable key.
#[derive(Debug)]
pub struct MonotonicKeyGenerator {
    next: AtomicU64,
}

impl MonotonicKeyGenerator {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for MonotonicKeyGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl KeyGenerator for MonotonicKeyGenerator {
    fn next_key(&self) -> ProductKey {
        ProductKey::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn counts_up_from_start() {
        let keys = MonotonicKeyGenerator::starting_at(100);
        assert_eq!(keys.next_key(), ProductKey::new(100));
        assert_eq!(keys.next_key(), ProductKey::new(101));
    }

    #[test]
    fn keys_are_unique_across_threads() {
        let keys = MonotonicKeyGenerator::default();
        let seen: Vec<ProductKey> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| (0..250).map(|_| keys.next_key()).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        let unique: HashSet<_> = seen.iter().copied().collect();
        assert_eq!(unique.len(), 1000);
    }
}

//! Per-vendor write serialization.
//!
//! Two concurrent Learn calls for the same vendor would race on the
//! read-modify-write of the vendor row and the correction counters, so each
//! vendor name maps to one mutex. Different vendors proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
pub struct VendorLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl VendorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock cell for a vendor, created on first use.
    pub fn lock_for(&self, vendor_name: &str) -> Arc<Mutex<()>> {
        let mut registry = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        registry
            .entry(vendor_name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_vendor_shares_a_lock() {
        let locks = VendorLocks::new();
        let a = locks.lock_for("Supplier GmbH");
        let b = locks.lock_for("Supplier GmbH");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_vendors_get_distinct_locks() {
        let locks = VendorLocks::new();
        let a = locks.lock_for("Supplier GmbH");
        let b = locks.lock_for("Other AG");
        assert!(!Arc::ptr_eq(&a, &b));
    }
}

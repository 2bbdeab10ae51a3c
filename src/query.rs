//! Read-only lookups over the store. All of them are linear scans.

use tracing::debug;

use crate::error::Result;
use crate::record::Order;
use crate::store::OrderStore;

impl OrderStore {
    /// The first record with `order_id`, if any.
    pub fn find_by_id(&self, order_id: i64) -> Result<Option<Order>> {
        for line in self.lines()? {
            if let Some(order) = line?.into_order()
                && order.order_id == order_id
            {
                return Ok(Some(order));
            }
        }
        Ok(None)
    }

    /// Every record whose product name contains `needle`, ignoring case.
    pub fn find_by_product_substring(&self, needle: &str) -> Result<Vec<Order>> {
        let needle = needle.to_lowercase();
        let mut found = Vec::new();
        for line in self.lines()? {
            if let Some(order) = line?.into_order()
                && order.product_name.to_lowercase().contains(&needle)
            {
                found.push(order);
            }
        }
        debug!(needle = %needle, matches = found.len(), "product search");
        Ok(found)
    }

    /// Every record with `order_id`, in file order.
    ///
    /// Position `i` in the result is ordinal `i + 1` for
    /// [`OrderStore::delete_selected`].
    pub fn matches_for(&self, order_id: i64) -> Result<Vec<Order>> {
        let mut found = Vec::new();
        for line in self.lines()? {
            if let Some(order) = line?.into_order()
                && order.order_id == order_id
            {
                found.push(order);
            }
        }
        Ok(found)
    }
}

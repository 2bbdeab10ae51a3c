//! Line transforms driven by [`OrderStore::atomic_rewrite`].
//!
//! A transform sees every line of the store file in order and decides what
//! goes into the replacement file: `None` drops the line, `Some(bytes)` emits
//! `bytes` (without its line terminator). Returning an error aborts the
//! rewrite and leaves the original file as it was.
//!
//! [`OrderStore::atomic_rewrite`]: crate::store::OrderStore::atomic_rewrite

use crate::error::Result;
use crate::record::{Order, encode};
use crate::store::Line;

/// A rewrite step that processes the store file one line at a time.
pub trait LineTransform {
    /// Process a single line, returning the text to keep, if any.
    fn process(&mut self, line: &Line) -> Result<Option<Vec<u8>>>;

    /// The display name of this transform, used in logs and errors.
    fn name(&self) -> &str {
        "REWRITE"
    }
}

impl<F> LineTransform for F
where
    F: FnMut(&Line) -> Result<Option<Vec<u8>>>,
{
    fn process(&mut self, line: &Line) -> Result<Option<Vec<u8>>> {
        self(line)
    }
}

fn keep(line: &Line) -> Option<Vec<u8>> {
    Some(line.raw().to_vec())
}

/// Replace the first record with `order_id`, passing everything else through.
pub struct ReplaceFirst {
    order_id: i64,
    replacement: Order,
    done: bool,
}

impl ReplaceFirst {
    pub fn new(order_id: i64, replacement: Order) -> Self {
        Self {
            order_id,
            replacement,
            done: false,
        }
    }

    /// Whether a matching line has been replaced yet.
    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl LineTransform for ReplaceFirst {
    fn process(&mut self, line: &Line) -> Result<Option<Vec<u8>>> {
        match line.order() {
            Some(order) if !self.done && order.order_id == self.order_id => {
                self.done = true;
                let mut encoded = encode(&self.replacement).into_bytes();
                encoded.pop();
                Ok(Some(encoded))
            }
            _ => Ok(keep(line)),
        }
    }

    fn name(&self) -> &str {
        "REPLACE"
    }
}

/// Drop the `ordinal`-th record (1-based) with `order_id`.
///
/// Other records with the same id, including later ones, are kept.
pub struct RemoveNth {
    order_id: i64,
    ordinal: usize,
    seen: usize,
    removed: Option<Order>,
}

impl RemoveNth {
    pub fn new(order_id: i64, ordinal: usize) -> Self {
        Self {
            order_id,
            ordinal,
            seen: 0,
            removed: None,
        }
    }

    /// The record that was dropped, once the rewrite has passed it.
    pub fn removed(&self) -> Option<&Order> {
        self.removed.as_ref()
    }

    pub fn into_removed(self) -> Option<Order> {
        self.removed
    }
}

impl LineTransform for RemoveNth {
    fn process(&mut self, line: &Line) -> Result<Option<Vec<u8>>> {
        if let Some(order) = line.order()
            && order.order_id == self.order_id
        {
            self.seen += 1;
            if self.seen == self.ordinal {
                self.removed = Some(order.clone());
                return Ok(None);
            }
        }
        Ok(keep(line))
    }

    fn name(&self) -> &str {
        "REMOVE"
    }
}

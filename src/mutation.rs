//! Update and delete, both built on [`OrderStore::atomic_rewrite`].
//!
//! Each mutation scans first and only rewrites once it knows a matching
//! record exists, so the not-found, out-of-range and declined outcomes
//! never touch the file.

use tracing::info;

use crate::error::Result;
use crate::record::{Order, OrderField, sanitize_text};
use crate::rewrite::{RemoveNth, ReplaceFirst};
use crate::store::{OrderStore, StoreOptions};

/// A partial edit of one order. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderEdit {
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub order_date: Option<String>,
}

impl OrderEdit {
    pub fn is_empty(&self) -> bool {
        *self == OrderEdit::default()
    }

    /// Apply the edit field by field.
    ///
    /// An edit that fails validation is dropped and the current value kept;
    /// the dropped fields are returned alongside the edited record.
    pub fn apply(&self, current: &Order, options: &StoreOptions) -> (Order, Vec<OrderField>) {
        let mut next = current.clone();
        let mut rejected = Vec::new();

        if let Some(raw) = &self.customer_name {
            match sanitize_text(raw, options.text_limit) {
                Some(name) => next.customer_name = name,
                None => rejected.push(OrderField::CustomerName),
            }
        }
        if let Some(raw) = &self.product_name {
            match sanitize_text(raw, options.text_limit) {
                Some(name) => next.product_name = name,
                None => rejected.push(OrderField::ProductName),
            }
        }
        if let Some(quantity) = self.quantity {
            if quantity >= 0 {
                next.quantity = quantity;
            } else {
                rejected.push(OrderField::Quantity);
            }
        }
        if let Some(price) = self.price {
            if price.is_finite() && price >= 0.0 {
                next.price = price;
            } else {
                rejected.push(OrderField::Price);
            }
        }
        if let Some(date) = &self.order_date {
            if options.date_rules.is_valid(date) {
                next.order_date = date.trim().to_string();
            } else {
                rejected.push(OrderField::OrderDate);
            }
        }

        (next, rejected)
    }
}

/// Result of [`OrderStore::update_by_id`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated {
        before: Order,
        after: Order,
        /// Fields whose edits were invalid and left unchanged.
        rejected: Vec<OrderField>,
    },
    NotFound,
}

/// Result of [`OrderStore::delete_selected`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(Order),
    NotFound,
    /// The ordinal was outside `1..=matches`.
    OutOfRange { matches: usize },
    Declined,
}

impl OrderStore {
    /// Edit the first record with `order_id`.
    pub fn update_by_id(&self, order_id: i64, edit: &OrderEdit) -> Result<UpdateOutcome> {
        let Some(before) = self.find_by_id(order_id)? else {
            return Ok(UpdateOutcome::NotFound);
        };

        let (after, rejected) = edit.apply(&before, self.options());
        let mut stage = ReplaceFirst::new(order_id, after.clone());
        self.atomic_rewrite(&mut stage)?;
        if !stage.is_done() {
            // The record vanished between the scan and the rewrite.
            return Ok(UpdateOutcome::NotFound);
        }

        info!(order_id, rejected = rejected.len(), "updated order");
        Ok(UpdateOutcome::Updated {
            before,
            after,
            rejected,
        })
    }

    /// Remove the `ordinal`-th (1-based) record with `order_id`.
    ///
    /// Nothing is written unless the id matches, the ordinal is in range,
    /// and `confirmed` is true.
    pub fn delete_selected(
        &self,
        order_id: i64,
        ordinal: usize,
        confirmed: bool,
    ) -> Result<DeleteOutcome> {
        let matches = self.matches_for(order_id)?.len();
        if matches == 0 {
            return Ok(DeleteOutcome::NotFound);
        }
        if ordinal < 1 || ordinal > matches {
            return Ok(DeleteOutcome::OutOfRange { matches });
        }
        if !confirmed {
            return Ok(DeleteOutcome::Declined);
        }

        let mut stage = RemoveNth::new(order_id, ordinal);
        self.atomic_rewrite(&mut stage)?;
        match stage.into_removed() {
            Some(order) => {
                info!(order_id, ordinal, "deleted order");
                Ok(DeleteOutcome::Deleted(order))
            }
            None => Ok(DeleteOutcome::NotFound),
        }
    }
}

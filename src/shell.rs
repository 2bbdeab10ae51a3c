//! Interactive menus over an [`OrderStore`].
//!
//! The shell owns all user-facing text. It gathers validated input through
//! a [`Prompter`], calls the store, and prints the structured outcomes.
//! Store failures are reported and the menu carries on; running out of
//! input ends the session.

use std::io::{BufRead, Write};

use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::mutation::{DeleteOutcome, OrderEdit, UpdateOutcome};
use crate::prompt::Prompter;
use crate::record::{Order, OrderField, TextLimit};
use crate::store::OrderStore;

/// Render a record for display.
pub fn format_row(order: &Order) -> String {
    format!(
        "{}, {}, {}, {}, {:.2}, {}",
        order.order_id,
        order.customer_name,
        order.product_name,
        order.quantity,
        order.price,
        order.order_date
    )
}

fn rejection_message(field: OrderField) -> &'static str {
    match field {
        OrderField::CustomerName => "Customer name cannot be empty. Keeping old value.",
        OrderField::ProductName => "Product name cannot be empty. Keeping old value.",
        OrderField::Quantity => "Quantity must be >= 0. Keeping old value.",
        OrderField::Price => "Price must be >= 0. Keeping old value.",
        OrderField::OrderDate => "Invalid date. Keeping old value.",
        OrderField::OrderId => "Order ID cannot be changed.",
    }
}

/// The interactive order menu.
pub struct Shell<R, W> {
    store: OrderStore,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(store: OrderStore, input: R, output: W) -> Self {
        Self {
            store,
            prompter: Prompter::new(input, output),
        }
    }

    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Run the main menu until the user exits or input runs out.
    pub fn run(&mut self) -> Result<()> {
        self.store.ensure_initialized()?;
        match self.main_menu() {
            Err(Error::InputClosed) => {
                debug!("input closed, ending session");
                Ok(())
            }
            other => other,
        }
    }

    fn main_menu(&mut self) -> Result<()> {
        loop {
            self.prompter.say("\n==== Orders ====")?;
            self.prompter.say("[1] Add order")?;
            self.prompter.say("[2] Search")?;
            self.prompter.say("[3] Update by ID")?;
            self.prompter.say("[4] Delete by ID")?;
            self.prompter.say("[5] Exit")?;

            let result = match self.prompter.read_choice("Choose: ", 1, 5)? {
                1 => self.add(),
                2 => self.search_menu(),
                3 => self.update(),
                4 => self.delete(),
                _ => {
                    self.prompter.say("End of program")?;
                    return Ok(());
                }
            };
            self.report(result)?;
        }
    }

    /// Print recoverable failures; pass terminal ones up.
    fn report(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e @ (Error::InputClosed | Error::Terminal(_))) => Err(e),
            Err(e) => {
                error!(error = %e, "operation failed");
                self.prompter.say(format!("Error: {e}"))
            }
        }
    }

    fn add(&mut self) -> Result<()> {
        let order_id = loop {
            let id = self.prompter.read_int("Enter Order ID: ", None)?;
            if !self.store.exists(id)? {
                break id;
            }
            self.prompter
                .say(format!("Order ID {id} already exists. Try another."))?;
        };

        let options = *self.store.options();
        let customer = self
            .prompter
            .read_text("Customer name: ", options.text_limit)?;
        let product = self
            .prompter
            .read_text("Product name: ", options.text_limit)?;
        let quantity = self.prompter.read_int("Quantity (>=0): ", Some(0))?;
        let price = self.prompter.read_float("Price (>=0): ", Some(0.0))?;
        let prompt = format!("Order date ({}): ", options.date_rules.format.pattern());
        let date = self.prompter.read_date(&prompt, &options.date_rules)?;

        let order = Order::new(order_id, customer, product, quantity, price, date);
        self.store.append(&order)?;
        self.prompter.say(format!("Added: {}", format_row(&order)))
    }

    fn search_menu(&mut self) -> Result<()> {
        loop {
            self.prompter.say("\n-- Search Menu --")?;
            self.prompter.say("[1] By Order ID")?;
            self.prompter.say("[2] By Product Name")?;
            self.prompter.say("[3] Back")?;
            let result = match self.prompter.read_choice("Choose: ", 1, 3)? {
                1 => self.search_by_id(),
                2 => self.search_by_product(),
                _ => return Ok(()),
            };
            self.report(result)?;
        }
    }

    fn search_by_id(&mut self) -> Result<()> {
        let id = self.prompter.read_int("Enter Order ID to search: ", None)?;
        match self.store.find_by_id(id)? {
            Some(order) => self.prompter.say(format!("Found: {}", format_row(&order))),
            None => self.prompter.say(format!("OrderID {id} not found.")),
        }
    }

    fn search_by_product(&mut self) -> Result<()> {
        let needle = self.prompter.read_text(
            "Enter product name (substring, case-insensitive): ",
            TextLimit::Unbounded,
        )?;
        let found = self.store.find_by_product_substring(&needle)?;
        if found.is_empty() {
            return self.prompter.say(format!(
                "No orders found for product containing \"{needle}\"."
            ));
        }
        self.prompter.say(format!("Matches for \"{needle}\":"))?;
        for order in &found {
            self.prompter.say(format_row(order))?;
        }
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        let id = self.prompter.read_int("Enter Order ID to update: ", None)?;
        let Some(current) = self.store.find_by_id(id)? else {
            return self
                .prompter
                .say(format!("OrderID {id} not found. No changes made."));
        };
        self.prompter
            .say(format!("Current: {}", format_row(&current)))?;

        let pattern = self.store.options().date_rules.format.pattern();
        let edit = OrderEdit {
            customer_name: self
                .prompter
                .read_optional_text("New customer name (leave blank to keep): ")?,
            product_name: self
                .prompter
                .read_optional_text("New product name  (leave blank to keep): ")?,
            quantity: self
                .prompter
                .read_optional_int("New quantity (leave blank to keep): ")?,
            price: self
                .prompter
                .read_optional_float("New price (leave blank to keep): ")?,
            order_date: self.prompter.read_optional_text(&format!(
                "New order date {pattern} (leave blank to keep): "
            ))?,
        };

        match self.store.update_by_id(id, &edit)? {
            UpdateOutcome::Updated { rejected, .. } => {
                for field in rejected {
                    self.prompter.say(rejection_message(field))?;
                }
                self.prompter
                    .say(format!("Order {id} updated successfully."))
            }
            UpdateOutcome::NotFound => self
                .prompter
                .say(format!("OrderID {id} not found. No changes made.")),
        }
    }

    fn delete(&mut self) -> Result<()> {
        let id = self.prompter.read_int("Enter Order ID to delete: ", None)?;
        let matches = self.store.matches_for(id)?;
        if matches.is_empty() {
            return self
                .prompter
                .say(format!("OrderID {id} not found. Nothing to delete."));
        }

        self.prompter.say(format!(
            "\nFound {} record(s) with OrderID {id}:",
            matches.len()
        ))?;
        for (i, order) in matches.iter().enumerate() {
            self.prompter
                .say(format!("  [{}] {}", i + 1, format_row(order)))?;
        }

        let count = matches.len();
        let ordinal = if count > 1 {
            loop {
                let choice = self
                    .prompter
                    .read_int("Choose which one to delete [1..N]: ", Some(1))?;
                if let Ok(choice) = usize::try_from(choice)
                    && choice <= count
                {
                    break choice;
                }
                self.prompter
                    .say(format!("Please choose a number between 1 and {count}."))?;
            }
        } else {
            1
        };

        let confirmed = self.prompter.confirm("Confirm delete? (Y/N): ")?;
        match self.store.delete_selected(id, ordinal, confirmed)? {
            DeleteOutcome::Deleted(_) => self.prompter.say(format!(
                "Deleted record [{ordinal}] for OrderID {id} successfully."
            )),
            DeleteOutcome::Declined => self.prompter.say("Canceled. No changes made."),
            DeleteOutcome::NotFound => self
                .prompter
                .say(format!("OrderID {id} not found. Nothing to delete.")),
            DeleteOutcome::OutOfRange { matches } => self.prompter.say(format!(
                "Please choose a number between 1 and {matches}. No changes made."
            )),
        }
    }
}

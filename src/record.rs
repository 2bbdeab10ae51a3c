//! Order records and their single-line delimited encoding.
//!
//! Each record occupies one line of six fields:
//!
//! ```text
//! order_id,customer_name,product_name,quantity,price,order_date
//! ```
//!
//! The price is always written with two decimals. Text fields are never
//! escaped; callers sanitize them with [`sanitize_text`] so the delimiter
//! cannot appear inside a field.

use std::fmt;

use crate::error::{Error, Result};

/// Field separator.
pub const DELIMITER: char = ',';

/// Schema line written at the top of a freshly created file.
pub const HEADER: &str = "orderid,customername,productname,quantity,price,orderdate";

/// Column names of the record schema, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    OrderId,
    CustomerName,
    ProductName,
    Quantity,
    Price,
    OrderDate,
}

impl OrderField {
    /// The column name as it appears in the header line.
    pub fn name(&self) -> &'static str {
        match self {
            OrderField::OrderId => "orderid",
            OrderField::CustomerName => "customername",
            OrderField::ProductName => "productname",
            OrderField::Quantity => "quantity",
            OrderField::Price => "price",
            OrderField::OrderDate => "orderdate",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One stored order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: i64,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub price: f64,
    pub order_date: String,
}

impl Order {
    pub fn new(
        order_id: i64,
        customer_name: impl Into<String>,
        product_name: impl Into<String>,
        quantity: i64,
        price: f64,
        order_date: impl Into<String>,
    ) -> Self {
        Self {
            order_id,
            customer_name: customer_name.into(),
            product_name: product_name.into(),
            quantity,
            price,
            order_date: order_date.into(),
        }
    }

    /// Check that encoding this record yields exactly one decodable line.
    pub fn check_encodable(&self) -> Result<()> {
        check_text(OrderField::CustomerName, &self.customer_name)?;
        check_text(OrderField::ProductName, &self.product_name)?;
        if self.quantity < 0 {
            return Err(Error::invalid(
                OrderField::Quantity.name(),
                format!("must be >= 0, got {}", self.quantity),
            ));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::invalid(
                OrderField::Price.name(),
                format!("must be a finite number >= 0, got {}", self.price),
            ));
        }
        if self.order_date.trim().is_empty() {
            return Err(Error::invalid(OrderField::OrderDate.name(), "is empty"));
        }
        if self.order_date.contains(['\n', '\r']) {
            return Err(Error::invalid(
                OrderField::OrderDate.name(),
                "contains a line break",
            ));
        }
        Ok(())
    }
}

fn check_text(field: OrderField, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(field.name(), "is empty"));
    }
    if value.contains(DELIMITER) {
        return Err(Error::invalid(
            field.name(),
            format!("contains the delimiter '{DELIMITER}'"),
        ));
    }
    if value.contains(['\n', '\r']) {
        return Err(Error::invalid(field.name(), "contains a line break"));
    }
    Ok(())
}

/// Encode a record as one newline-terminated line.
pub fn encode(order: &Order) -> String {
    format!(
        "{}{d}{}{d}{}{d}{}{d}{:.2}{d}{}\n",
        order.order_id,
        order.customer_name,
        order.product_name,
        order.quantity,
        order.price,
        order.order_date,
        d = DELIMITER,
    )
}

/// Decode one line into a record.
///
/// Returns `None` when the line does not have the record shape; header
/// lines and malformed lines both land here. Any integer quantity and any
/// finite price decode, negative ones included, so such rows stay
/// reachable by id. The date column is the rest of the line and is not
/// checked against any date rules.
pub fn decode(line: &str) -> Option<Order> {
    let line = line.trim_end_matches(['\n', '\r']);
    let mut fields = line.splitn(6, DELIMITER);

    let order_id = fields.next()?.trim().parse::<i64>().ok()?;
    let customer_name = non_empty(fields.next()?)?;
    let product_name = non_empty(fields.next()?)?;
    let quantity = fields.next()?.trim().parse::<i64>().ok()?;
    let price = fields.next()?.trim().parse::<f64>().ok()?;
    if !price.is_finite() {
        return None;
    }
    let order_date = non_empty(fields.next()?)?;

    Some(Order {
        order_id,
        customer_name,
        product_name,
        quantity,
        price,
        order_date,
    })
}

fn non_empty(field: &str) -> Option<String> {
    let field = field.trim();
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

/// Does this line look like a header rather than a record?
///
/// True when the first character after leading spaces and tabs is not an
/// ASCII digit. This is a heuristic: a damaged data line that happens to
/// start with a letter is classified as a header too. Only the first line
/// of a file is ever tested.
pub fn is_header_shaped(line: &str) -> bool {
    !line
        .trim_start_matches([' ', '\t'])
        .starts_with(|c: char| c.is_ascii_digit())
}

/// Length policy for free-text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLimit {
    /// Keep text of any length.
    Unbounded,
    /// Keep at most this many characters, dropping the rest.
    Truncate(usize),
}

impl Default for TextLimit {
    /// 49 characters, the capacity of the historical name columns.
    fn default() -> Self {
        TextLimit::Truncate(49)
    }
}

impl TextLimit {
    fn apply<'a>(&self, text: &'a str) -> &'a str {
        match *self {
            TextLimit::Unbounded => text,
            TextLimit::Truncate(max) => match text.char_indices().nth(max) {
                Some((idx, _)) => &text[..idx],
                None => text,
            },
        }
    }
}

/// Make user text safe to store in a text column.
///
/// Delimiters and line breaks become spaces, surrounding whitespace is
/// trimmed, then `limit` is applied. Returns `None` if nothing is left.
pub fn sanitize_text(raw: &str, limit: TextLimit) -> Option<String> {
    let replaced: String = raw
        .chars()
        .map(|c| {
            if c == DELIMITER || c == '\n' || c == '\r' {
                ' '
            } else {
                c
            }
        })
        .collect();
    let limited = limit.apply(replaced.trim()).trim_end();
    if limited.is_empty() {
        None
    } else {
        Some(limited.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Order {
        Order::new(42, "John Doe", "Widget X", 5, 12.34, "01-01-2024")
    }

    #[test]
    fn test_encode_formats_price() {
        let order = Order::new(101, "Alice", "Widget", 2, 9.99, "01-01-2024");
        assert_eq!(encode(&order), "101,Alice,Widget,2,9.99,01-01-2024\n");

        let order = Order::new(7, "Bob", "Bolt", 1, 3.5, "02-01-2024");
        assert_eq!(encode(&order), "7,Bob,Bolt,1,3.50,02-01-2024\n");
    }

    #[test]
    fn test_decode_record_line() {
        let order = decode("42,John Doe,Widget X,5,12.34,01-01-2024\n").unwrap();
        assert_eq!(order, sample());
    }

    #[test]
    fn test_decode_tolerates_whitespace() {
        let order = decode("  42 , John Doe ,  Widget X , 5 , 12.34 , 01-01-2024\r\n").unwrap();
        assert_eq!(order, sample());
    }

    #[test]
    fn test_decode_rejects_header_and_garbage() {
        assert!(decode(HEADER).is_none());
        assert!(decode("x,y,z").is_none());
        assert!(decode("").is_none());
        assert!(decode("1,a,b,2,3.0").is_none());
    }

    #[test]
    fn test_decode_rejects_bad_numbers() {
        assert!(decode("1,a,b,two,3.00,01-01-2024").is_none());
        assert!(decode("1,a,b,2,cheap,01-01-2024").is_none());
        assert!(decode("1,a,b,2.5,3.00,01-01-2024").is_none());
        assert!(decode("1,a,b,2,inf,01-01-2024").is_none());
        assert!(decode("1,a,b,2,NaN,01-01-2024").is_none());
    }

    #[test]
    fn test_decode_accepts_negative_numbers() {
        let order = decode("7,Ann,AAA,-1,1.00,01-02-2024").unwrap();
        assert_eq!(order.quantity, -1);

        let order = decode("7,Ann,AAA,1,-3.00,01-02-2024").unwrap();
        assert_eq!(order.price, -3.0);
    }

    #[test]
    fn test_decode_rejects_empty_text() {
        assert!(decode("1, ,b,2,3.00,01-01-2024").is_none());
        assert!(decode("1,a,,2,3.00,01-01-2024").is_none());
        assert!(decode("1,a,b,2,3.00,  ").is_none());
    }

    #[test]
    fn test_decode_date_takes_rest_of_line() {
        let order = decode("1,a,b,2,3.00,01-01-2024, late").unwrap();
        assert_eq!(order.order_date, "01-01-2024, late");
    }

    #[test]
    fn test_header_shaped() {
        assert!(!is_header_shaped("1,abc"));
        assert!(!is_header_shaped("   9,x"));
        assert!(!is_header_shaped("\t9,x"));
        assert!(is_header_shaped("id,1"));
        assert!(is_header_shaped(HEADER));
        assert!(is_header_shaped(""));
    }

    #[test]
    fn test_header_heuristic_misreads_damaged_first_row() {
        // Known limitation: a damaged data row starting with a letter looks
        // like a header.
        assert!(is_header_shaped("x42,John,Widget,1,1.00,01-01-2024"));
    }

    #[test]
    fn test_sanitize_replaces_delimiter() {
        assert_eq!(
            sanitize_text("a,b,,c", TextLimit::Unbounded).as_deref(),
            Some("a b  c")
        );
        assert_eq!(
            sanitize_text("x,y\n", TextLimit::Unbounded).as_deref(),
            Some("x y")
        );
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(sanitize_text("", TextLimit::default()).is_none());
        assert!(sanitize_text("   ", TextLimit::default()).is_none());
        assert!(sanitize_text(",,", TextLimit::default()).is_none());
    }

    #[test]
    fn test_sanitize_truncation_policy() {
        let long = "a".repeat(80);
        let kept = sanitize_text(&long, TextLimit::default()).unwrap();
        assert_eq!(kept.len(), 49);

        let kept = sanitize_text(&long, TextLimit::Unbounded).unwrap();
        assert_eq!(kept.len(), 80);

        let kept = sanitize_text("héllo wörld", TextLimit::Truncate(4)).unwrap();
        assert_eq!(kept, "héll");
    }

    #[test]
    fn test_sanitize_truncation_drops_trailing_space() {
        let kept = sanitize_text("ab cd", TextLimit::Truncate(3)).unwrap();
        assert_eq!(kept, "ab");
    }

    #[test]
    fn test_check_encodable() {
        assert!(sample().check_encodable().is_ok());

        let mut bad = sample();
        bad.customer_name = "a,b".to_string();
        assert!(bad.check_encodable().is_err());

        let mut bad = sample();
        bad.product_name = "  ".to_string();
        assert!(bad.check_encodable().is_err());

        let mut bad = sample();
        bad.quantity = -1;
        assert!(bad.check_encodable().is_err());

        let mut bad = sample();
        bad.price = -1.0;
        assert!(bad.check_encodable().is_err());

        let mut bad = sample();
        bad.order_date = "01-01-2024\n2,x".to_string();
        assert!(bad.check_encodable().is_err());
    }

    #[test]
    fn test_field_names_match_header() {
        let names: Vec<&str> = [
            OrderField::OrderId,
            OrderField::CustomerName,
            OrderField::ProductName,
            OrderField::Quantity,
            OrderField::Price,
            OrderField::OrderDate,
        ]
        .iter()
        .map(OrderField::name)
        .collect();
        assert_eq!(names.join(","), HEADER);
    }

    proptest! {
        #[test]
        fn test_round_trip(
            order_id in any::<i64>(),
            customer in "[A-Za-z][A-Za-z .'-]{0,30}",
            product in "[A-Za-z0-9][A-Za-z0-9 ]{0,30}",
            quantity in any::<i64>(),
            cents in 0u64..10_000_000,
            date in "[0-9]{2}-[0-9]{2}-[0-9]{4}",
        ) {
            let customer = sanitize_text(&customer, TextLimit::Unbounded).unwrap();
            let product = sanitize_text(&product, TextLimit::Unbounded).unwrap();
            let price = cents as f64 / 100.0;
            let order = Order::new(order_id, customer, product, quantity, price, date);

            let decoded = decode(&encode(&order)).unwrap();
            prop_assert_eq!(decoded.order_id, order.order_id);
            prop_assert_eq!(&decoded.customer_name, &order.customer_name);
            prop_assert_eq!(&decoded.product_name, &order.product_name);
            prop_assert_eq!(decoded.quantity, order.quantity);
            prop_assert_eq!(format!("{:.2}", decoded.price), format!("{:.2}", order.price));
            prop_assert_eq!(&decoded.order_date, &order.order_date);
        }
    }
}

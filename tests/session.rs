//! End-to-end menu sessions driven by scripted input.

use order_tracker::{DateFormat, DateRules, HEADER, OrderStore, Shell, StoreOptions, TextLimit};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

fn run(store: &OrderStore, script: &str) -> String {
    let mut shell = Shell::new(
        store.clone(),
        Cursor::new(script.as_bytes().to_vec()),
        Vec::new(),
    );
    shell.run().unwrap();
    String::from_utf8(shell.into_output()).unwrap()
}

#[test]
fn test_full_lifecycle() {
    let dir = TempDir::new().unwrap();
    let store = OrderStore::new(dir.path().join("orders.csv"));

    let script = "1\n9001\nZed\nBolt\n2\n3.50\n01-01-2024\n\
                  2\n1\n9001\n\
                  2\nBolt\n3\n\
                  3\n9001\n\nBoltX\n\n\n\n\
                  2\n2\nboltx\n3\n\
                  4\n9001\nY\n\
                  2\n1\n9001\n3\n\
                  5\n";
    let out = run(&store, script);

    assert!(out.contains("Added: 9001, Zed, Bolt, 2, 3.50, 01-01-2024"));
    assert!(out.contains("Found: 9001, Zed, Bolt, 2, 3.50, 01-01-2024"));
    assert!(out.contains("Matches for \"Bolt\":"));
    assert!(out.contains("Order 9001 updated successfully."));
    assert!(out.contains("Matches for \"boltx\":\n9001, Zed, BoltX, 2, 3.50, 01-01-2024"));
    assert!(out.contains("Deleted record [1] for OrderID 9001 successfully."));
    assert!(out.contains("OrderID 9001 not found."));
    assert!(out.contains("End of program"));

    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        format!("{HEADER}\n")
    );
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_wide_year_range_with_ymd_dates() {
    let dir = TempDir::new().unwrap();
    let options = StoreOptions {
        date_rules: DateRules::wide().with_format(DateFormat::YearMonthDay),
        text_limit: TextLimit::Truncate(5),
    };
    let store = OrderStore::with_options(dir.path().join("orders.csv"), options);

    let script = "1\n1\nAlexandra\nSprocket\n1\n1\n01-01-2024\n2950-12-31\n5\n";
    let out = run(&store, script);

    assert!(out.contains("Invalid date. Use YYYY-MM-DD"));
    assert!(out.contains("Added: 1, Alexa, Sproc, 1, 1.00, 2950-12-31"));
    let order = store.find_by_id(1).unwrap().unwrap();
    assert_eq!(order.customer_name, "Alexa");
    assert_eq!(order.order_date, "2950-12-31");
}

#[test]
fn test_existing_rows_and_junk_survive_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.csv");
    let original = "orderid,customername,productname,quantity,price,orderdate\n\
                    1,Ann,AAA,1,1.00,01-02-2024\n\
                    ## imported by hand ##\n\
                    2,Ben,BBB,2,2.00,02-02-2024\n";
    fs::write(&path, original).unwrap();
    let store = OrderStore::new(&path);

    let out = run(&store, "3\n1\n\n\n7\n\n\n4\n2\nyes\n5\n");
    assert!(out.contains("Order 1 updated successfully."));
    assert!(out.contains("Deleted record [1] for OrderID 2 successfully."));

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "orderid,customername,productname,quantity,price,orderdate\n\
         1,Ann,AAA,7,1.00,01-02-2024\n\
         ## imported by hand ##\n"
    );
}

#[test]
fn test_session_ends_cleanly_when_input_runs_out() {
    let dir = TempDir::new().unwrap();
    let store = OrderStore::new(dir.path().join("orders.csv"));
    // Input stops in the middle of an add.
    let out = run(&store, "1\n42\nAnn\n");
    assert!(out.contains("Product name: "));
    assert!(!store.exists(42).unwrap());
}

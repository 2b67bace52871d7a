use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;

use cartstore::{
    core::store::CartStore,
    persist::{KeyValueStore, adapter::CartStorage, sqlite::SqliteStore},
    product::{Product, Rating},
    theme::{Theme, ThemeStore},
    types::{CART_KEY, THEME_KEY},
};

fn product(id: u64, cents: i64) -> Product {
    Product {
        id,
        title: format!("Item {id}"),
        price: Decimal::new(cents, 2),
        description: "Slim fit".to_string(),
        category: "men's clothing".to_string(),
        image: format!("https://fakestoreapi.com/img/{id}.jpg"),
        rating: Rating { rate: 4.1, count: 259 },
    }
}

#[test]
fn cart_survives_reopen_with_order_and_fields() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("cart.db");

    let snapshot = {
        let medium = SqliteStore::open(&db_path).expect("open sqlite");
        let mut cart = CartStore::open(CartStorage::new(medium, CART_KEY));
        cart.add_to_cart(&product(3, 10_995), 1);
        cart.add_to_cart(&product(1, 2_230), 2);
        cart.update_quantity(3, 4);
        cart.snapshot()
    };

    let reopened = SqliteStore::open(&db_path).expect("reopen");
    let cart = CartStore::open(CartStorage::new(reopened, CART_KEY));

    assert_eq!(cart.snapshot(), snapshot);
    assert_eq!(cart.total_items(), 6);
    assert_eq!(cart.total_price(), Decimal::new(48_440, 2));
    assert_eq!(cart.line(1).map(|l| l.product.rating.count), Some(259));
}

#[test]
fn persisted_blob_is_a_flat_record_array() {
    let medium = Arc::new(SqliteStore::open_in_memory().expect("open"));
    let mut cart = CartStore::open(CartStorage::new(Arc::clone(&medium), CART_KEY));
    cart.add_to_cart(&product(7, 10_000), 1);

    let raw = medium.get_item(CART_KEY).expect("get").expect("blob");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
    let first = &value[0];

    assert_eq!(first["id"], 7);
    assert_eq!(first["quantity"], 1);
    assert_eq!(first["price"], 100.0);
    assert_eq!(first["rating"]["count"], 259);
    assert!(first.get("product").is_none());
}

#[test]
fn malformed_and_mismatched_blobs_recover_as_empty() {
    let medium = Arc::new(SqliteStore::open_in_memory().expect("open"));
    let storage = CartStorage::new(Arc::clone(&medium), CART_KEY);

    for blob in ["{not json", "42", r#"[{"id":1}]"#, r#"[{"id":"x","quantity":-1}]"#] {
        medium.set_item(CART_KEY, blob).expect("set");
        assert!(storage.load().is_empty(), "blob {blob:?} should load empty");
    }
}

#[test]
fn clear_deletes_row_and_theme_key_is_untouched() {
    let medium = Arc::new(SqliteStore::open_in_memory().expect("open"));
    let themes = ThemeStore::open(Arc::clone(&medium), THEME_KEY);
    themes.set_theme(Theme::Theme3);

    let mut cart = CartStore::open(CartStorage::new(Arc::clone(&medium), CART_KEY));
    cart.add_to_cart(&product(1, 100), 1);
    assert_eq!(medium.keys().expect("keys"), vec![THEME_KEY.to_string(), CART_KEY.to_string()]);

    cart.clear_cart();

    assert_eq!(medium.keys().expect("keys"), vec![THEME_KEY.to_string()]);
    assert_eq!(medium.get_item(THEME_KEY).expect("get").as_deref(), Some("theme3"));
    assert!(CartStorage::new(Arc::clone(&medium), CART_KEY).load().is_empty());
}

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rust_decimal::Decimal;

use cartstore::{
    core::{cart::Cart, store::CartStore},
    persist::{adapter::CartStorage, memory::MemoryStore, sqlite::SqliteStore},
    product::{Product, Rating},
    types::CART_KEY,
};

fn product(id: u64) -> Product {
    Product {
        id,
        title: format!("Product {id}"),
        price: Decimal::new(1_999, 2),
        description: "bench".to_string(),
        category: "electronics".to_string(),
        image: String::new(),
        rating: Rating { rate: 4.0, count: id },
    }
}

fn bench_in_memory_adds(c: &mut Criterion) {
    c.bench_function("cart_add_10k", |b| {
        b.iter(|| {
            let mut cart = Cart::new();
            for i in 0..10_000u64 {
                cart.add(&product(i % 500), 1);
            }
        });
    });
}

fn bench_persisted_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("persisted_add");
    for lines in [10u64, 100, 500] {
        group.bench_with_input(BenchmarkId::new("memory", lines), &lines, |b, &lines| {
            b.iter(|| {
                let mut cart = CartStore::open(CartStorage::new(MemoryStore::new(), CART_KEY));
                for i in 0..lines {
                    cart.add_to_cart(&product(i), 1);
                }
            });
        });
        group.bench_with_input(BenchmarkId::new("sqlite", lines), &lines, |b, &lines| {
            b.iter(|| {
                let medium = SqliteStore::open_in_memory().expect("open");
                let mut cart = CartStore::open(CartStorage::new(medium, CART_KEY));
                for i in 0..lines {
                    cart.add_to_cart(&product(i), 1);
                }
            });
        });
    }
    group.finish();
}

fn bench_totals(c: &mut Criterion) {
    let mut cart = Cart::new();
    for i in 0..1_000u64 {
        cart.add(&product(i), 3);
    }
    c.bench_function("totals_1k_lines", |b| b.iter(|| cart.totals()));
}

criterion_group!(benches, bench_in_memory_adds, bench_persisted_mutations, bench_totals);
criterion_main!(benches);

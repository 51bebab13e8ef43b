//! Benchmarks for order submission and market sweeps

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use matching_engine::OrderBook;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use types::ids::AgentId;
use types::numeric::Price;
use types::order::{Order, Side};

fn populated_book(levels: u64) -> OrderBook {
    let mut book = OrderBook::new();
    let maker = AgentId::new(1);
    for i in 0..levels {
        let id = book.next_order_id();
        let _ = book.submit(Order::new(id, maker, Side::BUY, Price::from_u64(999 - i), 100, 0));
        let id = book.next_order_id();
        let _ = book.submit(Order::new(id, maker, Side::SELL, Price::from_u64(1001 + i), 100, 0));
    }
    book
}

fn random_order(rng: &mut ChaCha8Rng, book: &mut OrderBook, tick: u64) -> Order {
    let side = if rng.gen_bool(0.5) { Side::BUY } else { Side::SELL };
    let price = rng.gen_range(990..=1010);
    let quantity = rng.gen_range(1..=50);
    let id = book.next_order_id();
    Order::new(id, AgentId::new(2), side, Price::from_u64(price), quantity, tick)
}

fn benchmark_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_book_submit");
    group.throughput(Throughput::Elements(1));

    let mut book = populated_book(20);
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut tick = 0u64;

    group.bench_function("random_limit", |b| {
        b.iter(|| {
            tick += 1;
            let order = random_order(&mut rng, &mut book, tick);
            let _ = black_box(book.submit(order));
        })
    });

    group.finish();
}

fn benchmark_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_book_sweep");

    group.bench_function("simulate_10_levels", |b| {
        let book = populated_book(20);
        b.iter(|| black_box(book.simulate_market(Side::BUY, black_box(1_000))))
    });

    group.bench_function("execute_10_levels", |b| {
        b.iter_batched(
            || populated_book(20),
            |mut book| {
                let id = book.next_order_id();
                black_box(book.execute_market(id, AgentId::new(3), Side::SELL, 1_000, 1))
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, benchmark_submit, benchmark_sweep);
criterion_main!(benches);

use criterion::{Criterion, criterion_group, criterion_main};
use spooky_wide_row::composite::{Eoc, pack, unpack};
use spooky_wide_row::serialization::encode;
use spooky_wide_row::deserialization::decode;
use spooky_wide_row::{
    FieldDescriptor, Mapping, MemoryProvider, RecordMapping, Row, TypeDescriptor, Value, WireType,
};
use std::hint::black_box;

// ─── Test Data ──────────────────────────────────────────────────────────────

/// A timeline entry: row key `user`, composite prefix `(ts, seq)`, four cells.
#[derive(Debug, Default, Clone)]
struct Tweet {
    user: String,
    ts: i64,
    seq: i32,
    body: String,
    likes: i64,
    score: f64,
    pinned: bool,
}

fn tweet_type(mapping: &str) -> TypeDescriptor<Tweet> {
    TypeDescriptor::builder("Tweet")
        .annotate("cf", "Timeline")
        .annotate("key", "user")
        .annotate("cols", "ts,seq")
        .annotate("value", "body")
        .annotate("mapping", mapping)
        .field(FieldDescriptor::typed(
            "user",
            WireType::Utf8,
            |t: &Tweet| t.user.clone(),
            |t: &mut Tweet, v| t.user = v,
        ))
        .field(FieldDescriptor::typed("ts", WireType::Long, |t: &Tweet| t.ts, |t: &mut Tweet, v| t.ts = v))
        .field(FieldDescriptor::typed("seq", WireType::Int32, |t: &Tweet| t.seq, |t: &mut Tweet, v| t.seq = v))
        .field(FieldDescriptor::typed(
            "body",
            WireType::Utf8,
            |t: &Tweet| t.body.clone(),
            |t: &mut Tweet, v| t.body = v,
        ))
        .field(FieldDescriptor::typed(
            "likes",
            WireType::Integer,
            |t: &Tweet| t.likes,
            |t: &mut Tweet, v| t.likes = v,
        ))
        .field(FieldDescriptor::typed(
            "score",
            WireType::Double,
            |t: &Tweet| t.score,
            |t: &mut Tweet, v| t.score = v,
        ))
        .field(FieldDescriptor::typed(
            "pinned",
            WireType::Boolean,
            |t: &Tweet| t.pinned,
            |t: &mut Tweet, v| t.pinned = v,
        ))
        .build()
        .unwrap()
}

fn make_tweets(n: i64) -> Vec<Tweet> {
    (0..n)
        .map(|i| Tweet {
            user: "ada".to_string(),
            ts: 1_700_000_000_000 + i,
            seq: (i % 7) as i32,
            body: format!("tweet number {i}"),
            likes: i * 31,
            score: i as f64 / 3.0,
            pinned: i % 2 == 0,
        })
        .collect()
}

/// All rows of `tweets` concatenated into one row, the way a row read returns them.
fn make_row(mapping: &Mapping<Tweet>, tweets: &[Tweet]) -> Row {
    let mut row = Row::default();
    for tweet in tweets {
        let mapped = mapping.map(tweet).unwrap();
        row.key = mapped.key;
        row.columns.extend(mapped.columns);
    }
    row
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 1: Scalar codec
// ═══════════════════════════════════════════════════════════════════════════

fn bench_scalar_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_codec");

    let long = Value::from(1_700_000_000_000i64);
    let text = Value::from("the quick brown fox");

    group.bench_function("encode LongType", |b| {
        b.iter(|| encode(black_box(&long), WireType::Long).unwrap())
    });

    group.bench_function("encode IntegerType", |b| {
        b.iter(|| encode(black_box(&long), WireType::Integer).unwrap())
    });

    group.bench_function("encode UTF8Type", |b| {
        b.iter(|| encode(black_box(&text), WireType::Utf8).unwrap())
    });

    let long_bytes = encode(&long, WireType::Long).unwrap();
    group.bench_function("decode LongType", |b| {
        b.iter(|| decode::<Value>(black_box(&long_bytes), WireType::Long).unwrap())
    });

    let json = serde_json::json!(1_700_000_000_000i64);
    group.bench_function("encode LongType (serde_json)", |b| {
        b.iter(|| encode(black_box(&json), WireType::Long).unwrap())
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 2: Composite
// ═══════════════════════════════════════════════════════════════════════════

fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");

    let parts: [&[u8]; 3] = [&[0, 0, 1, 139, 207, 226, 16, 0], &[0, 0, 0, 3], b"body"];

    group.bench_function("pack (3 components)", |b| {
        b.iter(|| pack(black_box(&parts), Eoc::Equal).unwrap())
    });

    let packed = pack(&parts, Eoc::Equal).unwrap();
    group.bench_function("unpack (3 components)", |b| {
        b.iter(|| unpack(black_box(&packed)).unwrap())
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 3: Mapping
// ═══════════════════════════════════════════════════════════════════════════

fn bench_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapping");

    let tweets = make_tweets(100);

    for kind in ["sparse", "compact"] {
        let mapping = Mapping::new(tweet_type(kind)).unwrap();
        let tweet = &tweets[0];

        group.bench_function(format!("{kind}: map"), |b| {
            b.iter(|| mapping.map(black_box(tweet)).unwrap())
        });

        let single = mapping.map(tweet).unwrap();
        group.bench_function(format!("{kind}: unmap"), |b| {
            b.iter(|| {
                let mut provider = MemoryProvider::from_row(black_box(single.clone()));
                let mut decoded = Tweet::default();
                mapping.unmap(&mut decoded, &mut provider).unwrap();
                decoded
            })
        });

        // ── 100 records in one row, split on prefix changes ──

        let row = make_row(&mapping, &tweets);
        group.bench_function(format!("{kind}: unmap_all (100 records)"), |b| {
            b.iter(|| {
                let mut provider = MemoryProvider::from_row(black_box(row.clone()));
                mapping.unmap_all(&mut provider).unwrap()
            })
        });
    }

    group.finish();
}

// ─── Criterion Main ─────────────────────────────────────────────────────────

criterion_group!(benches, bench_scalar_codec, bench_composite, bench_mapping);
criterion_main!(benches);

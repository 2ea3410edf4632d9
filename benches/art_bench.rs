use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::prelude::SliceRandom;
use rand::{thread_rng, Rng};

use radixart::AdaptiveRadixTree;

fn gen_keys(l1_prefix: usize, l2_prefix: usize, suffix: usize) -> Vec<(Vec<u8>, u64)> {
    let mut keys = Vec::new();
    let chars: Vec<u8> = (b'a'..=b'z').collect();
    for &c1 in &chars {
        let level1_prefix = vec![c1; l1_prefix];
        for &c2 in &chars {
            let level2_prefix = vec![c2; l2_prefix];
            let mut key_prefix = level1_prefix.clone();
            key_prefix.extend_from_slice(&level2_prefix);
            for _ in 0..=u8::MAX {
                let mut key = key_prefix.clone();
                let mut rng = thread_rng();
                for _ in 0..suffix {
                    key.push(chars[rng.gen_range(0..chars.len())]);
                }
                keys.push((key, 0u64));
            }
        }
    }
    keys.shuffle(&mut thread_rng());
    keys
}

pub fn seq_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("seq_insert");
    group.throughput(Throughput::Elements(1));
    group.bench_function("seq_insert", |b| {
        let mut tree = AdaptiveRadixTree::new();
        let mut key = 0u64;
        b.iter(|| {
            tree.put(&key.to_be_bytes(), key);
            key += 1;
        })
    });
    group.finish();
}

pub fn rand_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand_insert");
    group.throughput(Throughput::Elements(1));
    let keys = gen_keys(3, 2, 3);

    group.bench_function("rand_insert", |b| {
        let mut tree = AdaptiveRadixTree::new();
        let mut rng = thread_rng();
        b.iter(|| {
            let (key, val) = &keys[rng.gen_range(0..keys.len())];
            tree.put(key, *val);
        })
    });
    group.finish();
}

pub fn rand_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("rand_get");
    group.throughput(Throughput::Elements(1));
    let keys = gen_keys(3, 2, 3);
    let mut tree = AdaptiveRadixTree::new();
    for (key, val) in &keys {
        tree.put(key, *val);
    }

    group.bench_function("rand_get", |b| {
        let mut rng = thread_rng();
        b.iter(|| {
            let (key, _) = &keys[rng.gen_range(0..keys.len())];
            tree.get(key)
        })
    });
    group.finish();
}

criterion_group!(benches, seq_insert, rand_insert, rand_get);
criterion_main!(benches);

use std::borrow::Borrow;
use std::hash::Hash;
use std::collections::BTreeSet;

use rand::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use simple_tree::SimpleTreeSet;
// Looking to measure set implementation, not hasher performance so using a faster hasher
use fnv::FnvHashSet as HashSet;

use ordtree::OrderedSet;

trait Set<T>: Default {
    fn len(&self) -> usize;

    fn contains<Q>(&self, value: &Q) -> bool
        where T: Borrow<Q>,
              Q: Ord + Hash + Eq + ?Sized;

    fn add(&mut self, value: T);

    fn remove<Q>(&mut self, value: &Q)
        where T: Borrow<Q>,
              Q: Ord + Hash + Eq + ?Sized;
}

macro_rules! impl_set {
    ($name:ident, $add:ident, $bound:ident $(+ $other_bound:ident)*) => {
        impl<T> Set<T> for $name<T>
            where T: $bound $(+ $other_bound)*,
        {
            fn len(&self) -> usize {
                $name::len(self)
            }

            fn contains<Q>(&self, value: &Q) -> bool
                where T: Borrow<Q>,
                      Q: Ord + Hash + Eq + ?Sized
            {
                $name::contains(self, value)
            }

            fn add(&mut self, value: T) {
                $name::$add(self, value);
            }

            fn remove<Q>(&mut self, value: &Q)
                where T: Borrow<Q>,
                      Q: Ord + Hash + Eq + ?Sized
            {
                $name::remove(self, value);
            }
        }
    };
}

impl_set!(HashSet, insert, Hash + Eq);
impl_set!(BTreeSet, insert, Ord);
impl_set!(SimpleTreeSet, add, PartialOrd);
impl_set!(OrderedSet, add, PartialOrd);

#[derive(Debug, Clone)]
struct Values {
    values: Vec<i64>,
}

impl Values {
    /// Deterministically generates `nvalues` unique values in a random order
    ///
    /// A random order keeps the unbalanced trees from degenerating into a list.
    pub fn generate(nvalues: u32) -> Self {
        let n = nvalues as i64;
        let mut values: Vec<_> = (0..n).map(|i| (i - n/2) * 10).collect();

        // Use seed to make this deterministic
        let mut rng = StdRng::seed_from_u64(45930923092);
        values.shuffle(&mut rng);

        Self {values}
    }

    pub fn get(&self, value_i: i64) -> i64 {
        // Make sure index is >= 0
        let index = value_i.max(0);
        self.values[index as usize]
    }
}

fn slice_max<T: Copy + Ord>(data: &[T]) -> T {
    data.iter().max().copied().expect("bug: slice was empty")
}

/// Fills a set with the first `count` values
fn filled<M: Set<i64>>(values: &Values, count: usize) -> M {
    let mut set = M::default();

    for value_i in 0..count {
        set.add(values.get(value_i as i64));
    }

    set
}

/// Runs many consecutive lookups on a set
fn benchmark_contains<M: Set<i64>>(values: &Values, set: &M, lookups: usize) {
    for i in 0..lookups {
        // Look values up in the opposite order to how they were added
        let value_i = lookups - i - 1;
        let value = values.get(value_i as i64);
        black_box(set.contains(&value));
    }
}

/// Runs many consecutive remove operations on a set
///
/// Removing from an `OrderedSet` or `SimpleTreeSet` can discard whole subtrees, so later removals
/// often find nothing.
fn benchmark_removes<M: Set<i64>>(values: &Values, mut set: M, removes: usize) -> M {
    for i in 0..removes {
        let value_i = removes - i - 1;
        let value = values.get(value_i as i64);
        set.remove(&value);
        // Should find nothing since the value has been removed
        set.remove(&value);
    }

    set
}

/// Runs a mix of operations on a set
fn benchmark_set_ops<M: Set<i64>>(values: &Values, steps: usize) -> M {
    const MAX_ADDS: usize = 5;
    const MAX_LOOKUPS: usize = 3;
    const MAX_REMOVES: usize = 2;

    let mut set = M::default();

    let mut value_i = 0;
    for i in 0..steps {
        // Loop always runs at least once
        for _ in 0..=(i % MAX_ADDS) {
            let value = values.get(value_i);
            value_i += 1;
            set.add(value);
        }

        // Add the last value again
        set.add(values.get(value_i - 1));

        let lookups = MAX_LOOKUPS - (i % MAX_LOOKUPS);
        for j in 0..lookups {
            let value = values.get(value_i - j as i64);
            black_box(set.contains(&value));
        }

        let removes = MAX_REMOVES - (i % MAX_REMOVES);
        for j in 0..removes {
            let value = values.get(value_i - j as i64);
            set.remove(&value);
        }
    }

    black_box(set.len());
    set
}

pub fn bench_set_add(c: &mut Criterion) {
    const ADDS: &[usize] = &[50, 100, 500, 1000, 2000];

    let values = Values::generate(slice_max(ADDS) as u32);

    let mut group = c.benchmark_group("set add");
    for adds in ADDS {
        group.bench_with_input(BenchmarkId::new("HashSet", adds), adds, |b, &adds| {
            b.iter(|| filled::<HashSet<i64>>(&values, adds))
        });
        group.bench_with_input(BenchmarkId::new("BTreeSet", adds), adds, |b, &adds| {
            b.iter(|| filled::<BTreeSet<i64>>(&values, adds))
        });
        group.bench_with_input(BenchmarkId::new("SimpleTreeSet", adds), adds, |b, &adds| {
            b.iter(|| filled::<SimpleTreeSet<i64>>(&values, adds))
        });
        group.bench_with_input(BenchmarkId::new("OrderedSet", adds), adds, |b, &adds| {
            b.iter(|| filled::<OrderedSet<i64>>(&values, adds))
        });
    }
    group.finish();
}

pub fn bench_set_contains(c: &mut Criterion) {
    const LOOKUPS: &[usize] = &[50, 100, 500, 1000, 2000];

    let values = Values::generate(slice_max(LOOKUPS) as u32);

    let mut group = c.benchmark_group("set contains");
    for lookups in LOOKUPS {
        group.bench_with_input(BenchmarkId::new("HashSet", lookups), lookups, |b, &lookups| {
            let set = filled::<HashSet<i64>>(&values, lookups);
            b.iter(|| benchmark_contains(&values, &set, lookups))
        });
        group.bench_with_input(BenchmarkId::new("BTreeSet", lookups), lookups, |b, &lookups| {
            let set = filled::<BTreeSet<i64>>(&values, lookups);
            b.iter(|| benchmark_contains(&values, &set, lookups))
        });
        group.bench_with_input(BenchmarkId::new("SimpleTreeSet", lookups), lookups, |b, &lookups| {
            let set = filled::<SimpleTreeSet<i64>>(&values, lookups);
            b.iter(|| benchmark_contains(&values, &set, lookups))
        });
        group.bench_with_input(BenchmarkId::new("OrderedSet", lookups), lookups, |b, &lookups| {
            let set = filled::<OrderedSet<i64>>(&values, lookups);
            b.iter(|| benchmark_contains(&values, &set, lookups))
        });
    }
    group.finish();
}

pub fn bench_set_remove(c: &mut Criterion) {
    const REMOVES: &[usize] = &[50, 100, 500, 1000, 2000];

    let values = Values::generate(slice_max(REMOVES) as u32);

    let mut group = c.benchmark_group("set remove");
    for removes in REMOVES {
        group.bench_with_input(BenchmarkId::new("HashSet", removes), removes, |b, &removes| {
            let set = filled::<HashSet<i64>>(&values, removes);
            b.iter(|| benchmark_removes(&values, set.clone(), removes))
        });
        group.bench_with_input(BenchmarkId::new("BTreeSet", removes), removes, |b, &removes| {
            let set = filled::<BTreeSet<i64>>(&values, removes);
            b.iter(|| benchmark_removes(&values, set.clone(), removes))
        });
        group.bench_with_input(BenchmarkId::new("SimpleTreeSet", removes), removes, |b, &removes| {
            let set = filled::<SimpleTreeSet<i64>>(&values, removes);
            b.iter(|| benchmark_removes(&values, set.clone(), removes))
        });
        group.bench_with_input(BenchmarkId::new("OrderedSet", removes), removes, |b, &removes| {
            let set = filled::<OrderedSet<i64>>(&values, removes);
            b.iter(|| benchmark_removes(&values, set.clone(), removes))
        });
    }
    group.finish();
}

pub fn bench_set_ops(c: &mut Criterion) {
    const STEPS: &[usize] = &[50, 100, 1000, 2000, 4000];

    // Using (max * 5) because we do up to `MAX_ADDS` adds per step
    let values = Values::generate(slice_max(STEPS) as u32 * 5);

    let mut group = c.benchmark_group("set operations");
    for steps in STEPS {
        group.bench_with_input(BenchmarkId::new("HashSet", steps), steps, |b, &steps| {
            b.iter(|| benchmark_set_ops::<HashSet<i64>>(&values, steps))
        });
        group.bench_with_input(BenchmarkId::new("BTreeSet", steps), steps, |b, &steps| {
            b.iter(|| benchmark_set_ops::<BTreeSet<i64>>(&values, steps))
        });
        group.bench_with_input(BenchmarkId::new("SimpleTreeSet", steps), steps, |b, &steps| {
            b.iter(|| benchmark_set_ops::<SimpleTreeSet<i64>>(&values, steps))
        });
        group.bench_with_input(BenchmarkId::new("OrderedSet", steps), steps, |b, &steps| {
            b.iter(|| benchmark_set_ops::<OrderedSet<i64>>(&values, steps))
        });
    }
    group.finish();
}

criterion_group!(benches,
    bench_set_add,
    bench_set_contains,
    bench_set_remove,
    bench_set_ops,
);

criterion_main!(benches);

//! Terminal reducers. Each call opens one enumeration and drives it to the
//! end (or, for `count` on a sequence of known length, pulls nothing).

use std::cmp::Ordering;

use lazyseq_core::error::{Error, Result};

use crate::sequence::Sequence;

/// Element types `sum` and `average` accept.
pub trait Numeric: Copy + 'static {
    const ZERO: Self;
    fn checked_add(self, other: Self) -> Option<Self>;
    fn to_f64(self) -> f64;
}

macro_rules! numeric_int {
    ($($t:ty),*) => {
        $(impl Numeric for $t {
            const ZERO: Self = 0;
            fn checked_add(self, other: Self) -> Option<Self> {
                <$t>::checked_add(self, other)
            }
            fn to_f64(self) -> f64 {
                self as f64
            }
        })*
    };
}

macro_rules! numeric_float {
    ($($t:ty),*) => {
        $(impl Numeric for $t {
            const ZERO: Self = 0.0;
            fn checked_add(self, other: Self) -> Option<Self> {
                Some(self + other)
            }
            fn to_f64(self) -> f64 {
                f64::from(self)
            }
        })*
    };
}

numeric_int!(i32, i64, u32, u64, usize);
numeric_float!(f32, f64);

fn incomparable() -> Error {
    Error::TypeMismatch("values have no defined order".into())
}

fn comparable<K: PartialOrd>(key: &K) -> Result<()> {
    match key.partial_cmp(key) {
        Some(_) => Ok(()),
        None => Err(incomparable()),
    }
}

/// Whether `candidate` should replace `best`. Ties keep `best`.
fn beats<K: PartialOrd>(candidate: &K, best: &K, wanted: Ordering) -> Result<bool> {
    match candidate.partial_cmp(best) {
        Some(ord) => Ok(ord == wanted),
        None => Err(incomparable()),
    }
}

impl<T: Numeric> Sequence<T> {
    /// Total of all elements; zero for an empty sequence.
    pub fn sum(&self) -> Result<T> {
        let mut cursor = self.cursor();
        let mut total = T::ZERO;
        while let Some(item) = cursor.try_next()? {
            total = total.checked_add(item).ok_or(Error::Overflow("sum"))?;
        }
        Ok(total)
    }

    /// Arithmetic mean as `f64`.
    pub fn average(&self) -> Result<f64> {
        let mut cursor = self.cursor();
        let (mut total, mut count) = (0.0f64, 0usize);
        while let Some(item) = cursor.try_next()? {
            total += item.to_f64();
            count += 1;
        }
        if count == 0 {
            return Err(Error::EmptySequence);
        }
        Ok(total / count as f64)
    }
}

impl<T: PartialOrd + 'static> Sequence<T> {
    pub fn min(&self) -> Result<T> {
        self.extreme(Ordering::Less)
    }

    pub fn max(&self) -> Result<T> {
        self.extreme(Ordering::Greater)
    }

    fn extreme(&self, wanted: Ordering) -> Result<T> {
        let mut cursor = self.cursor();
        let mut best = cursor.try_next()?.ok_or(Error::EmptySequence)?;
        comparable(&best)?;
        while let Some(item) = cursor.try_next()? {
            if beats(&item, &best, wanted)? {
                best = item;
            }
        }
        Ok(best)
    }
}

impl<T: 'static> Sequence<T> {
    /// The first element with the smallest `key`.
    pub fn min_by<K, F>(&self, key: F) -> Result<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        self.keyed_extreme(key, Ordering::Less)
    }

    /// The first element with the largest `key`.
    pub fn max_by<K, F>(&self, key: F) -> Result<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        self.keyed_extreme(key, Ordering::Greater)
    }

    fn keyed_extreme<K, F>(&self, key: F, wanted: Ordering) -> Result<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        let mut cursor = self.cursor();
        let mut best = cursor.try_next()?.ok_or(Error::EmptySequence)?;
        let mut best_key = key(&best);
        comparable(&best_key)?;
        while let Some(item) = cursor.try_next()? {
            let k = key(&item);
            if beats(&k, &best_key, wanted)? {
                best = item;
                best_key = k;
            }
        }
        Ok(best)
    }

    /// Left fold from `seed`.
    pub fn aggregate<A, F>(&self, seed: A, f: F) -> Result<A>
    where
        F: Fn(A, T) -> A,
    {
        let mut cursor = self.cursor();
        let mut acc = seed;
        while let Some(item) = cursor.try_next()? {
            acc = f(acc, item);
        }
        Ok(acc)
    }

    /// Left fold from `seed`, then `result` over the final accumulator.
    pub fn aggregate_with<A, R, F, G>(&self, seed: A, f: F, result: G) -> Result<R>
    where
        F: Fn(A, T) -> A,
        G: FnOnce(A) -> R,
    {
        self.aggregate(seed, f).map(result)
    }

    /// Unseeded fold: the first element is the initial accumulator.
    pub fn reduce<F>(&self, f: F) -> Result<T>
    where
        F: Fn(T, T) -> T,
    {
        let mut cursor = self.cursor();
        let mut acc = cursor.try_next()?.ok_or(Error::EmptySequence)?;
        while let Some(item) = cursor.try_next()? {
            acc = f(acc, item);
        }
        Ok(acc)
    }

    /// Number of elements. When the length is known without enumerating,
    /// stages that preserve it (such as `select`) are not run.
    pub fn count(&self) -> Result<usize> {
        if let Some(len) = self.non_enumerated_count() {
            return Ok(len);
        }
        let mut cursor = self.cursor();
        let mut n = 0;
        while cursor.try_next()?.is_some() {
            n += 1;
        }
        Ok(n)
    }

    pub fn count_where<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&T) -> bool,
    {
        self.aggregate(0, |n, item| if predicate(&item) { n + 1 } else { n })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_reducers() {
        let seq = Sequence::from_vec(vec![10, 20, 30]);
        assert_eq!(seq.sum().unwrap(), 60);
        assert_eq!(seq.min().unwrap(), 10);
        assert_eq!(seq.max().unwrap(), 30);
        assert_eq!(seq.average().unwrap(), 20.0);
        assert_eq!(Sequence::<f64>::empty().sum().unwrap(), 0.0);
    }

    #[test]
    fn empty_input_reports_empty_sequence() {
        let empty = Sequence::<i32>::empty();
        assert_eq!(empty.min(), Err(Error::EmptySequence));
        assert_eq!(empty.max(), Err(Error::EmptySequence));
        assert_eq!(empty.average(), Err(Error::EmptySequence));
        assert_eq!(empty.reduce(|a, b| a + b), Err(Error::EmptySequence));
        assert_eq!(empty.min_by(|x| *x), Err(Error::EmptySequence));
    }

    #[test]
    fn nan_is_incomparable() {
        let seq = Sequence::from_vec(vec![1.0, f64::NAN, 3.0]);
        assert!(matches!(seq.max(), Err(Error::TypeMismatch(_))));
        assert!(matches!(
            Sequence::from_vec(vec![f64::NAN]).min(),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn sum_overflow_is_reported() {
        let seq = Sequence::from_vec(vec![i32::MAX, 1]);
        assert_eq!(seq.sum(), Err(Error::Overflow("sum")));
    }

    #[test]
    fn min_by_and_max_by_keep_the_first_extreme() {
        let names = Sequence::from_vec(vec!["Tom", "Dick", "Harry", "Mary", "Jay"]);
        assert_eq!(names.min_by(|s| s.len()).unwrap(), "Tom");
        assert_eq!(names.max_by(|s| s.len()).unwrap(), "Harry");
        assert_eq!(names.max_by(|s| s.len() % 2).unwrap(), "Tom");
    }

    #[test]
    fn folds() {
        let seq = Sequence::from_vec(vec![1, 2, 3, 4]);
        assert_eq!(seq.aggregate(0, |acc, x| acc * 10 + x).unwrap(), 1234);
        assert_eq!(
            seq.aggregate_with(0, |acc, x| acc + x, |total| format!("{total}")).unwrap(),
            "10"
        );
        assert_eq!(seq.reduce(|a, b| a * b).unwrap(), 24);
        assert_eq!(seq.count().unwrap(), 4);
        assert_eq!(seq.filter(|x| x % 2 == 0).count().unwrap(), 2);
        assert_eq!(seq.count_where(|x| *x > 1).unwrap(), 3);
    }

    #[test]
    fn known_length_count_skips_projections() {
        let calls = std::rc::Rc::new(std::cell::Cell::new(0));
        let seen = std::rc::Rc::clone(&calls);
        let projected = Sequence::from_vec(vec![1, 2, 3]).select(move |x| {
            seen.set(seen.get() + 1);
            x * 2
        });
        assert_eq!(projected.count().unwrap(), 3);
        assert_eq!(calls.get(), 0);
        assert_eq!(projected.to_vec().unwrap(), vec![2, 4, 6]);
        assert_eq!(calls.get(), 3);
    }
}

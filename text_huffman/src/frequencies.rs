//! Tools to count frequencies of symbols.

use std::collections::{BTreeMap, HashMap};
use fsum::FSum;
use co_sort::{Permutation, co_sort};
use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};

/// Types that implement this trait can count number of occurrences of values.
pub trait Frequencies {
    /// Type of value.
    type Value;

    /// Constructs `Self` that counts occurrences of all values exposed by `iter`.
    fn with_counted_all<Iter: IntoIterator>(iter: Iter) -> Self
        where Iter::Item: Borrow<Self::Value>, Self: Default, Self::Value: Clone
    {
        let mut result = Self::default();
        result.count_all(iter);
        result
    }

    /// Adds one to the stored number of `value` occurrences.
    fn count(&mut self, value: Self::Value);

    /// Calls `count` for all items exposed by `iter`.
    fn count_all<Iter: IntoIterator>(&mut self, iter: Iter) where Iter::Item: Borrow<Self::Value>, Self::Value: Clone {
        for v in iter { self.count(v.borrow().clone()); }
    }

    /// Returns the total number of occurrences counted so far.
    fn total(&self) -> u64;

    /// Returns the Shannon entropy (in bits per value) of the values counted so far,
    /// or `0.0` if nothing has been counted.
    fn entropy(&self) -> f64;

    /// Converts `self` to the pair of boxed slices that contain
    /// distinct values and numbers of their occurrences respectively.
    fn into_unsorted(self) -> (Box<[Self::Value]>, Box<[u32]>);

    /// Converts `self` to the pair of boxed slices that contain
    /// distinct values and numbers of their occurrences (in non decreasing order) respectively.
    fn into_sorted(self) -> (Box<[Self::Value]>, Box<[u32]>) where Self: Sized {
        let (mut values, mut freq) = self.into_unsorted();
        co_sort!(freq, values);
        (values, freq)
    }
}

fn entropy_of<'a>(counts: impl Iterator<Item = &'a u32> + Clone) -> f64 {
    let sum = counts.clone().map(|v| *v as u64).sum::<u64>() as f64;
    if sum == 0.0 { return 0.0; }
    - FSum::with_all(counts.filter(|v| **v != 0)
        .map(|v| { let p = *v as f64 / sum; p * p.log2() })).value()
}

impl<Value: Eq + Hash, S: BuildHasher> Frequencies for HashMap<Value, u32, S> {
    type Value = Value;

    fn count(&mut self, value: Value) {
        *self.entry(value).or_insert(0) += 1;
    }

    fn total(&self) -> u64 {
        self.values().map(|v| *v as u64).sum()
    }

    fn entropy(&self) -> f64 {
        entropy_of(self.values())
    }

    fn into_unsorted(self) -> (Box<[Self::Value]>, Box<[u32]>) {
        let (values, freq): (Vec<_>, Vec<_>) = self.into_iter().unzip();
        (values.into_boxed_slice(), freq.into_boxed_slice())
    }
}

impl<Value: Ord> Frequencies for BTreeMap<Value, u32> {
    type Value = Value;

    fn count(&mut self, value: Value) {
        *self.entry(value).or_insert(0) += 1;
    }

    fn total(&self) -> u64 {
        self.values().map(|v| *v as u64).sum()
    }

    fn entropy(&self) -> f64 {
        entropy_of(self.values())
    }

    fn into_unsorted(self) -> (Box<[Self::Value]>, Box<[u32]>) {
        let (values, freq): (Vec<_>, Vec<_>) = self.into_iter().unzip();
        (values.into_boxed_slice(), freq.into_boxed_slice())
    }
}

/// Counts the occurrences of each `char` of `text`, in ascending symbol order.
pub fn count_symbols(text: &str) -> BTreeMap<char, u32> {
    BTreeMap::with_counted_all(text.chars())
}

//! Per-vaccine quantity ledgers and their elementwise arithmetic.
//!
//! A ledger maps canonical vaccine names to a quantity (doses or people).
//! All operations treat a missing key as zero and return a new ledger;
//! keys present in either operand survive into the result. Subtraction may
//! produce negative entries; callers clamp where the semantics demand it
//! (a stockpile must not go negative).

use std::collections::BTreeMap;
use std::collections::btree_map;

use itertools::Itertools;

/// Mapping from canonical vaccine name to a quantity.
///
/// Backed by a `BTreeMap` so iteration is sorted and deterministic; two
/// runs over identical inputs produce identical ledgers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VaccineLedger {
    entries: BTreeMap<String, f64>,
}

impl VaccineLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Quantity for a vaccine; absent keys read as zero.
    #[must_use]
    pub fn get(&self, name: &str) -> f64 {
        self.entries.get(name).copied().unwrap_or(0.0)
    }

    /// Whether the ledger carries an entry for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Set the entry for a vaccine.
    pub fn set(&mut self, name: impl Into<String>, amount: f64) {
        self.entries.insert(name.into(), amount);
    }

    /// Add `amount` onto the entry for `name`, creating it from zero.
    pub fn add_to(&mut self, name: &str, amount: f64) {
        *self.entries.entry(name.to_string()).or_insert(0.0) += amount;
    }

    /// Elementwise combination over the union of both key sets.
    ///
    /// `result[k] = f(self[k], other[k])` with absent keys read as zero, so
    /// no key from either side is lost.
    #[must_use]
    pub fn combine(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let entries = self
            .entries
            .keys()
            .merge(other.entries.keys())
            .dedup()
            .map(|name| (name.clone(), f(self.get(name), other.get(name))))
            .collect();
        Self { entries }
    }

    /// Apply `f(entry, scalar)` to every entry of this ledger.
    #[must_use]
    pub fn combine_scalar(&self, scalar: f64, f: impl Fn(f64, f64) -> f64) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(name, &amount)| (name.clone(), f(amount, scalar)))
            .collect();
        Self { entries }
    }

    /// Elementwise sum.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        self.combine(other, |a, b| a + b)
    }

    /// Elementwise difference; entries may go negative.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.combine(other, |a, b| a - b)
    }

    /// Elementwise minimum.
    #[must_use]
    pub fn min_with(&self, other: &Self) -> Self {
        self.combine(other, f64::min)
    }

    /// Multiply every entry by a factor.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        self.combine_scalar(factor, |a, b| a * b)
    }

    /// Clamp every entry to at least `bound`; `clamp_min(0.0)` is the
    /// non-negativity idiom.
    #[must_use]
    pub fn clamp_min(&self, bound: f64) -> Self {
        self.combine_scalar(bound, f64::max)
    }

    /// Sum of all entries.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Iterate entries in sorted name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, f64> {
        self.entries.iter()
    }

    /// Vaccine names present in the ledger, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, f64)> for VaccineLedger {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(pairs: &[(&str, f64)]) -> VaccineLedger {
        pairs
            .iter()
            .map(|(name, amount)| ((*name).to_string(), *amount))
            .collect()
    }

    #[test]
    fn absent_keys_read_as_zero() {
        let a = ledger(&[("biontech", 5.0)]);
        assert_eq!(a.get("moderna"), 0.0);
        assert_eq!(a.get("biontech"), 5.0);
    }

    #[test]
    fn combine_keeps_keys_from_both_sides() {
        let a = ledger(&[("biontech", 5.0), ("az", 2.0)]);
        let b = ledger(&[("moderna", 3.0), ("az", 1.0)]);
        let sum = a.add(&b);
        assert_eq!(sum.len(), 3);
        assert_eq!(sum.get("biontech"), 5.0);
        assert_eq!(sum.get("moderna"), 3.0);
        assert_eq!(sum.get("az"), 3.0);
    }

    #[test]
    fn subtracting_a_ledger_from_itself_is_zero_on_its_keys() {
        let a = ledger(&[("biontech", 5.0), ("az", 2.0)]);
        let zero = a.sub(&a);
        assert_eq!(zero.len(), 2);
        assert_eq!(zero.get("biontech"), 0.0);
        assert_eq!(zero.get("az"), 0.0);
    }

    #[test]
    fn subtraction_can_go_negative_and_clamp_restores() {
        let a = ledger(&[("biontech", 5.0)]);
        let b = ledger(&[("biontech", 8.0), ("moderna", 1.0)]);
        let diff = a.sub(&b);
        assert_eq!(diff.get("biontech"), -3.0);
        assert_eq!(diff.get("moderna"), -1.0);

        let clamped = diff.clamp_min(0.0);
        assert_eq!(clamped.get("biontech"), 0.0);
        assert_eq!(clamped.get("moderna"), 0.0);
    }

    #[test]
    fn min_with_bounds_each_entry() {
        let stock = ledger(&[("biontech", 5.0), ("az", 10.0)]);
        let wanted = ledger(&[("biontech", 8.0), ("az", 4.0), ("moderna", 2.0)]);
        let given = stock.min_with(&wanted);
        assert_eq!(given.get("biontech"), 5.0);
        assert_eq!(given.get("az"), 4.0);
        // nothing on stock means nothing given
        assert_eq!(given.get("moderna"), 0.0);
    }

    #[test]
    fn scalar_operations_only_touch_own_keys() {
        let a = ledger(&[("biontech", 5.0), ("az", 2.0)]);
        let scaled = a.scale(2.0);
        assert_eq!(scaled.len(), 2);
        assert_eq!(scaled.get("biontech"), 10.0);
        assert_eq!(scaled.get("az"), 4.0);
        assert_eq!(a.total(), 7.0);
    }
}

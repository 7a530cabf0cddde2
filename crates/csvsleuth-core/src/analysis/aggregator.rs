/// Running aggregation of spend rows into [`Highlights`].
///
/// Totals are kept per civilisation and per day in first-seen order, so
/// ties for the largest or smallest total resolve to whichever key appeared
/// first in the file.
use crate::model::Highlights;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Per-key totals that remember first-seen order.
#[derive(Debug, Clone)]
struct OrderedTotals<K> {
    index: HashMap<K, usize>,
    totals: Vec<(K, f64)>,
}

impl<K: Clone + Eq + Hash> OrderedTotals<K> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            totals: Vec::new(),
        }
    }

    /// Add `amount` to `key`'s total. The key is only copied into owned
    /// form the first time it is seen.
    fn add<Q>(&mut self, key: &Q, amount: f64)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        match self.index.get(key) {
            Some(&i) => self.totals[i].1 += amount,
            None => {
                let owned = key.to_owned();
                self.index.insert(owned.clone(), self.totals.len());
                self.totals.push((owned, amount));
            }
        }
    }

    fn max(&self) -> Option<&(K, f64)> {
        let mut best: Option<&(K, f64)> = None;
        for entry in &self.totals {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best
    }

    fn min(&self) -> Option<&(K, f64)> {
        let mut best: Option<&(K, f64)> = None;
        for entry in &self.totals {
            if best.is_none_or(|b| entry.1 < b.1) {
                best = Some(entry);
            }
        }
        best
    }
}

/// Accumulates rows and produces highlight snapshots on demand.
#[derive(Debug, Clone)]
pub struct Aggregator {
    total_spend: f64,
    rows: u64,
    by_civ: OrderedTotals<String>,
    by_day: OrderedTotals<u32>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            total_spend: 0.0,
            rows: 0,
            by_civ: OrderedTotals::new(),
            by_day: OrderedTotals::new(),
        }
    }

    /// Fold one validated row into the totals.
    pub fn add_row(&mut self, civ: &str, day: u32, spend: f64) {
        self.total_spend += spend;
        self.rows += 1;
        self.by_civ.add(civ, spend);
        self.by_day.add(&day, spend);
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Highlights over everything added so far. All-zero before the first row.
    pub fn snapshot(&self) -> Highlights {
        if self.rows == 0 {
            return Highlights::default();
        }

        let (big_spent_civ, less_spent_civ) = match (self.by_civ.max(), self.by_civ.min()) {
            (Some(big), Some(less)) => (big.0.clone(), less.0.clone()),
            _ => (String::new(), String::new()),
        };
        let (big_spent_at, big_spent_value) = self.by_day.max().copied().unwrap_or_default();
        let (less_spent_at, less_spent_value) = self.by_day.min().copied().unwrap_or_default();

        Highlights {
            total_spend_galactic: self.total_spend,
            rows_affected: self.rows,
            less_spent_at,
            big_spent_at,
            less_spent_value,
            big_spent_value,
            average_spend_galactic: self.total_spend / self.rows as f64,
            big_spent_civ,
            less_spent_civ,
        }
    }
}

use serde_json::Value;
use super::Evidence;

/// Array evidence. Keeps the list hypothesis (`item`) and the tuple hypothesis
/// (`cols`) side by side until lowering picks one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArrEvidence {
    pub len_min: usize,
    pub len_max: usize,
    pub item: Box<Evidence>,   // every element pooled
    pub cols: Vec<Evidence>,   // per position
    pub present: Vec<u64>,     // arrays that reached position i (incl. null)
    pub non_null: Vec<u64>,    // arrays with a non-null value at position i
    pub samples: u64,
}

impl ArrEvidence {
    pub(super) fn observe(xs: &[Value]) -> Self {
        let mut arr = Self {
            len_min: xs.len(),
            len_max: xs.len(),
            samples: 1,
            ..Self::default()
        };
        let mut item = Evidence::empty();
        for el in xs {
            let seen = Evidence::observe(el);
            item = Evidence::join(&item, &seen);
            arr.cols.push(seen);
            arr.present.push(1);
            arr.non_null.push(u64::from(!el.is_null()));
        }
        arr.item = Box::new(item);
        arr
    }

    pub(super) fn join(a: &Self, b: &Self) -> Self {
        let n = a.cols.len().max(b.cols.len());
        let count = |xs: &[u64], i: usize| xs.get(i).copied().unwrap_or(0);
        Self {
            len_min: a.len_min.min(b.len_min),
            len_max: a.len_max.max(b.len_max),
            item: Box::new(Evidence::join(&a.item, &b.item)),
            cols: (0..n)
                .map(|i| {
                    // a missing position reads as null
                    let ai = a.cols.get(i).cloned().unwrap_or_else(Evidence::null);
                    let bi = b.cols.get(i).cloned().unwrap_or_else(Evidence::null);
                    Evidence::join(&ai, &bi)
                })
                .collect(),
            present: (0..n).map(|i| count(&a.present, i) + count(&b.present, i)).collect(),
            non_null: (0..n).map(|i| count(&a.non_null, i) + count(&b.non_null, i)).collect(),
            samples: a.samples + b.samples,
        }
    }

    /// True only with proof of fixed arity:
    ///  - every observed array had the same, non-zero length, or
    ///  - some position held null in every sample (a padding slot).
    ///
    /// A single sample is never proof.
    pub fn is_tuple(&self) -> bool {
        if self.samples < 2 || self.cols.is_empty() {
            return false;
        }
        if self.len_min == self.len_max {
            return true;
        }
        (0..self.cols.len()).any(|i| {
            self.present.get(i).copied().unwrap_or(0) == self.samples
                && self.non_null.get(i).copied().unwrap_or(0) == 0
        })
    }

    /// Last position present in every sample, plus one.
    pub fn min_items(&self) -> usize {
        if self.len_min == self.len_max {
            return self.cols.len();
        }
        self.present
            .iter()
            .rposition(|&n| n == self.samples)
            .map_or(0, |i| i + 1)
    }
}

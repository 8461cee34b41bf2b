use indexmap::IndexMap;
use serde_json::{Map, Value};
use super::Evidence;

/// Object evidence: per-field evidence in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjEvidence {
    pub fields: IndexMap<String, Evidence>,
    pub seen_objects: u64,
}

impl ObjEvidence {
    pub(super) fn observe(map: &Map<String, Value>) -> Self {
        Self {
            fields: map.iter().map(|(k, v)| (k.clone(), Evidence::observe(v))).collect(),
            seen_objects: 1,
        }
    }

    pub(super) fn join(a: &Self, b: &Self) -> Self {
        let mut fields = a.fields.clone();
        for (k, fb) in &b.fields {
            match fields.get_mut(k) {
                Some(fa) => {
                    let joined = Evidence::join(fa, fb);
                    *fa = joined;
                }
                None => {
                    fields.insert(k.clone(), fb.clone());
                }
            }
        }
        Self { fields, seen_objects: a.seen_objects + b.seen_objects }
    }
}

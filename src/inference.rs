//! Structural shape inference from JSON samples.
//!
//! Stream JSON samples in, accumulate structural evidence, and lower it to a
//! [`Shape`](crate::shape::Shape). Scalars are not distinguished from one
//! another; only containers matter for key paths.
//!
//! The join ⊔ is associative and commutative, so samples may be observed in
//! any order or in parallel and reduced afterwards. It is not idempotent: sample
//! counts add up, and they are part of the tuple-vs-list proof.
pub mod arr;
pub mod obj;

use serde_json::Value;

pub use arr::ArrEvidence;
pub use obj::ObjEvidence;

use crate::shape::Shape;

// ------------------------------ Evidence ---------------------------------- //

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evidence {
    pub nullable: bool,
    pub scalar: bool,
    pub arr: Option<ArrEvidence>,
    pub obj: Option<ObjEvidence>,
}

impl Evidence {
    pub fn empty() -> Self { Self::default() }

    pub fn null() -> Self { Self { nullable: true, ..Self::default() } }

    /// Nothing observed at all.
    pub fn is_bottom(&self) -> bool {
        !self.nullable && !self.scalar && self.arr.is_none() && self.obj.is_none()
    }

    pub fn observe(v: &Value) -> Self {
        match v {
            Value::Null => Self::null(),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => Self { scalar: true, ..Self::default() },
            Value::Array(xs) => Self { arr: Some(ArrEvidence::observe(xs)), ..Self::default() },
            Value::Object(m) => Self { obj: Some(ObjEvidence::observe(m)), ..Self::default() },
        }
    }

    pub fn join(a: &Self, b: &Self) -> Self {
        Self {
            nullable: a.nullable || b.nullable,
            scalar: a.scalar || b.scalar,
            arr: match (&a.arr, &b.arr) {
                (None, None) => None,
                (Some(x), None) | (None, Some(x)) => Some(x.clone()),
                (Some(x), Some(y)) => Some(ArrEvidence::join(x, y)),
            },
            obj: match (&a.obj, &b.obj) {
                (None, None) => None,
                (Some(x), None) | (None, Some(x)) => Some(x.clone()),
                (Some(x), Some(y)) => Some(ObjEvidence::join(x, y)),
            },
        }
    }

    pub fn to_shape(&self) -> Shape {
        crate::lower::lower_to_shape(self)
    }
}

// ------------------------------- Front API -------------------------------- //

#[derive(Clone, Debug, Default)]
pub struct Inference { state: Evidence }

impl Inference {
    pub fn new() -> Self { Self::default() }

    pub fn observe_value(&mut self, v: &Value) {
        let obs = Evidence::observe(v);
        self.state = Evidence::join(&self.state, &obs);
    }

    /// Fold in evidence gathered elsewhere (e.g. on another thread).
    pub fn merge(&mut self, other: &Evidence) {
        self.state = Evidence::join(&self.state, other);
    }

    pub fn evidence(&self) -> &Evidence { &self.state }

    pub fn into_evidence(self) -> Evidence { self.state }

    pub fn solve(&self) -> Shape {
        self.state.to_shape()
    }
}

pub fn infer_from_values<'a, I>(values: I) -> Evidence
where
    I: IntoIterator<Item = &'a Value>
{
    values
        .into_iter()
        .fold(Evidence::empty(), |st, v| Evidence::join(&st, &Evidence::observe(v)))
}

// ------------------------------- Tests ------------------------------------ //

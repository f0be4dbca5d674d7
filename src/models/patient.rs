use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the `patient` table, keyed by `pid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub pid: String,
    pub pname: String,
    pub gender: String,
    pub age: i64,
    pub contactnum: String,
    pub gmail: String,
    pub address: String,
    pub bloodgroup: String,
    pub weight: f64,
    pub height: f64,
    pub created_at: NaiveDateTime,
}

/// Creation payload. Every field is optional at the wire level so a missing
/// key and an empty value fail the same presence check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPatient {
    pub pid: Option<String>,
    pub pname: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i64>,
    pub contactnum: Option<String>,
    pub gmail: Option<String>,
    pub address: Option<String>,
    pub bloodgroup: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

/// Partial-update payload: any subset of the nine mutable fields.
/// `pid` is the lookup key and never part of the body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientUpdate {
    pub pname: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i64>,
    pub contactnum: Option<String>,
    pub gmail: Option<String>,
    pub address: Option<String>,
    pub bloodgroup: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

/// A supplied value for one column of a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Real(f64),
}

// Presence checks. Empty strings and zero numbers count as missing, matching
// the truthiness rules the service contract inherits.
fn text(v: &Option<String>) -> Option<FieldValue> {
    v.as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| FieldValue::Text(s.to_string()))
}

fn int(v: &Option<i64>) -> Option<FieldValue> {
    v.filter(|n| *n != 0).map(FieldValue::Int)
}

fn real(v: &Option<f64>) -> Option<FieldValue> {
    v.filter(|n| *n != 0.0).map(FieldValue::Real)
}

impl NewPatient {
    /// True when all ten required fields are present and truthy.
    pub fn is_complete(&self) -> bool {
        text(&self.pid).is_some()
            && text(&self.pname).is_some()
            && text(&self.gender).is_some()
            && int(&self.age).is_some()
            && text(&self.contactnum).is_some()
            && text(&self.gmail).is_some()
            && text(&self.address).is_some()
            && text(&self.bloodgroup).is_some()
            && real(&self.weight).is_some()
            && real(&self.height).is_some()
    }
}

impl PatientUpdate {
    /// Supplied `(column, value)` pairs after presence filtering, in table
    /// column order. The repository turns these into `SET` clauses.
    pub fn changes(&self) -> Vec<(&'static str, FieldValue)> {
        let candidates = [
            ("pname", text(&self.pname)),
            ("gender", text(&self.gender)),
            ("age", int(&self.age)),
            ("contactnum", text(&self.contactnum)),
            ("gmail", text(&self.gmail)),
            ("address", text(&self.address)),
            ("bloodgroup", text(&self.bloodgroup)),
            ("weight", real(&self.weight)),
            ("height", real(&self.height)),
        ];
        candidates
            .into_iter()
            .filter_map(|(col, v)| v.map(|v| (col, v)))
            .collect()
    }

    /// True when no field survives the presence check.
    pub fn is_empty(&self) -> bool {
        self.changes().is_empty()
    }
}

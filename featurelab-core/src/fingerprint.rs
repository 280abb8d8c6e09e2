//! Feature-table fingerprinting.
//!
//! A `FeatureHash` identifies a table by content: symbol, column names and the
//! raw bit pattern of every value, in catalogue order. Two builds over the same
//! bars must hash identically, NaN cells included.

use crate::features::{ColumnValues, FeatureTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// BLAKE3 hex digest of a feature table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureHash(pub String);

impl FeatureHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn fingerprint(table: &FeatureTable) -> FeatureHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(table.symbol().as_bytes());
    hasher.update(&(table.len() as u64).to_le_bytes());

    for column in table.columns() {
        // Length-prefix names so adjacent columns can't alias
        hasher.update(&(column.name.len() as u64).to_le_bytes());
        hasher.update(column.name.as_bytes());
        match column.values {
            ColumnValues::Date(dates) => {
                for d in dates {
                    hasher.update(d.to_string().as_bytes());
                }
            }
            ColumnValues::Float(values) => {
                for v in values {
                    hasher.update(&v.to_bits().to_le_bytes());
                }
            }
            ColumnValues::Int(values) => {
                for v in values {
                    hasher.update(&v.to_le_bytes());
                }
            }
            ColumnValues::Flag(values) => {
                for &v in values {
                    hasher.update(&[u8::from(v)]);
                }
            }
        }
    }

    FeatureHash(hasher.finalize().to_hex().to_string())
}

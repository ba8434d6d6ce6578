use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label produced by a classifier for an entity.
pub type SegmentLabel = String;

/// Identifies an entity in an input record.
///
/// Member ids refer to people in the population registry. Names are opaque
/// vertex labels, typically from a network that has already been reduced to
/// segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identifier {
    Member(u64),
    Name(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Member(id) => write!(f, "{}", id),
            Identifier::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for Identifier {
    fn from(id: u64) -> Self {
        Identifier::Member(id)
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier::Name(name.to_string())
    }
}

/// A keyed row of values: `<key>\t<value>[\t<value>...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<K> {
    pub key: K,
    pub values: Vec<f64>,
}

impl<K> Record<K> {
    pub fn new(key: K, values: Vec<f64>) -> Self {
        Self { key, values }
    }

    pub fn single(key: K, value: f64) -> Self {
        Self {
            key,
            values: vec![value],
        }
    }

    pub fn value_sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// A weighted edge between two vertices: `<v1>\t<v2>\t<weight>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<K> {
    pub source: K,
    pub target: K,
    pub weight: f64,
}

impl<K: PartialEq> Edge<K> {
    pub fn new(source: K, target: K, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

pub type VertexRecord = Record<Identifier>;
pub type SegmentedRecord = Record<SegmentLabel>;
pub type EdgeRecord = Edge<Identifier>;
pub type SegmentedEdge = Edge<SegmentLabel>;

/// Whether a statistic looks at the number of connections or their weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Weightedness {
    Weighted,
    #[default]
    Unweighted,
}

impl Weightedness {
    pub fn as_str(self) -> &'static str {
        match self {
            Weightedness::Weighted => "weighted",
            Weightedness::Unweighted => "unweighted",
        }
    }
}

impl fmt::Display for Weightedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("weightedness must be \"weighted\" or \"unweighted\", got {0:?}")]
pub struct InvalidWeightedness(pub String);

impl FromStr for Weightedness {
    type Err = InvalidWeightedness;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weighted" => Ok(Weightedness::Weighted),
            "unweighted" => Ok(Weightedness::Unweighted),
            other => Err(InvalidWeightedness(other.to_string())),
        }
    }
}

//! Resource kinds, holdings, and the fixed-order resource vector.
//!
//! Every resource bundle that crosses the wire (player holdings, the two
//! halves of a trade offer) is flattened into a `ResourceVector` whose order
//! is always clay, wood, sheep, ore, wheat.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of tradable resource kinds.
pub const RESOURCE_KINDS: usize = 5;

/// A tradable resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Clay,
    Wood,
    Sheep,
    Ore,
    Wheat,
}

/// All kinds in wire order.
pub const ALL_RESOURCES: [ResourceKind; RESOURCE_KINDS] = [
    ResourceKind::Clay,
    ResourceKind::Wood,
    ResourceKind::Sheep,
    ResourceKind::Ore,
    ResourceKind::Wheat,
];

impl ResourceKind {
    /// Position of this kind in a `ResourceVector`.
    pub const fn index(self) -> usize {
        match self {
            ResourceKind::Clay => 0,
            ResourceKind::Wood => 1,
            ResourceKind::Sheep => 2,
            ResourceKind::Ore => 3,
            ResourceKind::Wheat => 4,
        }
    }
}

/// Errors from parsing a resource bundle.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("expected 5 comma-separated counts, got {0}")]
    WrongCount(usize),

    #[error("invalid resource count: '{0}'")]
    InvalidCount(String),
}

/// Per-kind resource counts for holdings or one side of a trade.
///
/// Serialized as a map of kind name to count; kinds left out of the map
/// count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSet {
    #[serde(default)]
    pub clay: u32,
    #[serde(default)]
    pub wood: u32,
    #[serde(default)]
    pub sheep: u32,
    #[serde(default)]
    pub ore: u32,
    #[serde(default)]
    pub wheat: u32,
}

impl ResourceSet {
    /// Builds a set from counts in wire order.
    pub const fn from_counts(counts: [u32; RESOURCE_KINDS]) -> Self {
        ResourceSet {
            clay: counts[0],
            wood: counts[1],
            sheep: counts[2],
            ore: counts[3],
            wheat: counts[4],
        }
    }

    /// Parses `c,w,s,o,wh` as used on the host command line.
    pub fn from_csv(s: &str) -> Result<Self, ResourceError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != RESOURCE_KINDS {
            return Err(ResourceError::WrongCount(parts.len()));
        }
        let mut counts = [0u32; RESOURCE_KINDS];
        for (slot, part) in counts.iter_mut().zip(parts) {
            *slot = part
                .parse()
                .map_err(|_| ResourceError::InvalidCount(part.to_string()))?;
        }
        Ok(ResourceSet::from_counts(counts))
    }

    pub fn amount(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Clay => self.clay,
            ResourceKind::Wood => self.wood,
            ResourceKind::Sheep => self.sheep,
            ResourceKind::Ore => self.ore,
            ResourceKind::Wheat => self.wheat,
        }
    }

    /// Adds `n` of `kind`.
    pub fn add(&mut self, kind: ResourceKind, n: u32) {
        let slot = match kind {
            ResourceKind::Clay => &mut self.clay,
            ResourceKind::Wood => &mut self.wood,
            ResourceKind::Sheep => &mut self.sheep,
            ResourceKind::Ore => &mut self.ore,
            ResourceKind::Wheat => &mut self.wheat,
        };
        *slot += n;
    }

    /// True if at least one card of `kind` is present.
    pub fn contains(&self, kind: ResourceKind) -> bool {
        self.amount(kind) > 0
    }

    pub fn total(&self) -> u32 {
        ALL_RESOURCES.iter().map(|&k| self.amount(k)).sum()
    }

    /// True if every count in `self` is at least the matching count in `other`.
    pub fn covers(&self, other: &ResourceSet) -> bool {
        ALL_RESOURCES
            .iter()
            .all(|&k| self.amount(k) >= other.amount(k))
    }
}

/// Fixed-order 5-element encoding of a resource bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResourceVector(pub [i32; RESOURCE_KINDS]);

impl ResourceVector {
    pub fn total(&self) -> i32 {
        self.0.iter().sum()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    /// Comma-joined counts, e.g. `1,0,2,0,0`.
    pub fn to_csv(&self) -> String {
        self.0
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_csv())
    }
}

/// Encodes a resource set in clay, wood, sheep, ore, wheat order.
pub fn encode(set: &ResourceSet) -> ResourceVector {
    let mut out = [0i32; RESOURCE_KINDS];
    for kind in ALL_RESOURCES {
        out[kind.index()] = i32::try_from(set.amount(kind)).unwrap_or(i32::MAX);
    }
    ResourceVector(out)
}

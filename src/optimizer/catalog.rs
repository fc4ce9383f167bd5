use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use super::OptimizerError;
use crate::types::place::place_id_text;

/// A visitable place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(deserialize_with = "place_id_text")]
    pub place_id: String,
    pub name: String,
    /// Category labels matched against preference weights
    #[serde(rename = "type", default)]
    pub types: Vec<String>,
    pub rating: f64,
    /// Season codes such as `DEC-APR` or `JUN-SEP`
    #[serde(default)]
    pub season: Vec<String>,
}

/// Road distance between two places, valid in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    #[serde(deserialize_with = "place_id_text")]
    pub place_id_from: String,
    #[serde(deserialize_with = "place_id_text")]
    pub place_id_to: String,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    pub locations: Vec<Location>,
    #[serde(default)]
    pub distances: Vec<Distance>,
}

/// Locations plus a symmetric distance index.
#[derive(Debug, Clone)]
pub struct Catalog {
    locations: Vec<Location>,
    distances: HashMap<(String, String), f64>,
}

impl Catalog {
    pub fn new(data: CatalogData) -> Self {
        let mut distances = HashMap::with_capacity(data.distances.len());
        for row in data.distances {
            // First row for a pair wins.
            distances
                .entry(pair_key(&row.place_id_from, &row.place_id_to))
                .or_insert(row.distance_km);
        }

        Self {
            locations: data.locations,
            distances,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, OptimizerError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            OptimizerError::Catalog(format!("cannot read {}: {err}", path.display()))
        })?;
        let data: CatalogData = serde_json::from_str(&raw).map_err(|err| {
            OptimizerError::Catalog(format!("cannot parse {}: {err}", path.display()))
        })?;
        Ok(Self::new(data))
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Known distance between two places in either direction.
    pub fn distance(&self, a: &str, b: &str) -> Option<f64> {
        self.distances.get(&pair_key(a, b)).copied()
    }

    /// Like [`Catalog::distance`], treating unknown pairs as zero.
    pub fn distance_or_zero(&self, a: &str, b: &str) -> f64 {
        self.distance(a, b).unwrap_or(0.0)
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

//! Hash containers keyed by cell coordinates.
//!
//! Fnv hashing beats the default SipHash on keys as small as a `Coordinate`.

use fnv::FnvBuildHasher;
use std::collections::{HashMap, HashSet};

use crate::cells::Coordinate;

pub type CoordinateSet = HashSet<Coordinate, FnvBuildHasher>;
pub type CoordinateMap<V> = HashMap<Coordinate, V, FnvBuildHasher>;

pub fn coordinate_set(capacity: usize) -> CoordinateSet {
    HashSet::with_capacity_and_hasher(capacity, FnvBuildHasher::default())
}

pub fn coordinate_map<V>(capacity: usize) -> CoordinateMap<V> {
    HashMap::with_capacity_and_hasher(capacity, FnvBuildHasher::default())
}

/// True when no coordinate turns up twice, stopping at the first repeat.
pub fn all_distinct<I>(coords: I) -> bool
    where I: IntoIterator<Item = Coordinate>
{
    let coords = coords.into_iter();
    let mut seen = coordinate_set(coords.size_hint().0);
    coords.into_iter().all(|coord| seen.insert(coord))
}

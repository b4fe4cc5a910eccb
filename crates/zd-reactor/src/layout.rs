//! State vector layout.
//!
//! Maps between the flat state vector integrated by the solver and named
//! components: index 0 is the temperature, then one entry per bulk species, then
//! one contiguous block per attached surface in attachment order.

use std::collections::HashMap;
use std::ops::Range;

use crate::error::{ReactorError, ReactorResult};

/// Name of the component at index 0.
pub const TEMPERATURE: &str = "temperature";

/// Index of the first bulk species.
pub const SPECIES_OFFSET: usize = 1;

/// Bidirectional name ↔ index map for a reactor's state vector.
#[derive(Debug, Clone, PartialEq)]
pub struct StateLayout {
    bulk: Vec<String>,
    /// Species names of each attached surface, in attachment order.
    surfaces: Vec<Vec<String>>,
    /// Reverse lookup: name -> state index.
    by_name: HashMap<String, usize>,
}

impl StateLayout {
    /// Build a layout. Every component name must be unique so that the mapping
    /// stays invertible.
    pub fn new(bulk: Vec<String>, surfaces: Vec<Vec<String>>) -> ReactorResult<Self> {
        let mut by_name = HashMap::new();
        by_name.insert(TEMPERATURE.to_string(), 0);
        let names = bulk.iter().chain(surfaces.iter().flatten());
        for (i, name) in names.enumerate() {
            if by_name.insert(name.clone(), SPECIES_OFFSET + i).is_some() {
                return Err(ReactorError::DuplicateComponent { name: name.clone() });
            }
        }
        Ok(Self {
            bulk,
            surfaces,
            by_name,
        })
    }

    /// Total state length: 1 + Ng + Σ Ns.
    pub fn neq(&self) -> usize {
        SPECIES_OFFSET + self.bulk.len() + self.surfaces.iter().map(Vec::len).sum::<usize>()
    }

    pub fn n_bulk(&self) -> usize {
        self.bulk.len()
    }

    pub fn n_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// Bulk species indices.
    pub fn bulk_range(&self) -> Range<usize> {
        SPECIES_OFFSET..SPECIES_OFFSET + self.bulk.len()
    }

    /// Indices of all species (bulk and surface).
    pub fn species_range(&self) -> Range<usize> {
        SPECIES_OFFSET..self.neq()
    }

    /// Indices of the block owned by surface `i`.
    pub fn surface_range(&self, i: usize) -> ReactorResult<Range<usize>> {
        if i >= self.surfaces.len() {
            return Err(ReactorError::IndexOutOfBounds {
                index: i,
                len: self.surfaces.len(),
            });
        }
        let start = SPECIES_OFFSET
            + self.bulk.len()
            + self.surfaces[..i].iter().map(Vec::len).sum::<usize>();
        Ok(start..start + self.surfaces[i].len())
    }

    /// State index of a named component.
    pub fn component_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Name of the component at `index`, resolved through the bulk species and
    /// then each surface in turn.
    pub fn component_name(&self, index: usize) -> ReactorResult<&str> {
        if index == 0 {
            return Ok(TEMPERATURE);
        }
        let mut k = index - SPECIES_OFFSET;
        if k < self.bulk.len() {
            return Ok(&self.bulk[k]);
        }
        k -= self.bulk.len();
        self.surfaces
            .iter()
            .find_map(|species| {
                if k < species.len() {
                    Some(species[k].as_str())
                } else {
                    k -= species.len();
                    None
                }
            })
            .ok_or_else(|| ReactorError::IndexOutOfBounds {
                index,
                len: self.neq(),
            })
    }

    /// All component names in state order.
    pub fn component_names(&self) -> Vec<String> {
        std::iter::once(TEMPERATURE.to_string())
            .chain(self.bulk.iter().cloned())
            .chain(self.surfaces.iter().flatten().cloned())
            .collect()
    }
}

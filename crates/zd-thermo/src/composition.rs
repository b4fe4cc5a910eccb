//! Named compositions (mole fractions keyed by species name).

use crate::error::{ThermoError, ThermoResult};

/// Composition defined by normalized mole fractions.
///
/// The composition is always normalized (mole fractions sum to 1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Species names and their mole fractions (always normalized to sum=1).
    items: Vec<(String, f64)>,
}

impl Composition {
    /// Create a pure-species composition.
    pub fn pure(species: &str) -> Self {
        Self {
            items: vec![(species.to_string(), 1.0)],
        }
    }

    /// Create a composition from mole fractions.
    ///
    /// Validates that all fractions are finite, non-negative, and have a positive sum,
    /// then normalizes to sum=1. Repeated names are merged.
    pub fn new_mole_fractions<S: Into<String>>(fractions: Vec<(S, f64)>) -> ThermoResult<Self> {
        if fractions.is_empty() {
            return Err(ThermoError::InvalidArg {
                what: "empty composition".into(),
            });
        }

        let mut merged: Vec<(String, f64)> = Vec::with_capacity(fractions.len());
        let mut sum = 0.0;
        for (name, frac) in fractions {
            if !frac.is_finite() {
                return Err(ThermoError::NonPhysical {
                    what: "non-finite mole fraction",
                });
            }
            if frac < 0.0 {
                return Err(ThermoError::NonPhysical {
                    what: "negative mole fraction",
                });
            }
            sum += frac;
            let name = name.into();
            match merged.iter_mut().find(|(n, _)| *n == name) {
                Some((_, f)) => *f += frac,
                None => merged.push((name, frac)),
            }
        }

        if sum <= 0.0 || !sum.is_finite() {
            return Err(ThermoError::NonPhysical {
                what: "mole fractions sum to zero or non-finite",
            });
        }

        let items = merged
            .into_iter()
            .map(|(s, f)| (s, f / sum))
            .filter(|(_, f)| *f > 1e-15) // Drop negligible species
            .collect();

        Ok(Self { items })
    }

    /// Parse a composition string such as `"CH4:1, O2:2, N2:7.52"`.
    pub fn parse(text: &str) -> ThermoResult<Self> {
        let mut fractions = Vec::new();
        for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (name, value) = item.split_once(':').ok_or_else(|| ThermoError::InvalidArg {
                what: format!("expected 'name:value', got '{}'", item),
            })?;
            let value: f64 = value.trim().parse().map_err(|_| ThermoError::InvalidArg {
                what: format!("invalid mole fraction in '{}'", item),
            })?;
            fractions.push((name.trim().to_string(), value));
        }
        Self::new_mole_fractions(fractions)
    }

    /// Get mole fraction of a species (0.0 if not present).
    pub fn mole_fraction(&self, species: &str) -> f64 {
        self.items
            .iter()
            .find(|(s, _)| s == species)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    /// Iterate over all species with non-zero mole fractions.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.items.iter().map(|(s, f)| (s.as_str(), *f))
    }

    /// Expand into a dense mole-fraction vector ordered like `species_names`.
    ///
    /// Fails if the composition names a species that is not in the list.
    pub fn to_dense<S: AsRef<str>>(&self, species_names: &[S]) -> ThermoResult<Vec<f64>> {
        let mut x = vec![0.0; species_names.len()];
        for (name, frac) in &self.items {
            let k = species_names
                .iter()
                .position(|s| s.as_ref() == name)
                .ok_or_else(|| ThermoError::UnknownSpecies { name: name.clone() })?;
            x[k] = *frac;
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zd_core::{Tolerances, nearly_equal};

    fn tol() -> Tolerances {
        Tolerances {
            abs: 1e-10,
            rel: 1e-10,
        }
    }

    #[test]
    fn pure_composition() {
        let comp = Composition::pure("O2");
        assert_eq!(comp.mole_fraction("O2"), 1.0);
        assert_eq!(comp.mole_fraction("N2"), 0.0);
    }

    #[test]
    fn mixture_normalization_non_unit_sum() {
        let comp = Composition::new_mole_fractions(vec![("O2", 2.0), ("N2", 8.0)]).unwrap();
        assert!(nearly_equal(comp.mole_fraction("O2"), 0.2, tol()));
        assert!(nearly_equal(comp.mole_fraction("N2"), 0.8, tol()));
    }

    #[test]
    fn repeated_names_are_merged() {
        let comp =
            Composition::new_mole_fractions(vec![("A", 1.0), ("B", 1.0), ("A", 2.0)]).unwrap();
        assert!(nearly_equal(comp.mole_fraction("A"), 0.75, tol()));
    }

    #[test]
    fn parse_string() {
        let comp = Composition::parse("CH4:1, O2:2 , N2:7").unwrap();
        assert!(nearly_equal(comp.mole_fraction("CH4"), 0.1, tol()));
        assert!(nearly_equal(comp.mole_fraction("N2"), 0.7, tol()));
        assert!(Composition::parse("CH4=1").is_err());
        assert!(Composition::parse("CH4:abc").is_err());
    }

    #[test]
    fn dense_expansion_follows_phase_order() {
        let comp = Composition::new_mole_fractions(vec![("B", 1.0), ("C", 3.0)]).unwrap();
        let x = comp.to_dense(&["A", "B", "C"]).unwrap();
        assert_eq!(x.len(), 3);
        assert_eq!(x[0], 0.0);
        assert!(nearly_equal(x[1], 0.25, tol()));
        assert!(nearly_equal(x[2], 0.75, tol()));

        let err = comp.to_dense(&["A", "B"]).unwrap_err();
        assert!(matches!(err, ThermoError::UnknownSpecies { .. }));
    }

    #[test]
    fn invalid_inputs() {
        assert!(Composition::new_mole_fractions(vec![("O2", -0.5), ("N2", 1.5)]).is_err());
        assert!(Composition::new_mole_fractions(vec![("O2", 0.0), ("N2", 0.0)]).is_err());
        assert!(Composition::new_mole_fractions(vec![("O2", f64::NAN)]).is_err());
        assert!(Composition::new_mole_fractions(Vec::<(String, f64)>::new()).is_err());
    }
}

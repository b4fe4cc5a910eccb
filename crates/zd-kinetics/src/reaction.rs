//! Irreversible mass-action reactions.

use crate::error::{KineticsError, KineticsResult};
use crate::rate::ArrheniusRate;

/// One irreversible reaction.
///
/// Species are referred to by index into the species list the reaction was
/// parsed against. Rate-law orders default to the reactant stoichiometric
/// coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub equation: String,
    pub reactants: Vec<(usize, f64)>,
    pub products: Vec<(usize, f64)>,
    pub orders: Vec<(usize, f64)>,
    pub rate: ArrheniusRate,
}

impl Reaction {
    /// Parse an equation such as `"2 H2 + O2 => 2 H2O"`.
    ///
    /// Only irreversible reactions (`=>`) are accepted.
    pub fn parse<S: AsRef<str>>(
        equation: &str,
        species: &[S],
        rate: ArrheniusRate,
    ) -> KineticsResult<Self> {
        rate.validate()?;
        if equation.contains("<=>") || (equation.contains('=') && !equation.contains("=>")) {
            return Err(KineticsError::NotSupported {
                what: "reversible reactions",
            });
        }
        let mut sides = equation.split("=>");
        let (lhs, rhs) = match (sides.next(), sides.next(), sides.next()) {
            (Some(l), Some(r), None) => (l, r),
            _ => {
                return Err(KineticsError::Parse {
                    equation: equation.into(),
                    what: "expected exactly one '=>'".into(),
                });
            }
        };

        let reactants = parse_side(lhs, equation, species)?;
        let products = parse_side(rhs, equation, species)?;
        if reactants.is_empty() {
            return Err(KineticsError::Parse {
                equation: equation.into(),
                what: "no reactants".into(),
            });
        }
        Ok(Self {
            equation: equation.trim().to_string(),
            orders: reactants.clone(),
            reactants,
            products,
            rate,
        })
    }

    /// Override the rate-law order of one species.
    pub fn with_order(mut self, species: usize, order: f64) -> KineticsResult<Self> {
        if !order.is_finite() || order < 0.0 {
            return Err(KineticsError::InvalidArg {
                what: format!("order {} in '{}'", order, self.equation),
            });
        }
        match self.orders.iter_mut().find(|(k, _)| *k == species) {
            Some(entry) => entry.1 = order,
            None => self.orders.push((species, order)),
        }
        self.orders.retain(|&(_, o)| o != 0.0);
        Ok(self)
    }

    /// Net stoichiometric coefficients (products minus reactants), merged by species.
    pub fn net_stoichiometry(&self) -> Vec<(usize, f64)> {
        let mut net: Vec<(usize, f64)> = Vec::new();
        let reactants = self.reactants.iter().map(|&(k, nu)| (k, -nu));
        for (k, nu) in reactants.chain(self.products.iter().copied()) {
            match net.iter_mut().find(|(j, _)| *j == k) {
                Some(entry) => entry.1 += nu,
                None => net.push((k, nu)),
            }
        }
        net.retain(|&(_, nu)| nu != 0.0);
        net
    }

    /// Largest species index referenced, if any.
    pub(crate) fn max_species_index(&self) -> Option<usize> {
        self.reactants
            .iter()
            .chain(&self.products)
            .chain(&self.orders)
            .map(|&(k, _)| k)
            .max()
    }
}

fn parse_side<S: AsRef<str>>(
    side: &str,
    equation: &str,
    species: &[S],
) -> KineticsResult<Vec<(usize, f64)>> {
    let mut out: Vec<(usize, f64)> = Vec::new();
    for term in side.split(" + ") {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        let (coeff, name) = split_coefficient(term);
        let coeff = match coeff {
            Some(text) => text.parse::<f64>().map_err(|_| KineticsError::Parse {
                equation: equation.into(),
                what: format!("bad coefficient '{}'", text),
            })?,
            None => 1.0,
        };
        if coeff <= 0.0 || name.is_empty() {
            return Err(KineticsError::Parse {
                equation: equation.into(),
                what: format!("bad term '{}'", term),
            });
        }
        let k = species
            .iter()
            .position(|s| s.as_ref() == name)
            .ok_or_else(|| KineticsError::UnknownSpecies {
                name: name.to_string(),
                equation: equation.into(),
            })?;
        match out.iter_mut().find(|(j, _)| *j == k) {
            Some(entry) => entry.1 += coeff,
            None => out.push((k, coeff)),
        }
    }
    Ok(out)
}

/// Split `"2 O2"` or `"2O2"` into (`Some("2")`, `"O2"`).
fn split_coefficient(term: &str) -> (Option<&str>, &str) {
    if let Some((head, tail)) = term.split_once(char::is_whitespace) {
        if head.parse::<f64>().is_ok() {
            return (Some(head), tail.trim());
        }
    }
    let digits = term
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(term.len());
    if digits == 0 {
        (None, term)
    } else {
        (Some(&term[..digits]), &term[digits..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECIES: [&str; 4] = ["H2", "O2", "H2O", "AR"];

    fn rate() -> ArrheniusRate {
        ArrheniusRate::new(1.0, 0.0, 0.0)
    }

    #[test]
    fn parse_with_coefficients() {
        let r = Reaction::parse("2 H2 + O2 => 2H2O", &SPECIES, rate()).unwrap();
        assert_eq!(r.reactants, vec![(0, 2.0), (1, 1.0)]);
        assert_eq!(r.products, vec![(2, 2.0)]);
        assert_eq!(r.orders, r.reactants);
    }

    #[test]
    fn repeated_species_merge() {
        let r = Reaction::parse("H2 + H2 => H2O + H2", &SPECIES, rate()).unwrap();
        assert_eq!(r.reactants, vec![(0, 2.0)]);
        assert_eq!(r.net_stoichiometry(), vec![(0, -1.0), (2, 1.0)]);
    }

    #[test]
    fn third_body_species_cancels() {
        let r = Reaction::parse("H2 + AR => H2O + AR", &SPECIES, rate()).unwrap();
        assert_eq!(r.net_stoichiometry(), vec![(0, -1.0), (2, 1.0)]);
    }

    #[test]
    fn reject_bad_equations() {
        assert!(matches!(
            Reaction::parse("H2 <=> H2O", &SPECIES, rate()),
            Err(KineticsError::NotSupported { .. })
        ));
        assert!(matches!(
            Reaction::parse("H2 => XE", &SPECIES, rate()),
            Err(KineticsError::UnknownSpecies { .. })
        ));
        assert!(matches!(
            Reaction::parse("H2 => H2O => O2", &SPECIES, rate()),
            Err(KineticsError::Parse { .. })
        ));
        assert!(Reaction::parse(" => H2O", &SPECIES, rate()).is_err());
    }

    #[test]
    fn order_override() {
        let r = Reaction::parse("2 H2 + O2 => 2 H2O", &SPECIES, rate())
            .unwrap()
            .with_order(0, 1.5)
            .unwrap()
            .with_order(1, 0.0)
            .unwrap();
        assert_eq!(r.orders, vec![(0, 1.5)]);
        assert!(r.clone().with_order(0, -1.0).is_err());
    }
}

// Dotted numeric OIDs ordered by integer components.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A hierarchical address: a non-empty sequence of integer components.
///
/// Ordering is lexicographic over the components as integers, never over the
/// dotted string, so `...1.9.1 < ...1.10.1` holds once indices pass single
/// digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid(Vec<u32>);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid OID")]
pub struct OidParseError;

impl Oid {
    pub fn new(parts: Vec<u32>) -> Self {
        Oid(parts)
    }

    /// This OID extended by one component.
    pub fn child(&self, part: u32) -> Self {
        let mut parts = self.0.clone();
        parts.push(part);
        Oid(parts)
    }

    pub fn components(&self) -> &[u32] {
        &self.0
    }
}

impl FromStr for Oid {
    type Err = OidParseError;

    /// Accepts an optional leading dot; empty components between dots are
    /// dropped like the net-snmp tools do.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('.');
        let parts: Vec<u32> = trimmed
            .split('.')
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<u32>().map_err(|_| OidParseError))
            .collect::<Result<_, _>>()?;
        if parts.is_empty() {
            return Err(OidParseError);
        }
        Ok(Oid(parts))
    }
}

impl fmt::Display for Oid {
    /// No leading dot; that is how the triple's first line is emitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in &self.0 {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{part}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_leading_dot() {
        let dotted: Oid = ".1.3.6.1".parse().unwrap();
        let bare: Oid = "1.3.6.1".parse().unwrap();
        assert_eq!(dotted, bare);
        assert_eq!(dotted.components(), &[1, 3, 6, 1]);
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert!(Oid::from_str("").is_err());
        assert!(Oid::from_str(".").is_err());
        assert!(Oid::from_str("1.x.3").is_err());
        assert!(Oid::from_str("not an oid").is_err());
    }

    #[test]
    fn display_has_no_leading_dot() {
        let oid: Oid = ".1.3.6.1.4".parse().unwrap();
        assert_eq!(oid.to_string(), "1.3.6.1.4");
    }

    #[test]
    fn orders_components_numerically_not_as_strings() {
        let nine: Oid = "1.9.1".parse().unwrap();
        let ten: Oid = "1.10.1".parse().unwrap();
        // "10" < "9" as strings; 9 < 10 as integers.
        assert!(nine < ten);
    }

    #[test]
    fn prefix_sorts_before_its_children() {
        let root: Oid = "1.3.6".parse().unwrap();
        assert!(root < root.child(0));
        assert!(root.child(1) < root.child(1).child(1));
    }
}

use serde::{Deserialize, Serialize};

/// Exchange on which a bare six-digit code is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Venue {
    Shanghai,
    Shenzhen,
}

impl Venue {
    /// The other venue.
    pub fn alternate(&self) -> Venue {
        match self {
            Venue::Shanghai => Venue::Shenzhen,
            Venue::Shenzhen => Venue::Shanghai,
        }
    }

    /// Two-letter prefix used in symbol strings ("sh600000").
    pub fn prefix(&self) -> &'static str {
        match self {
            Venue::Shanghai => "sh",
            Venue::Shenzhen => "sz",
        }
    }

    /// Numeric market id used in security ids ("1.600000").
    pub fn market_id(&self) -> u8 {
        match self {
            Venue::Shanghai => 1,
            Venue::Shenzhen => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternate_is_involution() {
        assert_eq!(Venue::Shanghai.alternate(), Venue::Shenzhen);
        assert_eq!(Venue::Shenzhen.alternate().alternate(), Venue::Shenzhen);
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(Venue::Shanghai.prefix(), "sh");
        assert_eq!(Venue::Shenzhen.prefix(), "sz");
        assert_eq!(Venue::Shanghai.market_id(), 1);
        assert_eq!(Venue::Shenzhen.market_id(), 0);
    }
}

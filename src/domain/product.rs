//! Product classes and execution venues.

use crate::domain::error::RiskGateError;
use std::fmt;
use std::str::FromStr;

/// Product class a trader wants access to. Unlisted classes are carried as
/// `Other` and pass every suitability rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProductType {
    Derivatives,
    StructuredProducts,
    HftAlgorithms,
    InternationalEquities,
    Cryptocurrency,
    Other(String),
}

impl ProductType {
    pub fn as_str(&self) -> &str {
        match self {
            ProductType::Derivatives => "DERIVATIVES",
            ProductType::StructuredProducts => "STRUCTURED_PRODUCTS",
            ProductType::HftAlgorithms => "HFT_ALGORITHMS",
            ProductType::InternationalEquities => "INTERNATIONAL_EQUITIES",
            ProductType::Cryptocurrency => "CRYPTOCURRENCY",
            ProductType::Other(name) => name,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            ProductType::Derivatives | ProductType::StructuredProducts
        )
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = RiskGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_uppercase();
        Ok(match label.as_str() {
            "" => {
                return Err(RiskGateError::invalid_input(
                    "request.product",
                    "must not be empty",
                ));
            }
            "DERIVATIVES" => ProductType::Derivatives,
            "STRUCTURED_PRODUCTS" => ProductType::StructuredProducts,
            "HFT_ALGORITHMS" => ProductType::HftAlgorithms,
            "INTERNATIONAL_EQUITIES" => ProductType::InternationalEquities,
            "CRYPTOCURRENCY" => ProductType::Cryptocurrency,
            _ => ProductType::Other(label),
        })
    }
}

/// Execution venue tag, normalised to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Venue(String);

impl Venue {
    pub const DARK_POOL: &'static str = "DARK_POOL";
    pub const INSTITUTIONAL_NETWORK: &'static str = "INSTITUTIONAL_NETWORK";
    pub const RETAIL_VENUE: &'static str = "RETAIL_VENUE";

    pub fn new(tag: &str) -> Result<Self, RiskGateError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(RiskGateError::invalid_input("request.venue", "must not be empty"));
        }
        Ok(Venue(tag.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is(&self, tag: &str) -> bool {
        self.0.eq_ignore_ascii_case(tag.trim())
    }

    pub fn is_any_of(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.is(t))
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Venue {
    type Err = RiskGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Venue::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_products_parse() {
        assert_eq!(
            "derivatives".parse::<ProductType>().unwrap(),
            ProductType::Derivatives
        );
        assert_eq!(
            "HFT_ALGORITHMS".parse::<ProductType>().unwrap(),
            ProductType::HftAlgorithms
        );
    }

    #[test]
    fn unknown_product_is_other() {
        let p: ProductType = "us_equities".parse().unwrap();
        assert_eq!(p, ProductType::Other("US_EQUITIES".into()));
        assert_eq!(p.to_string(), "US_EQUITIES");
        assert!(!p.is_complex());
    }

    #[test]
    fn empty_product_is_error() {
        assert!("  ".parse::<ProductType>().is_err());
    }

    #[test]
    fn complex_products() {
        assert!(ProductType::Derivatives.is_complex());
        assert!(ProductType::StructuredProducts.is_complex());
        assert!(!ProductType::Cryptocurrency.is_complex());
    }

    #[test]
    fn venue_normalises_case() {
        let v: Venue = " dark_pool ".parse().unwrap();
        assert_eq!(v.as_str(), Venue::DARK_POOL);
        assert!(v.is(Venue::DARK_POOL));
        assert!(v.is_any_of(&["INSTITUTIONAL_NETWORK".into(), "DARK_POOL".into()]));
    }

    #[test]
    fn empty_venue_is_error() {
        assert!(Venue::new("").is_err());
    }
}

//! Special Offer Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a special offer matches products by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OfferTargetType {
    /// Exact SKU (one variant)
    Sku,
    /// Style number (all variants of a base item)
    Style,
    /// Category name
    Category,
    /// Brand name
    Brand,
}

impl OfferTargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sku => "sku",
            Self::Style => "style",
            Self::Category => "category",
            Self::Brand => "brand",
        }
    }
}

impl fmt::Display for OfferTargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferTargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sku" => Ok(Self::Sku),
            "style" | "style_number" => Ok(Self::Style),
            "category" => Ok(Self::Category),
            "brand" => Ok(Self::Brand),
            other => Err(format!("unknown offer target type: {other}")),
        }
    }
}

/// A target type together with the value it matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferTarget {
    pub target_type: OfferTargetType,
    pub value: String,
}

impl OfferTarget {
    /// Parse and trim; an empty value is rejected
    pub fn parse(target_type: &str, value: &str) -> Result<Self, String> {
        let target_type = target_type.parse()?;
        let value = value.trim();
        if value.is_empty() {
            return Err("offer target value must not be empty".to_string());
        }
        Ok(Self {
            target_type,
            value: value.to_string(),
        })
    }
}

/// Special offer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialOffer {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Percentage off the base price (20 = 20%)
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    pub target_type: OfferTargetType,
    pub target_value: String,
    /// Valid from (Unix millis)
    pub starts_at: Option<i64>,
    /// Valid until (Unix millis)
    pub ends_at: Option<i64>,
    pub is_active: bool,
    /// Rows rewritten by the most recent application
    pub products_affected: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl SpecialOffer {
    pub fn target(&self) -> OfferTarget {
        OfferTarget {
            target_type: self.target_type,
            value: self.target_value.clone(),
        }
    }

    /// Active and, at `now` (Unix millis), inside its optional window
    pub fn is_live(&self, now: i64) -> bool {
        self.is_active
            && self.starts_at.is_none_or(|starts| now >= starts)
            && self.ends_at.is_none_or(|ends| now <= ends)
    }
}

/// Create special offer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialOfferCreate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "discount")]
    pub discount_percent: Option<Decimal>,
    pub target_type: Option<String>,
    pub target_value: Option<String>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub is_active: Option<bool>,
}

/// Update special offer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialOfferUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "discount")]
    pub discount_percent: Option<Decimal>,
    pub target_type: Option<String>,
    pub target_value: Option<String>,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_type_parse() {
        assert_eq!("SKU".parse::<OfferTargetType>(), Ok(OfferTargetType::Sku));
        assert_eq!(
            "style_number".parse::<OfferTargetType>(),
            Ok(OfferTargetType::Style)
        );
        assert_eq!(
            " brand ".parse::<OfferTargetType>(),
            Ok(OfferTargetType::Brand)
        );
        assert!("colour".parse::<OfferTargetType>().is_err());
    }

    #[test]
    fn test_target_type_serde() {
        let json = serde_json::to_string(&OfferTargetType::Category).unwrap();
        assert_eq!(json, "\"category\"");
    }

    #[test]
    fn test_offer_target_parse() {
        let target = OfferTarget::parse("style", "  TSR3-DRV ").unwrap();
        assert_eq!(target.target_type, OfferTargetType::Style);
        assert_eq!(target.value, "TSR3-DRV");
        assert!(OfferTarget::parse("brand", "   ").is_err());
        assert!(OfferTarget::parse("supplier", "Acme").is_err());
    }

    fn offer(starts_at: Option<i64>, ends_at: Option<i64>, is_active: bool) -> SpecialOffer {
        SpecialOffer {
            id: 1,
            name: "Putter week".into(),
            description: None,
            discount_percent: Decimal::from(15),
            target_type: OfferTargetType::Category,
            target_value: "Putters".into(),
            starts_at,
            ends_at,
            is_active,
            products_affected: 0,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_is_live_respects_window() {
        assert!(offer(None, None, true).is_live(5_000));
        assert!(!offer(None, None, false).is_live(5_000));

        let windowed = offer(Some(1_000), Some(2_000), true);
        assert!(!windowed.is_live(999));
        assert!(windowed.is_live(1_000));
        assert!(windowed.is_live(2_000));
        assert!(!windowed.is_live(2_001));

        assert!(offer(Some(1_000), None, true).is_live(i64::MAX));
        assert!(!offer(None, Some(1_000), true).is_live(1_001));
    }

    #[test]
    fn test_create_accepts_discount_alias() {
        let create: SpecialOfferCreate = serde_json::from_str(
            r#"{"name":"Spring sale","discount":20,"target_type":"brand","target_value":"Callaway"}"#,
        )
        .unwrap();
        assert_eq!(create.discount_percent, Some(Decimal::from(20)));
    }
}

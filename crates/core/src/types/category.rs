//! Product categories.
//!
//! Only true categories are stored on product records. Listing facets such as
//! "featured" and "new" are derived from other fields, see
//! [`crate::catalog::Facet`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// A product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Fashion,
    Home,
}

impl Category {
    /// All categories, in showcase order.
    pub const ALL: [Self; 3] = [Self::Electronics, Self::Fashion, Self::Home];

    /// The wire/database form of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Fashion => "fashion",
            Self::Home => "home",
        }
    }

    /// Human-readable name for navigation and headings.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Fashion => "Fashion",
            Self::Home => "Home & Living",
        }
    }

    /// Short blurb shown on the category showcase.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Electronics => "Latest tech gadgets and devices",
            Self::Fashion => "Stylish clothing and accessories",
            Self::Home => "Beautiful items for your home",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electronics" => Ok(Self::Electronics),
            "fashion" => Ok(Self::Fashion),
            "home" => Ok(Self::Home),
            _ => Err(CategoryError(s.to_owned())),
        }
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Category {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Category {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Category {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Electronics".parse::<Category>().unwrap(), Category::Electronics);
        assert_eq!(" home ".parse::<Category>().unwrap(), Category::Home);
    }

    #[test]
    fn test_facets_are_not_categories() {
        assert!("featured".parse::<Category>().is_err());
        assert!("new".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Fashion).unwrap(), "\"fashion\"");
        let parsed: Category = serde_json::from_str("\"home\"").unwrap();
        assert_eq!(parsed, Category::Home);
    }

    #[test]
    fn test_round_trip_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }
}

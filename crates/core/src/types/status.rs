//! Status enums for catalog entities.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Listing status of a product.
///
/// The backend stores this as an integer flag (`1` active, `0` inactive)
/// and sometimes sends it as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProductStatus {
    /// Product is listed.
    #[default]
    Active,
    /// Product is hidden from the public catalog.
    Inactive,
}

impl ProductStatus {
    /// Wire code of this status.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Active => 1,
            Self::Inactive => 0,
        }
    }

    /// Build a status from its wire code. Any non-zero code means active.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        if code == 0 { Self::Inactive } else { Self::Active }
    }

    /// The status a toggle would move to.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    /// Verb shown in the confirmation prompt for toggling *to* this status.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Active => "activate",
            Self::Inactive => "deactivate",
        }
    }
}

impl Serialize for ProductStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for ProductStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        super::de::lenient_i64(deserializer).map(Self::from_code)
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// Account status of a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// User can sign in and own products.
    #[default]
    Active,
    /// User is blocked; products cannot be assigned to them.
    Disabled,
}

impl UserStatus {
    /// The status a toggle would move to.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Disabled,
            Self::Disabled => Self::Active,
        }
    }

    /// Wire value of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Disabled => "disabled",
        }
    }

    /// Verb shown in the confirmation prompt for toggling *to* this status.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Active => "enable",
            Self::Disabled => "disable",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "disabled" => Ok(Self::Disabled),
            _ => Err(format!("invalid user status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_status_toggle() {
        assert_eq!(ProductStatus::Active.toggled(), ProductStatus::Inactive);
        assert_eq!(ProductStatus::Inactive.toggled(), ProductStatus::Active);
    }

    #[test]
    fn test_product_status_wire_forms() {
        let s: ProductStatus = serde_json::from_str("1").unwrap();
        assert_eq!(s, ProductStatus::Active);
        let s: ProductStatus = serde_json::from_str(r#""0""#).unwrap();
        assert_eq!(s, ProductStatus::Inactive);
        assert_eq!(serde_json::to_string(&ProductStatus::Inactive).unwrap(), "0");
    }

    #[test]
    fn test_user_status_toggle() {
        assert_eq!(UserStatus::Active.toggled(), UserStatus::Disabled);
        assert_eq!(UserStatus::Disabled.verb(), "disable");
    }

    #[test]
    fn test_user_status_serde() {
        let s: UserStatus = serde_json::from_str(r#""disabled""#).unwrap();
        assert_eq!(s, UserStatus::Disabled);
        assert_eq!("active".parse::<UserStatus>().unwrap(), UserStatus::Active);
        assert!("banned".parse::<UserStatus>().is_err());
    }
}

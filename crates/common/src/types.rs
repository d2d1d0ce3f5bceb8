use serde::{Deserialize, Deserializer, Serialize};

/// Stock keeping unit, the catalog's primary key.
///
/// Surrounding whitespace is stripped on construction so that `" SKU-1 "`
/// and `"SKU-1"` address the same product. Blankness is a validation
/// concern of the domain layer, see [`Sku::is_blank`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Creates a SKU from a string, trimming surrounding whitespace.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.len() == id.len() {
            Self(id)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Returns the SKU as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the SKU is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Sku {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Sku {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Sku {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Sku::new)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of an order, assigned sequentially by the ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Creates an order ID from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<OrderId> for u64 {
    fn from(id: OrderId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_is_trimmed() {
        let sku = Sku::new("  SKU-100 ");
        assert_eq!(sku.as_str(), "SKU-100");
        assert_eq!(sku, Sku::from("SKU-100"));
    }

    #[test]
    fn sku_is_trimmed_when_deserialized() {
        let sku: Sku = serde_json::from_str("\" SKU-100 \"").unwrap();
        assert_eq!(sku, Sku::new("SKU-100"));
        assert_eq!(serde_json::to_string(&sku).unwrap(), "\"SKU-100\"");
    }

    #[test]
    fn sku_blank_detection() {
        assert!(Sku::new("   ").is_blank());
        assert!(Sku::new("").is_blank());
        assert!(!Sku::new("A").is_blank());
    }

    #[test]
    fn sku_orders_lexicographically() {
        let mut skus = vec![Sku::new("SKU-300"), Sku::new("SKU-100"), Sku::new("SKU-200")];
        skus.sort();
        let ordered: Vec<_> = skus.iter().map(Sku::as_str).collect();
        assert_eq!(ordered, ["SKU-100", "SKU-200", "SKU-300"]);
    }

    #[test]
    fn order_id_serializes_as_number() {
        let id = OrderId::new(1000);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "1000");
        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn order_id_display() {
        assert_eq!(OrderId::from(1042).to_string(), "1042");
        assert_eq!(u64::from(OrderId::new(7)), 7);
    }
}

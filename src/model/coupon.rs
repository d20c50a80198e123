//! Coupon: a named discount rule with eligibility and usage constraints

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountType {
    /// `discount_value` is a percentage of the order amount, 0..=100
    Percentage,
    /// `discount_value` is a flat amount
    Fixed,
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountType::Percentage => f.write_str("Percentage"),
            DiscountType::Fixed => f.write_str("Fixed"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("DiscountType must be 'Percentage' or 'Fixed', got '{0}'")]
pub struct ParseDiscountTypeError(String);

impl FromStr for DiscountType {
    type Err = ParseDiscountTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Percentage" => Ok(DiscountType::Percentage),
            "Fixed" => Ok(DiscountType::Fixed),
            other => Err(ParseDiscountTypeError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: Uuid,
    /// Stored uppercase; matched case-insensitively
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<Decimal>,
    /// Cap on the computed discount; only meaningful for percentage coupons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    pub used_count: u32,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    pub fn new(
        code: impl Into<String>,
        discount_type: DiscountType,
        discount_value: Decimal,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into().to_uppercase(),
            discount_type,
            discount_value,
            min_order_amount: None,
            max_discount_amount: None,
            usage_limit: None,
            used_count: 0,
            expires_at,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn usage_exhausted(&self) -> bool {
        self.usage_limit
            .is_some_and(|limit| self.used_count >= limit)
    }

    pub fn remaining_uses(&self) -> Option<u32> {
        self.usage_limit
            .map(|limit| limit.saturating_sub(self.used_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_code_uppercased() {
        let coupon = Coupon::new(
            "welcome10",
            DiscountType::Percentage,
            dec!(10),
            Utc::now() + Duration::days(30),
        );
        assert_eq!(coupon.code, "WELCOME10");
    }

    #[test]
    fn test_usage_exhaustion() {
        let mut coupon = Coupon::new(
            "FLAT50",
            DiscountType::Fixed,
            dec!(50),
            Utc::now() + Duration::days(1),
        );
        assert!(!coupon.usage_exhausted());
        assert_eq!(coupon.remaining_uses(), None);

        coupon.usage_limit = Some(2);
        coupon.used_count = 2;
        assert!(coupon.usage_exhausted());
        assert_eq!(coupon.remaining_uses(), Some(0));
    }

    #[test]
    fn test_discount_type_parse() {
        assert_eq!(
            "Percentage".parse::<DiscountType>().unwrap(),
            DiscountType::Percentage
        );
        assert!("percent".parse::<DiscountType>().is_err());
    }
}

//! The three checkout steps.

use serde::{Deserialize, Serialize};

/// Checkout progress, strictly ordered.
///
/// Forward movement requires the current step to validate; backward
/// movement is always allowed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Step 1 - buyer identity.
    #[default]
    Buyer,
    /// Step 2 - shipping address.
    Address,
    /// Step 3 - payment method and card data.
    Payment,
}

impl CheckoutStep {
    /// 1-based step number shown in the progress bar.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Buyer => 1,
            Self::Address => 2,
            Self::Payment => 3,
        }
    }

    /// The following step, clamped at [`Self::Payment`].
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Buyer => Self::Address,
            Self::Address | Self::Payment => Self::Payment,
        }
    }

    /// The preceding step, clamped at [`Self::Buyer`].
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Buyer | Self::Address => Self::Buyer,
            Self::Payment => Self::Address,
        }
    }
}

impl TryFrom<u8> for CheckoutStep {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Buyer),
            2 => Ok(Self::Address),
            3 => Ok(Self::Payment),
            other => Err(format!("invalid checkout step: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_ordered() {
        assert!(CheckoutStep::Buyer < CheckoutStep::Address);
        assert!(CheckoutStep::Address < CheckoutStep::Payment);
    }

    #[test]
    fn test_next_clamps_at_payment() {
        assert_eq!(CheckoutStep::Buyer.next(), CheckoutStep::Address);
        assert_eq!(CheckoutStep::Payment.next(), CheckoutStep::Payment);
    }

    #[test]
    fn test_prev_clamps_at_buyer() {
        assert_eq!(CheckoutStep::Payment.prev(), CheckoutStep::Address);
        assert_eq!(CheckoutStep::Buyer.prev(), CheckoutStep::Buyer);
    }

    #[test]
    fn test_try_from_number_round_trip() {
        for n in 1..=3u8 {
            let step = CheckoutStep::try_from(n).expect("valid step");
            assert_eq!(step.number(), n);
        }
        assert!(CheckoutStep::try_from(0).is_err());
        assert!(CheckoutStep::try_from(4).is_err());
    }
}

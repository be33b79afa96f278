//! Checkout flow state machine.

use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// Steps of a single checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutStep {
    /// Totals shown, cart still editable.
    #[default]
    Reviewing,
    /// The order create call is in flight.
    Placing,
    /// The order exists. Terminal.
    Placed,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Reviewing => "reviewing",
            CheckoutStep::Placing => "placing",
            CheckoutStep::Placed => "placed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Reviewing => "Reviewing",
            CheckoutStep::Placing => "Placing",
            CheckoutStep::Placed => "Placed",
        }
    }
}

/// Checkout flow state.
///
/// A failed create is not a resting state: [`CheckoutFlow::mark_failed`]
/// records the failure and drops straight back to `Reviewing`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    /// Number of create calls that have failed in this attempt.
    failed_attempts: u32,
    /// Order number once placed.
    order_number: Option<String>,
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn order_number(&self) -> Option<&str> {
        self.order_number.as_deref()
    }

    pub fn is_placed(&self) -> bool {
        self.step == CheckoutStep::Placed
    }

    /// The cart can only change while reviewing.
    pub fn edit_cart(&self) -> Result<(), CommerceError> {
        self.expect(CheckoutStep::Reviewing, CheckoutStep::Reviewing)
    }

    /// Confirm: Reviewing -> Placing.
    pub fn begin_placing(&mut self) -> Result<(), CommerceError> {
        self.expect(CheckoutStep::Reviewing, CheckoutStep::Placing)?;
        self.step = CheckoutStep::Placing;
        Ok(())
    }

    /// Create succeeded: Placing -> Placed.
    pub fn mark_placed(&mut self, order_number: impl Into<String>) -> Result<(), CommerceError> {
        self.expect(CheckoutStep::Placing, CheckoutStep::Placed)?;
        self.step = CheckoutStep::Placed;
        self.order_number = Some(order_number.into());
        Ok(())
    }

    /// Create failed: Placing -> Reviewing, ready for a retry.
    pub fn mark_failed(&mut self) -> Result<(), CommerceError> {
        self.expect(CheckoutStep::Placing, CheckoutStep::Reviewing)?;
        self.step = CheckoutStep::Reviewing;
        self.failed_attempts += 1;
        Ok(())
    }

    fn expect(&self, required: CheckoutStep, to: CheckoutStep) -> Result<(), CommerceError> {
        if self.step == required {
            Ok(())
        } else {
            Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut flow = CheckoutFlow::new();
        assert_eq!(flow.step(), CheckoutStep::Reviewing);
        assert!(flow.edit_cart().is_ok());

        flow.begin_placing().unwrap();
        assert!(flow.edit_cart().is_err());

        flow.mark_placed("AMC100001").unwrap();
        assert!(flow.is_placed());
        assert_eq!(flow.order_number(), Some("AMC100001"));
    }

    #[test]
    fn test_failure_returns_to_reviewing() {
        let mut flow = CheckoutFlow::new();
        flow.begin_placing().unwrap();
        flow.mark_failed().unwrap();
        assert_eq!(flow.step(), CheckoutStep::Reviewing);
        assert_eq!(flow.failed_attempts(), 1);
        assert_eq!(flow.order_number(), None);

        flow.begin_placing().unwrap();
        flow.mark_placed("AMC100002").unwrap();
        assert!(flow.is_placed());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut flow = CheckoutFlow::new();
        assert!(flow.mark_placed("AMC1").is_err());
        assert!(flow.mark_failed().is_err());

        flow.begin_placing().unwrap();
        assert_eq!(
            flow.begin_placing(),
            Err(CommerceError::InvalidCheckoutTransition {
                from: "placing".to_string(),
                to: "placing".to_string(),
            })
        );

        flow.mark_placed("AMC1").unwrap();
        assert!(flow.begin_placing().is_err());
        assert!(flow.mark_failed().is_err());
    }
}

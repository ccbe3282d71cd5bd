use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Trigger,
    NoTrigger,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerStrictness {
    /// Fire only when the current price is strictly below the target.
    #[default]
    #[serde(alias = "strict-less-than")]
    StrictLessThan,
}

/// Trigger rule shared by registration and polling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriggerPolicy {
    pub strictness: TriggerStrictness,
}

impl TriggerPolicy {
    pub fn new(strictness: TriggerStrictness) -> Self {
        Self { strictness }
    }

    pub fn decide(&self, current_price: f64, target_price: f64) -> Decision {
        let fires = match self.strictness {
            TriggerStrictness::StrictLessThan => current_price < target_price,
        };
        if fires {
            Decision::Trigger
        } else {
            Decision::NoTrigger
        }
    }
}

pub fn decide(current_price: f64, target_price: f64) -> Decision {
    TriggerPolicy::default().decide(current_price, target_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_target_triggers() {
        assert_eq!(decide(2.0, 2.5), Decision::Trigger);
        assert_eq!(decide(0.0, 0.0001), Decision::Trigger);
    }

    #[test]
    fn equal_never_triggers() {
        assert_eq!(decide(2.5, 2.5), Decision::NoTrigger);
        assert_eq!(decide(0.0, 0.0), Decision::NoTrigger);
    }

    #[test]
    fn above_target_does_not_trigger() {
        for (current, target) in [(3.0, 2.5), (100.0, 0.0), (1.0000001, 1.0)] {
            assert_eq!(decide(current, target), Decision::NoTrigger);
        }
    }

    #[test]
    fn nan_price_never_triggers() {
        assert_eq!(decide(f64::NAN, 1.0), Decision::NoTrigger);
    }
}

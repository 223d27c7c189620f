//! Onboarding gate: the user may continue once they have signed a message
//! and hold a positive USDC balance.

pub const GUIDANCE_SIGN_AND_FUND: &str = "Sign a message and add USDC to your wallet to continue.";
pub const GUIDANCE_SIGN: &str = "Sign a message to continue.";
pub const GUIDANCE_FUND: &str = "Add USDC to your wallet to continue.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnboardingState {
    pub has_signed_message: bool,
    pub has_positive_balance: bool,
}

impl OnboardingState {
    /// An unknown balance counts as not funded.
    pub fn from_reads(has_signed_message: bool, usdc_balance: Option<u128>) -> Self {
        Self {
            has_signed_message,
            has_positive_balance: usdc_balance.is_some_and(|balance| balance > 0),
        }
    }

    pub fn can_continue(&self) -> bool {
        self.has_signed_message && self.has_positive_balance
    }

    /// Guidance for the unmet conditions; `None` once both are met.
    pub fn guidance(&self) -> Option<&'static str> {
        match (self.has_signed_message, self.has_positive_balance) {
            (false, false) => Some(GUIDANCE_SIGN_AND_FUND),
            (false, true) => Some(GUIDANCE_SIGN),
            (true, false) => Some(GUIDANCE_FUND),
            (true, true) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continues_only_when_both_conditions_hold() {
        let cases = [
            (false, false, false, Some(GUIDANCE_SIGN_AND_FUND)),
            (false, true, false, Some(GUIDANCE_SIGN)),
            (true, false, false, Some(GUIDANCE_FUND)),
            (true, true, true, None),
        ];
        for (signed, funded, expected, guidance) in cases {
            let state = OnboardingState {
                has_signed_message: signed,
                has_positive_balance: funded,
            };
            assert_eq!(state.can_continue(), expected, "signed={signed} funded={funded}");
            assert_eq!(state.guidance(), guidance, "signed={signed} funded={funded}");
        }
    }

    #[test]
    fn unknown_or_zero_balance_is_not_funded() {
        assert!(!OnboardingState::from_reads(true, None).has_positive_balance);
        assert!(!OnboardingState::from_reads(true, Some(0)).has_positive_balance);
        assert!(OnboardingState::from_reads(true, Some(1)).can_continue());
    }
}

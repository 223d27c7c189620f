pub const DEFAULT_CONTINUE_URL: &str = "/app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingConfig {
    /// Where the continue control navigates once onboarding is complete.
    pub continue_url: String,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            continue_url: DEFAULT_CONTINUE_URL.to_owned(),
        }
    }
}

impl OnboardingConfig {
    /// Reads `SUPERFAN_CONTINUE_URL` from the environment, then the build environment.
    pub fn from_env() -> Self {
        let continue_url = std::env::var("SUPERFAN_CONTINUE_URL")
            .ok()
            .or_else(|| option_env!("SUPERFAN_CONTINUE_URL").map(str::to_owned))
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTINUE_URL.to_owned());
        Self { continue_url }
    }
}

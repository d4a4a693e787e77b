//! Federated sign-in provider seam.
//!
//! The identity service never talks to an external provider directly;
//! it goes through [`FederatedProvider`], which a deployment backs with
//! its real provider SDK and tests back with a stub.

/// Profile returned by a federated provider after a successful sign-in.
#[derive(Debug, Clone)]
pub struct FederatedProfile {
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// A federated identity provider offering both popup and redirect flows.
///
/// Errors are the provider's own message strings; the service inspects
/// them to decide whether a popup failure warrants a redirect retry.
pub trait FederatedProvider: Send + Sync {
    /// Interactive popup flow.
    fn sign_in_popup(
        &self,
    ) -> impl Future<Output = Result<FederatedProfile, String>> + Send;

    /// Full-page redirect flow, used as the fallback when popups are
    /// unavailable.
    fn sign_in_redirect(
        &self,
    ) -> impl Future<Output = Result<FederatedProfile, String>> + Send;
}

/// Whether a provider error message indicates the popup flow itself
/// failed (blocked, dismissed, or unsupported) rather than the sign-in.
pub fn is_popup_failure(error: &str) -> bool {
    let lower = error.to_lowercase();
    lower.contains("popup") || lower.contains("blocked") || lower.contains("closed")
}

/// Whether a User-Agent string belongs to a mobile browser, where popup
/// windows are unreliable and the redirect flow should be preferred.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let lower = user_agent.to_lowercase();
    ["iphone", "ipad", "ipod", "android"]
        .iter()
        .any(|needle| lower.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_failures_are_recognised() {
        assert!(is_popup_failure("auth/popup-blocked"));
        assert!(is_popup_failure("Popup window was closed by the user"));
        assert!(is_popup_failure("request blocked by the browser"));
        assert!(!is_popup_failure("network error"));
        assert!(!is_popup_failure("account disabled"));
    }

    #[test]
    fn mobile_user_agents_are_recognised() {
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"
        ));
        assert!(is_mobile_user_agent("Mozilla/5.0 (Linux; Android 14)"));
        assert!(is_mobile_user_agent("Mozilla/5.0 (iPad; CPU OS 16_6)"));
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (X11; Linux x86_64) Firefox/128.0"
        ));
    }
}

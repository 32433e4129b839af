/// Safety preamble prepended to every outbound provider request.
///
/// Cross-cutting invariant: callers cannot opt out, and provider modules
/// never see a request without it.
pub const SAFETY_PREAMBLE: &str = "\
You are a healthcare assistant for post-discharge patient triage and follow-up. \
You are not a licensed clinician. \
Always include clear safety language. \
Never provide diagnosis, prescriptions, or treatment plans. \
Direct emergency cases to emergency care immediately.";

/// One completion request: caller-supplied system instruction plus the
/// user content
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            temperature: 0.0,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Full system content as sent to providers: the safety preamble,
    /// then the caller's instruction.
    pub fn system_with_preamble(&self) -> String {
        match &self.system {
            Some(system) => format!("{SAFETY_PREAMBLE}\n\n{system}"),
            None => SAFETY_PREAMBLE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_always_present() {
        let bare = CompletionRequest::new("hello");
        assert_eq!(bare.system_with_preamble(), SAFETY_PREAMBLE);

        let with_system = CompletionRequest::new("hello").with_system("Reply in JSON.");
        let combined = with_system.system_with_preamble();
        assert!(combined.starts_with(SAFETY_PREAMBLE));
        assert!(combined.ends_with("Reply in JSON."));
    }
}

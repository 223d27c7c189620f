pub const SIGN_FAILED_MESSAGE: &str = "Signing failed. Please try again.";
pub const SIGNATURE_PREVIEW_CHARS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("a signature request is already in flight")]
    Busy,
    #[error("no wallet available to sign with")]
    WalletNotReady,
    #[error("provider rejected the signature request: {0:#}")]
    Provider(anyhow::Error),
}

impl SignError {
    pub fn user_message(&self) -> &'static str {
        SIGN_FAILED_MESSAGE
    }
}

/// The sign button is enabled for any non-blank message while idle.
pub fn can_sign(message: &str, busy: bool) -> bool {
    !busy && !message.trim().is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMessage {
    pub message: String,
    pub signature: String,
    expanded: bool,
}

impl SignedMessage {
    pub fn new(message: String, signature: String) -> Self {
        Self {
            message,
            signature,
            expanded: false,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn preview(&self) -> String {
        match self.signature.char_indices().nth(SIGNATURE_PREVIEW_CHARS) {
            Some((cut, _)) => format!("{}...", &self.signature[..cut]),
            None => self.signature.clone(),
        }
    }

    /// Text for the signature box in its current expansion state.
    pub fn display(&self) -> String {
        if self.expanded {
            self.signature.clone()
        } else {
            self.preview()
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.expanded { "Collapse" } else { "Expand" }
    }
}

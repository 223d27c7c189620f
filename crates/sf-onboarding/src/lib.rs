pub mod config;
pub mod copy;
pub mod display;
pub mod gate;
pub mod session;
pub mod sign;
pub mod transfer;

pub use config::OnboardingConfig;
pub use copy::{Clipboard, CopyIndicator, CopyTarget, copy_text, flash_copied};
pub use display::{DEPOSIT_QR_SIZE, DepositInstructions, balance_line, deposit_instructions, deposit_qr_svg};
pub use gate::OnboardingState;
pub use session::OnboardingSession;
pub use sign::{SignError, SignedMessage, can_sign};
pub use transfer::{TransferAvailability, TransferBlock, TransferError, evaluate_transfer};

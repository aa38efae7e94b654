use thiserror::Error;

/// Terminal failure of one wager session. None of these are retried
/// internally; a new spin starts a fresh session from `Idle`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SpinError {
    #[error("connect a wallet before spinning")]
    NotConnected,
    #[error("no chip coins found for this account")]
    NoFunds,
    #[error("invalid bet amount: {0}")]
    InvalidAmount(String),
    #[error("insufficient funds: the wager needs {needed} minor units but the account holds {available}")]
    InsufficientFunds { needed: u64, available: u128 },
    #[error("signing rejected: {0}")]
    SigningRejected(String),
    #[error("submission failed: {0}")]
    SubmissionFailed(String),
    #[error(
        "request finalized without an interpretable settlement ({0}); \
         funds may have moved, the next balance refresh will reconcile"
    )]
    EventMissing(String),
}

impl SpinError {
    /// True for failures detected before anything was signed or
    /// submitted; these never consume coins.
    pub fn is_pre_submission(&self) -> bool {
        matches!(
            self,
            SpinError::NotConnected
                | SpinError::NoFunds
                | SpinError::InvalidAmount(_)
                | SpinError::InsufficientFunds { .. }
        )
    }
}

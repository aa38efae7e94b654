use serde_json::Value;
use sha2::{
    Digest,
    Sha256,
};
use std::fmt;
use thiserror::Error;

/// Account address as seen by the wallet provider.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Address(pub [u8; 32]);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Type tag of the fungible token a wager is denominated in.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TokenTag(pub String);

impl fmt::Display for TokenTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle of one token-holding record. Consumed when used as a
/// request input; change shows up out-of-band on the next coin query.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CoinId(pub [u8; 32]);

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Coin {
    pub id: CoinId,
    pub value: u64,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RequestId(pub [u8; 32]);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Handle to the output of an earlier build step within the same
/// request (the split that produced the funding input).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FundingRef(pub usize);

/// One mutation recorded into the atomic wager request. The ledger
/// executes all steps of a request or none of them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildStep {
    Merge { target: CoinId, sources: Vec<CoinId> },
    Split { source: CoinId, amount: u64 },
    Spin { bet: Option<u8>, funding: FundingRef },
}

/// Atomic request under construction: a sender plus an ordered list of
/// build steps. Built once, submitted once, never retried with the
/// same consumed inputs.
#[derive(Clone, Debug)]
pub struct WagerRequest {
    sender: Address,
    steps: Vec<BuildStep>,
}

impl WagerRequest {
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            steps: Vec::new(),
        }
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    pub fn merge(&mut self, target: CoinId, sources: Vec<CoinId>) {
        self.steps.push(BuildStep::Merge { target, sources });
    }

    pub fn split(&mut self, source: CoinId, amount: u64) -> FundingRef {
        self.steps.push(BuildStep::Split { source, amount });
        FundingRef(self.steps.len() - 1)
    }

    pub fn spin(&mut self, bet: Option<u8>, funding: FundingRef) {
        self.steps.push(BuildStep::Spin { bet, funding });
    }

    /// Content digest of the request; ledgers use it as the request id.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.sender.0);
        for step in &self.steps {
            match step {
                BuildStep::Merge { target, sources } => {
                    hasher.update([0u8]);
                    hasher.update(target.0);
                    for source in sources {
                        hasher.update(source.0);
                    }
                }
                BuildStep::Split { source, amount } => {
                    hasher.update([1u8]);
                    hasher.update(source.0);
                    hasher.update(amount.to_be_bytes());
                }
                BuildStep::Spin { bet, funding } => {
                    hasher.update([2u8]);
                    hasher.update([bet.is_some() as u8, bet.unwrap_or(0)]);
                    hasher.update((funding.0 as u64).to_be_bytes());
                }
            }
        }
        hasher.finalize().into()
    }
}

/// Structured event emitted by a finalized request.
#[derive(Clone, Debug)]
pub struct EmittedEvent {
    pub type_tag: String,
    pub data: Value,
}

#[derive(Clone, Debug)]
pub struct FinalizedRequest {
    pub events: Vec<EmittedEvent>,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct QueryError(pub String);

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The user declined the signing prompt; nothing left the wallet.
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum FinalityError {
    #[error("request reverted: {0}")]
    Reverted(String),
    #[error("network error: {0}")]
    Network(String),
}

/// External ledger seam: coin queries, atomic request submission, and
/// the finality wait. Implementations own signing and networking; the
/// core never sees keys. An indefinitely slow `wait_for_finality` is
/// simply a wait, never inferred as failure.
pub trait Ledger {
    fn coins(
        &self,
        owner: &Address,
        token: &TokenTag,
    ) -> impl Future<Output = Result<Vec<Coin>, QueryError>>;

    fn sign_and_submit(
        &self,
        request: &WagerRequest,
    ) -> impl Future<Output = Result<RequestId, SubmitError>>;

    fn wait_for_finality(
        &self,
        id: &RequestId,
    ) -> impl Future<Output = Result<FinalizedRequest, FinalityError>>;
}

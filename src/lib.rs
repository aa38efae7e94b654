pub mod amount;

pub mod bet;

pub mod error;

pub mod events;

pub mod funding;

pub mod ledger;

pub mod outcome;

pub mod session;

pub mod sim;

pub mod wheel;

pub use bet::Bet;
pub use error::SpinError;
pub use ledger::Ledger;
pub use outcome::{
    Outcome,
    Settlement,
    classify,
};
pub use session::{
    SessionState,
    WagerSession,
};

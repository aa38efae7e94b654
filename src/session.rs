use crate::{
    amount::parse_chips,
    bet::Bet,
    error::SpinError,
    events::{
        EventError,
        extract_settlement,
    },
    funding::assemble,
    ledger::{
        Address,
        FinalityError,
        Ledger,
        QueryError,
        SubmitError,
        TokenTag,
        WagerRequest,
    },
    outcome::{
        Outcome,
        Settlement,
        classify,
    },
};
use chrono::{
    DateTime,
    Utc,
};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{
    error,
    info,
    warn,
};

/// Grace period before re-reading balances, giving the ledger's own
/// indexing time to observe the settlement. Advisory only.
pub const BALANCE_REFRESH_DELAY: Duration = Duration::from_secs(1);

const HISTORY_DEPTH: usize = 10;

/// Lifecycle of the one in-flight wager a session may own.
#[derive(Clone, Debug)]
pub enum SessionState {
    Idle,
    AssemblingFunds,
    AwaitingSettlement,
    Settled(Settlement),
    Failed(SpinError),
}

impl SessionState {
    /// A request is being assembled or awaiting finality; new spins are
    /// rejected until it resolves.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            SessionState::AssemblingFunds | SessionState::AwaitingSettlement
        )
    }
}

#[derive(Clone, Debug)]
pub struct SpinRecord {
    pub at: DateTime<Utc>,
    pub bet: Option<Bet>,
    pub settlement: Settlement,
    pub outcome: Outcome,
}

/// Owns one wager at a time: assembles funding, submits the atomic
/// request, awaits finality, and classifies the settlement. Every
/// transition lands in [`SessionState`] for the presentation layer to
/// render; failures are terminal and cleared only by an explicit new
/// spin or [`WagerSession::clear`].
pub struct WagerSession {
    account: Option<Address>,
    token: TokenTag,
    state: SessionState,
    balance: Option<u128>,
    refresh_due: Option<Instant>,
    history: Vec<SpinRecord>,
}

impl WagerSession {
    pub fn new(account: Option<Address>, token: TokenTag) -> Self {
        Self {
            account,
            token,
            state: SessionState::Idle,
            balance: None,
            refresh_due: None,
            history: Vec::new(),
        }
    }

    pub fn connect(&mut self, account: Address) {
        self.account = Some(account);
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match &self.state {
            SessionState::Settled(settlement) => Some(settlement),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&SpinError> {
        match &self.state {
            SessionState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Newest-first record of settled spins.
    pub fn history(&self) -> &[SpinRecord] {
        &self.history
    }

    /// Last observed spendable balance (sum of snapshot coin values).
    pub fn balance(&self) -> Option<u128> {
        self.balance
    }

    pub fn balance_refresh_due(&self) -> Option<Instant> {
        self.refresh_due
    }

    /// Dismisses a settled or failed session back to `Idle`. In-flight
    /// states are left alone.
    pub fn clear(&mut self) {
        if !self.state.is_in_flight() {
            self.state = SessionState::Idle;
        }
    }

    /// Runs one wager end to end. `bet == None` is the pure-multiplier
    /// draw. Always returns the resulting state; while a prior wager is
    /// in flight the call is a no-op.
    ///
    /// Coins are snapshotted once, when fund assembly begins; mutations
    /// of the caller's holdings mid-flight are not observed until the
    /// next session.
    pub async fn spin<L: Ledger>(
        &mut self,
        ledger: &L,
        bet: Option<Bet>,
        amount_text: &str,
    ) -> &SessionState {
        if self.state.is_in_flight() {
            warn!("spin rejected: a wager is already in flight");
            return &self.state;
        }
        match self.run_spin(ledger, bet, amount_text).await {
            Ok(settlement) => {
                let outcome = classify(&settlement);
                info!(
                    payout = settlement.payout,
                    deposit = settlement.deposit,
                    multiplier = %settlement.multiplier,
                    ?outcome,
                    "wager settled"
                );
                self.history.insert(
                    0,
                    SpinRecord {
                        at: Utc::now(),
                        bet,
                        settlement: settlement.clone(),
                        outcome,
                    },
                );
                self.history.truncate(HISTORY_DEPTH);
                self.schedule_balance_refresh();
                self.state = SessionState::Settled(settlement);
            }
            Err(spin_error) => {
                error!(error = %spin_error, "wager failed");
                if matches!(spin_error, SpinError::EventMissing(_)) {
                    // Funds may have moved; let the refresh reconcile.
                    self.schedule_balance_refresh();
                }
                self.state = SessionState::Failed(spin_error);
            }
        }
        &self.state
    }

    async fn run_spin<L: Ledger>(
        &mut self,
        ledger: &L,
        bet: Option<Bet>,
        amount_text: &str,
    ) -> Result<Settlement, SpinError> {
        let Some(account) = self.account else {
            return Err(SpinError::NotConnected);
        };
        self.state = SessionState::AssemblingFunds;
        // Amount validation happens before any network interaction.
        let target = parse_chips(amount_text)?;
        let coins = ledger
            .coins(&account, &self.token)
            .await
            .map_err(|e: QueryError| {
                SpinError::SubmissionFailed(format!("coin query failed: {e}"))
            })?;
        if coins.is_empty() {
            return Err(SpinError::NoFunds);
        }
        let mut request = WagerRequest::new(account);
        let funding = assemble(&mut request, &coins, target)?;
        request.spin(bet.map(Bet::to_wire), funding);

        self.state = SessionState::AwaitingSettlement;
        info!(
            amount = target,
            bet = ?bet,
            steps = request.steps().len(),
            "submitting wager request"
        );
        let request_id = ledger.sign_and_submit(&request).await.map_err(
            |submit_error| match submit_error {
                SubmitError::Rejected(cause) => SpinError::SigningRejected(cause),
                SubmitError::Failed(cause) => SpinError::SubmissionFailed(cause),
            },
        )?;
        let finalized = ledger.wait_for_finality(&request_id).await.map_err(
            |finality_error| match finality_error {
                FinalityError::Reverted(cause) => SpinError::SubmissionFailed(cause),
                FinalityError::Network(cause) => SpinError::SubmissionFailed(cause),
            },
        )?;
        extract_settlement(&finalized.events).map_err(|event_error| {
            let cause = match event_error {
                EventError::Missing => String::from("no settlement event found"),
                EventError::Malformed(detail) => detail,
            };
            SpinError::EventMissing(cause)
        })
    }

    /// Re-reads the caller's coins and caches the summed balance.
    /// Callers drive this after [`BALANCE_REFRESH_DELAY`] elapses.
    pub async fn refresh_balance<L: Ledger>(
        &mut self,
        ledger: &L,
    ) -> Result<u128, QueryError> {
        let account = self
            .account
            .ok_or_else(|| QueryError(String::from("no account connected")))?;
        let coins = ledger.coins(&account, &self.token).await?;
        let total: u128 = coins.iter().map(|coin| coin.value as u128).sum();
        self.balance = Some(total);
        self.refresh_due = None;
        Ok(total)
    }

    fn schedule_balance_refresh(&mut self) {
        self.refresh_due = Some(Instant::now() + BALANCE_REFRESH_DELAY);
    }
}

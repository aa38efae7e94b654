use crate::{
    bet::Bet,
    ledger::{
        Address,
        BuildStep,
        Coin,
        CoinId,
        EmittedEvent,
        FinalityError,
        FinalizedRequest,
        Ledger,
        QueryError,
        RequestId,
        SubmitError,
        TokenTag,
        WagerRequest,
    },
    outcome::Multiplier,
};
use rand::{
    Rng,
    SeedableRng,
    rngs::StdRng,
};
use serde_json::json;
use sha2::{
    Digest,
    Sha256,
};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
    },
};
use tracing::debug;

/// Type tag the simulated authority stamps on its settlement events.
pub const SIM_SETTLEMENT_EVENT: &str = "0x51a7::roulette::SpinResult";

/// Type tag of the simulated chip token.
pub const SIM_CHIP_TOKEN: &str = "0x1d8a::chip::Chip";

/// Multiplier ladder for the unconditional draw: (num, denom, weight).
/// Tops out at the 100x jackpot.
const DRAW_LADDER: [(u64, u64, u32); 7] = [
    (0, 10, 500),
    (5, 10, 250),
    (10, 10, 120),
    (20, 10, 80),
    (50, 10, 40),
    (100, 10, 8),
    (1000, 10, 2),
];

struct SimState {
    coins: HashMap<Address, Vec<Coin>>,
    wheel_number: u8,
    rigged_draw: Option<(u64, u64)>,
    rng: StdRng,
    reject_signing: Option<String>,
    fail_submission: Option<String>,
    omit_event: bool,
    submissions: u64,
    pending: HashMap<RequestId, FinalizedRequest>,
    next_coin_seq: u64,
}

/// In-memory ledger plus settlement authority. Executes merge/split
/// semantics faithfully (inputs consumed, change observed only on the
/// next coin query) and settles spins against a riggable wheel number,
/// so tests and the demo binary can run the whole pipeline without a
/// network. Fault injection covers the failure paths: signing
/// rejection, submission failure, and settlement-event omission.
#[derive(Clone)]
pub struct SimLedger {
    state: Arc<Mutex<SimState>>,
}

impl SimLedger {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                coins: HashMap::new(),
                wheel_number: 19,
                rigged_draw: None,
                rng: StdRng::seed_from_u64(0x0051_a751),
                reject_signing: None,
                fail_submission: None,
                omit_event: false,
                submissions: 0,
                pending: HashMap::new(),
                next_coin_seq: 0,
            })),
        }
    }

    /// Mints one coin per value for the owner.
    pub fn fund(&self, owner: Address, values: &[u64]) {
        let mut state = self.state.lock().unwrap();
        for value in values {
            let id = mint_coin_id(&owner, &mut state.next_coin_seq);
            state
                .coins
                .entry(owner)
                .or_default()
                .push(Coin { id, value: *value });
        }
    }

    /// Pins the next wheel stop, the way a test VRF pins its number.
    pub fn set_wheel_number(&self, number: u8) {
        self.state.lock().unwrap().wheel_number = number;
    }

    /// Pins the next unconditional draw instead of sampling the ladder.
    pub fn rig_draw(&self, num: u64, denom: u64) {
        self.state.lock().unwrap().rigged_draw = Some((num, denom));
    }

    pub fn reject_next_signing(&self, cause: impl Into<String>) {
        self.state.lock().unwrap().reject_signing = Some(cause.into());
    }

    pub fn fail_next_submission(&self, cause: impl Into<String>) {
        self.state.lock().unwrap().fail_submission = Some(cause.into());
    }

    /// Settles without emitting the settlement event; the worst case a
    /// client can observe.
    pub fn omit_settlement_event(&self, omit: bool) {
        self.state.lock().unwrap().omit_event = omit;
    }

    pub fn balance_of(&self, owner: &Address) -> u128 {
        let state = self.state.lock().unwrap();
        state
            .coins
            .get(owner)
            .map(|coins| coins.iter().map(|coin| coin.value as u128).sum())
            .unwrap_or(0)
    }

    pub fn coin_count(&self, owner: &Address) -> usize {
        let state = self.state.lock().unwrap();
        state.coins.get(owner).map(Vec::len).unwrap_or(0)
    }

    /// How many requests reached the (simulated) network.
    pub fn submission_count(&self) -> u64 {
        self.state.lock().unwrap().submissions
    }

    pub fn chip_token(&self) -> TokenTag {
        TokenTag(String::from(SIM_CHIP_TOKEN))
    }
}

impl Default for SimLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for SimLedger {
    async fn coins(
        &self,
        owner: &Address,
        token: &TokenTag,
    ) -> Result<Vec<Coin>, QueryError> {
        if token.0 != SIM_CHIP_TOKEN {
            return Ok(Vec::new());
        }
        let state = self.state.lock().unwrap();
        Ok(state.coins.get(owner).cloned().unwrap_or_default())
    }

    async fn sign_and_submit(
        &self,
        request: &WagerRequest,
    ) -> Result<RequestId, SubmitError> {
        let mut state = self.state.lock().unwrap();
        if let Some(cause) = state.reject_signing.take() {
            return Err(SubmitError::Rejected(cause));
        }
        state.submissions += 1;
        if let Some(cause) = state.fail_submission.take() {
            return Err(SubmitError::Failed(cause));
        }
        let sender = request.sender();
        // Scratch copy: a request executes fully or not at all.
        let mut wallet = state.coins.get(&sender).cloned().unwrap_or_default();
        let mut split_outputs: HashMap<usize, u64> = HashMap::new();
        let mut events = Vec::new();

        for (index, step) in request.steps().iter().enumerate() {
            match step {
                BuildStep::Merge { target, sources } => {
                    for source in sources {
                        let position = wallet
                            .iter()
                            .position(|coin| coin.id == *source)
                            .ok_or_else(|| {
                                SubmitError::Failed(format!("unknown coin {source}"))
                            })?;
                        let absorbed = wallet.remove(position).value;
                        let target_coin = wallet
                            .iter_mut()
                            .find(|coin| coin.id == *target)
                            .ok_or_else(|| {
                                SubmitError::Failed(format!("unknown coin {target}"))
                            })?;
                        target_coin.value = target_coin
                            .value
                            .checked_add(absorbed)
                            .ok_or_else(|| {
                                SubmitError::Failed(String::from("merge overflow"))
                            })?;
                    }
                }
                BuildStep::Split { source, amount } => {
                    let source_coin = wallet
                        .iter_mut()
                        .find(|coin| coin.id == *source)
                        .ok_or_else(|| {
                            SubmitError::Failed(format!("unknown coin {source}"))
                        })?;
                    if source_coin.value < *amount {
                        return Err(SubmitError::Failed(format!(
                            "split of {amount} exceeds coin value {}",
                            source_coin.value
                        )));
                    }
                    // The remainder stays with the sender as change.
                    source_coin.value -= amount;
                    split_outputs.insert(index, *amount);
                }
                BuildStep::Spin { bet, funding } => {
                    let deposit =
                        split_outputs.remove(&funding.0).ok_or_else(|| {
                            SubmitError::Failed(String::from(
                                "funding ref is not a split output",
                            ))
                        })?;
                    let multiplier = settle_multiplier(&mut state, *bet)?;
                    let payout = multiplier.apply(deposit);
                    debug!(
                        deposit,
                        payout,
                        wheel = state.wheel_number,
                        "simulated spin settled"
                    );
                    if payout > 0 {
                        let value = u64::try_from(payout).map_err(|_| {
                            SubmitError::Failed(String::from("payout overflow"))
                        })?;
                        let id = mint_coin_id(&sender, &mut state.next_coin_seq);
                        wallet.push(Coin { id, value });
                    }
                    if !state.omit_event {
                        events.push(EmittedEvent {
                            type_tag: String::from(SIM_SETTLEMENT_EVENT),
                            data: json!({
                                "payout": payout.to_string(),
                                "deposit": (deposit as u128).to_string(),
                                "multiplier_num": multiplier.num(),
                                "multiplier_denom": multiplier.denom(),
                            }),
                        });
                    }
                }
            }
        }
        // Split outputs nothing consumed flow back to the sender.
        for (_, value) in split_outputs {
            let id = mint_coin_id(&sender, &mut state.next_coin_seq);
            wallet.push(Coin { id, value });
        }

        state.coins.insert(sender, wallet);
        let id = RequestId(request.digest());
        state.pending.insert(id, FinalizedRequest { events });
        Ok(id)
    }

    async fn wait_for_finality(
        &self,
        id: &RequestId,
    ) -> Result<FinalizedRequest, FinalityError> {
        let mut state = self.state.lock().unwrap();
        state
            .pending
            .remove(id)
            .ok_or_else(|| FinalityError::Network(format!("unknown request {id}")))
    }
}

fn settle_multiplier(
    state: &mut SimState,
    bet: Option<u8>,
) -> Result<Multiplier, SubmitError> {
    match bet {
        Some(code) => {
            let bet = Bet::from_wire(code).ok_or_else(|| {
                SubmitError::Failed(format!("unknown bet code {code}"))
            })?;
            if bet.covers(state.wheel_number) {
                Ok(bet.multiplier())
            } else {
                Ok(Multiplier::new(0, 10).expect("static losing ratio"))
            }
        }
        None => {
            let (num, denom) = match state.rigged_draw.take() {
                Some(pinned) => pinned,
                None => sample_ladder(&mut state.rng),
            };
            Multiplier::new(num, denom)
                .map_err(|e| SubmitError::Failed(e.to_string()))
        }
    }
}

fn sample_ladder(rng: &mut StdRng) -> (u64, u64) {
    let total: u32 = DRAW_LADDER.iter().map(|(_, _, weight)| weight).sum();
    let mut roll = rng.random_range(0..total);
    for (num, denom, weight) in DRAW_LADDER {
        if roll < weight {
            return (num, denom);
        }
        roll -= weight;
    }
    unreachable!("ladder weights sum to total")
}

fn mint_coin_id(owner: &Address, seq: &mut u64) -> CoinId {
    let mut hasher = Sha256::new();
    hasher.update(owner.0);
    hasher.update(seq.to_be_bytes());
    *seq += 1;
    CoinId(hasher.finalize().into())
}

use crate::{
    ledger::EmittedEvent,
    outcome::{
        Multiplier,
        Settlement,
    },
};
use serde::Deserialize;
use thiserror::Error;

/// Suffix of the settlement-outcome event's type tag. Matched with
/// `ends_with` so the emitting package id stays opaque.
pub const SETTLEMENT_EVENT_MARKER: &str = "::roulette::SpinResult";

/// Wire shape of the settlement event. Token amounts travel as decimal
/// strings so values past 53 bits survive JSON; they are parsed as
/// integers, never floats.
#[derive(Clone, Debug, Deserialize)]
pub struct SpinResultEvent {
    pub payout: String,
    pub deposit: String,
    pub multiplier_num: u64,
    pub multiplier_denom: u64,
}

#[derive(Debug, Error)]
pub enum EventError {
    #[error("no settlement event in the finalized request")]
    Missing,
    #[error("malformed settlement event: {0}")]
    Malformed(String),
}

/// Finds the settlement event among a finalized request's emitted
/// events and parses its payload.
pub fn extract_settlement(events: &[EmittedEvent]) -> Result<Settlement, EventError> {
    let event = events
        .iter()
        .find(|event| event.type_tag.ends_with(SETTLEMENT_EVENT_MARKER))
        .ok_or(EventError::Missing)?;
    parse_settlement(event)
}

fn parse_settlement(event: &EmittedEvent) -> Result<Settlement, EventError> {
    let wire: SpinResultEvent = serde_json::from_value(event.data.clone())
        .map_err(|e| EventError::Malformed(e.to_string()))?;
    let payout: u128 = wire
        .payout
        .parse()
        .map_err(|_| EventError::Malformed(format!("payout '{}'", wire.payout)))?;
    let deposit: u128 = wire
        .deposit
        .parse()
        .map_err(|_| EventError::Malformed(format!("deposit '{}'", wire.deposit)))?;
    let multiplier = Multiplier::new(wire.multiplier_num, wire.multiplier_denom)
        .map_err(|e| EventError::Malformed(e.to_string()))?;
    Ok(Settlement {
        payout,
        deposit,
        multiplier,
    })
}

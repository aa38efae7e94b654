use crate::{
    error::SpinError,
    ledger::{
        Coin,
        FundingRef,
        WagerRequest,
    },
};
use tracing::debug;

/// Builds one exact-value funding input of `target` minor units from
/// the caller's coin snapshot, appending merge/split steps to the
/// pending request. Nothing is submitted here; on error the request is
/// left untouched.
///
/// Fragmented holdings are consolidated first (2nd..Nth coins merged
/// into the 1st), so a single split suffices and the build succeeds
/// whenever the sum of balances covers the target, even if no single
/// coin does. Coin order only decides which handle receives the merge.
pub fn assemble(
    request: &mut WagerRequest,
    coins: &[Coin],
    target: u64,
) -> Result<FundingRef, SpinError> {
    if target == 0 {
        return Err(SpinError::InvalidAmount(String::from(
            "funding target must be positive",
        )));
    }
    let Some(primary) = coins.first() else {
        return Err(SpinError::NoFunds);
    };
    let available: u128 = coins.iter().map(|coin| coin.value as u128).sum();
    if available < target as u128 {
        return Err(SpinError::InsufficientFunds {
            needed: target,
            available,
        });
    }
    if coins.len() > 1 {
        let sources = coins[1..].iter().map(|coin| coin.id).collect();
        request.merge(primary.id, sources);
        debug!(
            merged = coins.len() - 1,
            into = %primary.id,
            "consolidated fragmented coins"
        );
    }
    Ok(request.split(primary.id, target))
}

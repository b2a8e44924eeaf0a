use rand::Rng;
use serde::Serialize;

use crate::dataset::Dataset;

/// One synthetic transaction, in the wire shape the ledger's create endpoint expects.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRequest {
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(rename = "type")]
    pub tx_type: i64,
    pub amount: i64,
}

/// Synthesize one transaction request from the shared dataset.
///
/// Pure and stateless: the same dataset and the same random draws always produce the same
/// request, and concurrent callers only need read access to the dataset. The dataset must be
/// non-empty, which is guaranteed by the startup validation in [Dataset::load].
///
/// The account index and the amount both come from flooring a uniform draw on [0, 1), keeping
/// the value distribution identical to the generator this ledger has always been load-tested
/// with. That includes the type flag: it is derived from the sign of the amount after the +100
/// offset, and since the amount is always at least 100 the flag always comes out as 1. Type 2
/// is deliberately left reachable only on paper until the intended semantics of the flag are
/// confirmed with the ledger team.
pub fn synthesize(dataset: &Dataset, rng: &mut impl Rng) -> TransactionRequest {
    let index = (rng.gen::<f64>() * dataset.len() as f64).floor() as usize;
    let amount = (rng.gen::<f64>() * 10_000.0).floor() as i64 + 100;

    TransactionRequest {
        account_id: dataset.get(index).to_string(),
        tx_type: if amount > 0 { 1 } else { 2 },
        amount,
    }
}

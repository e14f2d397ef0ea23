// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use linera_sdk::linera_base_types::{AccountOwner, Amount};
use serde::{Deserialize, Serialize};

use crate::LotteryError;

/// One movement of funds out of the lottery custody account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub recipient: AccountOwner,
    pub amount: Amount,
}

/// Moves funds in and out of the lottery custody account.
pub trait PayoutEngine {
    /// Pulls an entry fee from `from` into custody.
    fn collect(&mut self, from: AccountOwner, amount: Amount) -> Result<(), LotteryError>;

    /// Pays out a batch from custody. Either every transfer happens or none does.
    fn disburse(&mut self, transfers: &[Transfer]) -> Result<(), LotteryError>;
}

/// The single transfer closing a round with a winner.
pub fn winner_payout(winner: AccountOwner, prize: Amount) -> Vec<Transfer> {
    vec![Transfer {
        recipient: winner,
        amount: prize,
    }]
}

/// One refund of `ticket_price` per participant, in entry order.
pub fn refund_plan(participants: &[AccountOwner], ticket_price: Amount) -> Vec<Transfer> {
    participants
        .iter()
        .map(|participant| Transfer {
            recipient: *participant,
            amount: ticket_price,
        })
        .collect()
}

/// Sum of a batch.
pub fn batch_total(transfers: &[Transfer]) -> Amount {
    transfers
        .iter()
        .fold(Amount::ZERO, |total, transfer| total.saturating_add(transfer.amount))
}

/// Fails unless `available` covers the whole batch.
pub fn ensure_covered(available: Amount, transfers: &[Transfer]) -> Result<(), LotteryError> {
    let needed = batch_total(transfers);
    if available < needed {
        return Err(LotteryError::PayoutFailed(format!(
            "custody holds {} but the batch needs {}",
            available, needed
        )));
    }
    Ok(())
}

// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

/*! ABI of the Simple Lottery Application */

pub mod error;
pub mod guard;
pub mod payout;
pub mod random;

use async_graphql::{Request, Response, SimpleObject};
use linera_sdk::linera_base_types::{AccountOwner, Amount, ContractAbi, ServiceAbi};
use serde::{Deserialize, Serialize};

pub use error::LotteryError;

pub struct SimpleLotteryAbi;

impl ContractAbi for SimpleLotteryAbi {
    type Operation = Operation;
    type Response = LotteryResponse;
}

impl ServiceAbi for SimpleLotteryAbi {
    type Query = Request;
    type QueryResponse = Response;
}

/// What `StartNewRound` does when the current round is still open.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, async_graphql::Enum,
)]
pub enum ActiveRoundPolicy {
    /// Refuse to start until the open round is ended or cancelled.
    #[default]
    Reject,
    /// Cancel the open round, refunding its participants, then start.
    RefundPrevious,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LotteryParameters {
    /// Entry fee charged for every ticket.
    pub ticket_price: Amount,
    #[serde(default)]
    pub active_round_policy: ActiveRoundPolicy,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct InstantiationArgument {
    /// Lottery owner. Defaults to the signer creating the application.
    pub owner: Option<AccountOwner>,
}

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, async_graphql::Enum)]
pub enum RoundStatus {
    Active,    // Accepting tickets
    Ended,     // Winner paid
    Cancelled, // Everyone refunded
}

/// A lottery round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
pub struct Round {
    pub id: u64,
    pub active: bool,
    pub status: RoundStatus,
    pub total_collected: Amount,
    pub ticket_price: Amount,
    pub participants: Vec<AccountOwner>,
    pub created_at: u64,
    pub closed_at: Option<u64>,
}

impl Round {
    pub fn new(id: u64, ticket_price: Amount, created_at: u64) -> Self {
        Round {
            id,
            active: true,
            status: RoundStatus::Active,
            total_collected: Amount::ZERO,
            ticket_price,
            participants: Vec::new(),
            created_at,
            closed_at: None,
        }
    }

    pub fn participant_count(&self) -> u64 {
        self.participants.len() as u64
    }
}

/// The winner of a finished round and what they received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
pub struct WinnerRecord {
    pub round_id: u64,
    pub winner: AccountOwner,
    pub prize: Amount,
    pub drawn_at: u64,
}

/// Operations take no arguments: the caller is the block's authenticated signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Operation {
    /// Open the next round (owner only)
    StartNewRound,
    /// Pay the ticket price and join the current round
    BuyTicket,
    /// Draw a winner and pay out the pot (owner only)
    EndRound,
    /// Refund every participant and close the round (owner only)
    CancelRound,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum LotteryResponse {
    RoundStarted(u64),
    TicketBought,
    RoundEnded {
        round_id: u64,
        winner: AccountOwner,
        prize: Amount,
    },
    RoundCancelled {
        round_id: u64,
        refunded: Amount,
    },
}

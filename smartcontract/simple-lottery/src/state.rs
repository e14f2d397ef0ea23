// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use linera_sdk::linera_base_types::{AccountOwner, Amount};
use linera_sdk::views::{linera_views, MapView, RegisterView, RootView, ViewStorageContext};
use log::{debug, info, warn};
use simple_lottery::{
    guard::require_owner,
    payout::{batch_total, refund_plan, winner_payout, PayoutEngine},
    random::{select_winner, RandomnessSource},
    ActiveRoundPolicy, LotteryError, Round, RoundStatus, WinnerRecord,
};

/// Fewest entries a round needs before a winner can be drawn.
pub const MIN_PARTICIPANTS: u64 = 2;

/// The application state for the Simple Lottery.
#[derive(RootView)]
#[view(context = ViewStorageContext)]
pub struct SimpleLotteryState {
    /// Identity allowed to start, end and cancel rounds
    pub owner: RegisterView<Option<AccountOwner>>,
    /// Id of the latest round, 0 before the first one
    pub current_round_id: RegisterView<u64>,
    /// Every round ever started
    pub rounds: MapView<u64, Round>,
    /// (round_id, owner) -> bought a ticket
    pub participation: MapView<(u64, AccountOwner), bool>,
    /// Winners of ended rounds
    pub winners: MapView<u64, WinnerRecord>,
    /// Funds held for rounds that are still open
    pub contract_balance: RegisterView<Amount>,
}

/// Result of a successful cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelledRound {
    pub round_id: u64,
    pub refunded: Amount,
}

#[allow(dead_code)]
impl SimpleLotteryState {
    pub fn initialize(&mut self, owner: AccountOwner) {
        self.owner.set(Some(owner));
        self.current_round_id.set(0);
        self.contract_balance.set(Amount::ZERO);
    }

    // Ticket ledger

    pub async fn has_participated(
        &self,
        round_id: u64,
        owner: &AccountOwner,
    ) -> Result<bool, LotteryError> {
        Ok(self
            .participation
            .get(&(round_id, *owner))
            .await?
            .unwrap_or(false))
    }

    pub async fn participant_count(&self, round_id: u64) -> Result<u64, LotteryError> {
        Ok(self
            .rounds
            .get(&round_id)
            .await?
            .map_or(0, |round| round.participant_count()))
    }

    // Round manager

    /// Opens the next round. `policy` decides what happens to a round that is still open.
    pub async fn start_new_round(
        &mut self,
        caller: AccountOwner,
        ticket_price: Amount,
        policy: ActiveRoundPolicy,
        now: u64,
        payout: &mut impl PayoutEngine,
    ) -> Result<u64, LotteryError> {
        require_owner(&caller, self.owner.get().as_ref())?;

        let current_id = *self.current_round_id.get();
        if let Some(current) = self.rounds.get(&current_id).await? {
            if current.active {
                match policy {
                    ActiveRoundPolicy::Reject => {
                        return Err(LotteryError::RoundStillActive {
                            round_id: current_id,
                        });
                    }
                    ActiveRoundPolicy::RefundPrevious => {
                        warn!(
                            "round {} still active, refunding it before starting a new one",
                            current_id
                        );
                        self.refund_round(current, now, payout)?;
                    }
                }
            }
        }

        let round_id = current_id + 1;
        self.rounds
            .insert(&round_id, Round::new(round_id, ticket_price, now))?;
        self.current_round_id.set(round_id);

        info!("started round {} with ticket price {}", round_id, ticket_price);
        Ok(round_id)
    }

    /// Charges `caller` the ticket price and adds them to the current round.
    pub async fn buy_ticket(
        &mut self,
        caller: AccountOwner,
        payout: &mut impl PayoutEngine,
    ) -> Result<(), LotteryError> {
        let mut round = self.active_round().await?;
        if self.has_participated(round.id, &caller).await? {
            return Err(LotteryError::AlreadyParticipated { round_id: round.id });
        }

        payout.collect(caller, round.ticket_price)?;

        let round_id = round.id;
        let price = round.ticket_price;
        round.participants.push(caller);
        round.total_collected = round.total_collected.saturating_add(price);
        debug!(
            "round {}: {} participant(s), {} collected",
            round_id,
            round.participants.len(),
            round.total_collected
        );

        self.participation.insert(&(round_id, caller), true)?;
        self.rounds.insert(&round_id, round)?;
        self.hold_custody(price);

        info!("{:?} bought a ticket for round {}", caller, round_id);
        Ok(())
    }

    /// Draws a winner among the participants and pays them the whole pot.
    pub async fn end_round(
        &mut self,
        caller: AccountOwner,
        source: &impl RandomnessSource,
        now: u64,
        payout: &mut impl PayoutEngine,
    ) -> Result<WinnerRecord, LotteryError> {
        require_owner(&caller, self.owner.get().as_ref())?;

        let mut round = self.active_round().await?;
        let count = round.participant_count();
        let (index, winner) = match select_winner(&round.participants, round.id, source) {
            Some(selection) if count >= MIN_PARTICIPANTS => selection,
            _ => {
                return Err(LotteryError::InsufficientParticipants {
                    round_id: round.id,
                    count,
                })
            }
        };
        let prize = round.total_collected;

        payout.disburse(&winner_payout(winner, prize))?;

        round.active = false;
        round.status = RoundStatus::Ended;
        round.closed_at = Some(now);

        let record = WinnerRecord {
            round_id: round.id,
            winner,
            prize,
            drawn_at: now,
        };
        self.winners.insert(&round.id, record.clone())?;
        let round_id = round.id;
        self.rounds.insert(&round_id, round)?;
        self.release_custody(prize);

        info!(
            "round {} ended: entry #{} {:?} won {}",
            record.round_id, index, winner, prize
        );
        Ok(record)
    }

    /// Refunds every participant of the current round and closes it.
    pub async fn cancel_round(
        &mut self,
        caller: AccountOwner,
        now: u64,
        payout: &mut impl PayoutEngine,
    ) -> Result<CancelledRound, LotteryError> {
        require_owner(&caller, self.owner.get().as_ref())?;
        let round = self.active_round().await?;
        self.refund_round(round, now, payout)
    }

    async fn active_round(&self) -> Result<Round, LotteryError> {
        let round_id = *self.current_round_id.get();
        match self.rounds.get(&round_id).await? {
            Some(round) if round.active => Ok(round),
            _ => Err(LotteryError::RoundNotActive),
        }
    }

    fn refund_round(
        &mut self,
        mut round: Round,
        now: u64,
        payout: &mut impl PayoutEngine,
    ) -> Result<CancelledRound, LotteryError> {
        let plan = refund_plan(&round.participants, round.ticket_price);
        let refunded = batch_total(&plan);

        payout.disburse(&plan)?;

        let round_id = round.id;
        round.total_collected = Amount::ZERO;
        round.active = false;
        round.status = RoundStatus::Cancelled;
        round.closed_at = Some(now);
        self.rounds.insert(&round_id, round)?;
        self.release_custody(refunded);

        info!(
            "round {} cancelled, refunded {} to {} participant(s)",
            round_id,
            refunded,
            plan.len()
        );
        Ok(CancelledRound { round_id, refunded })
    }

    fn hold_custody(&mut self, amount: Amount) {
        let balance = self.contract_balance.get_mut();
        *balance = balance.saturating_add(amount);
    }

    fn release_custody(&mut self, amount: Amount) {
        let balance = self.contract_balance.get_mut();
        *balance = balance.saturating_sub(amount);
    }

    // Queries

    pub fn owner(&self) -> Option<AccountOwner> {
        *self.owner.get()
    }

    pub fn current_round_id(&self) -> u64 {
        *self.current_round_id.get()
    }

    pub fn contract_balance(&self) -> Amount {
        *self.contract_balance.get()
    }

    pub async fn current_round(&self) -> Result<Option<Round>, LotteryError> {
        self.round(self.current_round_id()).await
    }

    pub async fn round(&self, round_id: u64) -> Result<Option<Round>, LotteryError> {
        Ok(self.rounds.get(&round_id).await?)
    }

    /// Every round, oldest first.
    pub async fn all_rounds(&self) -> Result<Vec<Round>, LotteryError> {
        let indices = self.rounds.indices().await?;
        let mut rounds = Vec::with_capacity(indices.len());
        for index in indices {
            if let Some(round) = self.rounds.get(&index).await? {
                rounds.push(round);
            }
        }
        rounds.sort_by_key(|round| round.id);
        Ok(rounds)
    }

    pub async fn winner_record(&self, round_id: u64) -> Result<Option<WinnerRecord>, LotteryError> {
        Ok(self.winners.get(&round_id).await?)
    }

    pub async fn winner(&self, round_id: u64) -> Result<Option<AccountOwner>, LotteryError> {
        Ok(self.winner_record(round_id).await?.map(|record| record.winner))
    }

    pub async fn prize(&self, round_id: u64) -> Result<Option<Amount>, LotteryError> {
        Ok(self.winner_record(round_id).await?.map(|record| record.prize))
    }

    /// Whether `owner` holds a ticket in the current round.
    pub async fn has_participated_in_current(
        &self,
        owner: &AccountOwner,
    ) -> Result<bool, LotteryError> {
        self.has_participated(self.current_round_id(), owner).await
    }

    pub async fn current_participant_count(&self) -> Result<u64, LotteryError> {
        self.participant_count(self.current_round_id()).await
    }
}

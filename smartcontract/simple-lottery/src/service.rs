// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(target_arch = "wasm32", no_main)]

mod state;

use std::sync::Arc;

use async_graphql::{EmptySubscription, Object, Request, Response, Schema};
use linera_sdk::{
    linera_base_types::{AccountOwner, Amount, WithServiceAbi},
    views::View,
    Service, ServiceRuntime,
};
use simple_lottery::{
    ActiveRoundPolicy, LotteryParameters, Operation, Round, SimpleLotteryAbi, WinnerRecord,
};

use self::state::SimpleLotteryState;

pub struct SimpleLotteryService {
    state: Arc<SimpleLotteryState>,
    runtime: Arc<ServiceRuntime<Self>>,
}

linera_sdk::service!(SimpleLotteryService);

impl WithServiceAbi for SimpleLotteryService {
    type Abi = SimpleLotteryAbi;
}

impl Service for SimpleLotteryService {
    type Parameters = LotteryParameters;

    async fn new(runtime: ServiceRuntime<Self>) -> Self {
        let state = SimpleLotteryState::load(runtime.root_view_storage_context())
            .await
            .expect("Failed to load state");
        SimpleLotteryService {
            state: Arc::new(state),
            runtime: Arc::new(runtime),
        }
    }

    async fn handle_query(&self, request: Request) -> Response {
        let schema = Schema::build(
            QueryRoot {
                state: self.state.clone(),
                runtime: self.runtime.clone(),
            },
            MutationRoot {
                runtime: self.runtime.clone(),
            },
            EmptySubscription,
        )
        .finish();
        schema.execute(request).await
    }
}

struct QueryRoot {
    state: Arc<SimpleLotteryState>,
    runtime: Arc<ServiceRuntime<SimpleLotteryService>>,
}

#[Object]
impl QueryRoot {
    /// The latest round, if any was started
    async fn current_round(&self) -> async_graphql::Result<Option<Round>> {
        Ok(self.state.current_round().await?)
    }

    /// Winner of a finished round
    async fn winner(&self, round: u64) -> async_graphql::Result<Option<AccountOwner>> {
        Ok(self.state.winner(round).await?)
    }

    /// Prize paid for a finished round
    async fn prize(&self, round: u64) -> async_graphql::Result<Option<Amount>> {
        Ok(self.state.prize(round).await?)
    }

    /// Whether `owner` holds a ticket in the current round
    async fn has_participated(&self, owner: AccountOwner) -> async_graphql::Result<bool> {
        Ok(self.state.has_participated_in_current(&owner).await?)
    }

    /// Number of tickets sold in the current round
    async fn participants_count(&self) -> async_graphql::Result<u64> {
        Ok(self.state.current_participant_count().await?)
    }

    /// Funds held for rounds that are still open
    async fn contract_balance(&self) -> Amount {
        self.state.contract_balance()
    }

    async fn round(&self, id: u64) -> async_graphql::Result<Option<Round>> {
        Ok(self.state.round(id).await?)
    }

    /// All rounds, oldest first
    async fn rounds(&self) -> async_graphql::Result<Vec<Round>> {
        Ok(self.state.all_rounds().await?)
    }

    async fn winner_record(&self, round: u64) -> async_graphql::Result<Option<WinnerRecord>> {
        Ok(self.state.winner_record(round).await?)
    }

    async fn has_participated_in(
        &self,
        round: u64,
        owner: AccountOwner,
    ) -> async_graphql::Result<bool> {
        Ok(self.state.has_participated(round, &owner).await?)
    }

    async fn owner(&self) -> Option<AccountOwner> {
        self.state.owner()
    }

    async fn current_round_id(&self) -> u64 {
        self.state.current_round_id()
    }

    async fn ticket_price(&self) -> Amount {
        self.runtime.application_parameters().ticket_price
    }

    async fn active_round_policy(&self) -> ActiveRoundPolicy {
        self.runtime.application_parameters().active_round_policy
    }
}

struct MutationRoot {
    runtime: Arc<ServiceRuntime<SimpleLotteryService>>,
}

#[Object]
impl MutationRoot {
    /// Open the next round (owner only)
    async fn start_new_round(&self) -> String {
        self.runtime.schedule_operation(&Operation::StartNewRound);
        "StartNewRound operation scheduled".to_string()
    }

    /// Join the current round
    async fn buy_ticket(&self) -> String {
        self.runtime.schedule_operation(&Operation::BuyTicket);
        "BuyTicket operation scheduled".to_string()
    }

    /// Draw the winner of the current round (owner only)
    async fn end_round(&self) -> String {
        self.runtime.schedule_operation(&Operation::EndRound);
        "EndRound operation scheduled".to_string()
    }

    /// Refund and close the current round (owner only)
    async fn cancel_round(&self) -> String {
        self.runtime.schedule_operation(&Operation::CancelRound);
        "CancelRound operation scheduled".to_string()
    }
}

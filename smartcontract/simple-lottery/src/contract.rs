// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(target_arch = "wasm32", no_main)]

mod state;

use linera_sdk::{
    linera_base_types::{Account, AccountOwner, Amount, WithContractAbi},
    views::{RootView, View},
    Contract, ContractRuntime,
};
use log::info;
use simple_lottery::{
    payout::{ensure_covered, PayoutEngine, Transfer},
    random::ExecutionEntropy,
    InstantiationArgument, LotteryError, LotteryParameters, LotteryResponse, Operation,
    SimpleLotteryAbi,
};

use self::state::SimpleLotteryState;

pub struct SimpleLotteryContract {
    state: SimpleLotteryState,
    runtime: ContractRuntime<Self>,
}

linera_sdk::contract!(SimpleLotteryContract);

impl WithContractAbi for SimpleLotteryContract {
    type Abi = SimpleLotteryAbi;
}

impl Contract for SimpleLotteryContract {
    type Message = ();
    type Parameters = LotteryParameters;
    type InstantiationArgument = InstantiationArgument;
    type EventValue = ();

    async fn load(runtime: ContractRuntime<Self>) -> Self {
        let state = SimpleLotteryState::load(runtime.root_view_storage_context())
            .await
            .expect("Failed to load state");
        SimpleLotteryContract { state, runtime }
    }

    async fn instantiate(&mut self, argument: Self::InstantiationArgument) {
        let parameters = self.runtime.application_parameters();
        assert!(
            parameters.ticket_price > Amount::ZERO,
            "Ticket price must be greater than zero"
        );

        let owner = argument
            .owner
            .or_else(|| self.runtime.authenticated_signer())
            .expect("Lottery owner must be given or the creator must sign");
        self.state.initialize(owner);

        info!(
            "lottery instantiated: owner={:?} ticket_price={} policy={:?}",
            owner, parameters.ticket_price, parameters.active_round_policy
        );
    }

    async fn execute_operation(&mut self, operation: Self::Operation) -> Self::Response {
        match self.execute(operation).await {
            Ok(response) => response,
            Err(error) => panic!(
                "{:?} failed with code {}: {}",
                operation,
                error.code(),
                error
            ),
        }
    }

    async fn execute_message(&mut self, _message: Self::Message) {
        panic!("Simple lottery doesn't support cross-chain messages");
    }

    async fn store(mut self) {
        self.state.save().await.expect("Failed to save state");
    }
}

impl SimpleLotteryContract {
    async fn execute(&mut self, operation: Operation) -> Result<LotteryResponse, LotteryError> {
        let caller = self
            .runtime
            .authenticated_signer()
            .ok_or(LotteryError::MissingSigner)?;
        let now = self.runtime.system_time().micros();
        let parameters = self.runtime.application_parameters();

        match operation {
            Operation::StartNewRound => {
                let mut payout = RuntimePayout::new(&mut self.runtime);
                let round_id = self
                    .state
                    .start_new_round(
                        caller,
                        parameters.ticket_price,
                        parameters.active_round_policy,
                        now,
                        &mut payout,
                    )
                    .await?;
                Ok(LotteryResponse::RoundStarted(round_id))
            }

            Operation::BuyTicket => {
                let mut payout = RuntimePayout::new(&mut self.runtime);
                self.state.buy_ticket(caller, &mut payout).await?;
                Ok(LotteryResponse::TicketBought)
            }

            Operation::EndRound => {
                let entropy = ExecutionEntropy {
                    block_height: self.runtime.block_height().0,
                    timestamp_micros: now,
                };
                let mut payout = RuntimePayout::new(&mut self.runtime);
                let record = self
                    .state
                    .end_round(caller, &entropy, now, &mut payout)
                    .await?;
                Ok(LotteryResponse::RoundEnded {
                    round_id: record.round_id,
                    winner: record.winner,
                    prize: record.prize,
                })
            }

            Operation::CancelRound => {
                let mut payout = RuntimePayout::new(&mut self.runtime);
                let cancelled = self.state.cancel_round(caller, now, &mut payout).await?;
                Ok(LotteryResponse::RoundCancelled {
                    round_id: cancelled.round_id,
                    refunded: cancelled.refunded,
                })
            }
        }
    }
}

/// Native-token custody held in the application's own account on this chain.
///
/// A transfer the runtime cannot perform aborts the whole operation, so any
/// side effects of an earlier transfer in the same batch are discarded too.
struct RuntimePayout<'a> {
    runtime: &'a mut ContractRuntime<SimpleLotteryContract>,
}

impl<'a> RuntimePayout<'a> {
    fn new(runtime: &'a mut ContractRuntime<SimpleLotteryContract>) -> Self {
        RuntimePayout { runtime }
    }

    fn custody(&mut self) -> AccountOwner {
        AccountOwner::from(self.runtime.application_id().forget_abi())
    }

    fn account(&mut self, owner: AccountOwner) -> Account {
        Account {
            chain_id: self.runtime.chain_id(),
            owner,
        }
    }
}

impl PayoutEngine for RuntimePayout<'_> {
    fn collect(&mut self, from: AccountOwner, amount: Amount) -> Result<(), LotteryError> {
        let available = self.runtime.owner_balance(from);
        if available < amount {
            return Err(LotteryError::PayoutFailed(format!(
                "{:?} holds {} but a ticket costs {}",
                from, available, amount
            )));
        }
        let custody = self.custody();
        let destination = self.account(custody);
        self.runtime.transfer(from, destination, amount);
        Ok(())
    }

    fn disburse(&mut self, transfers: &[Transfer]) -> Result<(), LotteryError> {
        let custody = self.custody();
        ensure_covered(self.runtime.owner_balance(custody), transfers)?;
        for transfer in transfers {
            let destination = self.account(transfer.recipient);
            self.runtime.transfer(custody, destination, transfer.amount);
        }
        Ok(())
    }
}

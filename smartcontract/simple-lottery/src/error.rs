// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use linera_sdk::views::ViewError;
use serde::{Deserialize, Serialize};

/// Errors returned by the lottery state machine.
///
/// Every variant maps to a stable numeric code. Code `102` is reserved and is
/// never produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LotteryError {
    /// The caller is not the lottery owner.
    #[error("caller is not the lottery owner")]
    NotAuthorized,

    /// There is no active round to operate on.
    #[error("no active round")]
    RoundNotActive,

    /// Ending a round needs at least two participants.
    #[error("round {round_id} has {count} participant(s), at least 2 are required")]
    InsufficientParticipants { round_id: u64, count: u64 },

    /// The caller already holds a ticket in the current round.
    #[error("caller already bought a ticket in round {round_id}")]
    AlreadyParticipated { round_id: u64 },

    /// A new round was requested while the current one is still open.
    #[error("round {round_id} is still active")]
    RoundStillActive { round_id: u64 },

    /// Custody could not fund a transfer.
    #[error("payout failed: {0}")]
    PayoutFailed(String),

    /// A mutating operation arrived without an authenticated signer.
    #[error("operation requires an authenticated signer")]
    MissingSigner,

    /// Reading or writing the application views failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl LotteryError {
    pub const NOT_AUTHORIZED: u32 = 100;
    pub const ROUND_NOT_ACTIVE: u32 = 101;
    pub const INSUFFICIENT_PARTICIPANTS: u32 = 103;
    pub const ALREADY_PARTICIPATED: u32 = 104;
    pub const ROUND_STILL_ACTIVE: u32 = 105;
    pub const PAYOUT_FAILED: u32 = 106;
    pub const MISSING_SIGNER: u32 = 107;
    pub const STORAGE: u32 = 108;

    /// Stable numeric tag reported to callers.
    pub fn code(&self) -> u32 {
        match self {
            LotteryError::NotAuthorized => Self::NOT_AUTHORIZED,
            LotteryError::RoundNotActive => Self::ROUND_NOT_ACTIVE,
            LotteryError::InsufficientParticipants { .. } => Self::INSUFFICIENT_PARTICIPANTS,
            LotteryError::AlreadyParticipated { .. } => Self::ALREADY_PARTICIPATED,
            LotteryError::RoundStillActive { .. } => Self::ROUND_STILL_ACTIVE,
            LotteryError::PayoutFailed(_) => Self::PAYOUT_FAILED,
            LotteryError::MissingSigner => Self::MISSING_SIGNER,
            LotteryError::Storage(_) => Self::STORAGE,
        }
    }
}

impl From<ViewError> for LotteryError {
    fn from(error: ViewError) -> Self {
        LotteryError::Storage(format!("{:?}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::LotteryError;

    #[test]
    fn observed_codes_are_stable() {
        assert_eq!(LotteryError::NotAuthorized.code(), 100);
        assert_eq!(LotteryError::RoundNotActive.code(), 101);
        assert_eq!(
            LotteryError::InsufficientParticipants { round_id: 1, count: 1 }.code(),
            103
        );
        assert_eq!(LotteryError::AlreadyParticipated { round_id: 1 }.code(), 104);
    }

    #[test]
    fn code_102_is_never_produced() {
        let all = [
            LotteryError::NotAuthorized,
            LotteryError::RoundNotActive,
            LotteryError::InsufficientParticipants { round_id: 3, count: 0 },
            LotteryError::AlreadyParticipated { round_id: 3 },
            LotteryError::RoundStillActive { round_id: 3 },
            LotteryError::PayoutFailed("empty custody".to_string()),
            LotteryError::MissingSigner,
            LotteryError::Storage("closed".to_string()),
        ];
        assert!(all.iter().all(|error| error.code() != 102));
    }

    #[test]
    fn messages_carry_round_context() {
        let error = LotteryError::InsufficientParticipants { round_id: 7, count: 1 };
        assert_eq!(
            error.to_string(),
            "round 7 has 1 participant(s), at least 2 are required"
        );
    }
}

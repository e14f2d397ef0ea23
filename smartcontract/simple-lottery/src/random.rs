// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Deterministic winner selection.
//!
//! Every validator replaying a block must pick the same winner, so the seed can
//! only come from data that is part of the block's execution context. The draw
//! is therefore pseudo-random: whoever controls block timing can bias it. Fair
//! draws against such a party need an external verifiable-randomness oracle.

use linera_sdk::linera_base_types::AccountOwner;

/// A source of replay-stable entropy.
pub trait RandomnessSource {
    fn seed(&self) -> u64;
}

/// Entropy taken from the block executing the draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionEntropy {
    pub block_height: u64,
    pub timestamp_micros: u64,
}

impl RandomnessSource for ExecutionEntropy {
    fn seed(&self) -> u64 {
        self.timestamp_micros
            .wrapping_add(self.block_height.rotate_left(32))
    }
}

/// A fixed seed, for tests and reproducible draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSeed(pub u64);

impl RandomnessSource for FixedSeed {
    fn seed(&self) -> u64 {
        self.0
    }
}

// 64-bit finalizer from splitmix64.
fn mix(mut value: u64) -> u64 {
    value = (value ^ (value >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    value = (value ^ (value >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    value ^ (value >> 31)
}

/// Index of the winning entry among `count` participants of `round_id`.
pub fn winner_index(count: usize, round_id: u64, source: &impl RandomnessSource) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let digest = mix(
        mix(source.seed() ^ round_id.wrapping_mul(0x9e37_79b9_7f4a_7c15)) ^ count as u64,
    );
    Some((digest % count as u64) as usize)
}

/// Picks the winner among `participants`. `None` only for an empty list.
pub fn select_winner(
    participants: &[AccountOwner],
    round_id: u64,
    source: &impl RandomnessSource,
) -> Option<(usize, AccountOwner)> {
    let index = winner_index(participants.len(), round_id, source)?;
    Some((index, participants[index]))
}

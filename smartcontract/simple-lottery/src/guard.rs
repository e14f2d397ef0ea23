// Copyright (c) Zefchain Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use linera_sdk::linera_base_types::AccountOwner;

use crate::LotteryError;

/// Checks that `caller` is the configured owner.
///
/// An unset owner never authorizes anyone.
pub fn require_owner(
    caller: &AccountOwner,
    owner: Option<&AccountOwner>,
) -> Result<(), LotteryError> {
    match owner {
        Some(owner) if owner == caller => Ok(()),
        _ => Err(LotteryError::NotAuthorized),
    }
}

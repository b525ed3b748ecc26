//! Nullable token vault: in-memory balances per (token, holder).

use std::collections::{HashMap, HashSet};

use vesta_store::{TokenVault, VaultError};
use vesta_types::{Address, TokenId};

/// An in-memory token vault for testing.
///
/// Transfers to selected recipients can be made to fail to exercise the
/// engine's rollback paths.
pub struct NullVault {
    custody: Address,
    balances: HashMap<(TokenId, Address), u128>,
    rejected_recipients: HashSet<Address>,
}

impl NullVault {
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            balances: HashMap::new(),
            rejected_recipients: HashSet::new(),
        }
    }

    /// Credit `amount` to `holder` out of thin air (test setup).
    pub fn credit(&mut self, token: &TokenId, holder: &Address, amount: u128) {
        *self
            .balances
            .entry((token.clone(), holder.clone()))
            .or_default() += amount;
    }

    /// Credit custody directly, as the grant-issuance subsystem would when funding grants.
    pub fn fund_custody(&mut self, token: &TokenId, amount: u128) {
        let custody = self.custody.clone();
        self.credit(token, &custody, amount);
    }

    /// Reject every transfer whose recipient is `to`.
    pub fn reject_transfers_to(&mut self, to: &Address) {
        self.rejected_recipients.insert(to.clone());
    }

    pub fn accept_transfers_to(&mut self, to: &Address) {
        self.rejected_recipients.remove(to);
    }

    fn move_balance(
        &mut self,
        token: &TokenId,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), VaultError> {
        if self.rejected_recipients.contains(to) {
            return Err(VaultError::Rejected(format!("recipient {to} refuses {token}")));
        }
        let available = self.balance_of(token, from);
        if available < amount {
            return Err(VaultError::InsufficientBalance {
                token: token.clone(),
                holder: from.clone(),
                needed: amount,
                available,
            });
        }
        self.balances
            .insert((token.clone(), from.clone()), available - amount);
        self.credit(token, to, amount);
        Ok(())
    }
}

impl TokenVault for NullVault {
    fn custody(&self) -> Address {
        self.custody.clone()
    }

    fn balance_of(&self, token: &TokenId, holder: &Address) -> u128 {
        self.balances
            .get(&(token.clone(), holder.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(&mut self, token: &TokenId, to: &Address, amount: u128) -> Result<(), VaultError> {
        let custody = self.custody.clone();
        self.move_balance(token, &custody, to, amount)
    }

    fn transfer_from(
        &mut self,
        token: &TokenId,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), VaultError> {
        self.move_balance(token, from, to, amount)
    }
}

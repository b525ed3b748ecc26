//! Fungible-token transfer interface.

use crate::VaultError;
use vesta_types::{Address, TokenId};

/// The token layer holding the ledger's custodial balances.
pub trait TokenVault {
    /// The account whose balances back the ledger's outstanding flows.
    fn custody(&self) -> Address;

    fn balance_of(&self, token: &TokenId, holder: &Address) -> u128;

    /// Move `amount` of `token` out of custody to `to`.
    fn transfer(&mut self, token: &TokenId, to: &Address, amount: u128) -> Result<(), VaultError>;

    /// Move `amount` of `token` from `from` to `to`.
    fn transfer_from(
        &mut self,
        token: &TokenId,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), VaultError>;

    /// Balance currently held in custody.
    fn custodial_balance(&self, token: &TokenId) -> u128 {
        self.balance_of(token, &self.custody())
    }
}

//! Polymorphic account decoding for auth module queries.
//!
//! Account queries return a `google.protobuf.Any` whose concrete type
//! varies by chain configuration. The decoder handles the standard account
//! types plus the vesting family, and keeps unknown types around instead of
//! failing, so a new account type degrades gracefully.

use anyhow::{anyhow, Result};
use prost::Message;

use crate::proto::{
    BaseAccount, BaseVestingAccount, ContinuousVestingAccount, DelayedVestingAccount,
    PeriodicVestingAccount, PermanentLockedAccount,
};

/// All account types the client understands.
#[derive(Debug, Clone)]
pub enum Account {
    Base(BaseAccount),

    // Vesting account types
    BaseVesting(BaseVestingAccount),
    ContinuousVesting(ContinuousVestingAccount),
    DelayedVesting(DelayedVestingAccount),
    PeriodicVesting(PeriodicVestingAccount),
    PermanentLocked(PermanentLockedAccount),

    // Forward compatibility for unknown account types
    Unsupported { type_url: String, raw_value: Vec<u8> },
}

/// Common account information extracted from any account type.
#[derive(Debug, Clone, Default)]
pub struct AccountInfo {
    pub address: String,
    pub account_number: u64,
    pub sequence: u64,
}

impl Account {
    /// Decode a `google.protobuf.Any` account into the matching variant.
    pub fn decode_any(type_url: &str, value: &[u8]) -> Result<Self> {
        let account = match type_url {
            "/cosmos.auth.v1beta1.BaseAccount" => {
                let base_account = BaseAccount::decode(value)
                    .map_err(|e| anyhow!("failed to decode BaseAccount: {}", e))?;
                Account::Base(base_account)
            }

            "/cosmos.vesting.v1beta1.BaseVestingAccount" => {
                let vesting_account = BaseVestingAccount::decode(value)
                    .map_err(|e| anyhow!("failed to decode BaseVestingAccount: {}", e))?;
                Account::BaseVesting(vesting_account)
            }
            "/cosmos.vesting.v1beta1.ContinuousVestingAccount" => {
                let continuous_account = ContinuousVestingAccount::decode(value)
                    .map_err(|e| anyhow!("failed to decode ContinuousVestingAccount: {}", e))?;
                Account::ContinuousVesting(continuous_account)
            }
            "/cosmos.vesting.v1beta1.DelayedVestingAccount" => {
                let delayed_account = DelayedVestingAccount::decode(value)
                    .map_err(|e| anyhow!("failed to decode DelayedVestingAccount: {}", e))?;
                Account::DelayedVesting(delayed_account)
            }
            "/cosmos.vesting.v1beta1.PeriodicVestingAccount" => {
                let periodic_account = PeriodicVestingAccount::decode(value)
                    .map_err(|e| anyhow!("failed to decode PeriodicVestingAccount: {}", e))?;
                Account::PeriodicVesting(periodic_account)
            }
            "/cosmos.vesting.v1beta1.PermanentLockedAccount" => {
                let permanent_account = PermanentLockedAccount::decode(value)
                    .map_err(|e| anyhow!("failed to decode PermanentLockedAccount: {}", e))?;
                Account::PermanentLocked(permanent_account)
            }

            unsupported_type => {
                log::warn!("encountered unsupported account type: {}", unsupported_type);
                Account::Unsupported {
                    type_url: unsupported_type.to_string(),
                    raw_value: value.to_vec(),
                }
            }
        };

        Ok(account)
    }

    /// Extract the base account information, if the variant carries it.
    pub fn account_info(&self) -> Option<AccountInfo> {
        fn from_base(base: &BaseAccount) -> AccountInfo {
            AccountInfo {
                address: base.address.clone(),
                account_number: base.account_number,
                sequence: base.sequence,
            }
        }

        match self {
            Account::Base(acc) => Some(from_base(acc)),

            // BaseVesting has BaseAccount directly
            Account::BaseVesting(acc) => acc.base_account.as_ref().map(from_base),

            // The other vesting accounts nest BaseVestingAccount -> BaseAccount
            Account::ContinuousVesting(acc) => acc
                .base_vesting_account
                .as_ref()
                .and_then(|bva| bva.base_account.as_ref())
                .map(from_base),
            Account::DelayedVesting(acc) => acc
                .base_vesting_account
                .as_ref()
                .and_then(|bva| bva.base_account.as_ref())
                .map(from_base),
            Account::PeriodicVesting(acc) => acc
                .base_vesting_account
                .as_ref()
                .and_then(|bva| bva.base_account.as_ref())
                .map(from_base),
            Account::PermanentLocked(acc) => acc
                .base_vesting_account
                .as_ref()
                .and_then(|bva| bva.base_account.as_ref())
                .map(from_base),

            Account::Unsupported { .. } => None,
        }
    }

    /// Account type name for logging.
    pub fn account_type(&self) -> &'static str {
        match self {
            Account::Base(_) => "BaseAccount",
            Account::BaseVesting(_) => "BaseVestingAccount",
            Account::ContinuousVesting(_) => "ContinuousVestingAccount",
            Account::DelayedVesting(_) => "DelayedVestingAccount",
            Account::PeriodicVesting(_) => "PeriodicVestingAccount",
            Account::PermanentLocked(_) => "PermanentLockedAccount",
            Account::Unsupported { .. } => "UnsupportedAccount",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Account::Unsupported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_account_info_extraction() {
        let base_account = BaseAccount {
            address: "cosmos1test123".to_string(),
            pub_key: None,
            account_number: 12345,
            sequence: 5,
        };
        let bytes = base_account.encode_to_vec();

        let account = Account::decode_any("/cosmos.auth.v1beta1.BaseAccount", &bytes).unwrap();
        let info = account.account_info().unwrap();
        assert_eq!(info.address, "cosmos1test123");
        assert_eq!(info.account_number, 12345);
        assert_eq!(info.sequence, 5);
    }

    #[test]
    fn vesting_account_info_extraction() {
        let vesting = ContinuousVestingAccount {
            base_vesting_account: Some(BaseVestingAccount {
                base_account: Some(BaseAccount {
                    address: "cosmos1vesting".to_string(),
                    pub_key: None,
                    account_number: 7,
                    sequence: 3,
                }),
                ..Default::default()
            }),
            start_time: 0,
        };
        let bytes = vesting.encode_to_vec();

        let account =
            Account::decode_any("/cosmos.vesting.v1beta1.ContinuousVestingAccount", &bytes)
                .unwrap();
        let info = account.account_info().unwrap();
        assert_eq!(info.address, "cosmos1vesting");
        assert_eq!(info.sequence, 3);
    }

    #[test]
    fn unsupported_account_keeps_raw_value() {
        let account = Account::decode_any("/some.chain.v1.ModuleAccount", &[1, 2, 3]).unwrap();
        assert!(!account.is_supported());
        assert!(account.account_info().is_none());
        assert_eq!(account.account_type(), "UnsupportedAccount");
        match account {
            Account::Unsupported { type_url, raw_value } => {
                assert_eq!(type_url, "/some.chain.v1.ModuleAccount");
                assert_eq!(raw_value, vec![1, 2, 3]);
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}

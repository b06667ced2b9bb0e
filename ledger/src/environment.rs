use keytree::PublicKey;
use serde::{Deserialize, Serialize};

/// Server-side constants every transaction and vault derivation depends on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Fee payer of every transaction.
    #[serde(default = "Environment::default_subsidizer")]
    pub subsidizer: PublicKey,

    /// Co-signer of every time-lock command.
    #[serde(default = "Environment::default_time_authority")]
    pub time_authority: PublicKey,

    /// Token mint held by the vaults.
    #[serde(default = "Environment::default_mint")]
    pub mint: PublicKey,

    /// Unlock delay of the vaults, in days.
    #[serde(default = "Environment::default_lock_duration")]
    pub lock_duration: u8,

    /// App index written into transfer memos.
    #[serde(default)]
    pub app_index: u16,

    /// Largest dust balance burned when closing an empty account.
    #[serde(default = "Environment::default_max_dust_amount")]
    pub max_dust_amount: u64,
}

impl Environment {
    /// Development subsidizer.
    pub fn default_subsidizer() -> PublicKey {
        PublicKey([
            132, 179, 104, 26, 191, 64, 13, 166, 86, 151, 190, 180, 94, 90, 10, 244, 16, 44, 88,
            183, 228, 209, 64, 180, 157, 206, 63, 240, 168, 241, 6, 97,
        ])
    }

    /// Development time authority.
    pub fn default_time_authority() -> PublicKey {
        PublicKey([
            29, 119, 212, 239, 84, 149, 200, 6, 151, 2, 38, 38, 141, 185, 158, 159, 57, 146, 99,
            149, 165, 233, 228, 11, 206, 216, 0, 129, 243, 149, 210, 31,
        ])
    }

    /// Development mint.
    pub fn default_mint() -> PublicKey {
        PublicKey([
            241, 151, 188, 32, 149, 91, 204, 138, 31, 137, 226, 184, 11, 174, 178, 242, 182, 212,
            114, 212, 41, 127, 120, 226, 66, 218, 56, 133, 197, 128, 50, 97,
        ])
    }

    /// Three weeks.
    pub fn default_lock_duration() -> u8 {
        21
    }

    /// One unit.
    pub fn default_max_dust_amount() -> u64 {
        1
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            subsidizer: Self::default_subsidizer(),
            time_authority: Self::default_time_authority(),
            mint: Self::default_mint(),
            lock_duration: Self::default_lock_duration(),
            app_index: 0,
            max_dust_amount: Self::default_max_dust_amount(),
        }
    }
}

use keytree::PublicKey;
use serde::{Deserialize, Serialize};

/// What an intent does, reported to the server alongside its actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Metadata {
    /// Opens all accounts of a new tray.
    OpenAccounts,
    /// Moves funds from a funding account into the buckets.
    ReceivePaymentsPrivately {
        /// Funding account vault.
        source: PublicKey,
        /// Amount received.
        amount: u64,
        /// Whether funds came from the primary account.
        is_deposit: bool,
    },
    /// Pays out of the buckets through the outgoing account.
    SendPrivatePayment {
        /// Recipient token account.
        destination: PublicKey,
        /// Gross amount.
        amount: u64,
        /// Whether the payment leaves the wallet for an external account.
        is_withdrawal: bool,
        /// Whether the recipient is a cash link.
        is_remote_send: bool,
    },
    /// Pays directly out of a source account.
    SendPublicPayment {
        /// Recipient token account.
        destination: PublicKey,
        /// Amount paid.
        amount: u64,
        /// Whether the payment leaves the wallet for an external account.
        is_withdrawal: bool,
    },
    /// Moves funds into the incoming account from outside the buckets.
    ReceivePaymentsPublicly {
        /// Vault funds come from.
        source: PublicKey,
        /// Amount received.
        amount: u64,
        /// Whether the source is a cash link.
        is_remote_send: bool,
    },
    /// Pays winnings out of a pool.
    DistributeWinnings {
        /// Pool vault.
        source: PublicKey,
        /// Sum of all distributions.
        total: u64,
    },
}

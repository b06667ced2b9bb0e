use keytree::PublicKey;
use ledger::{Hash, NonceConfig};
use serde::{Deserialize, Serialize};

/// Per-action material issued by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerParameter {
    /// Id of the action this parameter belongs to.
    pub action_id: u32,
    /// Action-specific data.
    pub kind: Option<ParameterKind>,
    /// One nonce per transaction of the action.
    pub configs: Vec<NonceConfig>,
}

/// Action-specific part of a server parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    /// Privacy treasury used for bucket movements.
    TempPrivacy {
        /// Treasury account.
        treasury: PublicKey,
        /// Most recent commitment root of the treasury.
        recent_root: Hash,
    },
    /// Where the code fee goes.
    FeePayment {
        /// Fee collector.
        destination: PublicKey,
    },
}

/// What the server knows about a withdrawal destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationMetadata {
    /// Token account that receives the funds.
    pub destination: PublicKey,
    /// Whether the destination can hold the token at all.
    pub is_valid: bool,
    /// Whether the token account must be created before it can receive.
    pub requires_initialization: bool,
    /// Fee charged for creating the account.
    pub fee: u64,
}

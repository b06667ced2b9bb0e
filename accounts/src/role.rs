use core::fmt;

use serde::{Deserialize, Serialize};

use crate::denomination::Denomination;

/// Purpose of an account cluster. Each role derives its keys along a separate path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Long-lived owner account. Dormant accounts sweep into it.
    Primary,
    /// Single-use account that receives payments; rotated after every receive.
    Incoming,
    /// Single-use account that assembles outgoing payments; rotated after every send.
    Outgoing,
    /// Holds bills of one denomination.
    Bucket(Denomination),
    /// Account dedicated to one counter-party domain.
    Relationship(String),
    /// Account behind a cash link. Not derived from the owner's master key.
    GiftCard,
}

impl Role {
    /// Tag committed to the derivation transcript.
    pub fn tag(&self) -> &'static [u8] {
        match self {
            Role::Primary => b"primary",
            Role::Incoming => b"incoming",
            Role::Outgoing => b"outgoing",
            Role::Bucket(_) => b"bucket",
            Role::Relationship(_) => b"relationship",
            Role::GiftCard => b"giftcard",
        }
    }

    /// Whether the role is rotated to a fresh index after use.
    pub fn is_rotating(&self) -> bool {
        matches!(self, Role::Incoming | Role::Outgoing)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Primary => f.write_str("primary"),
            Role::Incoming => f.write_str("incoming"),
            Role::Outgoing => f.write_str("outgoing"),
            Role::Bucket(d) => write!(f, "bucket-{}", d),
            Role::Relationship(domain) => write!(f, "relationship({})", domain),
            Role::GiftCard => f.write_str("giftcard"),
        }
    }
}

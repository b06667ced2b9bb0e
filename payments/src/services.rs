//! Boundaries to the remote collaborators of the client.

use accounts::TrayState;
use async_trait::async_trait;
use intents::{DestinationMetadata, IntentDescriptor, ServerParameter, SignedActions};
use keytree::{PublicKey, Signature};
use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, ServiceError};

/// Issues per-action parameters: nonces, blockhashes and treasury or fee details.
#[async_trait]
pub trait ParameterService: Send + Sync {
    /// Returns one parameter per action of the described intent, in order.
    async fn request_parameters(
        &self,
        intent: &IntentDescriptor,
    ) -> Result<Vec<ServerParameter>, ServiceError>;
}

/// What gets submitted for an intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Submission {
    /// Authority signatures over the server-parameterized transactions, in action order.
    Signatures {
        /// Intent the signatures belong to.
        intent_id: PublicKey,
        /// Signatures in action order.
        signatures: Vec<Signature>,
    },
    /// Action list signed by the tray owner.
    Actions(SignedActions),
}

impl Submission {
    /// Intent the submission belongs to.
    pub fn intent_id(&self) -> PublicKey {
        match self {
            Submission::Signatures { intent_id, .. } => *intent_id,
            Submission::Actions(signed) => signed.descriptor.intent_id,
        }
    }
}

/// Server-side progress of a submitted intent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentStatus {
    /// Not yet settled.
    Pending,
    /// Every action landed.
    Confirmed,
    /// The intent was rejected or one of its actions failed.
    Failed,
}

/// Accepts intents and reports their progress.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    /// Hands over an intent. A rejection is reported as `ServiceError::Rejected`.
    async fn submit(&self, submission: Submission) -> Result<(), ServiceError>;

    /// Current status of a submitted intent.
    async fn status(&self, intent_id: &PublicKey) -> Result<IntentStatus, ServiceError>;
}

/// Describes external destinations before withdrawing to them.
#[async_trait]
pub trait DestinationMetadataService: Send + Sync {
    /// Whether `destination` can receive funds and what it costs to initialize it.
    async fn destination_metadata(&self, destination: &PublicKey) -> Result<DestinationMetadata, ServiceError>;
}

/// Loads and stores the persisted tray.
#[async_trait]
pub trait TrayStore: Send + Sync {
    /// Last committed state, if any.
    async fn load(&self) -> Result<Option<TrayState>, ClientError>;

    /// Replaces the committed state.
    async fn store(&self, state: &TrayState) -> Result<(), ClientError>;
}

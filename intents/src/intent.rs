use core::fmt;

use accounts::Tray;
use keytree::{KeyPair, PublicKey, Signature};
use ledger::Transaction;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::action::{ActionDescriptor, ActionGroup};
use crate::errors::IntentError;
use crate::metadata::Metadata;
use crate::parameter::ServerParameter;

/// Lifecycle of an intent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentState {
    /// Actions are built; nothing was sent.
    Built,
    /// The action list was handed to the server.
    ParametersRequested,
    /// Every action carries its server parameter.
    ParametersApplied,
    /// Signatures are ready for submission.
    Signed,
    /// The server accepted the submission.
    Submitted,
    /// The ledger confirmed every action.
    Finalized,
    /// The server or the ledger rejected the intent.
    Failed,
}

impl IntentState {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, IntentState::Finalized | IntentState::Failed)
    }
}

/// Public view of an intent, sent when requesting parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentDescriptor {
    /// Single-use identifier of the intent.
    pub intent_id: PublicKey,
    /// What the intent does.
    pub metadata: Metadata,
    /// Actions in order.
    pub actions: Vec<ActionDescriptor>,
}

impl IntentDescriptor {
    /// Canonical bytes the owner signs.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IntentError> {
        serde_json::to_vec(self).map_err(|e| IntentError::Serialization(e.to_string()))
    }
}

/// Action list signed by the tray owner, submitted without server parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedActions {
    /// Signed content.
    pub descriptor: IntentDescriptor,
    /// Owner's primary authority.
    pub owner: PublicKey,
    /// Owner's signature over `descriptor.to_bytes()`.
    pub signature: Signature,
}

impl SignedActions {
    /// Checks the owner signature.
    pub fn verify(&self) -> Result<(), IntentError> {
        let bytes = self.descriptor.to_bytes()?;
        self.owner
            .verify(&bytes, &self.signature)
            .map_err(|e| IntentError::LedgerError(e.into()))
    }
}

/// An atomic payment operation: an ordered action list, the tray it leaves
/// behind once confirmed, and its progress through submission.
pub struct Intent {
    id: KeyPair,
    metadata: Metadata,
    actions: ActionGroup,
    result_tray: Tray,
    state: IntentState,
}

impl Intent {
    /// Wraps built actions into a fresh intent with a random single-use id.
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        metadata: Metadata,
        actions: ActionGroup,
        result_tray: Tray,
    ) -> Self {
        let id = KeyPair::generate(rng);
        debug!(intent = %id.public_key(), actions = actions.len(), ?metadata, "intent built");
        Intent {
            id,
            metadata,
            actions,
            result_tray,
            state: IntentState::Built,
        }
    }

    /// Single-use identifier.
    pub fn id(&self) -> PublicKey {
        self.id.public_key()
    }

    /// Key pair behind the identifier, used to authenticate calls about this intent.
    pub fn id_keypair(&self) -> &KeyPair {
        &self.id
    }

    /// What the intent does.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Actions in order.
    pub fn actions(&self) -> &ActionGroup {
        &self.actions
    }

    /// Current state.
    pub fn state(&self) -> IntentState {
        self.state
    }

    /// Tray as it will look once the intent is finalized.
    pub fn result_tray(&self) -> &Tray {
        &self.result_tray
    }

    /// Public description of the intent.
    pub fn descriptor(&self) -> IntentDescriptor {
        IntentDescriptor {
            intent_id: self.id(),
            metadata: self.metadata.clone(),
            actions: self.actions.actions().iter().map(|a| a.descriptor()).collect(),
        }
    }

    /// Hands out the descriptor the server issues parameters for.
    pub fn request_parameters(&mut self) -> Result<IntentDescriptor, IntentError> {
        self.transition(IntentState::Built, IntentState::ParametersRequested)?;
        Ok(self.descriptor())
    }

    /// Binds one server parameter to each action, in order.
    /// Nothing is bound unless every parameter matches its action.
    pub fn apply_parameters(&mut self, parameters: Vec<ServerParameter>) -> Result<(), IntentError> {
        self.ensure_state(IntentState::ParametersRequested)?;
        if parameters.len() != self.actions.len() {
            return Err(IntentError::InvalidParameterCount {
                expected: self.actions.len(),
                actual: parameters.len(),
            });
        }
        for (action, parameter) in self.actions.actions().iter().zip(&parameters) {
            if !action.accepts(parameter) {
                return Err(IntentError::ActionParameterMismatch(action.id));
            }
        }
        for (action, parameter) in self.actions.actions_mut().iter_mut().zip(parameters) {
            action.parameter = Some(parameter);
        }
        self.transition(IntentState::ParametersRequested, IntentState::ParametersApplied)
    }

    /// Unsigned transactions of all actions, in order.
    pub fn transactions(&self) -> Result<Vec<Transaction>, IntentError> {
        let env = self.result_tray.env();
        let id = self.id();
        let mut txs = Vec::new();
        for action in self.actions.actions() {
            txs.extend(action.transactions(env, &id)?);
        }
        Ok(txs)
    }

    /// Signs every transaction with its action's authority and returns the
    /// signatures in action order. Open-account actions contribute none.
    pub fn sign(&mut self) -> Result<Vec<Signature>, IntentError> {
        self.ensure_state(IntentState::ParametersApplied)?;
        let env = self.result_tray.env();
        let id = self.id();
        let mut signatures = Vec::new();
        for action in self.actions.actions() {
            signatures.extend(action.sign(env, &id)?);
        }
        self.transition(IntentState::ParametersApplied, IntentState::Signed)?;
        Ok(signatures)
    }

    /// Signs the action list and metadata with the tray owner's key, for
    /// submissions that skip server parameters.
    pub fn sign_actions(&mut self) -> Result<SignedActions, IntentError> {
        self.ensure_state(IntentState::Built)?;
        let descriptor = self.descriptor();
        let owner = self.result_tray.owner().cluster.authority();
        let signature = owner.sign(&descriptor.to_bytes()?);
        let signed = SignedActions {
            descriptor,
            owner: owner.public_key(),
            signature,
        };
        self.transition(IntentState::Built, IntentState::Signed)?;
        Ok(signed)
    }

    /// Records that the server accepted the submission.
    pub fn mark_submitted(&mut self) -> Result<(), IntentError> {
        self.transition(IntentState::Signed, IntentState::Submitted)
    }

    /// Records that the ledger confirmed the intent.
    pub fn finalize(&mut self) -> Result<(), IntentError> {
        self.transition(IntentState::Submitted, IntentState::Finalized)
    }

    /// Records a rejection. Allowed from any non-terminal state.
    pub fn fail(&mut self) -> Result<(), IntentError> {
        if self.state.is_terminal() {
            return Err(IntentError::InvalidState {
                expected: IntentState::Submitted,
                actual: self.state,
            });
        }
        info!(intent = %self.id(), from = ?self.state, "intent failed");
        self.state = IntentState::Failed;
        Ok(())
    }

    /// Resulting tray, available once the intent is finalized.
    pub fn committed_tray(&self) -> Result<&Tray, IntentError> {
        self.ensure_state(IntentState::Finalized)?;
        Ok(&self.result_tray)
    }

    /// Consumes a finalized intent and returns its resulting tray.
    pub fn into_committed_tray(self) -> Result<Tray, IntentError> {
        self.ensure_state(IntentState::Finalized)?;
        Ok(self.result_tray)
    }

    fn ensure_state(&self, expected: IntentState) -> Result<(), IntentError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(IntentError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }

    fn transition(&mut self, from: IntentState, to: IntentState) -> Result<(), IntentError> {
        self.ensure_state(from)?;
        info!(intent = %self.id(), ?from, ?to, "intent transition");
        self.state = to;
        Ok(())
    }
}

impl fmt::Debug for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intent")
            .field("id", &self.id())
            .field("metadata", &self.metadata)
            .field("actions", &self.actions)
            .field("state", &self.state)
            .finish()
    }
}

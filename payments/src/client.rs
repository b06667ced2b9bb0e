use accounts::{Role, Tray, TrayState};
use intents::{Intent, IntentState};
use keytree::{PublicKey, Signature, Xprv};
use ledger::Environment;
use rand::{CryptoRng, RngCore};
use tracing::{debug, info, warn};

use crate::config::PollConfig;
use crate::errors::ClientError;
use crate::poll::poll_until;
use crate::services::{
    DestinationMetadataService, IntentStatus, ParameterService, SubmissionService, Submission, TrayStore,
};

/// Drives intents from construction to a committed tray.
///
/// The client owns the master key and the services it talks to. It loads the
/// committed tray, hands it to intent constructors, runs the resulting intent
/// through parameter issuance, signing, submission and confirmation, and
/// stores the intent's tray once the ledger confirms it.
pub struct Client<P, S, D, T> {
    root: Xprv,
    env: Environment,
    poll: PollConfig,
    parameters: P,
    submission: S,
    destinations: D,
    store: T,
}

impl<P, S, D, T> Client<P, S, D, T>
where
    P: ParameterService,
    S: SubmissionService,
    D: DestinationMetadataService,
    T: TrayStore,
{
    /// Creates a client.
    pub fn new(
        root: Xprv,
        env: Environment,
        poll: PollConfig,
        parameters: P,
        submission: S,
        destinations: D,
        store: T,
    ) -> Self {
        Client {
            root,
            env,
            poll,
            parameters,
            submission,
            destinations,
            store,
        }
    }

    /// Service intents are submitted to.
    pub fn submission_service(&self) -> &S {
        &self.submission
    }

    /// Where committed trays are persisted.
    pub fn store(&self) -> &T {
        &self.store
    }

    /// The committed tray. A wallet without stored state starts empty at index zero.
    pub async fn tray(&self) -> Result<Tray, ClientError> {
        let state = self.store.load().await?.unwrap_or_else(TrayState::default);
        Ok(Tray::restore(self.root.clone(), self.env.clone(), &state)?)
    }

    /// Runs `intent` through the parameter protocol and commits its tray once confirmed.
    pub async fn execute(&self, mut intent: Intent) -> Result<Tray, ClientError> {
        let id = intent.id();
        let signatures = self.prepare(&mut intent).await?;
        self.submit_and_commit(
            intent,
            Submission::Signatures {
                intent_id: id,
                signatures,
            },
        )
        .await
    }

    /// Requests parameters for `intent`, applies them and signs every action.
    /// On any error the intent is marked failed.
    pub async fn prepare(&self, intent: &mut Intent) -> Result<Vec<Signature>, ClientError> {
        let descriptor = match intent.request_parameters() {
            Ok(descriptor) => descriptor,
            Err(e) => return Err(abandon(intent, e)),
        };
        info!(intent = %intent.id(), actions = descriptor.actions.len(), "requesting parameters");

        let parameters = match self.parameters.request_parameters(&descriptor).await {
            Ok(parameters) => parameters,
            Err(e) => return Err(abandon(intent, e)),
        };
        if let Err(e) = intent.apply_parameters(parameters) {
            return Err(abandon(intent, e));
        }
        match intent.sign() {
            Ok(signatures) => Ok(signatures),
            Err(e) => Err(abandon(intent, e)),
        }
    }

    /// Submits the owner-signed action list of `intent` and commits its tray once confirmed.
    pub async fn execute_signed_actions(&self, mut intent: Intent) -> Result<Tray, ClientError> {
        let signed = match intent.sign_actions() {
            Ok(signed) => signed,
            Err(e) => return Err(abandon(&mut intent, e)),
        };
        self.submit_and_commit(intent, Submission::Actions(signed)).await
    }

    /// Looks up `destination`, builds a withdrawal from `source` and executes it.
    pub async fn withdraw<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        source: &Role,
        destination: PublicKey,
        amount: u64,
    ) -> Result<Tray, ClientError> {
        let metadata = self.destinations.destination_metadata(&destination).await?;
        let tray = self.tray().await?;
        let intent = intents::withdraw(rng, &tray, source, &metadata, amount)?;
        self.execute(intent).await
    }

    /// Waits until the server settles `intent_id`.
    pub async fn wait_for_confirmation(&self, intent_id: &PublicKey) -> Result<IntentStatus, ClientError> {
        let submission = &self.submission;
        poll_until(&self.poll, move || async move {
            submission
                .status(intent_id)
                .await
                .map(|status| match status {
                    IntentStatus::Pending => None,
                    settled => Some(settled),
                })
        })
        .await
    }

    async fn submit_and_commit(&self, mut intent: Intent, submission: Submission) -> Result<Tray, ClientError> {
        let id = intent.id();
        if let Err(e) = self.submission.submit(submission).await {
            return Err(abandon(&mut intent, e));
        }
        intent.mark_submitted()?;
        info!(intent = %id, "submitted");

        match self.wait_for_confirmation(&id).await? {
            IntentStatus::Confirmed => intent.finalize()?,
            _ => {
                intent.fail()?;
                return Err(ClientError::IntentFailed(id));
            }
        }

        let tray = intent.into_committed_tray()?;
        self.store.store(&tray.state()).await?;
        info!(intent = %id, balance = tray.total_balance(), "committed");
        Ok(tray)
    }
}

/// Marks `intent` failed and returns `error`.
fn abandon(intent: &mut Intent, error: impl Into<ClientError>) -> ClientError {
    let error = error.into();
    warn!(intent = %intent.id(), %error, "abandoning intent");
    if intent.state() != IntentState::Failed && intent.fail().is_err() {
        debug!(intent = %intent.id(), state = ?intent.state(), "intent already settled");
    }
    error
}

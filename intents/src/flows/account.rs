use accounts::{Denomination, Role, Tray};
use rand::{CryptoRng, RngCore};

use crate::builder::IntentBuilder;
use crate::errors::IntentError;
use crate::intent::Intent;
use crate::metadata::Metadata;

/// Opens every account of a new tray. All accounts except the primary one
/// sweep back into the primary vault once they go dormant.
pub fn create_account<R: RngCore + CryptoRng>(rng: &mut R, tray: &Tray) -> Result<Intent, IntentError> {
    let mut builder = IntentBuilder::new(tray);
    let primary = builder.cluster(&Role::Primary)?;
    builder.open(primary);

    let roles = vec![Role::Incoming, Role::Outgoing]
        .into_iter()
        .chain(Denomination::ALL.iter().map(|d| Role::Bucket(*d)));
    for role in roles {
        let cluster = builder.cluster(&role)?;
        builder.open(cluster.clone());
        builder.close_dormant(cluster);
    }

    Ok(builder.finish(rng, Metadata::OpenAccounts))
}

/// Opens the relationship account for `domain`, deriving it on first use.
pub fn open_relationship<R: RngCore + CryptoRng>(
    rng: &mut R,
    tray: &Tray,
    domain: &str,
) -> Result<Intent, IntentError> {
    let mut builder = IntentBuilder::new(tray);
    let cluster = builder.tray_mut().add_relationship(domain)?.clone();
    builder.open(cluster);
    Ok(builder.finish(rng, Metadata::OpenAccounts))
}

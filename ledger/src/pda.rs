//! Program-derived addresses: keys owned by a program, deliberately off the
//! ed25519 curve so that no private key can sign for them.

use curve25519_dalek::edwards::CompressedEdwardsY;
use keytree::PublicKey;

use crate::errors::LedgerError;
use crate::hash::Hash;

/// Maximum number of seeds.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed.
pub const MAX_SEED_LENGTH: usize = 32;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Hashes `seeds` with the program id and fails if the result is a curve point.
pub fn create_program_address(seeds: &[&[u8]], program: &PublicKey) -> Result<PublicKey, LedgerError> {
    if seeds.len() > MAX_SEEDS || seeds.iter().any(|s| s.len() > MAX_SEED_LENGTH) {
        return Err(LedgerError::MaxSeedLengthExceeded);
    }
    let hash = Hash::digest(
        seeds
            .iter()
            .copied()
            .chain(Some(&program.as_bytes()[..]))
            .chain(Some(PDA_MARKER)),
    );
    if CompressedEdwardsY(hash.0).decompress().is_some() {
        return Err(LedgerError::InvalidSeeds);
    }
    Ok(PublicKey(hash.0))
}

/// Searches bump seeds from 255 downwards and returns the first off-curve
/// address together with its bump.
pub fn find_program_address(seeds: &[&[u8]], program: &PublicKey) -> Result<(PublicKey, u8), LedgerError> {
    for bump in (0..=u8::max_value()).rev() {
        let bump_seed = [bump];
        let with_bump: Vec<&[u8]> = seeds.iter().copied().chain(Some(&bump_seed[..])).collect();
        match create_program_address(&with_bump, program) {
            Ok(address) => return Ok((address, bump)),
            Err(LedgerError::InvalidSeeds) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(LedgerError::NoViableBump)
}

//! Well-known program ids and instruction builders for the programs
//! the payment flows call.

use keytree::PublicKey;

pub mod memo;
pub mod system;
pub mod timelock;

/// The system program.
pub const SYSTEM_PROGRAM: PublicKey = PublicKey([0u8; 32]);

/// The memo program.
pub const MEMO_PROGRAM: PublicKey = PublicKey([
    5, 74, 83, 80, 248, 93, 200, 130, 214, 20, 165, 86, 114, 120, 138, 41, 109, 223, 30, 171, 171,
    208, 166, 6, 120, 136, 73, 50, 244, 238, 246, 160,
]);

/// The token program.
pub const TOKEN_PROGRAM: PublicKey = PublicKey([
    6, 221, 246, 225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172, 28, 180, 133,
    237, 95, 91, 55, 145, 58, 140, 245, 133, 126, 255, 0, 169,
]);

/// The time-lock program that owns every vault.
pub const TIMELOCK_PROGRAM: PublicKey = PublicKey([
    13, 63, 217, 175, 77, 139, 63, 48, 250, 197, 190, 77, 127, 108, 120, 249, 29, 39, 239, 5, 137,
    200, 160, 31, 106, 30, 128, 200, 9, 86, 92, 87,
]);

/// The recent blockhashes sysvar read by nonce advances.
pub const RECENT_BLOCKHASHES_SYSVAR: PublicKey = PublicKey([
    6, 167, 213, 23, 25, 44, 86, 142, 224, 138, 132, 95, 115, 210, 151, 136, 207, 3, 92, 49, 69,
    178, 26, 179, 68, 216, 6, 46, 169, 64, 0, 0,
]);

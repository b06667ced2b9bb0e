use super::*;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

#[test]
fn random_xprv_test() {
    let seed = [0u8; 32];
    let mut rng = ChaChaRng::from_seed(seed);
    let xprv = Xprv::random(&mut rng);

    // the following are hard-coded based on the previous seed
    assert_eq!(
        hex::encode(&xprv.dk),
        "9f07e7be5551387a98ba977c732d080dcb0f29a048e3656912c6533e32ee7aed"
    );
    assert_eq!(
        hex::encode(xprv.scalar.as_bytes()),
        "4a53c3fbbc59970ee5f85af813875dffc13a904a2e53ae7e65fa0dea6e62c901"
    );
}

#[test]
fn xprv_bytes_roundtrip() {
    let xprv = Xprv::random(ChaChaRng::from_seed([1u8; 32]));
    let restored = Xprv::from_bytes(&xprv.to_bytes()).unwrap();
    assert_eq!(restored.public_key(), xprv.public_key());
    assert_eq!(restored.dk, xprv.dk);

    assert_eq!(Xprv::from_bytes(&[0u8; 63]).err(), Some(KeyError::InvalidEncoding));
    assert_eq!(Xprv::from_bytes(&[0xffu8; 64]).err(), Some(KeyError::InvalidSecret));
}

#[test]
fn seed_expansion_is_deterministic() {
    let a = Xprv::from_seed(&[7u8; 32]);
    let b = Xprv::from_seed(&[7u8; 32]);
    let c = Xprv::from_seed(&[8u8; 32]);
    assert_eq!(a.to_bytes()[..], b.to_bytes()[..]);
    assert_ne!(a.public_key(), c.public_key());
}

#[test]
fn derivation_is_pure_and_separated() {
    let root = Xprv::from_seed(&[3u8; 32]);

    let derive = |role: &'static [u8], index: u64| {
        root.derive_intermediate_key(|t| t.append_message(b"role", role))
            .derive_key(|t| t.append_u64(b"index", index))
    };

    assert_eq!(derive(b"incoming", 0), derive(b"incoming", 0));
    assert_ne!(derive(b"incoming", 0), derive(b"incoming", 1));
    assert_ne!(derive(b"incoming", 0), derive(b"outgoing", 0));

    // leaf and intermediate derivations never collide
    let intermediate = root.derive_intermediate_key(|t| t.append_u64(b"index", 0));
    let leaf = root.derive_key(|t| t.append_u64(b"index", 0));
    assert_ne!(intermediate.public_key(), leaf.public_key());
}

#[test]
fn sign_and_verify_message() {
    let keypair = KeyPair::from_secret(Scalar::from(1u64));
    let sig = keypair.sign(b"example message");

    assert!(keypair.public_key().verify(b"example message", &sig).is_ok());
    assert_eq!(
        keypair.public_key().verify(b"other message", &sig),
        Err(KeyError::InvalidSignature)
    );

    let other = KeyPair::from_secret(Scalar::from(2u64));
    assert_eq!(
        other.public_key().verify(b"example message", &sig),
        Err(KeyError::InvalidSignature)
    );
}

#[test]
fn signing_is_deterministic() {
    let keypair = KeyPair::generate(&mut ChaChaRng::from_seed([5u8; 32]));
    let a = keypair.sign(b"message");
    let b = keypair.sign(b"message");
    assert_eq!(a, b);
    assert_ne!(a, keypair.sign(b"message 2"));
    assert!(!a.is_empty());
    assert!(Signature::default().is_empty());
}

#[test]
fn verify_rejects_non_curve_key() {
    let keypair = KeyPair::from_secret(Scalar::from(9u64));
    let sig = keypair.sign(b"m");
    // 0xff..ff is not a valid Ristretto encoding
    let address = PublicKey([0xffu8; 32]);
    assert_eq!(address.verify(b"m", &sig), Err(KeyError::InvalidPublicKey));
}

#[test]
fn keypair_bytes_roundtrip() {
    let keypair = KeyPair::generate(&mut ChaChaRng::from_seed([6u8; 32]));
    let restored = KeyPair::from_bytes(&keypair.to_bytes()).unwrap();
    assert_eq!(restored, keypair);
    assert_eq!(KeyPair::from_bytes(&[1u8; 31]).err(), Some(KeyError::InvalidEncoding));
}

#[test]
fn public_key_base58() {
    let zero = PublicKey::default();
    assert_eq!(zero.to_string(), "11111111111111111111111111111111");
    assert_eq!("11111111111111111111111111111111".parse::<PublicKey>(), Ok(zero));

    let key = Xprv::from_seed(&[1u8; 32]).public_key();
    assert_eq!(key.to_base58().parse::<PublicKey>(), Ok(key));
    assert_eq!("0OIl".parse::<PublicKey>(), Err(KeyError::InvalidEncoding));
    assert_eq!("2".parse::<PublicKey>(), Err(KeyError::InvalidEncoding));
}

#[test]
fn public_key_serde() {
    let key = Xprv::from_seed(&[2u8; 32]).public_key();
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, format!("\"{}\"", key.to_base58()));
    let back: PublicKey = serde_json::from_str(&json).unwrap();
    assert_eq!(back, key);

    let keypair = KeyPair::from_secret(Scalar::from(3u64));
    let sig = keypair.sign(b"serde");
    let json = serde_json::to_string(&sig).unwrap();
    let back: Signature = serde_json::from_str(&json).unwrap();
    assert_eq!(back, sig);
}

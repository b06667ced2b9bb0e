use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use accounts::TrayState;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use tokio::time::Instant;

use super::*;

#[test]
fn poll_delay_grows_every_ten_attempts() {
    let poll = PollConfig::default();
    assert_eq!(poll.delay_for(0), Duration::from_millis(0));
    assert_eq!(poll.delay_for(9), Duration::from_millis(0));
    assert_eq!(poll.delay_for(10), Duration::from_millis(50));
    assert_eq!(poll.delay_for(25), Duration::from_millis(100));
    assert_eq!(poll.delay_for(49), Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn poll_gives_up_after_max_attempts() {
    let calls = AtomicUsize::new(0);
    let start = Instant::now();
    let result: Result<(), ClientError> = poll_until(&PollConfig::default(), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(None) }
    })
    .await;

    match result {
        Err(ClientError::PollLimitReached { attempts }) => assert_eq!(attempts, 50),
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 50);
    // ten attempts at each of 0, 50, 100, 150 and 200 ms
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(5), "{:?}", elapsed);
    assert!(elapsed < Duration::from_secs(6), "{:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn poll_swallows_errors() {
    let calls = AtomicUsize::new(0);
    let result = poll_until(&PollConfig::default(), || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if n < 3 {
                Err(ServiceError::Unavailable("connection reset".into()))
            } else {
                Ok(Some(n))
            }
        }
    })
    .await;
    assert_eq!(result.unwrap(), 3);
}

#[test]
fn config_fills_in_defaults() {
    let config: Config = toml::from_str(
        r#"
        [poll]
        max_attempts = 5

        [ledger]
        lock_duration = 7
        "#,
    )
    .unwrap();
    assert_eq!(config.poll.max_attempts, 5);
    assert_eq!(config.poll.base_delay_ms, 50);
    assert_eq!(config.ledger.lock_duration, 7);
    assert_eq!(config.ledger.mint, ledger::Environment::default_mint());
    assert_eq!(config.log, LogConfig::default());
    assert_eq!(config.wallet, WalletConfig::default());

    let empty: Config = toml::from_str("").unwrap();
    assert_eq!(empty, Config::default());
}

#[test]
fn config_roundtrips_through_toml() {
    let config = Config::default();
    let text = config.to_toml().unwrap();
    assert!(text.contains("[ledger]"));
    let back: Config = toml::from_str(&text).unwrap();
    assert_eq!(back, config);
    assert!(Config::documentation().contains("max_attempts"));
}

#[test]
fn config_load_reports_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cascade.toml");
    assert!(matches!(Config::load(&path), Err(ClientError::Config(_))));

    std::fs::write(&path, "[poll]\nmax_attempts = \"many\"\n").unwrap();
    assert!(matches!(Config::load(&path), Err(ClientError::Config(_))));
}

#[tokio::test]
async fn memory_store_keeps_the_last_state() {
    let store = MemoryStore::default();
    assert_eq!(store.load().await.unwrap(), None);

    let state = TrayState {
        owner: 12,
        ..TrayState::default()
    };
    store.store(&state).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(state));
}

#[tokio::test]
async fn json_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wallet").join("tray.json");
    let store = JsonFileStore::new(&path);
    assert_eq!(store.load().await.unwrap(), None);

    let mut state = TrayState {
        owner: 1_000,
        buckets: [1, 10, 0, 0, 0, 0, 0],
        ..TrayState::default()
    };
    state.outgoing.index = 3;
    state.relationships.insert("example.com".into(), 40);
    store.store(&state).await.unwrap();

    let reopened = JsonFileStore::new(&path);
    assert_eq!(reopened.load().await.unwrap(), Some(state));
    assert!(!path.with_extension("tmp").exists());

    std::fs::write(&path, "{").unwrap();
    assert!(matches!(reopened.load().await, Err(ClientError::Serialization(_))));
}

#[tokio::test]
async fn seed_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seed.hex");
    let mut rng = ChaChaRng::from_seed([1u8; 32]);

    let created = create_seed(&mut rng, &path).await.unwrap();
    let loaded = load_seed(&path).await.unwrap();
    assert_eq!(created.public_key(), loaded.public_key());
    assert!(matches!(create_seed(&mut rng, &path).await, Err(ClientError::Io(_))));

    std::fs::write(&path, "abcd").unwrap();
    assert!(matches!(load_seed(&path).await, Err(ClientError::InvalidSeed)));
    std::fs::write(&path, "not hex").unwrap();
    assert!(matches!(load_seed(&path).await, Err(ClientError::InvalidSeed)));
}

#[tokio::test]
async fn open_wallet_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let seed = dir.path().join("seed.hex");
    let mut rng = ChaChaRng::from_seed([2u8; 32]);
    let root = create_seed(&mut rng, &seed).await.unwrap();

    let env = ledger::Environment::default();
    let store = MemoryStore::default();
    let tray = open_wallet(&seed, &store, &env).await.unwrap();
    assert_eq!(tray.total_balance(), 0);
    assert_eq!(tray.owner().cluster.authority_key(), accounts::Tray::new(root, env).unwrap().owner().cluster.authority_key());
}

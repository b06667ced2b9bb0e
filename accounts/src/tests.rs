use keytree::Xprv;
use ledger::Environment;
use proptest::prelude::*;

use super::*;

fn root() -> Xprv {
    Xprv::from_seed(&[9u8; 32])
}

fn tray_with(state: TrayState) -> Tray {
    Tray::restore(root(), Environment::default(), &state).unwrap()
}

fn buckets(tray: &Tray) -> Vec<u64> {
    tray.slots().iter().map(|s| s.account.partial_balance).collect()
}

fn bucket(d: Denomination) -> Role {
    Role::Bucket(d)
}

fn exchange(from: Role, to: Role, amount: u64) -> InternalExchange {
    InternalExchange { from, to, amount }
}

#[test]
fn denominations() {
    let values: Vec<_> = Denomination::ALL.iter().map(|d| d.value()).collect();
    assert_eq!(values, vec![1, 10, 100, 1_000, 10_000, 100_000, 1_000_000]);
    assert_eq!(Denomination::covering(1), Denomination::One);
    assert_eq!(Denomination::covering(11), Denomination::Hundred);
    assert_eq!(Denomination::covering(5_000_000), Denomination::Million);
}

#[test]
fn bill_splitting() {
    assert_eq!(split_bills(250, 10), vec![90, 90, 70]);
    assert_eq!(split_bills(9, 10), Vec::<u64>::new());
    assert_eq!(split_largest(1_230), vec![1_000, 200, 30]);
    assert_eq!(split_largest(100), vec![100]);
    assert_eq!(split_largest(12_000_000), vec![9_000_000, 3_000_000]);
}

#[test]
fn derivation_is_deterministic_per_role_and_index() {
    let env = Environment::default();
    let a = AccountCluster::derive(&root(), Role::Incoming, 3, &env).unwrap();
    let b = AccountCluster::derive(&root(), Role::Incoming, 3, &env).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.vault(), b.vault());

    let next = AccountCluster::derive(&root(), Role::Incoming, 4, &env).unwrap();
    let outgoing = AccountCluster::derive(&root(), Role::Outgoing, 3, &env).unwrap();
    let ten = AccountCluster::derive(&root(), bucket(Denomination::Ten), 0, &env).unwrap();
    let hundred = AccountCluster::derive(&root(), bucket(Denomination::Hundred), 0, &env).unwrap();
    assert_ne!(a.authority_key(), next.authority_key());
    assert_ne!(a.authority_key(), outgoing.authority_key());
    assert_ne!(ten.authority_key(), hundred.authority_key());
    assert_ne!(ten.vault(), hundred.vault());

    let card = AccountCluster::gift_card(&[4u8; 32], &env).unwrap();
    assert_eq!(card, AccountCluster::gift_card(&[4u8; 32], &env).unwrap());
    assert_eq!(card.role, Role::GiftCard);
}

#[test]
fn deposit_of_a_million_cascades_down() {
    let mut tray = tray_with(TrayState {
        owner: 1_000_000,
        ..TrayState::default()
    });

    let received = tray.receive(&Role::Primary, 1_000_000).unwrap();
    assert_eq!(
        received,
        vec![exchange(Role::Primary, bucket(Denomination::Million), 1_000_000)]
    );

    let exchanges = tray.redistribute().unwrap();
    let amounts: Vec<_> = exchanges.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![1_000_000, 100_000, 10_000, 1_000, 100, 10]);
    assert!(exchanges.iter().all(|e| e.is_bucket_exchange()));
    assert_eq!(
        exchanges[0],
        exchange(
            bucket(Denomination::Million),
            bucket(Denomination::HundredThousand),
            1_000_000
        )
    );

    assert_eq!(
        buckets(&tray),
        vec![10, 90, 900, 9_000, 90_000, 900_000, 0]
    );
    assert_eq!(tray.owner().partial_balance, 0);
}

#[test]
fn power_of_ten_deposits_take_one_action_per_level() {
    for (entry, d) in Denomination::ALL.iter().enumerate() {
        let amount = d.value();
        let mut tray = tray_with(TrayState {
            owner: amount,
            ..TrayState::default()
        });
        let mut actions = tray.receive(&Role::Primary, amount).unwrap();
        actions.extend(tray.redistribute().unwrap());
        assert_eq!(actions.len(), entry + 1, "deposit of {}", amount);
        assert_eq!(tray.slots_balance(), amount);
    }
}

#[test]
fn transfer_breaks_a_million_for_half() {
    let mut tray = tray_with(TrayState {
        buckets: [0, 0, 0, 0, 0, 0, 1_000_000],
        ..TrayState::default()
    });

    let moves = tray.transfer(500_000).unwrap();
    assert_eq!(
        moves,
        vec![
            exchange(
                bucket(Denomination::Million),
                bucket(Denomination::HundredThousand),
                1_000_000
            ),
            exchange(
                bucket(Denomination::HundredThousand),
                bucket(Denomination::TenThousand),
                100_000
            ),
            exchange(bucket(Denomination::HundredThousand), Role::Outgoing, 500_000),
            exchange(
                bucket(Denomination::TenThousand),
                bucket(Denomination::Thousand),
                10_000
            ),
            exchange(bucket(Denomination::Thousand), bucket(Denomination::Hundred), 1_000),
            exchange(bucket(Denomination::Hundred), bucket(Denomination::Ten), 100),
            exchange(bucket(Denomination::Ten), bucket(Denomination::One), 10),
        ]
    );
    assert_eq!(tray.outgoing().partial_balance, 500_000);

    tray.debit(&Role::Outgoing, 500_000).unwrap();
    assert!(tray.redistribute().unwrap().is_empty());
    assert_eq!(
        buckets(&tray),
        vec![10, 90, 900, 9_000, 90_000, 400_000, 0]
    );
}

#[test]
fn transfer_prefers_whole_bills() {
    let mut tray = tray_with(TrayState {
        buckets: [5, 30, 200, 0, 0, 0, 0],
        ..TrayState::default()
    });
    let moves = tray.transfer(125).unwrap();
    assert_eq!(
        moves,
        vec![
            exchange(bucket(Denomination::Hundred), Role::Outgoing, 100),
            exchange(bucket(Denomination::Ten), Role::Outgoing, 20),
            exchange(bucket(Denomination::One), Role::Outgoing, 5),
        ]
    );
    assert_eq!(buckets(&tray), vec![0, 10, 100, 0, 0, 0, 0]);
}

#[test]
fn transfer_preconditions() {
    let mut tray = tray_with(TrayState {
        buckets: [5, 0, 0, 0, 0, 0, 0],
        ..TrayState::default()
    });
    assert_eq!(tray.transfer(0), Err(TrayError::InvalidAmount));
    assert_eq!(
        tray.transfer(6),
        Err(TrayError::InsufficientTrayBalance {
            available: 5,
            requested: 6
        })
    );
    assert_eq!(buckets(&tray), vec![5, 0, 0, 0, 0, 0, 0]);
    assert_eq!(
        tray.receive(&Role::Incoming, 1),
        Err(TrayError::InsufficientBalance(Role::Incoming))
    );
    assert_eq!(
        tray.receive(&Role::Relationship("example.com".into()), 1),
        Err(TrayError::UnknownAccount(Role::Relationship("example.com".into())))
    );
}

#[test]
fn consolidation_leaves_nine_bills() {
    let mut tray = tray_with(TrayState {
        buckets: [25, 0, 0, 0, 0, 0, 0],
        ..TrayState::default()
    });
    let exchanges = tray.redistribute().unwrap();
    assert_eq!(
        exchanges,
        vec![exchange(bucket(Denomination::One), bucket(Denomination::Ten), 10)]
    );
    assert_eq!(buckets(&tray), vec![15, 10, 0, 0, 0, 0, 0]);
}

#[test]
fn rotation_moves_to_the_next_index() {
    let mut tray = tray_with(TrayState::default());
    let before = tray.outgoing().cluster.clone();
    let previous = tray.rotate_outgoing().unwrap();
    assert_eq!(previous, before);
    assert_eq!(tray.outgoing().cluster.index, 1);
    assert_ne!(tray.outgoing().cluster.vault(), before.vault());

    tray.rotate_incoming().unwrap();
    tray.rotate_incoming().unwrap();
    assert_eq!(tray.state().incoming.index, 2);
    assert_eq!(tray.state().outgoing.index, 1);
}

#[test]
fn rotation_past_the_last_index_fails() {
    let mut tray = tray_with(TrayState {
        incoming: RotatingState {
            index: u64::MAX,
            balance: 0,
        },
        outgoing: RotatingState {
            index: u64::MAX,
            balance: 0,
        },
        ..TrayState::default()
    });
    assert_eq!(
        tray.rotate_outgoing().err(),
        Some(TrayError::IndexExhausted(Role::Outgoing))
    );
    assert_eq!(
        tray.rotate_incoming().err(),
        Some(TrayError::IndexExhausted(Role::Incoming))
    );
    assert_eq!(tray.outgoing().cluster.index, u64::MAX);
}

#[test]
fn restore_rejects_corrupted_balances() {
    let restore = |state: TrayState| Tray::restore(root(), Environment::default(), &state).err();

    assert_eq!(
        restore(TrayState {
            buckets: [u64::MAX, 10, 0, 0, 0, 0, 0],
            ..TrayState::default()
        }),
        Some(TrayError::BalanceOverflow)
    );
    assert_eq!(
        restore(TrayState {
            owner: u64::MAX,
            buckets: [1, 0, 0, 0, 0, 0, 0],
            ..TrayState::default()
        }),
        Some(TrayError::BalanceOverflow)
    );
    assert_eq!(
        restore(TrayState {
            buckets: [0, 15, 0, 0, 0, 0, 0],
            ..TrayState::default()
        }),
        Some(TrayError::FractionalBill(bucket(Denomination::Ten)))
    );
}

#[test]
fn credit_keeps_the_total_representable() {
    let mut tray = tray_with(TrayState {
        owner: u64::MAX - 10,
        ..TrayState::default()
    });
    assert_eq!(
        tray.credit(&Role::Incoming, 11).err(),
        Some(TrayError::BalanceOverflow)
    );
    tray.credit(&Role::Incoming, 10).unwrap();
    assert_eq!(tray.total_balance(), u64::MAX);
}

#[test]
fn state_roundtrip() {
    let mut tray = tray_with(TrayState {
        owner: 77,
        incoming: RotatingState {
            index: 4,
            balance: 3,
        },
        buckets: [1, 10, 0, 0, 0, 0, 2_000_000],
        ..TrayState::default()
    });
    tray.add_relationship("example.com").unwrap();
    tray.credit(&Role::Relationship("example.com".into()), 50).unwrap();

    let state = tray.state();
    let json = serde_json::to_string(&state).unwrap();
    let restored: TrayState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);

    let again = tray_with(restored);
    assert_eq!(again.incoming().cluster, tray.incoming().cluster);
    assert_eq!(again.total_balance(), 77 + 3 + 11 + 2_000_000 + 50);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn transfer_moves_exactly_the_amount(
        bills in proptest::collection::vec(0u64..25, 7),
        fraction in 1u64..=1_000,
    ) {
        let mut balances = [0u64; 7];
        for (i, b) in bills.iter().enumerate() {
            balances[i] = b * Denomination::ALL[i].value();
        }
        let total: u64 = balances.iter().sum();
        prop_assume!(total > 0);
        let amount = std::cmp::max(1, total * fraction / 1_000);

        let mut tray = tray_with(TrayState { buckets: balances, ..TrayState::default() });
        tray.transfer(amount).unwrap();
        prop_assert_eq!(tray.outgoing().partial_balance, amount);
        prop_assert_eq!(tray.slots_balance(), total - amount);

        tray.redistribute().unwrap();
        prop_assert_eq!(tray.slots_balance(), total - amount);
        for slot in tray.slots() {
            prop_assert_eq!(slot.account.partial_balance % slot.bill(), 0);
        }
    }

    #[test]
    fn deposit_sums_to_the_amount(amount in 1u64..20_000_000) {
        let mut tray = tray_with(TrayState { owner: amount, ..TrayState::default() });
        tray.receive(&Role::Primary, amount).unwrap();
        tray.redistribute().unwrap();
        prop_assert_eq!(tray.slots_balance(), amount);
        prop_assert_eq!(tray.owner().partial_balance, 0);
        for slot in tray.slots() {
            prop_assert_eq!(slot.account.partial_balance % slot.bill(), 0);
        }
    }
}

use accounts::{AccountCluster, Denomination, Role, Tray, TrayError, TrayState};
use keytree::{PublicKey, Xprv};
use ledger::{Environment, Hash, NonceConfig};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use super::*;

fn rng() -> ChaChaRng {
    ChaChaRng::from_seed([0u8; 32])
}

fn tray_with(state: TrayState) -> Tray {
    Tray::restore(Xprv::from_seed(&[9u8; 32]), Environment::default(), &state).unwrap()
}

fn million_in_top_bucket() -> Tray {
    tray_with(TrayState {
        buckets: [0, 0, 0, 0, 0, 0, 1_000_000],
        ..TrayState::default()
    })
}

fn buckets(tray: &Tray) -> Vec<u64> {
    tray.slots().iter().map(|s| s.account.partial_balance).collect()
}

fn types(intent: &Intent) -> Vec<ActionType> {
    intent
        .actions()
        .actions()
        .iter()
        .map(|a| a.kind.action_type())
        .collect()
}

fn destination() -> PublicKey {
    PublicKey([42u8; 32])
}

/// Parameters the server would issue for every action of `intent`.
fn parameters_for(intent: &Intent) -> Vec<ServerParameter> {
    intent
        .actions()
        .actions()
        .iter()
        .map(|action| {
            let kind = match action.kind.action_type() {
                ActionType::TempPrivacyTransfer | ActionType::TempPrivacyExchange => {
                    Some(ParameterKind::TempPrivacy {
                        treasury: PublicKey([7u8; 32]),
                        recent_root: Hash([8u8; 32]),
                    })
                }
                ActionType::CodeFeePayment => Some(ParameterKind::FeePayment {
                    destination: PublicKey([6u8; 32]),
                }),
                _ => None,
            };
            let configs = (0..action.kind.transaction_count())
                .map(|i| NonceConfig {
                    nonce: PublicKey([action.id as u8 + i as u8 + 1; 32]),
                    blockhash: Hash([3u8; 32]),
                })
                .collect();
            ServerParameter {
                action_id: action.id,
                kind,
                configs,
            }
        })
        .collect()
}

#[test]
fn private_transfer_of_half_a_million() {
    let tray = million_in_top_bucket();
    let outgoing = tray.outgoing().cluster.clone();

    let intent = private_transfer(&mut rng(), &tray, destination(), 500_000, 0, &[], false).unwrap();

    assert_eq!(
        types(&intent),
        vec![
            ActionType::TempPrivacyExchange,
            ActionType::TempPrivacyExchange,
            ActionType::TempPrivacyTransfer,
            ActionType::TempPrivacyExchange,
            ActionType::TempPrivacyExchange,
            ActionType::TempPrivacyExchange,
            ActionType::TempPrivacyExchange,
            ActionType::NoPrivacyWithdraw,
            ActionType::OpenAccount,
            ActionType::CloseDormantAccount,
        ]
    );

    let actions = intent.actions().actions();
    assert!(actions.iter().enumerate().all(|(i, a)| a.id == i as u32));
    match &actions[2].kind {
        ActionKind::Transfer(t) => {
            assert_eq!(t.amount, 500_000);
            assert_eq!(t.destination, outgoing.vault());
        }
        other => panic!("unexpected action {:?}", other),
    }
    match &actions[7].kind {
        ActionKind::Withdraw(w) => {
            assert_eq!(w.kind, WithdrawKind::NoPrivacyWithdraw(500_000));
            assert_eq!(w.source, outgoing);
            assert_eq!(w.destination, destination());
        }
        other => panic!("unexpected action {:?}", other),
    }
    match &actions[9].kind {
        ActionKind::Withdraw(w) => {
            assert_eq!(w.kind, WithdrawKind::CloseDormantAccount(Role::Outgoing));
            assert_eq!(w.source, outgoing);
            assert_eq!(w.destination, tray.owner().cluster.vault());
        }
        other => panic!("unexpected action {:?}", other),
    }

    let result = intent.result_tray();
    assert_eq!(buckets(result), vec![10, 90, 900, 9_000, 90_000, 400_000, 0]);
    assert_eq!(result.outgoing().cluster.index, 1);
    assert_eq!(result.outgoing().partial_balance, 0);

    // the input tray is untouched
    assert_eq!(buckets(&tray), vec![0, 0, 0, 0, 0, 0, 1_000_000]);
    assert_eq!(tray.outgoing().cluster.index, 0);
}

#[test]
fn private_transfer_pays_fees_from_outgoing() {
    let tray = million_in_top_bucket();
    let partner = PublicKey([5u8; 32]);
    let third_parties = [ThirdPartyFee {
        destination: partner,
        basis_points: 250,
    }];

    let intent = private_transfer(&mut rng(), &tray, destination(), 1_000, 10, &third_parties, true).unwrap();

    let fees: Vec<_> = intent
        .actions()
        .actions()
        .iter()
        .filter_map(|a| match &a.kind {
            ActionKind::FeePayment(f) => Some((f.kind, f.amount)),
            _ => None,
        })
        .collect();
    assert_eq!(fees, vec![(FeeKind::Code, 10), (FeeKind::ThirdParty(partner), 25)]);

    let net = intent.actions().actions().iter().find_map(|a| match &a.kind {
        ActionKind::Withdraw(Withdraw {
            kind: WithdrawKind::NoPrivacyWithdraw(net),
            ..
        }) => Some(*net),
        _ => None,
    });
    assert_eq!(net, Some(965));
    assert_eq!(intent.result_tray().slots_balance(), 999_000);
    assert_eq!(
        intent.metadata(),
        &Metadata::SendPrivatePayment {
            destination: destination(),
            amount: 1_000,
            is_withdrawal: true,
            is_remote_send: false,
        }
    );
}

#[test]
fn private_transfer_rejects_bad_amounts() {
    let tray = million_in_top_bucket();
    assert_eq!(
        private_transfer(&mut rng(), &tray, destination(), 0, 0, &[], false).err(),
        Some(IntentError::InvalidAmount)
    );
    assert_eq!(
        private_transfer(&mut rng(), &tray, destination(), 1_000, 1_000, &[], false).err(),
        Some(IntentError::InvalidFee {
            fee: 1_000,
            amount: 1_000
        })
    );
    let everything = [ThirdPartyFee {
        destination: PublicKey([5u8; 32]),
        basis_points: 10_000,
    }];
    assert_eq!(
        private_transfer(&mut rng(), &tray, destination(), 1_000, 0, &everything, false).err(),
        Some(IntentError::InvalidFee {
            fee: 1_000,
            amount: 1_000
        })
    );
    assert_eq!(
        private_transfer(&mut rng(), &tray, destination(), 2_000_000, 0, &[], false).err(),
        Some(IntentError::TrayError(TrayError::InsufficientTrayBalance {
            available: 1_000_000,
            requested: 2_000_000
        }))
    );
}

#[test]
fn deposit_cascades_into_buckets() {
    let tray = tray_with(TrayState {
        owner: 1_000_000,
        ..TrayState::default()
    });

    let intent = deposit(&mut rng(), &tray, &Role::Primary, 1_000_000).unwrap();
    let mut expected = vec![ActionType::TempPrivacyTransfer];
    expected.extend(vec![ActionType::TempPrivacyExchange; 6]);
    assert_eq!(types(&intent), expected);
    assert_eq!(
        buckets(intent.result_tray()),
        vec![10, 90, 900, 9_000, 90_000, 900_000, 0]
    );
    assert_eq!(intent.result_tray().owner().partial_balance, 0);
    assert_eq!(
        intent.metadata(),
        &Metadata::ReceivePaymentsPrivately {
            source: tray.owner().cluster.vault(),
            amount: 1_000_000,
            is_deposit: true,
        }
    );

    assert_eq!(
        deposit(&mut rng(), &tray, &Role::Outgoing, 10).err(),
        Some(IntentError::InvalidSource(Role::Outgoing))
    );
    assert_eq!(
        deposit(&mut rng(), &tray, &Role::Primary, 0).err(),
        Some(IntentError::InvalidAmount)
    );
}

#[test]
fn receiving_from_incoming_rotates_it() {
    let tray = tray_with(TrayState {
        incoming: accounts::RotatingState { index: 4, balance: 100 },
        ..TrayState::default()
    });
    let previous = tray.incoming().cluster.clone();

    let intent = receive_from_incoming(&mut rng(), &tray, 100).unwrap();
    assert_eq!(
        types(&intent),
        vec![
            ActionType::TempPrivacyTransfer,
            ActionType::TempPrivacyExchange,
            ActionType::TempPrivacyExchange,
            ActionType::CloseEmptyAccount,
            ActionType::OpenAccount,
            ActionType::CloseDormantAccount,
        ]
    );

    let result = intent.result_tray();
    let next = result.incoming().cluster.clone();
    assert_eq!(next.index, 5);
    let actions = intent.actions().actions();
    assert_eq!(actions[3].kind.cluster(), &previous);
    assert_eq!(actions[4].kind.cluster(), &next);
    assert_eq!(actions[5].kind.cluster(), &next);
    assert_eq!(buckets(result), vec![10, 90, 0, 0, 0, 0, 0]);

    assert_eq!(
        receive_from_incoming(&mut rng(), &tray, 40).err(),
        Some(IntentError::BalanceMismatch {
            expected: 100,
            actual: 40
        })
    );
}

#[test]
fn receiving_from_a_relationship() {
    let mut tray = tray_with(TrayState::default());
    tray.add_relationship("example.com").unwrap();
    tray.credit(&Role::Relationship("example.com".into()), 30).unwrap();

    let intent = receive_from_relationship(&mut rng(), &tray, "example.com", 30).unwrap();
    assert_eq!(buckets(intent.result_tray()), vec![10, 20, 0, 0, 0, 0, 0]);
    assert_eq!(
        receive_from_relationship(&mut rng(), &tray, "other.com", 30).err(),
        Some(IntentError::TrayError(TrayError::UnknownAccount(Role::Relationship(
            "other.com".into()
        ))))
    );
}

#[test]
fn create_account_opens_everything() {
    let tray = tray_with(TrayState::default());
    let intent = create_account(&mut rng(), &tray).unwrap();
    let actions = intent.actions().actions();
    assert_eq!(actions.len(), 19);

    assert_eq!(actions[0].kind.action_type(), ActionType::OpenAccount);
    assert_eq!(actions[0].kind.cluster(), &tray.owner().cluster);

    let primary_vault = tray.owner().cluster.vault();
    for pair in actions[1..].chunks(2) {
        assert_eq!(pair[0].kind.action_type(), ActionType::OpenAccount);
        match &pair[1].kind {
            ActionKind::Withdraw(w) => {
                assert_eq!(&w.source, pair[0].kind.cluster());
                assert_eq!(w.destination, primary_vault);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }
    assert_eq!(
        actions[18].kind.cluster().role,
        Role::Bucket(Denomination::Million)
    );
    assert_eq!(intent.metadata(), &Metadata::OpenAccounts);
}

#[test]
fn open_account_needs_no_signature() {
    let tray = tray_with(TrayState::default());
    let mut intent = create_account(&mut rng(), &tray).unwrap();
    intent.request_parameters().unwrap();
    let parameters = parameters_for(&intent);
    assert!(parameters[0].configs.is_empty());
    intent.apply_parameters(parameters).unwrap();
    assert_eq!(intent.sign().unwrap().len(), 9);
}

#[test]
fn parameters_must_match_actions() {
    let tray = tray_with(TrayState {
        owner: 1_000,
        ..TrayState::default()
    });
    let mut intent = deposit(&mut rng(), &tray, &Role::Primary, 1_000).unwrap();
    let parameters = parameters_for(&intent);

    assert_eq!(
        intent.apply_parameters(parameters.clone()).err(),
        Some(IntentError::InvalidState {
            expected: IntentState::ParametersRequested,
            actual: IntentState::Built
        })
    );
    intent.request_parameters().unwrap();

    let mut short = parameters.clone();
    short.pop();
    assert_eq!(
        intent.apply_parameters(short).err(),
        Some(IntentError::InvalidParameterCount {
            expected: 4,
            actual: 3
        })
    );

    let mut swapped = parameters.clone();
    swapped.swap(0, 1);
    assert_eq!(
        intent.apply_parameters(swapped).err(),
        Some(IntentError::ActionParameterMismatch(0))
    );

    let mut wrong_kind = parameters.clone();
    wrong_kind[1].kind = None;
    assert_eq!(
        intent.apply_parameters(wrong_kind).err(),
        Some(IntentError::ActionParameterMismatch(1))
    );

    let mut no_nonce = parameters.clone();
    no_nonce[2].configs.clear();
    assert_eq!(
        intent.apply_parameters(no_nonce).err(),
        Some(IntentError::ActionParameterMismatch(2))
    );

    // failed attempts bind nothing
    assert!(intent.actions().actions().iter().all(|a| a.parameter.is_none()));
    assert_eq!(intent.state(), IntentState::ParametersRequested);

    intent.apply_parameters(parameters).unwrap();
    assert_eq!(intent.state(), IntentState::ParametersApplied);
}

#[test]
fn signing_requires_parameters() {
    let tray = million_in_top_bucket();
    let intent = private_transfer(&mut rng(), &tray, destination(), 10, 0, &[], false).unwrap();
    let env = Environment::default();
    let action = &intent.actions().actions()[0];
    assert_eq!(
        action.sign(&env, &intent.id()).err(),
        Some(IntentError::MissingParameter(0))
    );
}

#[test]
fn full_lifecycle() {
    let tray = tray_with(TrayState {
        owner: 1_000,
        ..TrayState::default()
    });
    let mut intent = deposit(&mut rng(), &tray, &Role::Primary, 1_000).unwrap();
    assert_eq!(
        intent.committed_tray().err(),
        Some(IntentError::InvalidState {
            expected: IntentState::Finalized,
            actual: IntentState::Built
        })
    );

    let descriptor = intent.request_parameters().unwrap();
    assert_eq!(descriptor.intent_id, intent.id());
    assert_eq!(descriptor.actions.len(), 4);

    intent.apply_parameters(parameters_for(&intent)).unwrap();
    let signatures = intent.sign().unwrap();
    assert_eq!(signatures.len(), 4);

    let transactions = intent.transactions().unwrap();
    for ((action, mut tx), signature) in intent
        .actions()
        .actions()
        .iter()
        .zip(transactions)
        .zip(signatures.iter())
    {
        let signer = action.kind.signer().unwrap().authority_key();
        tx.set_signature(&signer, *signature).unwrap();
        assert!(tx.verify_signatures().is_ok());
    }

    // temp-privacy memos commit to the intent id
    let env = Environment::default();
    let exchange = &intent.actions().actions()[1];
    let ours = exchange.transactions(&env, &intent.id()).unwrap();
    let theirs = exchange.transactions(&env, &PublicKey([0u8; 32])).unwrap();
    assert_ne!(
        ours[0].message_bytes().unwrap(),
        theirs[0].message_bytes().unwrap()
    );

    intent.mark_submitted().unwrap();
    assert!(intent.sign().is_err());
    intent.finalize().unwrap();
    assert_eq!(buckets(intent.committed_tray().unwrap()), vec![10, 90, 900, 0, 0, 0, 0]);
    assert!(intent.fail().is_err());
    assert_eq!(intent.into_committed_tray().unwrap().owner().partial_balance, 0);
}

#[test]
fn failure_is_terminal() {
    let tray = million_in_top_bucket();
    let mut intent = private_transfer(&mut rng(), &tray, destination(), 10, 0, &[], false).unwrap();
    intent.request_parameters().unwrap();
    intent.fail().unwrap();
    assert_eq!(intent.state(), IntentState::Failed);
    assert!(intent.fail().is_err());
    assert!(intent.apply_parameters(parameters_for(&intent)).is_err());
}

#[test]
fn owner_signed_actions() {
    let tray = tray_with(TrayState {
        owner: 500,
        ..TrayState::default()
    });
    let mut intent = public_transfer(&mut rng(), &tray, &Role::Primary, destination(), 200, false).unwrap();
    let signed = intent.sign_actions().unwrap();
    assert_eq!(intent.state(), IntentState::Signed);
    assert_eq!(signed.owner, tray.owner().cluster.authority_key());
    assert!(signed.verify().is_ok());

    let mut tampered = signed.clone();
    tampered.descriptor.actions[0].amount = Some(201);
    assert!(tampered.verify().is_err());

    let json = serde_json::to_string(&signed).unwrap();
    let back: SignedActions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, signed);

    assert!(intent.request_parameters().is_err());
}

#[test]
fn public_transfer_debits_the_source() {
    let tray = tray_with(TrayState {
        owner: 500,
        ..TrayState::default()
    });
    let intent = public_transfer(&mut rng(), &tray, &Role::Primary, destination(), 200, false).unwrap();
    assert_eq!(types(&intent), vec![ActionType::NoPrivacyTransfer]);
    assert_eq!(intent.result_tray().owner().partial_balance, 300);
    assert_eq!(intent.result_tray().outgoing().cluster.index, 0);

    assert_eq!(
        public_transfer(&mut rng(), &tray, &Role::Primary, destination(), 501, false).err(),
        Some(IntentError::TrayError(TrayError::InsufficientBalance(Role::Primary)))
    );
    assert_eq!(
        public_transfer(&mut rng(), &tray, &Role::Bucket(Denomination::One), destination(), 1, false).err(),
        Some(IntentError::InvalidSource(Role::Bucket(Denomination::One)))
    );
}

#[test]
fn withdraw_to_uninitialized_destination_pays_a_fee() {
    let tray = tray_with(TrayState {
        owner: 100,
        ..TrayState::default()
    });
    let mut metadata = DestinationMetadata {
        destination: destination(),
        is_valid: true,
        requires_initialization: true,
        fee: 5,
    };

    let intent = withdraw(&mut rng(), &tray, &Role::Primary, &metadata, 100).unwrap();
    let actions = intent.actions().actions();
    assert_eq!(
        types(&intent),
        vec![ActionType::NoPrivacyTransfer, ActionType::CodeFeePayment]
    );
    match (&actions[0].kind, &actions[1].kind) {
        (ActionKind::Transfer(t), ActionKind::FeePayment(f)) => {
            assert_eq!(t.amount, 95);
            assert_eq!(f.amount, 5);
        }
        other => panic!("unexpected actions {:?}", other),
    }
    assert_eq!(intent.result_tray().owner().partial_balance, 0);

    metadata.fee = 100;
    assert_eq!(
        withdraw(&mut rng(), &tray, &Role::Primary, &metadata, 100).err(),
        Some(IntentError::InvalidFee { fee: 100, amount: 100 })
    );

    metadata.requires_initialization = false;
    let intent = withdraw(&mut rng(), &tray, &Role::Primary, &metadata, 100).unwrap();
    assert_eq!(types(&intent), vec![ActionType::NoPrivacyTransfer]);

    metadata.is_valid = false;
    assert_eq!(
        withdraw(&mut rng(), &tray, &Role::Primary, &metadata, 100).err(),
        Some(IntentError::InvalidDestination)
    );
}

#[test]
fn cash_link_roundtrip() {
    let tray = million_in_top_bucket();
    let env = Environment::default();
    let card = AccountCluster::gift_card(&[4u8; 32], &env).unwrap();

    let sent = send_cash_link(&mut rng(), &tray, &card, 1_000).unwrap();
    let actions = sent.actions().actions();
    assert_eq!(actions[0].kind.action_type(), ActionType::OpenAccount);
    assert_eq!(actions[0].kind.cluster(), &card);
    let last = actions.last().unwrap();
    match &last.kind {
        ActionKind::Withdraw(w) => {
            assert_eq!(w.kind, WithdrawKind::CloseDormantAccount(Role::GiftCard));
            assert_eq!(w.destination, tray.owner().cluster.vault());
        }
        other => panic!("unexpected action {:?}", other),
    }
    assert!(actions.iter().any(|a| match &a.kind {
        ActionKind::Withdraw(w) => {
            w.kind == WithdrawKind::NoPrivacyWithdraw(1_000) && w.destination == card.vault()
        }
        _ => false,
    }));
    assert_eq!(sent.result_tray().slots_balance(), 999_000);
    assert_eq!(sent.result_tray().outgoing().cluster.index, 1);

    let receiver = tray_with(TrayState::default());
    let received = receive_cash_link(&mut rng(), &receiver, &card, 1_000).unwrap();
    assert_eq!(types(&received), vec![ActionType::NoPrivacyWithdraw]);
    assert_eq!(received.result_tray().incoming().partial_balance, 1_000);
    assert_eq!(
        received.metadata(),
        &Metadata::ReceivePaymentsPublicly {
            source: card.vault(),
            amount: 1_000,
            is_remote_send: true,
        }
    );

    let not_a_card = receiver.owner().cluster.clone();
    assert_eq!(
        send_cash_link(&mut rng(), &tray, &not_a_card, 10).err(),
        Some(IntentError::InvalidDestination)
    );
}

#[test]
fn winnings_are_paid_from_the_pool() {
    let tray = tray_with(TrayState::default());
    let env = Environment::default();
    let pool = AccountCluster::gift_card(&[11u8; 32], &env).unwrap();
    let a = PublicKey([1u8; 32]);
    let b = PublicKey([2u8; 32]);

    let intent = distribute_winnings(&mut rng(), &tray, &pool, &[(a, 70), (b, 30)]).unwrap();
    assert_eq!(
        types(&intent),
        vec![ActionType::NoPrivacyTransfer, ActionType::NoPrivacyTransfer]
    );
    assert_eq!(
        intent.metadata(),
        &Metadata::DistributeWinnings {
            source: pool.vault(),
            total: 100
        }
    );
    assert_eq!(intent.result_tray().state(), tray.state());

    assert_eq!(
        distribute_winnings(&mut rng(), &tray, &pool, &[(a, 70), (b, 0)]).err(),
        Some(IntentError::InvalidAmount)
    );
    assert_eq!(
        distribute_winnings(&mut rng(), &tray, &pool, &[]).err(),
        Some(IntentError::InvalidAmount)
    );
}

#[test]
fn relationship_accounts_open_on_demand() {
    let tray = tray_with(TrayState::default());
    let intent = open_relationship(&mut rng(), &tray, "example.com").unwrap();
    assert_eq!(types(&intent), vec![ActionType::OpenAccount]);
    assert!(intent
        .result_tray()
        .account(&Role::Relationship("example.com".into()))
        .is_some());
    assert!(tray.account(&Role::Relationship("example.com".into())).is_none());
}

#[test]
fn appended_actions_are_renumbered() {
    let tray = tray_with(TrayState {
        owner: 500,
        ..TrayState::default()
    });
    let first = public_transfer(&mut rng(), &tray, &Role::Primary, destination(), 200, false).unwrap();
    let second = create_account(&mut rng(), &tray).unwrap();

    let mut group = first.actions().clone();
    group.append(second.actions().clone());
    assert_eq!(group.len(), 20);
    let ids: Vec<_> = group.actions().iter().map(|a| a.id).collect();
    assert_eq!(ids, (0..20).collect::<Vec<u32>>());
    assert_eq!(group.actions()[1].kind, second.actions().actions()[0].kind);
}

use partyhouse_game::{
    AbilityTarget, Command, GameState, GuestFactory, GuestId, GuestKind, Intermission,
    PartyAction, PartySession, Phase, RulesConfig, Selection,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

const SWEEP_SEEDS: u64 = 48;
const COMMANDS_PER_SEED: usize = 600;

fn any_guest(state: &GameState, rng: &mut ChaCha20Rng) -> GuestId {
    if state.rolodex.is_empty() || rng.gen_range(0..10) == 0 {
        return GuestId(u64::MAX);
    }
    state.rolodex[rng.gen_range(0..state.rolodex.len())].id
}

fn house_guest(state: &GameState, rng: &mut ChaCha20Rng) -> GuestId {
    if state.house.is_empty() {
        return any_guest(state, rng);
    }
    state.house[rng.gen_range(0..state.house.len())]
}

fn random_target(state: &GameState, rng: &mut ChaCha20Rng) -> AbilityTarget {
    match rng.gen_range(0..3) {
        0 => AbilityTarget::None,
        1 => AbilityTarget::Guest(any_guest(state, rng)),
        _ => AbilityTarget::Pair(any_guest(state, rng), any_guest(state, rng)),
    }
}

/// Mostly sensible input for the current phase, with a steady trickle of
/// nonsense mixed in.
fn random_command(state: &GameState, rng: &mut ChaCha20Rng) -> Command {
    if rng.gen_range(0..8) == 0 {
        return match rng.gen_range(0..6) {
            0 => Command::StartGame,
            1 => Command::AdvanceScenario,
            2 => Command::EndShop,
            3 => Command::ExpandHouse,
            4 => Command::SelectItem {
                selection: Selection::Guest(any_guest(state, rng)),
            },
            _ => Command::BuyGuest {
                kind: GuestKind::ALL[rng.gen_range(0..GuestKind::ALL.len())],
            },
        };
    }
    match (state.phase, state.action) {
        (Phase::Party, PartyAction::Peeking(_)) => {
            if rng.gen_bool(0.5) {
                Command::AcceptPeek
            } else {
                Command::RejectPeek
            }
        }
        (Phase::Party, PartyAction::Targeting(guest)) => Command::TargetAbility {
            guest,
            target: random_target(state, rng),
        },
        (Phase::Party, PartyAction::Idle) => match rng.gen_range(0..10) {
            0..=4 => Command::AdmitNextGuest,
            5 | 6 => Command::UseAbility {
                guest: house_guest(state, rng),
            },
            7 => Command::TargetAbility {
                guest: house_guest(state, rng),
                target: random_target(state, rng),
            },
            _ => Command::EndRound,
        },
        (Phase::Shutdown, _) => Command::BanGuest {
            guest: house_guest(state, rng),
        },
        (Phase::PartyEnded | Phase::Shop, _) => match rng.gen_range(0..4) {
            0 => Command::BuyGuest {
                kind: GuestKind::ALL[rng.gen_range(0..GuestKind::ALL.len())],
            },
            1 => Command::ExpandHouse,
            2 => Command::EndShop,
            _ => Command::Dismiss,
        },
        (Phase::ScenarioWon | Phase::ScenarioLost, _) => Command::Dismiss,
        (Phase::Title, _) if state.scenario_cleared => Command::AdvanceScenario,
        (Phase::Title, _) => Command::StartGame,
    }
}

fn check_phase_rules(state: &GameState) {
    state.check_invariants().unwrap();
    match state.phase {
        Phase::Party => {
            assert!(state.trouble_count < state.trouble_limit);
            for id in state.house.iter().chain(&state.draw_pile) {
                assert!(!state.guest(*id).unwrap().banned, "{id} banned but present");
            }
            if let PartyAction::Peeking(peeked) = state.action {
                assert_eq!(state.draw_pile.first(), Some(&peeked));
            }
        }
        Phase::Shutdown => assert!(state.trouble_count >= state.trouble_limit),
        _ => assert_eq!(state.action, PartyAction::Idle),
    }
    assert!(state.round <= state.round_limit);
}

/// Shop commands only work in the shop, and nothing leaves a finished party
/// or scenario except a dismiss or a restart.
fn check_gated_commands(before: &GameState, command: Command, after: &GameState) {
    let shop_command = matches!(
        command,
        Command::BuyGuest { .. } | Command::ExpandHouse | Command::EndShop
    );
    if shop_command && before.phase != Phase::Shop {
        assert_eq!(after, before, "{command} acted outside the shop");
    }
    let waiting = matches!(
        before.phase,
        Phase::PartyEnded | Phase::ScenarioWon | Phase::ScenarioLost
    );
    let releasing = matches!(
        command,
        Command::Dismiss | Command::StartGame | Command::SelectItem { .. }
    );
    if waiting && !releasing {
        assert_eq!(after, before, "{command} skipped the dismiss");
    }
}

fn sweep(config: &RulesConfig) {
    for seed in 0..SWEEP_SEEDS {
        let mut session = PartySession::new(seed, config.clone())
            .unwrap()
            .with_factory(GuestFactory::starting_at(1));
        let mut rng = ChaCha20Rng::seed_from_u64(seed ^ 0x5eed);
        for _ in 0..COMMANDS_PER_SEED {
            let before = session.snapshot();
            let command = random_command(&before, &mut rng);
            match session.dispatch(command) {
                Ok(after) => {
                    check_phase_rules(&after);
                    check_gated_commands(&before, command, &after);
                }
                Err(err) => {
                    assert!(err.is_recoverable(), "{command}: {err}");
                    assert_eq!(*session.snapshot(), *before, "{command} changed state");
                }
            }
        }
    }
}

#[test]
fn random_play_never_breaks_invariants() {
    sweep(&RulesConfig::default());
}

#[test]
fn random_play_with_shop_intermission_never_breaks_invariants() {
    let config = RulesConfig {
        intermission: Intermission::Shop,
        initial_house_size: 3,
        trouble_limit: 2,
        round_limit: 6,
        ..RulesConfig::default()
    };
    sweep(&config);
}

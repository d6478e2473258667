use partyhouse_game::{
    Command, GameState, GuestFactory, GuestKind, IdentityShuffler, Intermission, Phase,
    RulesConfig, RulesContext, RulesError, apply_command, catalog,
};

/// Drives the engine with identity shuffles so draw order equals rolodex order.
struct Table {
    config: RulesConfig,
    factory: GuestFactory,
    draw: IdentityShuffler,
    ability: IdentityShuffler,
}

impl Table {
    fn new(config: RulesConfig) -> Self {
        Self {
            config,
            factory: GuestFactory::starting_at(1),
            draw: IdentityShuffler,
            ability: IdentityShuffler,
        }
    }

    fn apply(&mut self, state: &GameState, command: Command) -> Result<GameState, RulesError> {
        let mut ctx = RulesContext::new(
            catalog(),
            &self.config,
            &mut self.factory,
            &mut self.draw,
            &mut self.ability,
        );
        apply_command(state, command, &mut ctx)
    }

    fn run(&mut self, state: &GameState, commands: &[Command]) -> GameState {
        let mut state = state.clone();
        for command in commands {
            state = self.apply(&state, *command).unwrap();
            state.check_invariants().unwrap();
        }
        state
    }

    fn party(&mut self, kinds: &[GuestKind]) -> GameState {
        let title = GameState::title(&self.config);
        let mut state = self.apply(&title, Command::StartGame).unwrap();
        state.rolodex = kinds
            .iter()
            .map(|kind| self.factory.instantiate(catalog(), *kind).unwrap())
            .collect();
        state.draw_pile = state.eligible_guests();
        state
    }
}

#[test]
fn banned_guest_stays_out_of_later_parties() {
    let mut table = Table::new(RulesConfig::default());
    let state = table.party(&[
        GuestKind::WildBuddy,
        GuestKind::Monkey,
        GuestKind::Gangster,
        GuestKind::OldFriend,
    ]);
    let state = table.run(&state, &[Command::AdmitNextGuest; 3]);
    assert_eq!(state.phase, Phase::Shutdown);
    assert_eq!(state.trouble_count, 3);

    let banned = state.house[1];
    let state = table.run(&state, &[Command::BanGuest { guest: banned }]);
    assert_eq!(state.phase, Phase::PartyEnded);
    assert!(state.guest(banned).unwrap().banned);

    let second = table.run(&state, &[Command::Dismiss]);
    assert_eq!(second.round, 2);
    assert_eq!(second.draw_pile.len(), 3);
    assert!(!second.in_pile(banned));

    let third = table.run(&second, &[Command::EndRound, Command::Dismiss]);
    assert_eq!(third.round, 3);
    assert!(!third.in_pile(banned));
    assert_eq!(third.rolodex.len(), 4);
}

#[test]
fn banning_requires_a_guest_in_the_house() {
    let mut table = Table::new(RulesConfig::default());
    let state = table.party(&[
        GuestKind::WildBuddy,
        GuestKind::Monkey,
        GuestKind::Gangster,
        GuestKind::OldFriend,
    ]);
    let state = table.run(&state, &[Command::AdmitNextGuest; 3]);
    let outsider = state.draw_pile[0];
    let err = table
        .apply(&state, Command::BanGuest { guest: outsider })
        .unwrap_err();
    assert!(matches!(err, RulesError::InvalidTarget { .. }));
    assert!(err.is_recoverable());
}

#[test]
fn shop_intermission_buys_and_expands_before_the_next_party() {
    let config = RulesConfig {
        intermission: Intermission::Shop,
        ..RulesConfig::default()
    };
    let mut table = Table::new(config);
    let state = table.party(&[GuestKind::OldFriend, GuestKind::RichPal]);
    let mut ended = table.run(&state, &[Command::EndRound]);
    assert_eq!(ended.phase, Phase::PartyEnded);

    // shop only opens once the party is dismissed
    ended.popularity = 10;
    ended.cash = 2;
    let unchanged = table.run(&ended, &[Command::BuyGuest { kind: GuestKind::Hippy }]);
    assert_eq!(unchanged.rolodex.len(), 2);

    let shop = table.run(&ended, &[Command::Dismiss]);
    assert_eq!(shop.phase, Phase::Shop);

    let refused = table.run(&shop, &[Command::BuyGuest { kind: GuestKind::OldFriend }]);
    assert_eq!(refused.rolodex.len(), 2);
    assert_eq!(refused.popularity, 10);

    let bought = table.run(
        &shop,
        &[Command::BuyGuest { kind: GuestKind::Hippy }, Command::ExpandHouse],
    );
    assert_eq!(bought.rolodex.len(), 3);
    assert_eq!(bought.popularity, 7);
    assert_eq!(bought.cash, 0);
    assert_eq!(bought.house_size, 6);
    assert_eq!(bought.next_expansion_cost, 3);
    assert_eq!(bought.caption, "THE HOUSE NOW HOLDS 6 GUESTS.");

    let next = table.run(&bought, &[Command::EndShop]);
    assert_eq!(next.phase, Phase::Party);
    assert_eq!(next.round, 2);
    assert_eq!(next.draw_pile.len(), 3);
}

#[test]
fn stars_outside_the_scenario_are_not_sold() {
    let config = RulesConfig {
        intermission: Intermission::Shop,
        ..RulesConfig::default()
    };
    let mut table = Table::new(config);
    let state = table.party(&[GuestKind::OldFriend]);
    let mut shop = table.run(&state, &[Command::EndRound, Command::Dismiss]);
    assert_eq!(shop.phase, Phase::Shop);
    shop.popularity = 60;

    // scenario 0 features the alien and the leprechaun
    let refused = table.run(&shop, &[Command::BuyGuest { kind: GuestKind::Dragon }]);
    assert_eq!(refused.rolodex.len(), 1);
    let bought = table.run(&shop, &[Command::BuyGuest { kind: GuestKind::Leprechaun }]);
    assert_eq!(bought.rolodex.len(), 2);
    assert_eq!(bought.popularity, 24);
}

#[test]
fn four_stars_win_and_advance_the_scenario() {
    let mut table = Table::new(RulesConfig::default());
    let state = table.party(&[
        GuestKind::Leprechaun,
        GuestKind::Dinosaur,
        GuestKind::Ghost,
        GuestKind::Genie,
    ]);
    let state = table.run(&state, &[Command::AdmitNextGuest; 4]);
    assert_eq!(state.star_count, 4);

    let won = table.run(&state, &[Command::EndRound]);
    assert_eq!(won.phase, Phase::ScenarioWon);

    // the win has to be dismissed before the next scenario opens
    let early = table.run(&won, &[Command::AdvanceScenario]);
    assert_eq!(early, won);

    let advanced = table.run(&won, &[Command::Dismiss, Command::AdvanceScenario]);
    assert_eq!(advanced.phase, Phase::Party);
    assert_eq!(advanced.scenario_index, 1);
    assert_eq!(advanced.round, 1);
    assert_eq!(advanced.rolodex.len(), 10);

    let replay = table.run(&won, &[Command::Dismiss, Command::StartGame]);
    assert_eq!(replay.scenario_index, 0);

    let mut last = won;
    last.scenario_index = catalog().scenario_count() - 1;
    let done = table.run(&last, &[Command::Dismiss, Command::AdvanceScenario]);
    assert_eq!(done.phase, Phase::Title);
    assert!(done.rolodex.is_empty());
}

#[test]
fn running_out_of_parties_loses_the_scenario() {
    let mut table = Table::new(RulesConfig::default());
    let mut state = table.party(&[GuestKind::OldFriend]);
    state.scenario_index = 2;
    state.round = state.round_limit;
    let lost = table.run(&state, &[Command::EndRound, Command::Dismiss]);
    assert_eq!(lost.phase, Phase::ScenarioLost);
    assert_eq!(lost.turns_remaining, 0);

    let title = table.run(&lost, &[Command::Dismiss]);
    assert_eq!(title.phase, Phase::Title);
    assert_eq!(title.scenario_index, 2);

    let restarted = table.run(&title, &[Command::StartGame]);
    assert_eq!(restarted.scenario_index, 2);
    assert_eq!(restarted.round, 1);
}

#[test]
fn popularity_is_clamped_at_the_cap() {
    let mut table = Table::new(RulesConfig::default());
    let mut state = table.party(&[GuestKind::Athlete, GuestKind::Athlete]);
    state.popularity = state.popularity_cap - 1;
    let state = table.run(
        &state,
        &[Command::AdmitNextGuest, Command::AdmitNextGuest, Command::EndRound],
    );
    assert_eq!(state.popularity, state.popularity_cap);
}

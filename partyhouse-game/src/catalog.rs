//! Guest archetypes, abilities, and scenario reference data.
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Every distinct guest archetype in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestKind {
    OldFriend,
    RichPal,
    WildBuddy,
    Driver,
    PrivateI,
    Hippy,
    CuteDog,
    Security,
    Wrestler,
    WatchDog,
    Spy,
    Grillmaster,
    Athlete,
    Dancer,
    MrPopular,
    Celebrity,
    TicketTaker,
    Comedian,
    Photographer,
    Caterer,
    Auctioneer,
    Mascot,
    Introvert,
    Stylist,
    Bartender,
    Writer,
    Climber,
    Cheerleader,
    Greeter,
    Magician,
    Cupid,
    Counselor,
    Werewolf,
    Monkey,
    RockStar,
    Gangster,
    Gambler,
    Alien,
    Leprechaun,
    Genie,
    Dragon,
    Dinosaur,
    Mermaid,
    Ghost,
    Unicorn,
    Superhero,
}

impl GuestKind {
    pub const ALL: &'static [Self] = &[
        Self::OldFriend,
        Self::RichPal,
        Self::WildBuddy,
        Self::Driver,
        Self::PrivateI,
        Self::Hippy,
        Self::CuteDog,
        Self::Security,
        Self::Wrestler,
        Self::WatchDog,
        Self::Spy,
        Self::Grillmaster,
        Self::Athlete,
        Self::Dancer,
        Self::MrPopular,
        Self::Celebrity,
        Self::TicketTaker,
        Self::Comedian,
        Self::Photographer,
        Self::Caterer,
        Self::Auctioneer,
        Self::Mascot,
        Self::Introvert,
        Self::Stylist,
        Self::Bartender,
        Self::Writer,
        Self::Climber,
        Self::Cheerleader,
        Self::Greeter,
        Self::Magician,
        Self::Cupid,
        Self::Counselor,
        Self::Werewolf,
        Self::Monkey,
        Self::RockStar,
        Self::Gangster,
        Self::Gambler,
        Self::Alien,
        Self::Leprechaun,
        Self::Genie,
        Self::Dragon,
        Self::Dinosaur,
        Self::Mermaid,
        Self::Ghost,
        Self::Unicorn,
        Self::Superhero,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OldFriend => "old_friend",
            Self::RichPal => "rich_pal",
            Self::WildBuddy => "wild_buddy",
            Self::Driver => "driver",
            Self::PrivateI => "private_i",
            Self::Hippy => "hippy",
            Self::CuteDog => "cute_dog",
            Self::Security => "security",
            Self::Wrestler => "wrestler",
            Self::WatchDog => "watch_dog",
            Self::Spy => "spy",
            Self::Grillmaster => "grillmaster",
            Self::Athlete => "athlete",
            Self::Dancer => "dancer",
            Self::MrPopular => "mr_popular",
            Self::Celebrity => "celebrity",
            Self::TicketTaker => "ticket_taker",
            Self::Comedian => "comedian",
            Self::Photographer => "photographer",
            Self::Caterer => "caterer",
            Self::Auctioneer => "auctioneer",
            Self::Mascot => "mascot",
            Self::Introvert => "introvert",
            Self::Stylist => "stylist",
            Self::Bartender => "bartender",
            Self::Writer => "writer",
            Self::Climber => "climber",
            Self::Cheerleader => "cheerleader",
            Self::Greeter => "greeter",
            Self::Magician => "magician",
            Self::Cupid => "cupid",
            Self::Counselor => "counselor",
            Self::Werewolf => "werewolf",
            Self::Monkey => "monkey",
            Self::RockStar => "rock_star",
            Self::Gangster => "gangster",
            Self::Gambler => "gambler",
            Self::Alien => "alien",
            Self::Leprechaun => "leprechaun",
            Self::Genie => "genie",
            Self::Dragon => "dragon",
            Self::Dinosaur => "dinosaur",
            Self::Mermaid => "mermaid",
            Self::Ghost => "ghost",
            Self::Unicorn => "unicorn",
            Self::Superhero => "superhero",
        }
    }
}

impl fmt::Display for GuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuestKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// Abilities a guest can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    /// Counts toward the police shutdown.
    Trouble,
    /// Negates one trouble guest.
    CancelTrouble,
    Fetch,
    Boot,
    Peek,
    Shuffle,
    BringOne,
    BringTwo,
    Photographer,
    Comedian,
    Dancer,
    Mascot,
    Introvert,
    Stylist,
    Bartender,
    Writer,
    Climber,
    Cheerleader,
    Greeter,
    Magician,
    Cupid,
    Counselor,
    Werewolf,
}

impl Ability {
    pub const ALL: &'static [Self] = &[
        Self::Trouble,
        Self::CancelTrouble,
        Self::Fetch,
        Self::Boot,
        Self::Peek,
        Self::Shuffle,
        Self::BringOne,
        Self::BringTwo,
        Self::Photographer,
        Self::Comedian,
        Self::Dancer,
        Self::Mascot,
        Self::Introvert,
        Self::Stylist,
        Self::Bartender,
        Self::Writer,
        Self::Climber,
        Self::Cheerleader,
        Self::Greeter,
        Self::Magician,
        Self::Cupid,
        Self::Counselor,
        Self::Werewolf,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Trouble => "trouble",
            Self::CancelTrouble => "cancel_trouble",
            Self::Fetch => "fetch",
            Self::Boot => "boot",
            Self::Peek => "peek",
            Self::Shuffle => "shuffle",
            Self::BringOne => "bring_one",
            Self::BringTwo => "bring_two",
            Self::Photographer => "photographer",
            Self::Comedian => "comedian",
            Self::Dancer => "dancer",
            Self::Mascot => "mascot",
            Self::Introvert => "introvert",
            Self::Stylist => "stylist",
            Self::Bartender => "bartender",
            Self::Writer => "writer",
            Self::Climber => "climber",
            Self::Cheerleader => "cheerleader",
            Self::Greeter => "greeter",
            Self::Magician => "magician",
            Self::Cupid => "cupid",
            Self::Counselor => "counselor",
            Self::Werewolf => "werewolf",
        }
    }

    /// Short UI description for the ability.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Trouble => "TROUBLE!",
            Self::CancelTrouble => "CANCELS TROUBLE",
            Self::Fetch => "FETCH A SPECIFIC GUEST",
            Self::Boot => "BOOT OUT ONE GUEST",
            Self::Peek => "PEEK AT NEXT GUEST",
            Self::Shuffle => "SEND ALL GUESTS OUT & RESHUFFLE",
            Self::BringOne => "BRINGS +1 RANDOM GUEST",
            Self::BringTwo => "BRINGS +2 RANDOM GUESTS",
            Self::Photographer => "CAPTURE ONE GUEST'S REWARD",
            Self::Comedian => "+5 POP IF HOUSE IS FULL",
            Self::Dancer => "POP SCALES WITH # OF DANCERS",
            Self::Mascot => "+1 POP PER OLD FRIEND",
            Self::Introvert => "+1 POP PER EMPTY SPACE",
            Self::Stylist => "PERMANENTLY +1 POP TO A GUEST",
            Self::Bartender => "+2 CASH PER TROUBLE",
            Self::Writer => "+2 POP PER TROUBLE",
            Self::Climber => "+1 POP EACH APPEARANCE",
            Self::Cheerleader => "REFRESH ALL ABILITIES",
            Self::Greeter => "ADMIT & SCORE NEXT GUEST",
            Self::Magician => "SWAP STAR & NON-STAR GUEST",
            Self::Cupid => "BOOT TWO ADJACENT GUESTS",
            Self::Counselor => "REMOVE ALL TROUBLE",
            Self::Werewolf => "TROUBLE EVERY OTHER VISIT",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Blueprint for a type of guest (immutable reference data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDefinition {
    pub kind: GuestKind,
    pub name: Cow<'static, str>,
    /// Price in popularity; zero means the guest is not sold in the shop.
    #[serde(default)]
    pub shop_cost: i32,
    #[serde(default)]
    pub base_popularity: i32,
    #[serde(default)]
    pub base_cash: i32,
    #[serde(default)]
    pub ability: Option<Ability>,
    #[serde(default)]
    pub is_star: bool,
    /// Maximum copies held per scenario (stars are exempt).
    #[serde(default)]
    pub max_copies: u32,
}

impl GuestDefinition {
    #[must_use]
    pub const fn is_for_sale(&self) -> bool {
        self.shop_cost > 0
    }

    /// Whether the rolodex may hold another copy given its current count.
    #[must_use]
    pub const fn allows_copy(&self, owned: u32) -> bool {
        self.is_star || owned < self.max_copies
    }
}

/// The two star archetypes that count toward winning a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: Cow<'static, str>,
    pub star_kinds: [GuestKind; 2],
}

impl Scenario {
    #[must_use]
    pub fn features_star(&self, kind: GuestKind) -> bool {
        self.star_kinds.contains(&kind)
    }
}

/// Starting rolodex line: `quantity` copies of `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolodexEntry {
    pub kind: GuestKind,
    pub quantity: u32,
}

/// Errors raised when catalog data violates its invariants.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("archetype {0} is defined more than once")]
    DuplicateArchetype(GuestKind),
    #[error("scenario '{scenario}' names undefined archetype {kind}")]
    ScenarioStarUndefined { scenario: String, kind: GuestKind },
    #[error("scenario '{scenario}' names non-star archetype {kind}")]
    ScenarioStarNotStar { scenario: String, kind: GuestKind },
    #[error("starting rolodex names undefined archetype {0}")]
    RolodexUndefined(GuestKind),
    #[error("starting rolodex is empty")]
    EmptyRolodex,
    #[error("catalog defines no scenarios")]
    NoScenarios,
    #[error("catalog JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogData {
    guests: Vec<GuestDefinition>,
    scenarios: Vec<Scenario>,
    default_rolodex: Vec<RolodexEntry>,
}

/// Read-only reference table of archetypes, scenarios, and the starting rolodex.
#[derive(Debug, Clone)]
pub struct Catalog {
    guests: Vec<GuestDefinition>,
    index: HashMap<GuestKind, usize>,
    scenarios: Vec<Scenario>,
    default_rolodex: Vec<RolodexEntry>,
}

impl Catalog {
    /// Build a validated catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if an archetype is defined twice, a scenario names an
    /// undefined or non-star archetype, or the starting rolodex is unusable.
    pub fn new(
        guests: Vec<GuestDefinition>,
        scenarios: Vec<Scenario>,
        default_rolodex: Vec<RolodexEntry>,
    ) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(guests.len());
        for (position, def) in guests.iter().enumerate() {
            if index.insert(def.kind, position).is_some() {
                return Err(CatalogError::DuplicateArchetype(def.kind));
            }
        }
        let catalog = Self {
            guests,
            index,
            scenarios,
            default_rolodex,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data.guests, data.scenarios, data.default_rolodex)
    }

    /// Check scenario and rolodex references.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.scenarios.is_empty() {
            return Err(CatalogError::NoScenarios);
        }
        for scenario in &self.scenarios {
            for kind in scenario.star_kinds {
                let def = self
                    .definition(kind)
                    .ok_or_else(|| CatalogError::ScenarioStarUndefined {
                        scenario: scenario.name.to_string(),
                        kind,
                    })?;
                if !def.is_star {
                    return Err(CatalogError::ScenarioStarNotStar {
                        scenario: scenario.name.to_string(),
                        kind,
                    });
                }
            }
        }
        if self.default_rolodex.iter().all(|entry| entry.quantity == 0) {
            return Err(CatalogError::EmptyRolodex);
        }
        if let Some(entry) = self
            .default_rolodex
            .iter()
            .find(|entry| !self.index.contains_key(&entry.kind))
        {
            return Err(CatalogError::RolodexUndefined(entry.kind));
        }
        Ok(())
    }

    #[must_use]
    pub fn definition(&self, kind: GuestKind) -> Option<&GuestDefinition> {
        self.index.get(&kind).and_then(|&idx| self.guests.get(idx))
    }

    #[must_use]
    pub fn guests(&self) -> &[GuestDefinition] {
        &self.guests
    }

    #[must_use]
    pub fn scenario(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn default_rolodex(&self) -> &[RolodexEntry] {
        &self.default_rolodex
    }

    /// Archetypes offered in the shop for a scenario: every non-star guest
    /// with a price, plus that scenario's two stars.
    pub fn shop_offerings<'a>(
        &'a self,
        scenario: &'a Scenario,
    ) -> impl Iterator<Item = &'a GuestDefinition> + 'a {
        self.guests.iter().filter(move |def| {
            def.is_for_sale() && (!def.is_star || scenario.features_star(def.kind))
        })
    }
}

/// The built-in catalog shared by every session in the process.
#[must_use]
pub fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(builtin_catalog)
}

#[allow(clippy::too_many_arguments)]
const fn guest(
    kind: GuestKind,
    name: &'static str,
    shop_cost: i32,
    base_popularity: i32,
    base_cash: i32,
    ability: Option<Ability>,
    is_star: bool,
    max_copies: u32,
) -> GuestDefinition {
    GuestDefinition {
        kind,
        name: Cow::Borrowed(name),
        shop_cost,
        base_popularity,
        base_cash,
        ability,
        is_star,
        max_copies,
    }
}

const fn star(
    kind: GuestKind,
    name: &'static str,
    shop_cost: i32,
    base_popularity: i32,
    base_cash: i32,
    ability: Option<Ability>,
) -> GuestDefinition {
    guest(kind, name, shop_cost, base_popularity, base_cash, ability, true, 0)
}

const fn scenario(name: &'static str, first: GuestKind, second: GuestKind) -> Scenario {
    Scenario {
        name: Cow::Borrowed(name),
        star_kinds: [first, second],
    }
}

const BUILTIN_GUESTS: &[GuestDefinition] = &[
    // Default guests
    guest(GuestKind::OldFriend, "Old Friend", 0, 1, 0, None, false, 0),
    guest(GuestKind::RichPal, "Rich Pal", 0, 0, 1, None, false, 0),
    guest(GuestKind::WildBuddy, "Wild Buddy", 0, 2, 0, Some(Ability::Trouble), false, 0),
    // Shop guests
    guest(GuestKind::Driver, "Driver", 3, 1, 0, Some(Ability::Fetch), false, 4),
    guest(GuestKind::PrivateI, "Private I.", 4, 1, 0, Some(Ability::Peek), false, 4),
    guest(GuestKind::Hippy, "Hippy", 3, 1, 0, Some(Ability::CancelTrouble), false, 4),
    guest(GuestKind::CuteDog, "Cute Dog", 7, 2, 0, Some(Ability::CancelTrouble), false, 4),
    guest(GuestKind::Security, "Security", 4, 1, 0, Some(Ability::Boot), false, 4),
    guest(GuestKind::Wrestler, "Wrestler", 9, 2, 0, Some(Ability::Boot), false, 4),
    guest(GuestKind::WatchDog, "Watch Dog", 6, 2, 0, Some(Ability::Peek), false, 4),
    guest(GuestKind::Spy, "Spy", 8, 2, 1, Some(Ability::Fetch), false, 4),
    guest(GuestKind::Grillmaster, "Grillmaster", 5, 2, 0, None, false, 4),
    guest(GuestKind::Athlete, "Athlete", 7, 3, 0, None, false, 4),
    guest(GuestKind::Dancer, "Dancer", 7, 0, 0, Some(Ability::Dancer), false, 8),
    guest(GuestKind::MrPopular, "Mr. Popular", 5, 1, 0, Some(Ability::BringOne), false, 4),
    guest(GuestKind::Celebrity, "Celebrity", 11, 3, 0, Some(Ability::BringTwo), false, 2),
    guest(GuestKind::TicketTaker, "Ticket Taker", 6, 0, 2, None, false, 4),
    guest(GuestKind::Comedian, "Comedian", 5, 0, 0, Some(Ability::Comedian), false, 4),
    guest(GuestKind::Photographer, "Photographer", 5, 1, 0, Some(Ability::Photographer), false, 4),
    guest(GuestKind::Caterer, "Caterer", 6, 0, 3, None, false, 4),
    guest(GuestKind::Auctioneer, "Auctioneer", 9, 0, 4, None, false, 2),
    guest(GuestKind::Mascot, "Mascot", 5, 0, 0, Some(Ability::Mascot), false, 4),
    guest(GuestKind::Introvert, "Introvert", 4, 0, 0, Some(Ability::Introvert), false, 4),
    guest(GuestKind::Stylist, "Stylist", 7, 1, 0, Some(Ability::Stylist), false, 4),
    guest(GuestKind::Bartender, "Bartender", 6, 0, 0, Some(Ability::Bartender), false, 4),
    guest(GuestKind::Writer, "Writer", 6, 0, 0, Some(Ability::Writer), false, 4),
    guest(GuestKind::Climber, "Climber", 8, 1, 0, Some(Ability::Climber), false, 4),
    guest(GuestKind::Cheerleader, "Cheerleader", 6, 1, 0, Some(Ability::Cheerleader), false, 4),
    guest(GuestKind::Greeter, "Greeter", 6, 1, 0, Some(Ability::Greeter), false, 4),
    guest(GuestKind::Magician, "Magician", 10, 1, 0, Some(Ability::Magician), false, 2),
    guest(GuestKind::Cupid, "Cupid", 7, 1, 0, Some(Ability::Cupid), false, 2),
    guest(GuestKind::Counselor, "Counselor", 8, 1, 0, Some(Ability::Counselor), false, 2),
    guest(GuestKind::Werewolf, "Werewolf", 5, 4, 0, Some(Ability::Werewolf), false, 4),
    guest(GuestKind::Monkey, "Monkey", 3, 3, 0, Some(Ability::Trouble), false, 4),
    guest(GuestKind::RockStar, "Rock Star", 10, 5, 2, Some(Ability::Trouble), false, 2),
    guest(GuestKind::Gangster, "Gangster", 6, 0, 4, Some(Ability::Trouble), false, 4),
    guest(GuestKind::Gambler, "Gambler", 7, 0, 2, Some(Ability::Shuffle), false, 4),
    // Star guests
    star(GuestKind::Alien, "Alien", 40, 0, 0, Some(Ability::Peek)),
    star(GuestKind::Leprechaun, "Leprechaun", 36, 0, 3, None),
    star(GuestKind::Genie, "Genie", 44, 1, 0, Some(Ability::Fetch)),
    star(GuestKind::Dragon, "Dragon", 30, 4, 0, Some(Ability::Trouble)),
    star(GuestKind::Dinosaur, "Dinosaur", 38, 2, 0, None),
    star(GuestKind::Mermaid, "Mermaid", 40, 1, 0, Some(Ability::Stylist)),
    star(GuestKind::Ghost, "Ghost", 35, 0, 0, Some(Ability::Boot)),
    star(GuestKind::Unicorn, "Unicorn", 42, 1, 0, Some(Ability::CancelTrouble)),
    star(GuestKind::Superhero, "Superhero", 45, 2, 0, Some(Ability::Counselor)),
];

const BUILTIN_SCENARIOS: &[Scenario] = &[
    scenario("Close Encounters", GuestKind::Alien, GuestKind::Leprechaun),
    scenario("Wishes And Wings", GuestKind::Genie, GuestKind::Dragon),
    scenario("Prehistoric Beach", GuestKind::Dinosaur, GuestKind::Mermaid),
    scenario("Spooky Stables", GuestKind::Ghost, GuestKind::Unicorn),
    scenario("Heroes From Beyond", GuestKind::Superhero, GuestKind::Alien),
];

const BUILTIN_ROLODEX: &[RolodexEntry] = &[
    RolodexEntry {
        kind: GuestKind::OldFriend,
        quantity: 4,
    },
    RolodexEntry {
        kind: GuestKind::RichPal,
        quantity: 3,
    },
    RolodexEntry {
        kind: GuestKind::WildBuddy,
        quantity: 3,
    },
];

fn builtin_catalog() -> Catalog {
    let mut index = HashMap::with_capacity(BUILTIN_GUESTS.len());
    for (position, def) in BUILTIN_GUESTS.iter().enumerate() {
        index.insert(def.kind, position);
    }
    Catalog {
        guests: BUILTIN_GUESTS.to_vec(),
        index,
        scenarios: BUILTIN_SCENARIOS.to_vec(),
        default_rolodex: BUILTIN_ROLODEX.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid_and_complete() {
        let catalog = catalog();
        catalog.validate().unwrap();
        assert_eq!(catalog.guests().len(), GuestKind::ALL.len());
        for kind in GuestKind::ALL {
            assert!(catalog.definition(*kind).is_some(), "{kind} missing");
        }
        assert_eq!(catalog.scenario_count(), 5);
    }

    #[test]
    fn stars_are_exempt_from_copy_limits() {
        let catalog = catalog();
        let alien = catalog.definition(GuestKind::Alien).unwrap();
        assert!(alien.allows_copy(50));
        let hippy = catalog.definition(GuestKind::Hippy).unwrap();
        assert!(hippy.allows_copy(3));
        assert!(!hippy.allows_copy(4));
    }

    #[test]
    fn shop_only_offers_scenario_stars() {
        let catalog = catalog();
        let scenario = catalog.scenario(0).unwrap();
        let stars: Vec<GuestKind> = catalog
            .shop_offerings(scenario)
            .filter(|def| def.is_star)
            .map(|def| def.kind)
            .collect();
        assert_eq!(stars, vec![GuestKind::Alien, GuestKind::Leprechaun]);
        assert!(
            catalog
                .shop_offerings(scenario)
                .all(|def| def.kind != GuestKind::OldFriend)
        );
    }

    #[test]
    fn kind_strings_roundtrip() {
        for kind in GuestKind::ALL {
            assert_eq!(kind.as_str().parse::<GuestKind>(), Ok(*kind));
        }
        assert!("bouncer".parse::<GuestKind>().is_err());
    }

    #[test]
    fn json_catalog_rejects_duplicates() {
        let json = r#"{
            "guests": [
                { "kind": "old_friend", "name": "Old Friend", "base_popularity": 1 },
                { "kind": "old_friend", "name": "Older Friend", "base_popularity": 2 }
            ],
            "scenarios": [],
            "default_rolodex": [ { "kind": "old_friend", "quantity": 2 } ]
        }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateArchetype(GuestKind::OldFriend)
        ));
    }

    #[test]
    fn json_catalog_rejects_non_star_scenarios() {
        let json = r#"{
            "guests": [
                { "kind": "old_friend", "name": "Old Friend", "base_popularity": 1 },
                { "kind": "alien", "name": "Alien", "is_star": true }
            ],
            "scenarios": [ { "name": "Bad", "star_kinds": ["alien", "old_friend"] } ],
            "default_rolodex": [ { "kind": "old_friend", "quantity": 2 } ]
        }"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::ScenarioStarNotStar { .. }));
    }

    #[test]
    fn json_catalog_loads_minimal_data() {
        let json = r#"{
            "guests": [
                { "kind": "old_friend", "name": "Old Friend", "base_popularity": 1 },
                { "kind": "ghost", "name": "Ghost", "is_star": true, "shop_cost": 30 },
                { "kind": "unicorn", "name": "Unicorn", "is_star": true, "shop_cost": 30 }
            ],
            "scenarios": [ { "name": "Tiny", "star_kinds": ["ghost", "unicorn"] } ],
            "default_rolodex": [ { "kind": "old_friend", "quantity": 3 } ]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.guests().len(), 3);
        assert!(catalog.definition(GuestKind::Dancer).is_none());
        assert_eq!(catalog.default_rolodex()[0].quantity, 3);
    }
}

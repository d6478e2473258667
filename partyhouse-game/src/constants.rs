//! Centralized balance and tuning constants for Party House rules.
//!
//! These values define the deterministic math for the core engine. Keeping
//! them together ensures that gameplay can only be adjusted via code changes
//! reviewed in version control. `RulesConfig` defaults are drawn from here.

// Journal keys -------------------------------------------------------------
pub(crate) const LOG_SCENARIO_STARTED: &str = "log.scenario.started";
pub(crate) const LOG_SCENARIO_WON: &str = "log.scenario.won";
pub(crate) const LOG_SCENARIO_LOST: &str = "log.scenario.lost";
pub(crate) const LOG_SCENARIO_ADVANCED: &str = "log.scenario.advanced";
pub(crate) const LOG_PARTY_STARTED: &str = "log.party.started";
pub(crate) const LOG_PARTY_ENDED: &str = "log.party.ended";
pub(crate) const LOG_PARTY_SHUTDOWN: &str = "log.party.shutdown";
pub(crate) const LOG_GUEST_ADMITTED: &str = "log.guest.admitted";
pub(crate) const LOG_GUEST_BROUGHT: &str = "log.guest.brought";
pub(crate) const LOG_GUEST_BANNED: &str = "log.guest.banned";
pub(crate) const LOG_GUEST_BOOTED: &str = "log.guest.booted";
pub(crate) const LOG_GUEST_FETCHED: &str = "log.guest.fetched";
pub(crate) const LOG_TROUBLE_CANCELLED: &str = "log.trouble.cancelled";
pub(crate) const LOG_REWARD_BANKED: &str = "log.reward.banked";
pub(crate) const LOG_PEEK_REVEALED: &str = "log.peek.revealed";
pub(crate) const LOG_PEEK_REJECTED: &str = "log.peek.rejected";
pub(crate) const LOG_ABILITY_USED_PREFIX: &str = "log.ability.";
pub(crate) const LOG_SHOP_PURCHASE: &str = "log.shop.purchase";
pub(crate) const LOG_SHOP_EXPANSION: &str = "log.shop.expansion";
pub(crate) const LOG_SHOP_OPENED: &str = "log.shop.opened";

/// Maximum number of journal keys retained on a snapshot.
pub const JOURNAL_WINDOW: usize = 64;

// Captions -----------------------------------------------------------------
pub(crate) const CAPTION_TITLE: &str = "PRESS START TO THROW A PARTY.";
pub(crate) const CAPTION_FIRST_PARTY: &str = "GET THIS PARTY STARTED!";
pub(crate) const CAPTION_PARTY_FULL: &str = "THE PARTY IS FULL.";
pub(crate) const CAPTION_FULL_WITH_ACTIONS: &str = "PARTY FULL, BUT ACTIONS STILL AVAILABLE.";
pub(crate) const CAPTION_NO_GUESTS: &str = "NO MORE GUESTS AVAILABLE.";
pub(crate) const CAPTION_SHUTDOWN: &str = "OH NO! THE COPS HAVE SHOWN UP! WHO GETS THE BLAME?";
pub(crate) const CAPTION_WON: &str = "YOU WIN! THE PARTY WAS LEGENDARY!";
pub(crate) const CAPTION_LOST: &str = "OUT OF TIME! THE SUMMER IS OVER.";
pub(crate) const CAPTION_BANNED: &str = "GUEST BANNED. MOVING ON...";
pub(crate) const CAPTION_SCENARIO_CLEARED: &str = "SCENARIO CLEARED! ADVANCE OR PLAY IT AGAIN.";
pub(crate) const CAPTION_ALL_SCENARIOS: &str = "EVERY SCENARIO IS COMPLETE. WHAT A SUMMER!";
pub(crate) const CAPTION_SHOP: &str = "TIME TO GO SHOPPING.";
pub(crate) const CAPTION_CANT_AFFORD: &str = "YOU CAN'T AFFORD THAT.";
pub(crate) const CAPTION_NOT_FOR_SALE: &str = "THAT GUEST ISN'T FOR SALE.";
pub(crate) const CAPTION_SOLD_OUT: &str = "NO MORE COPIES OF THAT GUEST.";
pub(crate) const CAPTION_HOUSE_MAXED: &str = "THE HOUSE CAN'T GET ANY BIGGER.";
pub(crate) const CAPTION_CHOOSE_TARGET: &str = "CHOOSE A TARGET.";

// House & round tuning -----------------------------------------------------
pub(crate) const INITIAL_HOUSE_SIZE: u32 = 5;
pub(crate) const MAX_HOUSE_SIZE: u32 = 34;
pub(crate) const MAX_PARTIES_PER_SCENARIO: u32 = 25;
pub(crate) const STARS_REQUIRED: u32 = 4;
pub(crate) const TROUBLE_LIMIT: u32 = 3;
pub(crate) const INITIAL_EXPANSION_COST: i32 = 2;
pub(crate) const EXPANSION_COST_STEP: i32 = 1;
pub(crate) const EXPANSION_COST_MAX: i32 = 12;
pub(crate) const INITIAL_POPULARITY_CAP: i32 = 65;
pub(crate) const INITIAL_CASH_CAP: i32 = 65;

// Ability tuning -----------------------------------------------------------
pub(crate) const CLIMBER_MAX_LEVEL: u8 = 9;
pub(crate) const COMEDIAN_FULL_HOUSE_BONUS: i32 = 5;
pub(crate) const MASCOT_BONUS_PER_OLD_FRIEND: i32 = 1;
pub(crate) const INTROVERT_BONUS_PER_EMPTY_SLOT: i32 = 1;
pub(crate) const BARTENDER_CASH_PER_TROUBLE: i32 = 2;
pub(crate) const WRITER_POP_PER_TROUBLE: i32 = 2;
pub(crate) const STYLIST_POP_GAIN: i32 = 1;
pub(crate) const CLIMBER_POP_PER_LEVEL: i32 = 1;

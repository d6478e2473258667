//! Guest instances and the factory that mints them.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::abilities;
use crate::catalog::{Ability, Catalog, GuestKind};
use crate::error::RulesError;

/// Unique guest instance identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(pub u64);

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "guest_{}", self.0)
    }
}

/// Capability-specific runtime data carried by only a few archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestExtension {
    /// Climbing level and the round it was last admitted in.
    Climb { level: u8, last_round: Option<u32> },
    /// How many times the guest has been admitted.
    Appearances { count: u32 },
}

/// Which extension an ability needs on its instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    Climb,
    Appearances,
}

impl ExtensionKind {
    #[must_use]
    pub const fn initial(self) -> GuestExtension {
        match self {
            Self::Climb => GuestExtension::Climb {
                level: 1,
                last_round: None,
            },
            Self::Appearances => GuestExtension::Appearances { count: 0 },
        }
    }
}

/// Inline storage; no archetype needs more than one extension.
pub type ExtensionSet = SmallVec<[GuestExtension; 1]>;

/// A concrete guest with runtime state layered on its definition.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInstance {
    pub id: GuestId,
    pub kind: GuestKind,
    /// Current popularity value (stylist and climber raise it permanently).
    pub popularity: i32,
    pub cash: i32,
    pub ability: Option<Ability>,
    pub is_star: bool,
    /// Whether the active ability has been used this party.
    #[serde(default)]
    pub ability_used: bool,
    #[serde(default)]
    pub trouble_active: bool,
    /// Trouble negated by a canceller elsewhere in the house this party.
    #[serde(default)]
    pub trouble_cancelled: bool,
    /// Canceller spent on this guest's trouble, if any.
    #[serde(default)]
    pub cancelled_by: Option<GuestId>,
    /// Reward already paid out this party (photographer, greeter).
    #[serde(default)]
    pub reward_banked: bool,
    /// Excluded from every future draw pile.
    #[serde(default)]
    pub banned: bool,
    #[serde(default)]
    pub extensions: ExtensionSet,
}

impl GuestInstance {
    /// Trouble that counts toward the shutdown threshold.
    #[must_use]
    pub const fn has_active_trouble(&self) -> bool {
        self.trouble_active && !self.trouble_cancelled
    }

    #[must_use]
    pub fn climb_level(&self) -> Option<u8> {
        self.extensions.iter().find_map(|ext| match ext {
            GuestExtension::Climb { level, .. } => Some(*level),
            GuestExtension::Appearances { .. } => None,
        })
    }

    #[must_use]
    pub fn appearances(&self) -> Option<u32> {
        self.extensions.iter().find_map(|ext| match ext {
            GuestExtension::Appearances { count } => Some(*count),
            GuestExtension::Climb { .. } => None,
        })
    }

    pub(crate) fn extension_mut(&mut self, kind: ExtensionKind) -> Option<&mut GuestExtension> {
        self.extensions.iter_mut().find(|ext| {
            matches!(
                (kind, ext),
                (ExtensionKind::Climb, GuestExtension::Climb { .. })
                    | (ExtensionKind::Appearances, GuestExtension::Appearances { .. })
            )
        })
    }

    /// Clear the per-party flags before a new party starts.
    pub(crate) const fn reset_for_party(&mut self) {
        self.ability_used = false;
        self.trouble_cancelled = false;
        self.cancelled_by = None;
        self.reward_banked = false;
    }
}

static NEXT_PROCESS_ID: AtomicU64 = AtomicU64::new(1);

/// Mints guest instances with unique identifiers.
///
/// The default factory draws from a process-wide counter so ids never repeat
/// across sessions. [`GuestFactory::starting_at`] gives a private counter for
/// reproducible ids in tests and replays.
#[derive(Debug, Clone, Default)]
pub struct GuestFactory {
    local_next: Option<u64>,
}

impl GuestFactory {
    #[must_use]
    pub const fn new() -> Self {
        Self { local_next: None }
    }

    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self {
            local_next: Some(first),
        }
    }

    fn next_id(&mut self) -> GuestId {
        match self.local_next.as_mut() {
            Some(next) => {
                let id = *next;
                *next = next.saturating_add(1);
                GuestId(id)
            }
            None => GuestId(NEXT_PROCESS_ID.fetch_add(1, Ordering::Relaxed)),
        }
    }

    /// Create a fresh instance of an archetype.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnknownArchetype`] if the catalog has no
    /// definition for `kind`.
    pub fn instantiate(
        &mut self,
        catalog: &Catalog,
        kind: GuestKind,
    ) -> Result<GuestInstance, RulesError> {
        let def = catalog
            .definition(kind)
            .ok_or(RulesError::UnknownArchetype(kind))?;
        let extensions = def
            .ability
            .and_then(|ability| abilities::spec(ability).extension)
            .map(ExtensionKind::initial)
            .into_iter()
            .collect();
        Ok(GuestInstance {
            id: self.next_id(),
            kind,
            popularity: def.base_popularity,
            cash: def.base_cash,
            ability: def.ability,
            is_star: def.is_star,
            ability_used: false,
            trouble_active: def.ability == Some(Ability::Trouble),
            trouble_cancelled: false,
            cancelled_by: None,
            reward_banked: false,
            banned: false,
            extensions,
        })
    }

    /// Build the starting rolodex declared by the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::UnknownArchetype`] if a rolodex entry is undefined.
    pub fn starting_rolodex(&mut self, catalog: &Catalog) -> Result<Vec<GuestInstance>, RulesError> {
        let mut guests = Vec::new();
        for entry in catalog.default_rolodex() {
            for _ in 0..entry.quantity {
                guests.push(self.instantiate(catalog, entry.kind)?);
            }
        }
        Ok(guests)
    }
}

//! The eight PokéAPI v1 resource record types.
//!
//! Every resource decodes from a generic JSON payload in one of two
//! shapes. The API embeds cross-references as "short" payloads carrying
//! only a name and a `resource_uri`; fetching a resource's own endpoint
//! yields the "full" payload with timestamps, scalars, and nested child
//! payloads. Each `decode` probes for a key only full payloads carry
//! and picks the construction path accordingly.
//!
//! Short-path names are capitalized on construction; full-path names
//! are taken verbatim. Child collections are owned by their parent, and
//! embedded back-references are by-value copies: mutating a cached
//! record never reaches into copies other records already hold.

use serde::Serialize;
use serde_json::Value;

use crate::uri;
use crate::Error;

/// A pokemon record.
///
/// Short records come from the pokedex listing and carry only the name,
/// the national id (derived from the reference string), and the
/// reference string itself. Full records add the complete stat block
/// and owned collections of every related resource; those children are
/// themselves short and need their own resolution.
#[derive(Debug, Clone, Serialize)]
pub struct Pokemon {
    /// The resource name, e.g. "Bulbasaur".
    pub name: String,
    /// National pokedex number.
    pub national_id: u32,
    pub resource_uri: String,

    /// Creation timestamp. Populated only by the full path; its
    /// presence is what marks a cached entry as fully resolved.
    pub created: Option<String>,
    pub modified: Option<String>,

    pub catch_rate: Option<i64>,
    pub species: Option<String>,
    pub hp: Option<i64>,
    pub attack: Option<i64>,
    pub defense: Option<i64>,
    pub sp_atk: Option<i64>,
    pub sp_def: Option<i64>,
    pub speed: Option<i64>,
    /// Sum of the six base stats.
    pub total: Option<i64>,
    /// Egg cycles needed to hatch.
    pub egg_cycles: Option<i64>,
    pub ev_yield: Option<String>,
    pub exp: Option<i64>,
    pub growth_rate: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    /// Base happiness.
    pub happiness: Option<i64>,
    /// Male to female ratio in the format "M / F".
    pub male_female_ratio: Option<String>,

    pub abilities: Vec<Ability>,
    pub descriptions: Vec<Description>,
    pub egg_groups: Vec<EggGroup>,
    pub evolutions: Vec<Evolution>,
    pub moves: Vec<Move>,
    pub sprites: Vec<Sprite>,
    pub types: Vec<Type>,
}

impl Pokemon {
    /// Decode a pokemon payload, full or short. The full shape is
    /// recognized by its explicit `national_id`.
    pub fn decode(info: &Value) -> Result<Self, Error> {
        if info.get("national_id").and_then(Value::as_u64).is_some() {
            Self::decode_full(info)
        } else {
            Self::decode_short(info)
        }
    }

    fn decode_full(info: &Value) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(info, "pokemon", "name")?,
            national_id: require_id(info, "pokemon", "national_id")?,
            resource_uri: require_str(info, "pokemon", "resource_uri")?,
            created: optional_str(info, "created"),
            modified: optional_str(info, "modified"),
            catch_rate: optional_int(info, "catch_rate"),
            species: optional_str(info, "species"),
            hp: optional_int(info, "hp"),
            attack: optional_int(info, "attack"),
            defense: optional_int(info, "defense"),
            sp_atk: optional_int(info, "sp_atk"),
            sp_def: optional_int(info, "sp_def"),
            speed: optional_int(info, "speed"),
            total: optional_int(info, "total"),
            egg_cycles: optional_int(info, "egg_cycles"),
            ev_yield: optional_str(info, "ev_yield"),
            exp: optional_int(info, "exp"),
            growth_rate: optional_str(info, "growth_rate"),
            height: optional_str(info, "height"),
            weight: optional_str(info, "weight"),
            happiness: optional_int(info, "happiness"),
            male_female_ratio: optional_str(info, "male_femal_ratio"),
            abilities: decode_each(info, "abilities", Ability::decode)?,
            descriptions: decode_each(info, "descriptions", Description::decode)?,
            egg_groups: decode_each(info, "egg_groups", EggGroup::decode)?,
            evolutions: decode_each(info, "evolutions", Evolution::decode)?,
            moves: decode_each(info, "moves", Move::decode)?,
            sprites: decode_each(info, "sprites", Sprite::decode)?,
            types: decode_each(info, "types", Type::decode)?,
        })
    }

    fn decode_short(info: &Value) -> Result<Self, Error> {
        let resource_uri = require_str(info, "pokemon", "resource_uri")?;
        Ok(Self {
            name: capitalize(&require_str(info, "pokemon", "name")?),
            national_id: uri::extract_id(&resource_uri, uri::POKEMON_PREFIX)?,
            resource_uri,
            created: None,
            modified: None,
            catch_rate: None,
            species: None,
            hp: None,
            attack: None,
            defense: None,
            sp_atk: None,
            sp_def: None,
            speed: None,
            total: None,
            egg_cycles: None,
            ev_yield: None,
            exp: None,
            growth_rate: None,
            height: None,
            weight: None,
            happiness: None,
            male_female_ratio: None,
            abilities: Vec::new(),
            descriptions: Vec::new(),
            egg_groups: Vec::new(),
            evolutions: Vec::new(),
            moves: Vec::new(),
            sprites: Vec::new(),
            types: Vec::new(),
        })
    }
}

/// An evolution link. These only ever appear embedded in a full pokemon
/// payload and have no short form; the reference string points at the
/// pokemon this evolution leads to.
#[derive(Debug, Clone, Serialize)]
pub struct Evolution {
    /// Level at which the evolution happens, for level-up methods.
    pub level: Option<i64>,
    /// Evolution method, e.g. "level_up" or "stone".
    pub method: String,
    pub detail: Option<String>,
    /// Name of the pokemon evolved into.
    pub to: String,
    pub resource_uri: String,
    /// National id of the pokemon the reference string points at.
    pub pokemon_national_id: u32,
}

impl Evolution {
    pub fn decode(info: &Value) -> Result<Self, Error> {
        let resource_uri = require_str(info, "evolution", "resource_uri")?;
        Ok(Self {
            level: optional_int(info, "level"),
            method: require_str(info, "evolution", "method")?,
            detail: optional_str(info, "detail"),
            to: require_str(info, "evolution", "to")?,
            pokemon_national_id: uri::extract_id(&resource_uri, uri::POKEMON_PREFIX)?,
            resource_uri,
        })
    }
}

/// An elemental type record.
///
/// A full type payload is self-referential: its five effectiveness
/// collections hold further (short) type payloads.
#[derive(Debug, Clone, Serialize)]
pub struct Type {
    /// The resource name, e.g. "Water".
    pub name: String,
    pub id: u32,
    pub resource_uri: String,

    pub created: Option<String>,
    pub modified: Option<String>,

    /// Types this type is ineffective against.
    pub ineffective: Vec<Type>,
    /// Types this type has no effect against.
    pub no_effect: Vec<Type>,
    /// Types this type is resistant to.
    pub resistance: Vec<Type>,
    /// Types this type is super effective against.
    pub super_effective: Vec<Type>,
    /// Types this type is weak to.
    pub weakness: Vec<Type>,
}

impl Type {
    /// Decode a type payload, full or short. The full shape is
    /// recognized by its `created` timestamp.
    pub fn decode(info: &Value) -> Result<Self, Error> {
        if info.get("created").and_then(Value::as_str).is_some() {
            Self::decode_full(info)
        } else {
            Self::decode_short(info)
        }
    }

    pub(crate) fn decode_full(info: &Value) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(info, "type", "name")?,
            id: require_id(info, "type", "id")?,
            resource_uri: require_str(info, "type", "resource_uri")?,
            created: optional_str(info, "created"),
            modified: optional_str(info, "modified"),
            ineffective: decode_each(info, "ineffective", Type::decode)?,
            no_effect: decode_each(info, "no_effect", Type::decode)?,
            resistance: decode_each(info, "resistance", Type::decode)?,
            super_effective: decode_each(info, "super_effective", Type::decode)?,
            weakness: decode_each(info, "weakness", Type::decode)?,
        })
    }

    fn decode_short(info: &Value) -> Result<Self, Error> {
        let resource_uri = require_str(info, "type", "resource_uri")?;
        Ok(Self {
            name: capitalize(&require_str(info, "type", "name")?),
            id: uri::extract_id(&resource_uri, uri::TYPE_PREFIX)?,
            resource_uri,
            created: None,
            modified: None,
            ineffective: Vec::new(),
            no_effect: Vec::new(),
            resistance: Vec::new(),
            super_effective: Vec::new(),
            weakness: Vec::new(),
        })
    }
}

/// Types compare by name alone. Consumers match a pokemon's types
/// against entries in effectiveness collections, where ids and nested
/// relations are not populated symmetrically.
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Type {}

/// A move record.
#[derive(Debug, Clone, Serialize)]
pub struct Move {
    /// The resource name, e.g. "Tackle".
    pub name: String,
    pub id: u32,
    pub resource_uri: String,

    pub created: Option<String>,
    pub modified: Option<String>,

    /// How the move is learned. Only present on short records embedded
    /// in a pokemon payload, e.g. "level up" or "machine".
    pub learn_type: Option<String>,

    pub description: Option<String>,
    pub power: Option<i64>,
    pub accuracy: Option<i64>,
    pub category: Option<String>,
    /// Power points.
    pub pp: Option<i64>,
}

impl Move {
    /// Decode a move payload, full or short. The full shape is
    /// recognized by its `description`.
    pub fn decode(info: &Value) -> Result<Self, Error> {
        if info.get("description").and_then(Value::as_str).is_some() {
            Self::decode_full(info)
        } else {
            Self::decode_short(info)
        }
    }

    fn decode_full(info: &Value) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(info, "move", "name")?,
            id: require_id(info, "move", "id")?,
            resource_uri: require_str(info, "move", "resource_uri")?,
            created: optional_str(info, "created"),
            modified: optional_str(info, "modified"),
            learn_type: None,
            description: optional_str(info, "description"),
            power: optional_int(info, "power"),
            accuracy: optional_int(info, "accuracy"),
            category: optional_str(info, "category"),
            pp: optional_int(info, "pp"),
        })
    }

    fn decode_short(info: &Value) -> Result<Self, Error> {
        let resource_uri = require_str(info, "move", "resource_uri")?;
        Ok(Self {
            name: capitalize(&require_str(info, "move", "name")?),
            id: uri::extract_id(&resource_uri, uri::MOVE_PREFIX)?,
            resource_uri,
            created: None,
            modified: None,
            learn_type: optional_str(info, "learn_type"),
            description: None,
            power: None,
            accuracy: None,
            category: None,
            pp: None,
        })
    }
}

/// An ability record.
#[derive(Debug, Clone, Serialize)]
pub struct Ability {
    /// The resource name, e.g. "Overgrow".
    pub name: String,
    pub id: u32,
    pub resource_uri: String,

    pub created: Option<String>,
    pub modified: Option<String>,

    pub description: Option<String>,
}

impl Ability {
    /// Decode an ability payload, full or short. The full shape is
    /// recognized by its `description`.
    pub fn decode(info: &Value) -> Result<Self, Error> {
        if info.get("description").and_then(Value::as_str).is_some() {
            Self::decode_full(info)
        } else {
            Self::decode_short(info)
        }
    }

    fn decode_full(info: &Value) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(info, "ability", "name")?,
            id: require_id(info, "ability", "id")?,
            resource_uri: require_str(info, "ability", "resource_uri")?,
            created: optional_str(info, "created"),
            modified: optional_str(info, "modified"),
            description: optional_str(info, "description"),
        })
    }

    fn decode_short(info: &Value) -> Result<Self, Error> {
        let resource_uri = require_str(info, "ability", "resource_uri")?;
        Ok(Self {
            name: capitalize(&require_str(info, "ability", "name")?),
            id: uri::extract_id(&resource_uri, uri::ABILITY_PREFIX)?,
            resource_uri,
            created: None,
            modified: None,
            description: None,
        })
    }
}

/// An egg group record.
#[derive(Debug, Clone, Serialize)]
pub struct EggGroup {
    /// The resource name, e.g. "Monster".
    pub name: String,
    pub id: u32,
    pub resource_uri: String,

    pub created: Option<String>,
    pub modified: Option<String>,

    /// All pokemon in this egg group, as short records.
    pub pokemon: Vec<Pokemon>,
}

impl EggGroup {
    /// Decode an egg group payload, full or short. The full shape is
    /// recognized by its `created` timestamp.
    pub fn decode(info: &Value) -> Result<Self, Error> {
        if info.get("created").and_then(Value::as_str).is_some() {
            Self::decode_full(info)
        } else {
            Self::decode_short(info)
        }
    }

    pub(crate) fn decode_full(info: &Value) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(info, "egg group", "name")?,
            id: require_id(info, "egg group", "id")?,
            resource_uri: require_str(info, "egg group", "resource_uri")?,
            created: optional_str(info, "created"),
            modified: optional_str(info, "modified"),
            pokemon: decode_each(info, "pokemon", Pokemon::decode)?,
        })
    }

    fn decode_short(info: &Value) -> Result<Self, Error> {
        let resource_uri = require_str(info, "egg group", "resource_uri")?;
        Ok(Self {
            name: capitalize(&require_str(info, "egg group", "name")?),
            id: uri::extract_id(&resource_uri, uri::EGG_GROUP_PREFIX)?,
            resource_uri,
            created: None,
            modified: None,
            pokemon: Vec::new(),
        })
    }
}

/// A pokedex flavor-text record.
#[derive(Debug, Clone, Serialize)]
pub struct Description {
    pub name: String,
    pub id: u32,
    pub resource_uri: String,

    pub created: Option<String>,
    pub modified: Option<String>,

    pub description: Option<String>,
    /// Games this description appears in.
    pub games: Vec<Game>,
    /// The pokemon this description is for, as a by-value copy.
    pub pokemon: Option<Box<Pokemon>>,
}

impl Description {
    /// Decode a description payload, full or short. The full shape is
    /// recognized by its `description` text.
    pub fn decode(info: &Value) -> Result<Self, Error> {
        if info.get("description").and_then(Value::as_str).is_some() {
            Self::decode_full(info)
        } else {
            Self::decode_short(info)
        }
    }

    fn decode_full(info: &Value) -> Result<Self, Error> {
        let pokemon = match info.get("pokemon") {
            Some(raw) => Some(Box::new(Pokemon::decode(raw)?)),
            None => None,
        };
        Ok(Self {
            name: require_str(info, "description", "name")?,
            id: require_id(info, "description", "id")?,
            resource_uri: require_str(info, "description", "resource_uri")?,
            created: optional_str(info, "created"),
            modified: optional_str(info, "modified"),
            description: optional_str(info, "description"),
            games: decode_each(info, "games", Game::decode)?,
            pokemon,
        })
    }

    fn decode_short(info: &Value) -> Result<Self, Error> {
        let resource_uri = require_str(info, "description", "resource_uri")?;
        Ok(Self {
            name: capitalize(&require_str(info, "description", "name")?),
            id: uri::extract_id(&resource_uri, uri::DESCRIPTION_PREFIX)?,
            resource_uri,
            created: None,
            modified: None,
            description: None,
            games: Vec::new(),
            pokemon: None,
        })
    }
}

/// A sprite record.
///
/// A full record carries the remote image locator; the raw bytes are
/// only attached by the client after a second fetch, and a record is
/// never cached without them.
#[derive(Debug, Clone, Serialize)]
pub struct Sprite {
    pub name: String,
    pub id: u32,
    pub resource_uri: String,

    pub created: Option<String>,
    pub modified: Option<String>,

    /// The pokemon this sprite is for, as a by-value copy.
    pub pokemon: Option<Box<Pokemon>>,
    /// Remote locator for the image itself.
    pub image_uri: Option<String>,
    /// The raw image bytes, once fetched.
    pub image: Option<Vec<u8>>,
}

impl Sprite {
    /// Decode a sprite payload, full or short. The full shape is
    /// recognized by its `image` locator.
    pub fn decode(info: &Value) -> Result<Self, Error> {
        if info.get("image").and_then(Value::as_str).is_some() {
            Self::decode_full(info)
        } else {
            Self::decode_short(info)
        }
    }

    fn decode_full(info: &Value) -> Result<Self, Error> {
        let pokemon = match info.get("pokemon") {
            Some(raw) => Some(Box::new(Pokemon::decode(raw)?)),
            None => None,
        };
        Ok(Self {
            name: require_str(info, "sprite", "name")?,
            id: require_id(info, "sprite", "id")?,
            resource_uri: require_str(info, "sprite", "resource_uri")?,
            created: optional_str(info, "created"),
            modified: optional_str(info, "modified"),
            pokemon,
            image_uri: optional_str(info, "image"),
            image: None,
        })
    }

    fn decode_short(info: &Value) -> Result<Self, Error> {
        let resource_uri = require_str(info, "sprite", "resource_uri")?;
        Ok(Self {
            name: capitalize(&require_str(info, "sprite", "name")?),
            id: uri::extract_id(&resource_uri, uri::SPRITE_PREFIX)?,
            resource_uri,
            created: None,
            modified: None,
            pokemon: None,
            image_uri: None,
            image: None,
        })
    }
}

/// A game title record.
#[derive(Debug, Clone, Serialize)]
pub struct Game {
    /// The resource name, e.g. "Pokemon Red".
    pub name: String,
    pub id: u32,
    pub resource_uri: String,

    pub created: Option<String>,
    pub modified: Option<String>,

    pub release_year: Option<i64>,
    pub generation: Option<i64>,
}

impl Game {
    /// Decode a game payload, full or short. The full shape is
    /// recognized by its `release_year`.
    pub fn decode(info: &Value) -> Result<Self, Error> {
        if info.get("release_year").and_then(Value::as_i64).is_some() {
            Self::decode_full(info)
        } else {
            Self::decode_short(info)
        }
    }

    fn decode_full(info: &Value) -> Result<Self, Error> {
        Ok(Self {
            name: require_str(info, "game", "name")?,
            id: require_id(info, "game", "id")?,
            resource_uri: require_str(info, "game", "resource_uri")?,
            created: optional_str(info, "created"),
            modified: optional_str(info, "modified"),
            release_year: optional_int(info, "release_year"),
            generation: optional_int(info, "generation"),
        })
    }

    fn decode_short(info: &Value) -> Result<Self, Error> {
        let resource_uri = require_str(info, "game", "resource_uri")?;
        Ok(Self {
            name: capitalize(&require_str(info, "game", "name")?),
            id: uri::extract_id(&resource_uri, uri::GAME_PREFIX)?,
            resource_uri,
            created: None,
            modified: None,
            release_year: None,
            generation: None,
        })
    }
}

// ============================================================================
// Decode helpers
// ============================================================================

fn require_str(info: &Value, kind: &'static str, field: &'static str) -> Result<String, Error> {
    info.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(Error::MissingField { kind, field })
}

fn require_id(info: &Value, kind: &'static str, field: &'static str) -> Result<u32, Error> {
    info.get(field)
        .and_then(Value::as_u64)
        .and_then(|id| u32::try_from(id).ok())
        .ok_or(Error::MissingField { kind, field })
}

fn optional_str(info: &Value, field: &str) -> Option<String> {
    info.get(field).and_then(Value::as_str).map(str::to_string)
}

fn optional_int(info: &Value, field: &str) -> Option<i64> {
    info.get(field).and_then(Value::as_i64)
}

/// Decode every element of an array field, propagating the first child
/// error. An absent field decodes as an empty collection.
fn decode_each<T>(
    info: &Value,
    field: &str,
    decode: impl Fn(&Value) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    match info.get(field).and_then(Value::as_array) {
        Some(items) => items.iter().map(decode).collect(),
        None => Ok(Vec::new()),
    }
}

/// Word-by-word capitalization applied to short-path names, which the
/// API serves lowercased.
fn capitalize(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

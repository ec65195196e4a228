//! In-memory resource caches keyed by numeric id.
//!
//! One map per resource kind, unbounded, never evicted. Storage order
//! is whatever the hash maps do; the pokedex accessor sorts on the way
//! out. Freshness is asymmetric: the pokemon map is seeded with short
//! records by the index load, so an entry only counts as resolved once
//! its `created` timestamp is populated. No other map is ever seeded
//! with short records, so for those presence alone is enough.

use std::collections::HashMap;

use crate::records::{Ability, Description, EggGroup, Game, Move, Pokemon, Sprite, Type};

#[derive(Debug, Default)]
pub(crate) struct ResourceCache {
    pokemon: HashMap<u32, Pokemon>,
    types: HashMap<u32, Type>,
    moves: HashMap<u32, Move>,
    abilities: HashMap<u32, Ability>,
    egg_groups: HashMap<u32, EggGroup>,
    descriptions: HashMap<u32, Description>,
    sprites: HashMap<u32, Sprite>,
    games: HashMap<u32, Game>,
}

impl ResourceCache {
    /// The fully resolved pokemon for `id`, if any. Entries seeded by
    /// the index load are short and do not count.
    pub fn fresh_pokemon(&self, id: u32) -> Option<&Pokemon> {
        self.pokemon.get(&id).filter(|p| p.created.is_some())
    }

    /// The indexed entry for `id`, short or full.
    pub fn indexed_pokemon(&self, id: u32) -> Option<&Pokemon> {
        self.pokemon.get(&id)
    }

    pub fn store_pokemon(&mut self, pokemon: Pokemon) {
        self.pokemon.insert(pokemon.national_id, pokemon);
    }

    /// Every indexed pokemon, ascending by national id.
    pub fn pokedex(&self) -> Vec<Pokemon> {
        let mut entries: Vec<Pokemon> = self.pokemon.values().cloned().collect();
        entries.sort_by_key(|p| p.national_id);
        entries
    }

    pub fn cached_type(&self, id: u32) -> Option<&Type> {
        self.types.get(&id)
    }

    pub fn store_type(&mut self, t: Type) {
        self.types.insert(t.id, t);
    }

    pub fn has_types(&self) -> bool {
        !self.types.is_empty()
    }

    /// Every cached type, ascending by id.
    pub fn all_types(&self) -> Vec<Type> {
        let mut entries: Vec<Type> = self.types.values().cloned().collect();
        entries.sort_by_key(|t| t.id);
        entries
    }

    pub fn cached_move(&self, id: u32) -> Option<&Move> {
        self.moves.get(&id)
    }

    pub fn store_move(&mut self, m: Move) {
        self.moves.insert(m.id, m);
    }

    pub fn cached_ability(&self, id: u32) -> Option<&Ability> {
        self.abilities.get(&id)
    }

    pub fn store_ability(&mut self, ability: Ability) {
        self.abilities.insert(ability.id, ability);
    }

    pub fn cached_egg_group(&self, id: u32) -> Option<&EggGroup> {
        self.egg_groups.get(&id)
    }

    pub fn store_egg_group(&mut self, group: EggGroup) {
        self.egg_groups.insert(group.id, group);
    }

    pub fn has_egg_groups(&self) -> bool {
        !self.egg_groups.is_empty()
    }

    /// Every cached egg group, ascending by id.
    pub fn all_egg_groups(&self) -> Vec<EggGroup> {
        let mut entries: Vec<EggGroup> = self.egg_groups.values().cloned().collect();
        entries.sort_by_key(|g| g.id);
        entries
    }

    pub fn cached_description(&self, id: u32) -> Option<&Description> {
        self.descriptions.get(&id)
    }

    pub fn store_description(&mut self, description: Description) {
        self.descriptions.insert(description.id, description);
    }

    pub fn cached_sprite(&self, id: u32) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn store_sprite(&mut self, sprite: Sprite) {
        self.sprites.insert(sprite.id, sprite);
    }

    pub fn cached_game(&self, id: u32) -> Option<&Game> {
        self.games.get(&id)
    }

    pub fn store_game(&mut self, game: Game) {
        self.games.insert(game.id, game);
    }
}

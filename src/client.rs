//! The resolution service.
//!
//! [`Pokedex`] is the public accessor surface: every `get_*` operation
//! checks the cache, and on a miss fetches the record's own endpoint,
//! decodes the full payload, stores it, and returns it. The client is
//! an explicit service object constructed by the host; clones are cheap
//! and share one cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rand::seq::SliceRandom;
use serde_json::Value;

use crate::cache::ResourceCache;
use crate::records::{Ability, Description, EggGroup, Game, Move, Pokemon, Sprite, Type};
use crate::transport::{HttpTransport, Transport};
use crate::Error;

const INDEX_PATH: &str = "/api/v1/pokedex/1/";
const TYPE_LIST_PATH: &str = "/api/v1/type/";
const EGG_GROUP_LIST_PATH: &str = "/api/v1/egg/";

/// Resource kinds, used to key in-flight fetch guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Pokemon,
    Type,
    Move,
    Ability,
    EggGroup,
    Description,
    Sprite,
    Game,
}

/// Caching PokéAPI client.
///
/// Resolved records are memoized for the lifetime of the client; the
/// cache is unbounded and never evicts. Cloning shares the cache.
#[derive(Clone)]
pub struct Pokedex {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    cache: Mutex<ResourceCache>,
    /// One async mutex per (kind, id) ever fetched, so concurrent
    /// resolutions of the same record issue a single transport call.
    /// Guards are never removed; the cache entry they protect outlives
    /// them anyway.
    inflight: Mutex<HashMap<(Kind, u32), Arc<tokio::sync::Mutex<()>>>>,
}

impl Pokedex {
    /// Create a client against the public API origin.
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()))
    }

    /// Create a client against a custom origin, e.g. a local mirror.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_transport(Arc::new(HttpTransport::with_base_url(base_url)))
    }

    /// Create a client over a caller-supplied transport.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                cache: Mutex::new(ResourceCache::default()),
                inflight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Fetch the national pokedex listing and seed the pokemon cache
    /// with a short record per entry.
    ///
    /// Must be called before [`national_pokedex`](Self::national_pokedex),
    /// [`get_pokemon_by_id`](Self::get_pokemon_by_id), or
    /// [`random_pokemon`](Self::random_pokemon) can return anything.
    /// Entries seeded here are short: resolving one still fetches its
    /// full record.
    pub async fn fill_national_pokedex(&self) -> Result<(), Error> {
        let response = self.inner.transport.fetch_json(INDEX_PATH).await?;
        let entries = response
            .get("pokemon")
            .and_then(Value::as_array)
            .ok_or(Error::MissingField {
                kind: "pokedex",
                field: "pokemon",
            })?;

        let mut decoded = Vec::with_capacity(entries.len());
        for entry in entries {
            decoded.push(Pokemon::decode(entry)?);
        }

        let mut cache = self.cache();
        for pokemon in decoded {
            cache.store_pokemon(pokemon);
        }
        Ok(())
    }

    /// The cached index, ascending by national id. Empty until
    /// [`fill_national_pokedex`](Self::fill_national_pokedex) has run.
    pub fn national_pokedex(&self) -> Vec<Pokemon> {
        self.cache().pokedex()
    }

    /// Resolve a short pokemon into its full record.
    ///
    /// Returns the cached record without a network call when this
    /// pokemon has already been fully fetched. An entry seeded only by
    /// the index load does not count as cached.
    pub async fn get_pokemon(&self, pokemon: &Pokemon) -> Result<Pokemon, Error> {
        let id = pokemon.national_id;
        self.resolve(
            Kind::Pokemon,
            id,
            &pokemon.resource_uri,
            move |cache| cache.fresh_pokemon(id).cloned(),
            Pokemon::decode,
            |cache, full| cache.store_pokemon(full),
        )
        .await
    }

    /// Resolve the indexed pokemon with the given national id.
    ///
    /// Fails with [`Error::NotIndexed`] when the id is absent from the
    /// index.
    pub async fn get_pokemon_by_id(&self, national_id: u32) -> Result<Pokemon, Error> {
        let entry = self
            .cache()
            .indexed_pokemon(national_id)
            .cloned()
            .ok_or(Error::NotIndexed(national_id))?;
        self.get_pokemon(&entry).await
    }

    /// Resolve a uniformly random entry from the index.
    ///
    /// Fails with [`Error::EmptyIndex`] when the index is empty.
    pub async fn random_pokemon(&self) -> Result<Pokemon, Error> {
        let entry = self
            .cache()
            .pokedex()
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(Error::EmptyIndex)?;
        self.get_pokemon(&entry).await
    }

    /// Resolve a short type into its full record, with its five
    /// effectiveness collections populated (as short types).
    pub async fn get_type(&self, t: &Type) -> Result<Type, Error> {
        let id = t.id;
        self.resolve(
            Kind::Type,
            id,
            &t.resource_uri,
            move |cache| cache.cached_type(id).cloned(),
            Type::decode,
            |cache, full| cache.store_type(full),
        )
        .await
    }

    /// Resolve a short move into its full record.
    pub async fn get_move(&self, m: &Move) -> Result<Move, Error> {
        let id = m.id;
        self.resolve(
            Kind::Move,
            id,
            &m.resource_uri,
            move |cache| cache.cached_move(id).cloned(),
            Move::decode,
            |cache, full| cache.store_move(full),
        )
        .await
    }

    /// Resolve a short ability into its full record.
    pub async fn get_ability(&self, ability: &Ability) -> Result<Ability, Error> {
        let id = ability.id;
        self.resolve(
            Kind::Ability,
            id,
            &ability.resource_uri,
            move |cache| cache.cached_ability(id).cloned(),
            Ability::decode,
            |cache, full| cache.store_ability(full),
        )
        .await
    }

    /// Resolve a short egg group into its full record, with its member
    /// pokemon populated (as short records).
    pub async fn get_egg_group(&self, group: &EggGroup) -> Result<EggGroup, Error> {
        let id = group.id;
        self.resolve(
            Kind::EggGroup,
            id,
            &group.resource_uri,
            move |cache| cache.cached_egg_group(id).cloned(),
            EggGroup::decode,
            |cache, full| cache.store_egg_group(full),
        )
        .await
    }

    /// Resolve a short description into its full record.
    pub async fn get_description(&self, description: &Description) -> Result<Description, Error> {
        let id = description.id;
        self.resolve(
            Kind::Description,
            id,
            &description.resource_uri,
            move |cache| cache.cached_description(id).cloned(),
            Description::decode,
            |cache, full| cache.store_description(full),
        )
        .await
    }

    /// Resolve a short game into its full record.
    pub async fn get_game(&self, game: &Game) -> Result<Game, Error> {
        let id = game.id;
        self.resolve(
            Kind::Game,
            id,
            &game.resource_uri,
            move |cache| cache.cached_game(id).cloned(),
            Game::decode,
            |cache, full| cache.store_game(full),
        )
        .await
    }

    /// Resolve a short sprite into its full record, image bytes
    /// included.
    ///
    /// This is a two-stage fetch: the JSON record first, then the raw
    /// bytes at its image locator. Nothing is cached until both stages
    /// succeed, so a failed byte fetch leaves no partial entry behind.
    /// The caller's pokemon back-reference is carried over onto the
    /// returned record.
    pub async fn get_sprite(&self, sprite: &Sprite) -> Result<Sprite, Error> {
        let id = sprite.id;
        if let Some(cached) = self.cache().cached_sprite(id).cloned() {
            return Ok(cached);
        }

        let guard = self.fetch_guard(Kind::Sprite, id);
        let _fetching = guard.lock().await;

        if let Some(cached) = self.cache().cached_sprite(id).cloned() {
            return Ok(cached);
        }

        let payload = self
            .inner
            .transport
            .fetch_json(&normalize(&sprite.resource_uri))
            .await?;
        let mut fetched = Sprite::decode(&payload)?;
        // The payload embeds its own pokemon copy; callers expect the
        // back-reference they already hold.
        fetched.pokemon = sprite.pokemon.clone();

        let image_uri = fetched.image_uri.clone().ok_or(Error::MissingField {
            kind: "sprite",
            field: "image",
        })?;
        let bytes = self
            .inner
            .transport
            .fetch_bytes(&normalize(&image_uri))
            .await?;
        fetched.image = Some(bytes);

        self.cache().store_sprite(fetched.clone());
        Ok(fetched)
    }

    /// All type records.
    ///
    /// Served from cache whenever any types are present; otherwise
    /// walks the paginated listing, caching every record. Concurrent
    /// first calls are not deduplicated and will each fetch the
    /// listing; last write wins, which is harmless because the records
    /// are identical.
    pub async fn get_types(&self) -> Result<Vec<Type>, Error> {
        {
            let cache = self.cache();
            if cache.has_types() {
                return Ok(cache.all_types());
            }
        }

        let records = self.fetch_listing(TYPE_LIST_PATH, Type::decode_full).await?;
        let mut cache = self.cache();
        for t in records {
            cache.store_type(t);
        }
        Ok(cache.all_types())
    }

    /// All egg group records. Same caching contract as
    /// [`get_types`](Self::get_types).
    pub async fn get_egg_groups(&self) -> Result<Vec<EggGroup>, Error> {
        {
            let cache = self.cache();
            if cache.has_egg_groups() {
                return Ok(cache.all_egg_groups());
            }
        }

        let records = self
            .fetch_listing(EGG_GROUP_LIST_PATH, EggGroup::decode_full)
            .await?;
        let mut cache = self.cache();
        for group in records {
            cache.store_egg_group(group);
        }
        Ok(cache.all_egg_groups())
    }

    /// Cache check, fetch on miss, decode, store, return. The in-flight
    /// guard serializes resolutions of the same (kind, id): the loser
    /// of a race waits, re-checks the cache, and returns the winner's
    /// record without a second transport call. If the winner failed,
    /// the waiter issues its own fetch.
    async fn resolve<T, L, S>(
        &self,
        kind: Kind,
        id: u32,
        resource_uri: &str,
        lookup: L,
        decode: fn(&Value) -> Result<T, Error>,
        store: S,
    ) -> Result<T, Error>
    where
        T: Clone,
        L: Fn(&ResourceCache) -> Option<T>,
        S: FnOnce(&mut ResourceCache, T),
    {
        if let Some(cached) = lookup(&self.cache()) {
            return Ok(cached);
        }

        let guard = self.fetch_guard(kind, id);
        let _fetching = guard.lock().await;

        if let Some(cached) = lookup(&self.cache()) {
            return Ok(cached);
        }

        let payload = self
            .inner
            .transport
            .fetch_json(&normalize(resource_uri))
            .await?;
        let record = decode(&payload)?;
        store(&mut self.cache(), record.clone());
        Ok(record)
    }

    /// Walk a paginated listing, decoding every element of every page.
    async fn fetch_listing<T>(
        &self,
        first_page: &str,
        decode: fn(&Value) -> Result<T, Error>,
    ) -> Result<Vec<T>, Error> {
        let mut records = Vec::new();
        let mut next = Some(first_page.to_string());

        while let Some(path) = next {
            let page = self.inner.transport.fetch_json(&normalize(&path)).await?;
            let objects = page
                .get("objects")
                .and_then(Value::as_array)
                .ok_or(Error::MissingField {
                    kind: "listing",
                    field: "objects",
                })?;
            for object in objects {
                records.push(decode(object)?);
            }
            next = page
                .get("meta")
                .and_then(|meta| meta.get("next"))
                .and_then(Value::as_str)
                .map(str::to_string);
        }

        Ok(records)
    }

    fn cache(&self) -> MutexGuard<'_, ResourceCache> {
        self.inner.cache.lock().expect("cache lock poisoned")
    }

    fn fetch_guard(&self, kind: Kind, id: u32) -> Arc<tokio::sync::Mutex<()>> {
        let mut inflight = self
            .inner
            .inflight
            .lock()
            .expect("inflight lock poisoned");
        inflight.entry((kind, id)).or_default().clone()
    }
}

impl Default for Pokedex {
    fn default() -> Self {
        Self::new()
    }
}

/// The pokedex listing hands out reference strings without the leading
/// slash; everything else carries it. The transport wants it present.
fn normalize(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;
    use serde_json::json;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("api/v1/pokemon/1/"), "/api/v1/pokemon/1/");
        assert_eq!(normalize("/api/v1/pokemon/1/"), "/api/v1/pokemon/1/");
    }

    #[test]
    fn test_empty_index_before_fill() {
        let dex = Pokedex::with_transport(Arc::new(FakeTransport::new()));
        assert!(dex.national_pokedex().is_empty());
    }

    #[tokio::test]
    async fn test_fill_failure_surfaces() {
        // No scripted response: the transport errors, and the error
        // must reach the caller instead of reporting success.
        let dex = Pokedex::with_transport(Arc::new(FakeTransport::new()));
        assert!(dex.fill_national_pokedex().await.is_err());
        assert!(dex.national_pokedex().is_empty());
    }

    #[tokio::test]
    async fn test_fill_rejects_malformed_listing() {
        let transport = Arc::new(FakeTransport::new());
        transport.stub_json("/api/v1/pokedex/1/", json!({"objects": []}));

        let dex = Pokedex::with_transport(transport);
        assert!(matches!(
            dex.fill_national_pokedex().await,
            Err(Error::MissingField {
                kind: "pokedex",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_get_pokemon_by_id_requires_index() {
        let dex = Pokedex::with_transport(Arc::new(FakeTransport::new()));
        assert!(matches!(
            dex.get_pokemon_by_id(25).await,
            Err(Error::NotIndexed(25))
        ));
    }

    #[tokio::test]
    async fn test_random_pokemon_on_empty_index() {
        let dex = Pokedex::with_transport(Arc::new(FakeTransport::new()));
        assert!(matches!(dex.random_pokemon().await, Err(Error::EmptyIndex)));
    }
}

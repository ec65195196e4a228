//! Caching client for the PokéAPI v1 REST API.
//!
//! The v1 API cross-links every resource through "short" reference
//! records: a name plus a `resource_uri` whose path embeds the numeric
//! id. This crate provides:
//! - The eight resource record types, each decodable from either its
//!   short or its full payload shape
//! - A per-resource in-memory cache keyed by numeric id, memoizing full
//!   records for the lifetime of the client
//! - A [`Pokedex`] service that resolves short records into full ones,
//!   fetching over HTTP only on a cache miss
//!
//! # Quick Start
//!
//! ```ignore
//! use pokedex::Pokedex;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pokedex::Error> {
//!     let dex = Pokedex::new();
//!     dex.fill_national_pokedex().await?;
//!
//!     let bulbasaur = dex.get_pokemon_by_id(1).await?;
//!     println!("{} knows {} moves", bulbasaur.name, bulbasaur.moves.len());
//!     Ok(())
//! }
//! ```

use thiserror::Error;

mod cache;
pub mod client;
pub mod records;
pub mod testing;
pub mod transport;
mod uri;

// Primary public API
pub use client::Pokedex;
pub use records::{
    Ability, Description, EggGroup, Evolution, Game, Move, Pokemon, Sprite, Type,
};
pub use transport::{HttpTransport, Transport};

/// Errors that can occur when using the pokedex client.
#[derive(Debug, Error)]
pub enum Error {
    /// A resource reference string did not have the expected
    /// `/api/v1/<kind>/<id>/` shape.
    #[error("malformed resource URI: {uri}")]
    MalformedReference { uri: String },

    /// A required key was absent, or present with the wrong shape, while
    /// decoding a full payload.
    #[error("missing field `{field}` in {kind} payload")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    /// Network failure, timeout, or non-success HTTP status.
    #[error("network error: {0}")]
    Transport(String),

    /// The response body was not valid structured data.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The national id is not present in the pokedex index.
    #[error("national id {0} is not in the pokedex")]
    NotIndexed(u32),

    /// The pokedex index has not been filled yet.
    #[error("the pokedex is empty")]
    EmptyIndex,
}

//! Numeric id extraction from resource reference strings.
//!
//! Short payloads carry no explicit id field; the id is recovered by
//! slicing the `resource_uri` (`/api/v1/<kind>/<id>/`) at a fixed
//! per-kind offset and parsing the remainder up to the trailing slash.

use crate::Error;

/// Offset at which the id digits begin, counted with the leading slash
/// present. The pokedex listing hands out URIs without the leading
/// slash; [`extract_id`] compensates by starting one byte earlier.
pub(crate) const POKEMON_PREFIX: usize = 16; // "/api/v1/pokemon/"
pub(crate) const TYPE_PREFIX: usize = 13; // "/api/v1/type/"
pub(crate) const MOVE_PREFIX: usize = 13; // "/api/v1/move/"
pub(crate) const ABILITY_PREFIX: usize = 16; // "/api/v1/ability/"
pub(crate) const EGG_GROUP_PREFIX: usize = 12; // "/api/v1/egg/"
pub(crate) const DESCRIPTION_PREFIX: usize = 20; // "/api/v1/description/"
pub(crate) const SPRITE_PREFIX: usize = 15; // "/api/v1/sprite/"
pub(crate) const GAME_PREFIX: usize = 13; // "/api/v1/game/"

/// Extract the embedded numeric id from a reference string.
///
/// Accepts both the leading-slash and the slash-less form. Anything
/// that does not slice to an unsigned integer between the prefix and
/// the trailing slash is rejected.
pub(crate) fn extract_id(uri: &str, prefix: usize) -> Result<u32, Error> {
    let malformed = || Error::MalformedReference {
        uri: uri.to_string(),
    };

    if !uri.ends_with('/') {
        return Err(malformed());
    }

    let start = if uri.starts_with('/') {
        prefix
    } else {
        prefix - 1
    };

    let digits = uri.get(start..uri.len() - 1).ok_or_else(malformed)?;
    digits.parse().map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_with_leading_slash() {
        assert_eq!(extract_id("/api/v1/pokemon/42/", POKEMON_PREFIX).unwrap(), 42);
        assert_eq!(extract_id("/api/v1/type/10/", TYPE_PREFIX).unwrap(), 10);
        assert_eq!(extract_id("/api/v1/move/105/", MOVE_PREFIX).unwrap(), 105);
        assert_eq!(extract_id("/api/v1/ability/65/", ABILITY_PREFIX).unwrap(), 65);
        assert_eq!(extract_id("/api/v1/egg/3/", EGG_GROUP_PREFIX).unwrap(), 3);
        assert_eq!(
            extract_id("/api/v1/description/512/", DESCRIPTION_PREFIX).unwrap(),
            512
        );
        assert_eq!(extract_id("/api/v1/sprite/7/", SPRITE_PREFIX).unwrap(), 7);
        assert_eq!(extract_id("/api/v1/game/14/", GAME_PREFIX).unwrap(), 14);
    }

    #[test]
    fn test_extract_without_leading_slash() {
        assert_eq!(extract_id("api/v1/pokemon/42/", POKEMON_PREFIX).unwrap(), 42);
        assert_eq!(extract_id("api/v1/type/10/", TYPE_PREFIX).unwrap(), 10);
        assert_eq!(extract_id("api/v1/egg/3/", EGG_GROUP_PREFIX).unwrap(), 3);
    }

    #[test]
    fn test_missing_trailing_slash_is_rejected() {
        assert!(extract_id("/api/v1/pokemon/42", POKEMON_PREFIX).is_err());
    }

    #[test]
    fn test_non_numeric_id_is_rejected() {
        assert!(extract_id("/api/v1/pokemon/bulbasaur/", POKEMON_PREFIX).is_err());
    }

    #[test]
    fn test_too_short_reference_is_rejected() {
        assert!(extract_id("/", POKEMON_PREFIX).is_err());
        assert!(extract_id("/api/v1/pokemon/", POKEMON_PREFIX).is_err());
        assert!(extract_id("", POKEMON_PREFIX).is_err());
    }

    #[test]
    fn test_negative_id_is_rejected() {
        assert!(extract_id("/api/v1/pokemon/-42/", POKEMON_PREFIX).is_err());
    }
}

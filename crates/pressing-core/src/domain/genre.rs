use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Géneros principales aceptados en los metadatos de un envío.
///
/// La taxonomía sigue la de Discogs: categorías amplias, sin subgéneros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
  Rock,
  Electronic,
  Pop,
  FolkWorldAndCountry,
  Jazz,
  FunkSoul,
  Classical,
  HipHop,
  Latin,
  StageAndScreen,
  Reggae,
  Blues,
  NonMusic,
  Childrens,
  BrassAndMilitary,
}

impl fmt::Display for Genre {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      Genre::Rock => "Rock",
      Genre::Electronic => "Electronic",
      Genre::Pop => "Pop",
      Genre::FolkWorldAndCountry => "Folk, World, & Country",
      Genre::Jazz => "Jazz",
      Genre::FunkSoul => "Funk / Soul",
      Genre::Classical => "Classical",
      Genre::HipHop => "Hip Hop",
      Genre::Latin => "Latin",
      Genre::StageAndScreen => "Stage & Screen",
      Genre::Reggae => "Reggae",
      Genre::Blues => "Blues",
      Genre::NonMusic => "Non-Music",
      Genre::Childrens => "Children's",
      Genre::BrassAndMilitary => "Brass & Military",
    };
    write!(f, "{}", text)
  }
}

/// Error producido cuando una cadena no puede convertirse en [`Genre`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid genre: {input}")]
pub struct GenreParseError {
  pub input: String,
}

impl FromStr for Genre {
  type Err = GenreParseError;

  /// Normaliza la cadena eliminando espacios, guiones y separadores comunes,
  /// de modo que `"Hip-Hop"`, `"hip hop"` y `"HipHop"` son equivalentes.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized = s.trim().to_lowercase().replace(['-', ' ', ',', '&', '/', '\''], "");

    let genre = match normalized.as_str() {
      "rock" => Genre::Rock,
      "electronic" => Genre::Electronic,
      "pop" => Genre::Pop,
      "folkworldandcountry" | "folkworldcountry" => Genre::FolkWorldAndCountry,
      "jazz" => Genre::Jazz,
      "funksoul" => Genre::FunkSoul,
      "classical" => Genre::Classical,
      "hiphop" => Genre::HipHop,
      "latin" => Genre::Latin,
      "stageandscreen" | "stagescreen" => Genre::StageAndScreen,
      "reggae" => Genre::Reggae,
      "blues" => Genre::Blues,
      "nonmusic" => Genre::NonMusic,
      "childrens" | "children" => Genre::Childrens,
      "brassandmilitary" | "brassmilitary" => Genre::BrassAndMilitary,
      _ => return Err(GenreParseError { input: s.to_string() }),
    };

    Ok(genre)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_display_form_back() {
    for genre in [Genre::FolkWorldAndCountry, Genre::FunkSoul, Genre::Childrens, Genre::HipHop] {
      assert_eq!(genre.to_string().parse::<Genre>(), Ok(genre));
    }
  }

  #[test]
  fn unknown_genre_is_an_error() {
    assert_eq!("vaporwave".parse::<Genre>(), Err(GenreParseError { input: "vaporwave".into() }));
  }
}

use serde::{Deserialize, Serialize};

/// Pasos del formulario, en el orden en que se recorren.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
  Release,
  Tracks,
  Artwork,
  Distribution,
  Review,
}

impl Stage {
  pub const ALL: [Stage; 5] = [Stage::Release, Stage::Tracks, Stage::Artwork, Stage::Distribution, Stage::Review];

  /// Etapas estrictamente anteriores a `self`.
  pub fn predecessors(self) -> impl Iterator<Item = Stage> {
    Self::ALL.into_iter().take_while(move |s| *s < self)
  }
}

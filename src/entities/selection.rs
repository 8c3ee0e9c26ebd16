use serde::{Deserialize, Serialize};

use crate::entities::Place;

/// The user's picked places, most recently added first.
///
/// Ids are unique: adding a place whose id is already present leaves the
/// selection untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(Vec<Place>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|place| place.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn places(&self) -> &[Place] {
        &self.0
    }

    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|place| place.id.as_str()).collect()
    }

    /// Returns the selection with `place` prepended, or `None` when its id is
    /// already picked.
    pub fn with_added(&self, place: &Place) -> Option<Selection> {
        if self.contains(&place.id) {
            return None;
        }

        let mut places = Vec::with_capacity(self.0.len() + 1);
        places.push(place.clone());
        places.extend(self.0.iter().cloned());

        Some(Selection(places))
    }

    pub fn without(&self, id: &str) -> Selection {
        Selection(self.0.iter().filter(|place| place.id != id).cloned().collect())
    }
}

impl From<Vec<Place>> for Selection {
    /// Later duplicates of an id are dropped so a hand-edited document cannot
    /// break the uniqueness invariant.
    fn from(places: Vec<Place>) -> Self {
        let mut selection = Vec::with_capacity(places.len());
        for place in places {
            if !selection.iter().any(|p: &Place| p.id == place.id) {
                selection.push(place);
            }
        }

        Selection(selection)
    }
}

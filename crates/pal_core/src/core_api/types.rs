use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::gender::Gender;

const MAP_SCALE: f64 = 0.0022;
const MAP_X_OFFSET: f64 = -345.0;
const MAP_Y_OFFSET: f64 = 271.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Guild {
    pub id: String,
    pub name: String,
    /// Player uid to player name, in the order the guild lists its members.
    pub player_map: IndexMap<String, String>,
    pub bases: Vec<Base>,
}

impl Guild {
    pub fn player_name(&self, player_id: &str) -> Option<&str> {
        self.player_map.get(player_id).map(String::as_str)
    }

    pub fn pal_count(&self) -> usize {
        self.bases.iter().map(|base| base.pals.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Base {
    pub id: String,
    pub container_id: String,
    pub coords: Coords,
    pub pals: Vec<Pal>,
}

impl Base {
    pub fn pals_owned_by<'a>(&'a self, player_id: &'a str) -> impl Iterator<Item = &'a Pal> {
        self.pals.iter().filter(move |pal| pal.owner == player_id)
    }
}

/// In-game map coordinates. Serialized as a two-element `[x, y]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coords {
    pub x: i32,
    pub y: i32,
}

impl Coords {
    /// Converts a world-space spawn translation to map coordinates. The world
    /// y axis feeds map x and vice versa.
    pub fn from_spawn_translation(raw_x: f64, raw_y: f64) -> Self {
        Self {
            x: (raw_y * MAP_SCALE + MAP_X_OFFSET).round_ties_even() as i32,
            y: (raw_x * MAP_SCALE + MAP_Y_OFFSET).round_ties_even() as i32,
        }
    }
}

impl From<[i32; 2]> for Coords {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Coords> for [i32; 2] {
    fn from(value: Coords) -> Self {
        [value.x, value.y]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pal {
    pub id: String,
    pub code: String,
    pub name: String,
    pub gender: Gender,
    pub level: i32,
    pub hp: i64,
    pub nickname: Option<String>,
    pub owner: String,
    pub lucky: bool,
    pub boss: bool,
    pub multiple_owners: bool,
}

#[cfg(test)]
mod tests {
    use super::Coords;

    #[test]
    fn spawn_translation_crosses_axes() {
        let coords = Coords::from_spawn_translation(100000.0, 200000.0);
        assert_eq!(coords, Coords { x: 95, y: 491 });
    }

    #[test]
    fn origin_maps_to_offsets() {
        let coords = Coords::from_spawn_translation(0.0, 0.0);
        assert_eq!(coords, Coords { x: -345, y: 271 });
    }

    #[test]
    fn negative_translation_rounds_to_nearest() {
        let coords = Coords::from_spawn_translation(-50000.0, 150000.0);
        assert_eq!(coords, Coords { x: -15, y: 161 });
    }

    #[test]
    fn serializes_as_pair() {
        let json = serde_json::to_string(&Coords { x: -15, y: 161 }).unwrap();
        assert_eq!(json, "[-15,161]");
    }
}

//! The fixed rotation of arenas the relay hands out to joining players.

use shared::Map;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map catalog must contain at least one map")]
    EmptyCatalog,
}

/// Ordered, immutable list of maps with a cursor to the one in play.
///
/// The cursor only moves forward, wrapping back to the first map after the last.
#[derive(Debug, Clone)]
pub struct MapCatalog {
    maps: Vec<Map>,
    index: usize,
}

impl MapCatalog {
    pub fn new(maps: Vec<Map>) -> Result<Self, MapError> {
        if maps.is_empty() {
            return Err(MapError::EmptyCatalog);
        }
        Ok(Self { maps, index: 0 })
    }

    /// The five arenas the game ships with.
    pub fn builtin() -> Self {
        Self {
            maps: builtin_maps(),
            index: 0,
        }
    }

    pub fn current(&self) -> &Map {
        &self.maps[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Moves to the next map and returns its index.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.maps.len();
        self.index
    }
}

impl Default for MapCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_maps() -> Vec<Map> {
    vec![
        Map::new(
            &[
                "#####################",
                "#      #     #      #",
                "# ##   ##   ##   ## #",
                "# #  #         #  # #",
                "# ## # ####### # ## #",
                "#                   #",
                "#####################",
            ],
            [10.0, 1.0],
        ),
        Map::new(
            &[
                "###########",
                "#         #",
                "# # # # # #",
                "#         #",
                "# # # # # #",
                "#         #",
                "# # # # # #",
                "#         #",
                "###########",
            ],
            [6.0, 3.0],
        ),
        Map::new(
            &[
                "###########",
                "#         #",
                "#  #   #  #",
                "# ##   ## #",
                "#         #",
                "# ##   ## #",
                "#  #   #  #",
                "#         #",
                "###########",
            ],
            [5.0, 4.0],
        ),
        Map::new(
            &[
                "  ###   ###  ",
                " #   # #   # ",
                "#     #     #",
                "#  #     #  #",
                "#           #",
                " #         # ",
                "  #   #   #  ",
                "   #     #   ",
                "    #   #    ",
                "     # #     ",
                "      #      ",
            ],
            [6.0, 4.0],
        ),
        Map::new(
            &[
                "#######",
                "#     #",
                "#     #",
                "#     #",
                "#     #",
                "#     #",
                "#######",
            ],
            [3.0, 3.0],
        ),
    ]
}

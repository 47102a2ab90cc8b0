//! Live being registry of the loaded level

use crate::beings::{Being, BeingKind, Layer};
use crate::core::types::BeingId;
use crate::grid::CellCoord;

/// Every being on the current level, in creation order
#[derive(Debug, Clone, Default)]
pub struct Beings {
    beings: Vec<Being>,
}

impl Beings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.beings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beings.is_empty()
    }

    pub fn insert(&mut self, being: Being) -> BeingId {
        let id = being.id();
        self.beings.push(being);
        id
    }

    pub fn remove(&mut self, id: BeingId) -> Option<Being> {
        let index = self.beings.iter().position(|b| b.id() == id)?;
        Some(self.beings.remove(index))
    }

    pub fn clear(&mut self) {
        self.beings.clear();
    }

    pub fn get(&self, id: BeingId) -> Option<&Being> {
        self.beings.iter().find(|b| b.id() == id)
    }

    pub fn get_mut(&mut self, id: BeingId) -> Option<&mut Being> {
        self.beings.iter_mut().find(|b| b.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Being> {
        self.beings.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Being> {
        self.beings.iter_mut()
    }

    /// The being standing on `cell`
    pub fn occupant(&self, cell: CellCoord) -> Option<&Being> {
        self.beings.iter().find(|b| b.cell() == cell)
    }

    pub fn is_empty_cell(&self, cell: CellCoord) -> bool {
        self.occupant(cell).is_none()
    }

    /// True unless a non-walkable being occupies the cell
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        !self
            .beings
            .iter()
            .any(|b| b.cell() == cell && !b.is_walkable())
    }

    /// Cells taken by non-walkable beings, for a fresh walkability snapshot
    pub fn blocking_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.beings
            .iter()
            .filter(|b| !b.is_walkable())
            .map(Being::cell)
    }

    pub fn on_layer(&self, layer: Layer) -> impl Iterator<Item = &Being> {
        self.beings.iter().filter(move |b| b.layer() == layer)
    }

    pub fn of_kind(&self, kind: BeingKind) -> impl Iterator<Item = &Being> {
        self.beings.iter().filter(move |b| b.kind() == kind)
    }

    pub fn is_alive(&self, id: BeingId) -> bool {
        self.get(id).is_some_and(Being::is_alive_creature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beings::HeroData;
    use serde_json::json;

    fn hero(x: u32, y: u32) -> Being {
        let data: HeroData = serde_json::from_value(json!({ "name": "Marty" })).unwrap();
        Being::hero(CellCoord::new(x, y), &data, 5).unwrap()
    }

    #[test]
    fn test_occupancy_and_walkability() {
        let mut beings = Beings::new();
        let wall = beings.insert(Being::wall(CellCoord::new(1, 0)));
        beings.insert(hero(2, 0));

        assert!(!beings.is_walkable(CellCoord::new(1, 0)));
        assert!(!beings.is_walkable(CellCoord::new(2, 0)));
        assert!(beings.is_walkable(CellCoord::new(3, 0)));
        assert_eq!(beings.blocking_cells().count(), 2);

        assert_eq!(beings.occupant(CellCoord::new(1, 0)).map(Being::id), Some(wall));
        assert!(beings.is_empty_cell(CellCoord::new(0, 0)));
    }

    #[test]
    fn test_remove_is_exact() {
        let mut beings = Beings::new();
        let kept = beings.insert(hero(0, 0));
        let removed = beings.insert(hero(1, 0));

        assert!(beings.remove(removed).is_some());
        assert!(beings.remove(removed).is_none());
        assert_eq!(beings.len(), 1);
        assert!(beings.get(kept).is_some());
    }

    #[test]
    fn test_layer_filter() {
        let mut beings = Beings::new();
        beings.insert(Being::wall(CellCoord::new(0, 0)));
        beings.insert(hero(1, 0));

        assert_eq!(beings.on_layer(Layer::Creatures).count(), 1);
        assert_eq!(beings.on_layer(Layer::Terrain).count(), 0);
        assert_eq!(beings.of_kind(BeingKind::Wall).count(), 1);
    }
}

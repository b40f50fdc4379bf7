//! The five-ship roster belonging to one side.

use crate::common::GameError;
use crate::ship::{Ship, ShipId};

/// Ordered roster of the five ships, tracking placement and damage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fleet {
    ships: [Ship; crate::config::NUM_SHIPS],
}

impl Fleet {
    /// Fresh fleet: every ship unplaced and undamaged.
    pub fn new() -> Self {
        Fleet {
            ships: ShipId::ALL.map(Ship::new),
        }
    }

    /// Ships in roster order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// State of a single ship.
    pub fn ship(&self, id: ShipId) -> Result<&Ship, GameError> {
        self.ships
            .iter()
            .find(|s| s.id == id)
            .ok_or(GameError::ShipNotFound(id))
    }

    fn ship_mut(&mut self, id: ShipId) -> Result<&mut Ship, GameError> {
        self.ships
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(GameError::ShipNotFound(id))
    }

    /// Record that `id` has been placed on the board.
    pub fn mark_placed(&mut self, id: ShipId) -> Result<(), GameError> {
        self.ship_mut(id)?.placed = true;
        Ok(())
    }

    /// Register one hit against `id`, marking it sunk once every segment
    /// has been struck. Errors if the id matches no roster entry; that
    /// means the board and this fleet have diverged.
    pub fn register_hit(&mut self, id: ShipId) -> Result<&Ship, GameError> {
        let size = id.size();
        let ship = self.ship_mut(id)?;
        ship.hits += 1;
        debug_assert!(ship.hits <= size);
        if ship.hits >= size {
            ship.sunk = true;
        }
        Ok(&*ship)
    }

    /// First ship not yet placed, in roster order.
    pub fn next_unplaced(&self) -> Option<ShipId> {
        self.ships.iter().find(|s| !s.placed).map(|s| s.id)
    }

    /// True once every ship has been placed.
    pub fn all_placed(&self) -> bool {
        self.ships.iter().all(|s| s.placed)
    }

    /// True once every ship has been sunk. This is the opposing side's
    /// win condition.
    pub fn all_sunk(&self) -> bool {
        self.ships.iter().all(|s| s.sunk)
    }
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_fleet_is_unplaced_and_afloat() {
        let fleet = Fleet::new();
        assert!(!fleet.all_placed());
        assert!(!fleet.all_sunk());
        assert_eq!(fleet.next_unplaced(), Some(ShipId::Carrier));
        for ship in fleet.ships() {
            assert_eq!(ship.hits, 0);
            assert!(!ship.sunk);
        }
    }

    #[test]
    fn sunk_flips_exactly_at_size() {
        let mut fleet = Fleet::new();
        let size = ShipId::Submarine.size();
        for n in 1..=size {
            let ship = fleet.register_hit(ShipId::Submarine).unwrap();
            assert_eq!(ship.hits, n);
            assert_eq!(ship.sunk, n == size);
        }
    }

    #[test]
    fn hits_on_one_ship_leave_the_rest_alone() {
        let mut fleet = Fleet::new();
        fleet.register_hit(ShipId::Patrol).unwrap();
        fleet.register_hit(ShipId::Patrol).unwrap();
        assert!(fleet.ship(ShipId::Patrol).unwrap().sunk);
        for id in [
            ShipId::Carrier,
            ShipId::Battleship,
            ShipId::Destroyer,
            ShipId::Submarine,
        ] {
            let ship = fleet.ship(id).unwrap();
            assert_eq!(ship.hits, 0);
            assert!(!ship.sunk);
        }
    }

    #[test]
    fn all_sunk_requires_every_ship() {
        let mut fleet = Fleet::new();
        for id in ShipId::ALL {
            assert!(!fleet.all_sunk());
            for _ in 0..id.size() {
                fleet.register_hit(id).unwrap();
            }
        }
        assert!(fleet.all_sunk());
    }

    #[test]
    fn placement_order_walks_the_roster() {
        let mut fleet = Fleet::new();
        fleet.mark_placed(ShipId::Carrier).unwrap();
        assert_eq!(fleet.next_unplaced(), Some(ShipId::Battleship));
        for id in ShipId::ALL {
            fleet.mark_placed(id).unwrap();
        }
        assert!(fleet.all_placed());
        assert_eq!(fleet.next_unplaced(), None);
    }
}

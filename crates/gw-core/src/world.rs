use std::collections::HashMap;

use crate::entity::{Background, Entity, EntityId, KindTag};
use crate::error::{GwError, GwResult};
use crate::grid::Grid;
use crate::images::ImageHandle;
use crate::point::Point;

/// The central world model. Owns the background and occupancy layers plus
/// the entity registry.
///
/// Scheduling lives upstream in gw-simulation; this type answers spatial
/// questions (occupancy, nearest entity, greedy steps) and keeps the two
/// grids and the registry consistent. All operations taking a [`Point`]
/// bounds-check it and treat out-of-bounds as a silent no-op; operations
/// taking an [`EntityId`] fail loudly when the id is unknown, because a
/// dangling id means a caller's bookkeeping is broken.
#[derive(Debug, Clone)]
pub struct WorldModel {
    background: Grid<Background>,
    occupancy: Grid<EntityId>,
    entities: HashMap<EntityId, Entity>,
    order: Vec<EntityId>,
    next_id: u64,
}

impl WorldModel {
    /// Create a world of the given dimensions with every background cell
    /// holding a clone of `background`.
    ///
    /// # Panics
    /// Panics if either dimension is not positive.
    pub fn new(num_cols: i32, num_rows: i32, background: Background) -> Self {
        Self {
            background: Grid::filled(num_cols, num_rows, background),
            occupancy: Grid::empty(num_cols, num_rows),
            entities: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of columns.
    pub fn num_cols(&self) -> i32 {
        self.occupancy.num_cols()
    }

    /// Number of rows.
    pub fn num_rows(&self) -> i32 {
        self.occupancy.num_rows()
    }

    /// Whether `pt` lies on the grid.
    pub fn within_bounds(&self, pt: Point) -> bool {
        pt.x >= 0 && pt.x < self.num_cols() && pt.y >= 0 && pt.y < self.num_rows()
    }

    /// Whether `pt` is in bounds and holds an occupant.
    pub fn is_occupied(&self, pt: Point) -> bool {
        self.within_bounds(pt) && self.occupancy.get(pt).is_some()
    }

    // -----------------------------------------------------------------------
    // Entity CRUD
    // -----------------------------------------------------------------------

    /// Insert an entity at its position, assigning its id.
    ///
    /// Returns `None` (and inserts nothing) when the position is out of
    /// bounds. A cell holds at most one occupant: a previous occupant is
    /// removed from the registry and handed back alongside the new id, so
    /// callers that schedule actions can cancel the displaced entity's
    /// pending actions.
    pub fn insert(&mut self, mut entity: Entity) -> Option<(EntityId, Option<Entity>)> {
        if !self.within_bounds(entity.position) {
            return None;
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;

        let displaced = self
            .occupancy
            .set(entity.position, Some(id))
            .and_then(|old| self.drop_from_registry(old));
        self.order.push(id);
        self.entities.insert(id, entity);
        Some((id, displaced))
    }

    fn drop_from_registry(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.entities.remove(&id)?;
        self.order.retain(|eid| *eid != id);
        entity.position = Point::INVALID;
        Some(entity)
    }

    /// Get a reference to an entity by id.
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to an entity by id.
    pub fn get_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Move an entity to `pt`, returning the dirty cells `[old, new]`.
    ///
    /// An out-of-bounds destination moves nothing and returns no dirty
    /// cells. The caller ensures the destination cell is clear; the
    /// occupancy cell is overwritten unconditionally.
    pub fn move_entity(&mut self, id: EntityId, pt: Point) -> GwResult<Vec<Point>> {
        let old_pt = self
            .entities
            .get(&id)
            .ok_or(GwError::EntityNotFound(id))?
            .position;
        if !self.within_bounds(pt) {
            return Ok(Vec::new());
        }
        if self.within_bounds(old_pt) {
            self.occupancy.set(old_pt, None);
        }
        self.occupancy.set(pt, Some(id));
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.position = pt;
        }
        Ok(vec![old_pt, pt])
    }

    /// Remove an entity, clearing its occupancy cell and poisoning its
    /// position with [`Point::INVALID`].
    pub fn remove_entity(&mut self, id: EntityId) -> GwResult<Entity> {
        let pos = self
            .entities
            .get(&id)
            .ok_or(GwError::EntityNotFound(id))?
            .position;
        if self.within_bounds(pos) && self.occupancy.get(pos) == Some(&id) {
            self.occupancy.set(pos, None);
        }
        // The registry entry is known to exist at this point.
        self.drop_from_registry(id).ok_or(GwError::EntityNotFound(id))
    }

    /// Remove whatever occupies `pt`. Returns `None` (a no-op) for an
    /// empty or out-of-bounds cell.
    pub fn remove_entity_at(&mut self, pt: Point) -> Option<Entity> {
        if !self.within_bounds(pt) {
            return None;
        }
        let id = *self.occupancy.get(pt)?;
        self.remove_entity(id).ok()
    }

    // -----------------------------------------------------------------------
    // Spatial queries
    // -----------------------------------------------------------------------

    /// The entity of kind `tag` nearest to `pt` by squared Euclidean
    /// distance. Ties go to the entity inserted first.
    pub fn find_nearest(&self, pt: Point, tag: KindTag) -> Option<EntityId> {
        let mut best: Option<(EntityId, i64)> = None;
        for id in &self.order {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            if entity.tag() != tag {
                continue;
            }
            let dist = pt.distance_sq(entity.position);
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((*id, dist)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// The first open in-bounds cell in raster order (row-major, both axes
    /// from `-distance` to `distance`) around `pt`, if any.
    pub fn find_open_around(&self, pt: Point, distance: i32) -> Option<Point> {
        for dy in -distance..=distance {
            for dx in -distance..=distance {
                let candidate = Point::new(pt.x + dx, pt.y + dy);
                if self.within_bounds(candidate) && !self.is_occupied(candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    // -----------------------------------------------------------------------
    // Greedy movement
    // -----------------------------------------------------------------------

    fn step_toward(&self, from: Point, dest: Point, blocked: impl Fn(Point) -> bool) -> Point {
        let horiz = (dest.x - from.x).signum();
        let candidate = Point::new(from.x + horiz, from.y);
        if horiz != 0 && !blocked(candidate) {
            return candidate;
        }
        let vert = (dest.y - from.y).signum();
        let candidate = Point::new(from.x, from.y + vert);
        if vert != 0 && !blocked(candidate) {
            return candidate;
        }
        from
    }

    /// One greedy step from `from` toward `dest`: the horizontal unit step
    /// when it is nonzero and unblocked, else the vertical one, else `from`
    /// itself. Never diagonal; occupied cells are refused.
    pub fn next_position(&self, from: Point, dest: Point) -> Point {
        self.step_toward(from, dest, |pt| self.is_occupied(pt))
    }

    /// [`Self::next_position`] variant for ore blobs: cells occupied by ore
    /// are passable (the blob consumes what it steps onto), everything else
    /// occupied stays impassable.
    pub fn next_position_through_ore(&self, from: Point, dest: Point) -> Point {
        self.step_toward(from, dest, |pt| {
            self.is_occupied(pt)
                && self
                    .get_tile_occupant(pt)
                    .is_none_or(|e| e.tag() != KindTag::Ore)
        })
    }

    // -----------------------------------------------------------------------
    // Render surface
    // -----------------------------------------------------------------------

    /// The entity occupying `pt`, if any.
    pub fn get_tile_occupant(&self, pt: Point) -> Option<&Entity> {
        if !self.within_bounds(pt) {
            return None;
        }
        self.occupancy.get(pt).and_then(|id| self.entities.get(id))
    }

    /// The id occupying `pt`, if any.
    pub fn occupant_id(&self, pt: Point) -> Option<EntityId> {
        if !self.within_bounds(pt) {
            return None;
        }
        self.occupancy.get(pt).copied()
    }

    /// The background tile at `pt`.
    pub fn get_background(&self, pt: Point) -> Option<&Background> {
        if !self.within_bounds(pt) {
            return None;
        }
        self.background.get(pt)
    }

    /// The background tile's current image at `pt`.
    pub fn get_background_image(&self, pt: Point) -> Option<ImageHandle> {
        self.get_background(pt).and_then(Background::image)
    }

    /// Replace the background tile at `pt`. No-op when out of bounds.
    pub fn set_background(&mut self, pt: Point, background: Background) {
        if self.within_bounds(pt) {
            self.background.set(pt, Some(background));
        }
    }

    /// All entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Number of registered entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    fn test_world() -> WorldModel {
        WorldModel::new(10, 8, Background::new("grass", Vec::new()))
    }

    fn ore_at(pt: Point) -> Entity {
        Entity::new(EntityKind::Ore { rate: 25000 }, "ore", pt, Vec::new())
    }

    fn obstacle_at(pt: Point) -> Entity {
        Entity::new(EntityKind::Obstacle, "rock", pt, Vec::new())
    }

    #[test]
    fn insert_and_get_occupant() {
        let mut world = test_world();
        let pt = Point::new(3, 4);
        let (id, displaced) = world.insert(ore_at(pt)).unwrap();
        assert!(displaced.is_none());
        assert_eq!(world.get_tile_occupant(pt).unwrap().id, id);
        assert_eq!(world.get_entity(id).unwrap().position, pt);
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn insert_out_of_bounds_is_noop() {
        let mut world = test_world();
        assert!(world.insert(ore_at(Point::new(-1, 0))).is_none());
        assert!(world.insert(ore_at(Point::new(10, 0))).is_none());
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn insert_displaces_previous_occupant() {
        let mut world = test_world();
        let pt = Point::new(2, 2);
        let (first, _) = world.insert(ore_at(pt)).unwrap();
        let (second, displaced) = world.insert(obstacle_at(pt)).unwrap();

        let displaced = displaced.unwrap();
        assert_eq!(displaced.id, first);
        assert_eq!(displaced.position, Point::INVALID);
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.occupant_id(pt), Some(second));
        assert!(world.get_entity(first).is_none());
    }

    #[test]
    fn move_entity_updates_both_cells() {
        let mut world = test_world();
        let from = Point::new(1, 1);
        let to = Point::new(2, 1);
        let (id, _) = world.insert(ore_at(from)).unwrap();

        let tiles = world.move_entity(id, to).unwrap();
        assert_eq!(tiles, vec![from, to]);
        assert!(world.get_tile_occupant(from).is_none());
        assert_eq!(world.occupant_id(to), Some(id));
        assert_eq!(world.get_entity(id).unwrap().position, to);
    }

    #[test]
    fn move_out_of_bounds_is_noop() {
        let mut world = test_world();
        let from = Point::new(0, 0);
        let (id, _) = world.insert(ore_at(from)).unwrap();

        let tiles = world.move_entity(id, Point::new(-1, 0)).unwrap();
        assert!(tiles.is_empty());
        assert_eq!(world.occupant_id(from), Some(id));
    }

    #[test]
    fn move_unknown_entity_errors() {
        let mut world = test_world();
        let result = world.move_entity(EntityId(99), Point::new(1, 1));
        assert!(result.is_err());
    }

    #[test]
    fn remove_clears_cell_and_poisons_position() {
        let mut world = test_world();
        let pt = Point::new(4, 4);
        let (id, _) = world.insert(ore_at(pt)).unwrap();

        let removed = world.remove_entity(id).unwrap();
        assert_eq!(removed.position, Point::INVALID);
        assert!(world.get_tile_occupant(pt).is_none());
        assert_eq!(world.entity_count(), 0);
        assert!(world.remove_entity(id).is_err());
    }

    #[test]
    fn remove_entity_at_empty_or_out_of_bounds_is_none() {
        let mut world = test_world();
        assert!(world.remove_entity_at(Point::new(5, 5)).is_none());
        assert!(world.remove_entity_at(Point::new(-3, 2)).is_none());
    }

    #[test]
    fn find_nearest_minimizes_squared_distance() {
        let mut world = test_world();
        let (_, _) = world.insert(ore_at(Point::new(9, 7))).unwrap();
        let (near, _) = world.insert(ore_at(Point::new(2, 0))).unwrap();
        world.insert(obstacle_at(Point::new(0, 1))).unwrap();

        assert_eq!(world.find_nearest(Point::new(0, 0), KindTag::Ore), Some(near));
        assert!(world.find_nearest(Point::new(0, 0), KindTag::Vein).is_none());
    }

    #[test]
    fn find_nearest_tie_goes_to_first_inserted() {
        let mut world = test_world();
        // Both ores are at distance 2^2 from (2, 2).
        let (first, _) = world.insert(ore_at(Point::new(0, 2))).unwrap();
        let (_second, _) = world.insert(ore_at(Point::new(4, 2))).unwrap();

        assert_eq!(world.find_nearest(Point::new(2, 2), KindTag::Ore), Some(first));
    }

    #[test]
    fn find_open_around_scans_in_raster_order() {
        let mut world = test_world();
        let center = Point::new(5, 5);
        world.insert(obstacle_at(center)).unwrap();

        // Top-left corner of the neighborhood comes first.
        assert_eq!(
            world.find_open_around(center, 1),
            Some(Point::new(4, 4))
        );

        world.insert(obstacle_at(Point::new(4, 4))).unwrap();
        assert_eq!(
            world.find_open_around(center, 1),
            Some(Point::new(5, 4))
        );
    }

    #[test]
    fn find_open_around_skips_out_of_bounds_cells() {
        let mut world = test_world();
        let corner = Point::new(0, 0);
        world.insert(obstacle_at(corner)).unwrap();
        // (-1, -1) etc. are skipped; the first in-bounds open cell is (1, 0).
        assert_eq!(world.find_open_around(corner, 1), Some(Point::new(1, 0)));
    }

    #[test]
    fn find_open_around_none_when_neighborhood_full() {
        let mut world = test_world();
        let center = Point::new(5, 5);
        for dy in -1..=1 {
            for dx in -1..=1 {
                world
                    .insert(obstacle_at(Point::new(5 + dx, 5 + dy)))
                    .unwrap();
            }
        }
        assert!(world.find_open_around(center, 1).is_none());
    }

    #[test]
    fn next_position_prefers_horizontal_step() {
        let world = test_world();
        let step = world.next_position(Point::new(2, 2), Point::new(6, 6));
        assert_eq!(step, Point::new(3, 2));
    }

    #[test]
    fn next_position_falls_back_to_vertical() {
        let mut world = test_world();
        world.insert(obstacle_at(Point::new(3, 2))).unwrap();
        let step = world.next_position(Point::new(2, 2), Point::new(6, 6));
        assert_eq!(step, Point::new(2, 3));

        // Aligned horizontally: vertical axis drives the step.
        let step = world.next_position(Point::new(2, 2), Point::new(2, 6));
        assert_eq!(step, Point::new(2, 3));
    }

    #[test]
    fn next_position_stays_put_when_blocked() {
        let mut world = test_world();
        world.insert(obstacle_at(Point::new(3, 2))).unwrap();
        world.insert(obstacle_at(Point::new(2, 3))).unwrap();
        let from = Point::new(2, 2);
        assert_eq!(world.next_position(from, Point::new(6, 6)), from);
    }

    #[test]
    fn next_position_never_steps_diagonally() {
        let world = test_world();
        for dest in [
            Point::new(9, 7),
            Point::new(0, 7),
            Point::new(9, 0),
            Point::new(0, 0),
        ] {
            let from = Point::new(4, 4);
            let step = world.next_position(from, dest);
            let moved = (step.x - from.x).abs() + (step.y - from.y).abs();
            assert!(moved <= 1, "diagonal or multi-cell step to {step}");
        }
    }

    #[test]
    fn blob_step_passes_through_ore_only() {
        let mut world = test_world();
        world.insert(ore_at(Point::new(3, 2))).unwrap();
        let step = world.next_position_through_ore(Point::new(2, 2), Point::new(6, 2));
        assert_eq!(step, Point::new(3, 2));

        let mut world = test_world();
        world.insert(obstacle_at(Point::new(3, 2))).unwrap();
        let step = world.next_position_through_ore(Point::new(2, 2), Point::new(6, 2));
        assert_eq!(step, Point::new(2, 2));
    }

    #[test]
    fn entities_enumerate_in_insertion_order() {
        let mut world = test_world();
        let (a, _) = world.insert(ore_at(Point::new(1, 0))).unwrap();
        let (b, _) = world.insert(ore_at(Point::new(2, 0))).unwrap();
        let (c, _) = world.insert(ore_at(Point::new(3, 0))).unwrap();
        world.remove_entity(b).unwrap();

        let ids: Vec<EntityId> = world.entities().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn background_layer_reads_and_writes() {
        let mut world = test_world();
        let pt = Point::new(1, 1);
        assert_eq!(world.get_background(pt).unwrap().name, "grass");
        assert!(world.get_background_image(pt).is_none());

        world.set_background(pt, Background::new("path", vec![ImageHandle(7)]));
        assert_eq!(world.get_background(pt).unwrap().name, "path");
        assert_eq!(world.get_background_image(pt), Some(ImageHandle(7)));

        // Out of bounds: silent no-op, nothing to read back.
        world.set_background(Point::new(-1, 0), Background::new("x", Vec::new()));
        assert!(world.get_background(Point::new(-1, 0)).is_none());
    }
}

use std::collections::HashSet;

use bracket_geometry::prelude::{Point, Rect};
use bracket_random::prelude::RandomNumberGenerator;

use crate::data::monsters::MonsterKind;

use super::{AuthoredEntity, FloorId, MapDefinition, MonsterSpec, StairsDef};

pub const DUNGEON_WIDTH: i32 = 80;
pub const DUNGEON_HEIGHT: i32 = 24;

fn corridor_path(start: Point, end: Point) -> Vec<Point> {
    let mut path = Vec::new();
    let mut cursor = start;
    path.push(cursor);

    while cursor.x != end.x {
        cursor.x += if end.x > cursor.x { 1 } else { -1 };
        path.push(cursor);
    }

    while cursor.y != end.y {
        cursor.y += if end.y > cursor.y { 1 } else { -1 };
        path.push(cursor);
    }

    path
}

/// Rooms and the corridors joining them, before anything is placed.
#[derive(Clone, Debug)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    pub rooms: Vec<Rect>,
    pub corridors: Vec<Vec<Point>>,
}

impl Layout {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            rooms: Vec::new(),
            corridors: Vec::new(),
        }
    }

    pub fn procedural(width: i32, height: i32, rng: &mut RandomNumberGenerator) -> Self {
        const MAX_ROOMS: usize = 12;
        const MIN_ROOM_W: i32 = 5;
        const MAX_ROOM_W: i32 = 14;
        const MIN_ROOM_H: i32 = 3;
        const MAX_ROOM_H: i32 = 7;

        let mut layout = Self::new(width, height);

        for _ in 0..MAX_ROOMS {
            let room_w = rng.range(MIN_ROOM_W, MAX_ROOM_W);
            let room_h = rng.range(MIN_ROOM_H, MAX_ROOM_H);

            // Leave one cell on every side for the wall outline.
            let x_max = width - room_w - 1;
            let y_max = height - room_h - 1;
            if x_max <= 1 || y_max <= 1 {
                continue;
            }

            let candidate =
                Rect::with_size(rng.range(1, x_max), rng.range(1, y_max), room_w, room_h);
            if layout.rooms.iter().any(|room| room.intersect(&candidate)) {
                continue;
            }

            if let Some(prev_center) = layout.rooms.last().map(|room| room.center()) {
                layout
                    .corridors
                    .push(corridor_path(prev_center, candidate.center()));
            }
            layout.rooms.push(candidate);
        }

        if layout.rooms.len() < 2 {
            Self::demo_layout(width, height)
        } else {
            layout
        }
    }

    /// A row of rooms joined left to right; used when rolling fails.
    pub fn demo_layout(width: i32, height: i32) -> Self {
        let mut layout = Self::new(width, height);
        let room_width = 8;
        let room_height = (height - 2).clamp(1, 6);
        let mut x = 1;
        while x + room_width < width - 1 {
            layout.rooms.push(Rect::with_size(x, 1, room_width, room_height));
            x += room_width + 3;
        }

        if layout.rooms.is_empty() {
            layout.rooms.push(Rect::with_size(
                1,
                1,
                (width - 2).max(1),
                room_height,
            ));
        }

        for window in layout.rooms.windows(2) {
            layout
                .corridors
                .push(corridor_path(window[0].center(), window[1].center()));
        }

        layout
    }

    pub fn floor_cells(&self) -> HashSet<Point> {
        let mut cells = HashSet::new();
        for room in &self.rooms {
            room.for_each(|point| {
                cells.insert(point);
            });
        }
        for corridor in &self.corridors {
            cells.extend(corridor.iter().copied());
        }
        cells
    }

    /// Every non-floor cell touching a floor cell, in reading order.
    pub fn wall_outline(&self) -> Vec<(i32, i32)> {
        let floor = self.floor_cells();
        let mut walls = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if floor.contains(&point) {
                    continue;
                }
                let touches_floor = (-1..=1).any(|dy| {
                    (-1..=1).any(|dx| floor.contains(&Point::new(x + dx, y + dy)))
                });
                if touches_floor {
                    walls.push((x, y));
                }
            }
        }
        walls
    }
}

/// Rolls a fresh dungeon level. Floor `n` is guarded by `n` drones.
pub fn generate_floor(floor: FloorId, rng: &mut RandomNumberGenerator) -> MapDefinition {
    let layout = Layout::procedural(DUNGEON_WIDTH, DUNGEON_HEIGHT, rng);
    let label = format!("dungeon floor {}", floor.0);
    let mut map = MapDefinition::new(label, layout.width, layout.height);
    map.floor = floor;
    map.walls = layout.wall_outline();

    let entry = layout.rooms[0].center();
    let exit = layout.rooms[layout.rooms.len() - 1].center();
    map.start_x = Some(entry.x);
    map.start_y = Some(entry.y);
    map.stairs = vec![
        StairsDef {
            x: entry.x,
            y: entry.y,
            direction: Some("up".to_string()),
        },
        StairsDef {
            x: exit.x,
            y: exit.y,
            direction: Some("down".to_string()),
        },
    ];

    let mut taken: HashSet<Point> = [entry, exit].into_iter().collect();
    let lairs = &layout.rooms[1..];
    for _ in 0..floor.0 {
        let room = lairs[rng.range(0, lairs.len() as i32) as usize];
        let point = Point::new(rng.range(room.x1, room.x2), rng.range(room.y1, room.y2));
        if !taken.insert(point) {
            continue;
        }
        map.entities.push(AuthoredEntity::Monster(MonsterSpec {
            kind: MonsterKind::Drone.name().to_string(),
            x: point.x,
            y: point.y,
            color: None,
        }));
    }

    map
}

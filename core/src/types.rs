/// Single coordinate axis used for board width, height, and positions.
pub type Ix = u8;

/// Count type used for bomb counts and total-tile counts.
pub type Ax = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Ix2 = (Ix, Ix);

pub const fn mult(a: Ix, b: Ix) -> Ax {
    let a = a as Ax;
    let b = b as Ax;
    a.saturating_mul(b)
}

/// Whether `coords` lies inside a board of the given size.
pub const fn in_bounds(coords: Ix2, bounds: Ix2) -> bool {
    coords.0 < bounds.0 && coords.1 < bounds.1
}

/// Maps keyed by coordinates serialize as entry lists; JSON objects cannot
/// be keyed by tuples.
pub(crate) mod coord_map_serde {
    use super::Ix2;
    use hashbrown::HashMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, V>(map: &HashMap<Ix2, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<HashMap<Ix2, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        let entries = Vec::<(Ix2, V)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Ix2, delta: (isize, isize), bounds: Ix2) -> Option<Ix2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

/// Iterates the up-to-8 tiles immediately horizontally, vertically, or
/// diagonally adjacent to `center`, clipped to the board bounds.
pub fn iter_neighbors(center: Ix2, bounds: Ix2) -> NeighborIter {
    NeighborIter::new(center, bounds)
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Ix2,
    bounds: Ix2,
    index: u8,
}

impl NeighborIter {
    fn new(center: Ix2, bounds: Ix2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Ix2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

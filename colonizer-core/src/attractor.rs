use crate::types::Point;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Unconsumed growth targets.
///
/// The set is order-irrelevant: consuming an attractor may move another
/// one into its slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttractorSet {
    pub points: Vec<Point>,
}

impl AttractorSet {
    pub fn from_positions(positions: Vec<Point>) -> Self {
        Self { points: positions }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Replaces every attractor with `positions`.
    pub fn replace(&mut self, positions: Vec<Point>) {
        self.points = positions;
    }

    /// Removes the attractor at `index`, filling the slot with the last one.
    pub fn swap_remove(&mut self, index: usize) -> Point {
        self.points.swap_remove(index)
    }

    /// Index of the attractor nearest to `pos`, if it lies within `tolerance`.
    pub fn nearest_within(&self, pos: Point, tolerance: f32) -> Option<usize> {
        let tol2 = tolerance * tolerance;
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance_squared(pos)))
            .filter(|&(_, d2)| d2 <= tol2)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Uniformly scatters `count` attractors inside the box `[min, max]`.
    pub fn random_in_rect(min: Point, max: Point, count: usize, rng: &mut impl Rng) -> Self {
        let positions = (0..count)
            .map(|_| {
                let x = rng.random_range(min.x..=max.x);
                let y = rng.random_range(min.y..=max.y);
                Vec2::new(x, y)
            })
            .collect();

        Self::from_positions(positions)
    }

    /// Scatters attractors over `[0, width) x [0, height)` with Poisson-disk spacing.
    ///
    /// No two points are closer than `radius`. Each active sample proposes up
    /// to `k` candidates in the annulus `[radius, 2 * radius)` before it is
    /// retired. A degenerate area or radius yields an empty set.
    pub fn poisson_disk(
        width: f32,
        height: f32,
        radius: f32,
        k: usize,
        rng: &mut impl Rng,
    ) -> Self {
        if !(width > 0.0 && height > 0.0 && radius > 0.0) {
            return Self::default();
        }

        let cell = radius / std::f32::consts::SQRT_2;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "grid dimensions are positive and bounded by the viewport"
        )]
        let (cols, rows) = (
            (width / cell).ceil() as usize,
            (height / cell).ceil() as usize,
        );
        let mut grid: Vec<Option<usize>> = vec![None; cols * rows];
        let cell_of = |p: Point| -> (usize, usize) {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "points are clamped to the sampling area"
            )]
            let (cx, cy) = ((p.x / cell) as usize, (p.y / cell) as usize);
            (cx.min(cols - 1), cy.min(rows - 1))
        };

        let mut points = Vec::new();
        let mut active = Vec::new();

        let first = Vec2::new(rng.random_range(0.0..width), rng.random_range(0.0..height));
        let (cx, cy) = cell_of(first);
        grid[cy * cols + cx] = Some(0);
        points.push(first);
        active.push(0);

        let r2 = radius * radius;
        while !active.is_empty() {
            let slot = rng.random_range(0..active.len());
            let origin = points[active[slot]];
            let mut placed = false;

            for _ in 0..k {
                let angle = rng.random_range(0.0..TAU);
                let dist = rng.random_range(radius..2.0 * radius);
                let cand = origin + Vec2::from_angle(angle) * dist;
                if !(cand.x >= 0.0 && cand.x < width && cand.y >= 0.0 && cand.y < height) {
                    continue;
                }

                let (cx, cy) = cell_of(cand);
                let clear = (cy.saturating_sub(2)..(cy + 3).min(rows)).all(|y| {
                    (cx.saturating_sub(2)..(cx + 3).min(cols)).all(|x| match grid[y * cols + x] {
                        Some(i) => points[i].distance_squared(cand) >= r2,
                        None => true,
                    })
                });

                if clear {
                    grid[cy * cols + cx] = Some(points.len());
                    active.push(points.len());
                    points.push(cand);
                    placed = true;
                    break;
                }
            }

            if !placed {
                active.swap_remove(slot);
            }
        }

        Self::from_positions(points)
    }
}

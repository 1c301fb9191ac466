//! Batched SIMD sphere intersection.
//!
//! Sphere centers and squared radii are copied once per `prepare` into
//! structure-of-arrays form. A ray is then tested against `B` spheres at a
//! time with wide arithmetic: the quadratic's `a` term is shared by every
//! sphere in the chunk, while `b`, `c` and the discriminant are computed per
//! lane. Lanes that miss are set to `+inf` so they never win the chunk
//! minimum, and chunk minima are reduced exactly like the scalar search.
//!
//! The batch size only changes how the work is grouped; the distances and
//! winning indices match `intersect::nearest_hit` over the same spheres.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use lumen_core::Surface;
use lumen_math::{DVec4, Ray};
use wide::{f64x2, f64x4, CmpLt};

use crate::error::{RenderError, RenderResult};
use crate::intersect::Hit;

/// Widest SIMD register used by the kernels, in `f64` lanes.
const MAX_LANE_WIDTH: usize = 4;

/// Number of spheres intersected together in one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchSize {
    B1,
    B2,
    B4,
    B8,
    B16,
    B32,
    B64,
    B128,
}

impl BatchSize {
    /// Every supported batch size, smallest first.
    pub const ALL: [BatchSize; 8] = [
        BatchSize::B1,
        BatchSize::B2,
        BatchSize::B4,
        BatchSize::B8,
        BatchSize::B16,
        BatchSize::B32,
        BatchSize::B64,
        BatchSize::B128,
    ];

    /// Number of spheres per chunk.
    pub const fn get(self) -> usize {
        match self {
            BatchSize::B1 => 1,
            BatchSize::B2 => 2,
            BatchSize::B4 => 4,
            BatchSize::B8 => 8,
            BatchSize::B16 => 16,
            BatchSize::B32 => 32,
            BatchSize::B64 => 64,
            BatchSize::B128 => 128,
        }
    }
}

impl TryFrom<usize> for BatchSize {
    type Error = RenderError;

    fn try_from(size: usize) -> RenderResult<Self> {
        BatchSize::ALL
            .into_iter()
            .find(|b| b.get() == size)
            .ok_or(RenderError::UnsupportedBatchSize(size))
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// One SIMD register of `f64` lanes.
trait Lane:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
    const WIDTH: usize;

    fn splat(value: f64) -> Self;

    /// Load `WIDTH` values from the front of `values`.
    fn load(values: &[f64]) -> Self;

    fn sqrt(self) -> Self;

    /// `s` where the lane hit, `+inf` where `delta < 0` or `s < 0`.
    fn hits_or_inf(delta: Self, s: Self) -> Self;

    /// Store `WIDTH` values into the front of `out`.
    fn store(self, out: &mut [f64]);
}

impl Lane for f64 {
    const WIDTH: usize = 1;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        value
    }

    #[inline(always)]
    fn load(values: &[f64]) -> Self {
        values[0]
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline(always)]
    fn hits_or_inf(delta: Self, s: Self) -> Self {
        if delta < 0.0 || s < 0.0 {
            f64::INFINITY
        } else {
            s
        }
    }

    #[inline(always)]
    fn store(self, out: &mut [f64]) {
        out[0] = self;
    }
}

impl Lane for f64x2 {
    const WIDTH: usize = 2;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        f64x2::splat(value)
    }

    #[inline(always)]
    fn load(values: &[f64]) -> Self {
        f64x2::from([values[0], values[1]])
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        f64x2::sqrt(self)
    }

    #[inline(always)]
    fn hits_or_inf(delta: Self, s: Self) -> Self {
        let zero = f64x2::splat(0.0);
        let miss = delta.cmp_lt(zero) | s.cmp_lt(zero);
        miss.blend(f64x2::splat(f64::INFINITY), s)
    }

    #[inline(always)]
    fn store(self, out: &mut [f64]) {
        out[..2].copy_from_slice(&self.to_array());
    }
}

impl Lane for f64x4 {
    const WIDTH: usize = 4;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        f64x4::splat(value)
    }

    #[inline(always)]
    fn load(values: &[f64]) -> Self {
        f64x4::from([values[0], values[1], values[2], values[3]])
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        f64x4::sqrt(self)
    }

    #[inline(always)]
    fn hits_or_inf(delta: Self, s: Self) -> Self {
        let zero = f64x4::splat(0.0);
        let miss = delta.cmp_lt(zero) | s.cmp_lt(zero);
        miss.blend(f64x4::splat(f64::INFINITY), s)
    }

    #[inline(always)]
    fn store(self, out: &mut [f64]) {
        out[..4].copy_from_slice(&self.to_array());
    }
}

/// Sphere data laid out for batched intersection.
#[derive(Debug, Clone, Default)]
pub struct SphereBatch {
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<f64>,
    radii_sq: Vec<f64>,
    /// Scene index of each batch slot, ascending
    scene_indices: Vec<usize>,
}

impl SphereBatch {
    /// Split `objects` into batched sphere data and the scene indices of
    /// everything else, both in scene order.
    pub fn partition(objects: &[Surface]) -> (Self, Vec<usize>) {
        let mut batch = SphereBatch::default();
        let mut others = Vec::new();

        for (index, object) in objects.iter().enumerate() {
            match object {
                Surface::Sphere(sphere) => {
                    batch.xs.push(sphere.center.x);
                    batch.ys.push(sphere.center.y);
                    batch.zs.push(sphere.center.z);
                    batch.radii_sq.push(sphere.radius * sphere.radius);
                    batch.scene_indices.push(index);
                }
                _ => others.push(index),
            }
        }

        (batch, others)
    }

    /// Number of spheres.
    pub fn len(&self) -> usize {
        self.scene_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene_indices.is_empty()
    }

    /// Fail unless `size` evenly divides the sphere count.
    pub fn check(&self, size: BatchSize) -> RenderResult<()> {
        if self.len() % size.get() == 0 {
            Ok(())
        } else {
            Err(RenderError::BatchSizeMismatch {
                batch_size: size.get(),
                sphere_count: self.len(),
            })
        }
    }

    /// Nearest sphere hit for `ray`, processing `size` spheres per chunk.
    ///
    /// Fails if `size` does not divide the sphere count.
    pub fn nearest(&self, ray: &Ray, size: BatchSize) -> RenderResult<Option<Hit>> {
        self.check(size)?;
        Ok(self.nearest_unchecked(ray, size))
    }

    /// [`SphereBatch::nearest`] for a `size` that already passed
    /// [`SphereBatch::check`].
    pub(crate) fn nearest_unchecked(&self, ray: &Ray, size: BatchSize) -> Option<Hit> {
        match size {
            BatchSize::B1 => self.nearest_with::<f64, 1>(ray),
            BatchSize::B2 => self.nearest_with::<f64x2, 1>(ray),
            BatchSize::B4 => self.nearest_with::<f64x4, 1>(ray),
            BatchSize::B8 => self.nearest_with::<f64x4, 2>(ray),
            BatchSize::B16 => self.nearest_with::<f64x4, 4>(ray),
            BatchSize::B32 => self.nearest_with::<f64x4, 8>(ray),
            BatchSize::B64 => self.nearest_with::<f64x4, 16>(ray),
            BatchSize::B128 => self.nearest_with::<f64x4, 32>(ray),
        }
    }

    /// Reduce chunk minima of `N` registers of `L` lanes each.
    fn nearest_with<L: Lane, const N: usize>(&self, ray: &Ray) -> Option<Hit> {
        let chunk = L::WIDTH * N;
        debug_assert_eq!(self.len() % chunk, 0);

        let origin = ray.origin();
        let dir = ray.direction();
        let a = dir.length_squared();

        let mut best: Option<(f64, usize)> = None;
        for start in (0..self.len()).step_by(chunk) {
            if let Some((distance, slot)) = self.nearest_in_chunk::<L, N>(start, origin, dir, a) {
                if best.map_or(true, |(d, _)| distance < d) {
                    best = Some((distance, slot));
                }
            }
        }

        best.map(|(distance, slot)| Hit {
            index: self.scene_indices[slot],
            distance,
            point: ray.at(distance),
        })
    }

    /// Minimum distance and its slot among the `L::WIDTH * N` spheres
    /// starting at `start`.
    #[inline(always)]
    fn nearest_in_chunk<L: Lane, const N: usize>(
        &self,
        start: usize,
        origin: DVec4,
        dir: DVec4,
        a: f64,
    ) -> Option<(f64, usize)> {
        let zero = L::splat(0.0);
        let two = L::splat(2.0);
        let four = L::splat(4.0);
        let (ox, oy, oz) = (L::splat(origin.x), L::splat(origin.y), L::splat(origin.z));
        let (vx, vy, vz) = (L::splat(dir.x), L::splat(dir.y), L::splat(dir.z));
        let a = L::splat(a);

        let mut lanes = [0.0; MAX_LANE_WIDTH];
        let mut best: Option<(f64, usize)> = None;

        for k in 0..N {
            let base = start + k * L::WIDTH;
            let dx = ox - L::load(&self.xs[base..]);
            let dy = oy - L::load(&self.ys[base..]);
            let dz = oz - L::load(&self.zs[base..]);

            let b = two * (dx * vx + dy * vy + dz * vz);
            let c = dx * dx + dy * dy + dz * dz - L::load(&self.radii_sq[base..]);
            let delta = b * b - four * a * c;
            let s = (zero - b - delta.sqrt()) / (two * a);

            L::hits_or_inf(delta, s).store(&mut lanes);
            for (lane, &distance) in lanes[..L::WIDTH].iter().enumerate() {
                if distance < best.map_or(f64::INFINITY, |(d, _)| d) {
                    best = Some((distance, base + lane));
                }
            }
        }

        best
    }
}

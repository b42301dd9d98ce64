use lattice_denoise::{LatticeCoord, LatticeFit, PointSet};
use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Noise-free lattice samples with their generating coordinates.
pub struct SyntheticLattice {
    pub points: Vec<Vector2<f64>>,
    pub coords: Vec<LatticeCoord>,
}

/// Generates `origin + i*v1 + j*v2` for `j` in `js` (outer) and `i` in `is` (inner).
pub fn lattice_grid(
    origin: Vector2<f64>,
    v1: Vector2<f64>,
    v2: Vector2<f64>,
    is: std::ops::Range<i32>,
    js: std::ops::Range<i32>,
) -> SyntheticLattice {
    let mut points = Vec::new();
    let mut coords = Vec::new();
    for j in js {
        for i in is.clone() {
            points.push(origin + v1 * i as f64 + v2 * j as f64);
            coords.push(LatticeCoord::new(i, j));
        }
    }
    SyntheticLattice { points, coords }
}

/// Adds uniform jitter in `[-amplitude, amplitude]` to each coordinate.
pub fn jittered(points: &[Vector2<f64>], amplitude: f64, seed: u64) -> Vec<Vector2<f64>> {
    if amplitude == 0.0 {
        return points.to_vec();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    points
        .iter()
        .map(|p| {
            Vector2::new(
                p.x + rng.gen_range(-amplitude..=amplitude),
                p.y + rng.gen_range(-amplitude..=amplitude),
            )
        })
        .collect()
}

pub fn point_set(points: &[Vector2<f64>]) -> PointSet {
    let raw: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
    PointSet::from_points(&raw).expect("synthetic point set is valid")
}

/// Mean squared distance between each estimated reconstruction and the truth.
pub fn mse_against(fit: &LatticeFit, truth: &[Vector2<f64>]) -> f64 {
    let recon = fit.reconstructed();
    assert_eq!(recon.len(), truth.len());
    recon
        .iter()
        .zip(truth)
        .map(|(r, t)| (r - t).norm_squared())
        .sum::<f64>()
        / truth.len() as f64
}

/// Asserts that `estimated` equals `truth` up to an integer affine relabeling
/// `(i, j) -> A (i, j) + t` with `|det A| = 1`.
pub fn assert_unimodular_relabel(estimated: &[LatticeCoord], truth: &[LatticeCoord]) {
    assert_eq!(estimated.len(), truth.len());
    let n = truth.len();
    // Pick three truth coords that span the plane to solve for A and t.
    let base = 0usize;
    let mut pair = None;
    'outer: for a in 1..n {
        for b in (a + 1)..n {
            let da = (truth[a].i - truth[base].i, truth[a].j - truth[base].j);
            let db = (truth[b].i - truth[base].i, truth[b].j - truth[base].j);
            if da.0 * db.1 - da.1 * db.0 != 0 {
                pair = Some((a, b));
                break 'outer;
            }
        }
    }
    let (a, b) = pair.expect("truth coordinates span the plane");

    let t = |k: usize| {
        (
            (truth[k].i - truth[base].i) as f64,
            (truth[k].j - truth[base].j) as f64,
        )
    };
    let e = |k: usize| {
        (
            (estimated[k].i - estimated[base].i) as f64,
            (estimated[k].j - estimated[base].j) as f64,
        )
    };
    let (ta, tb) = (t(a), t(b));
    let (ea, eb) = (e(a), e(b));
    let det = ta.0 * tb.1 - ta.1 * tb.0;
    // A = [ea eb] * [ta tb]^-1
    let m00 = (ea.0 * tb.1 - eb.0 * ta.1) / det;
    let m01 = (eb.0 * ta.0 - ea.0 * tb.0) / det;
    let m10 = (ea.1 * tb.1 - eb.1 * ta.1) / det;
    let m11 = (eb.1 * ta.0 - ea.1 * tb.0) / det;
    for m in [m00, m01, m10, m11] {
        assert!(
            (m - m.round()).abs() < 1e-9,
            "relabeling is not integral: {:?}",
            [m00, m01, m10, m11]
        );
    }
    let (m00, m01, m10, m11) = (
        m00.round() as i32,
        m01.round() as i32,
        m10.round() as i32,
        m11.round() as i32,
    );
    assert_eq!(
        (m00 * m11 - m01 * m10).abs(),
        1,
        "relabeling is not unimodular"
    );

    for k in 0..n {
        let di = truth[k].i - truth[base].i;
        let dj = truth[k].j - truth[base].j;
        let expected = LatticeCoord::new(
            estimated[base].i + m00 * di + m01 * dj,
            estimated[base].j + m10 * di + m11 * dj,
        );
        assert_eq!(
            estimated[k], expected,
            "point {k} breaks the relabeling (truth {:?})",
            truth[k]
        );
    }
}

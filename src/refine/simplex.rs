//! Derivative-free Nelder–Mead simplex minimiser.
//!
//! Standard coefficients (reflection 1, expansion 2, contraction 0.5,
//! shrink 0.5). The initial simplex perturbs each coordinate of `x0` by 5 %
//! (or by `0.00025` when the coordinate is zero). Iteration stops once both
//! the simplex diameter (per coordinate, relative to the best vertex) and the
//! spread of function values fall below their tolerances, or when either the
//! iteration or the evaluation budget runs out. In the latter case the best
//! vertex found so far is still returned.

use serde::{Deserialize, Serialize};

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;
const NONZERO_DELTA: f64 = 0.05;
const ZERO_DELTA: f64 = 0.00025;

/// Budget and tolerances for [`minimize`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplexParams {
    pub max_iterations: usize,
    pub max_evaluations: usize,
    /// Absolute tolerance on vertex coordinates.
    pub xtol: f64,
    /// Absolute tolerance on function values.
    pub ftol: f64,
}

impl Default for SimplexParams {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            max_evaluations: 2000,
            xtol: 1e-8,
            ftol: 1e-8,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimplexResult<const N: usize> {
    /// Best vertex.
    pub x: [f64; N],
    pub fx: f64,
    pub iterations: usize,
    pub evaluations: usize,
    /// False when the budget ran out before both tolerances were met.
    pub converged: bool,
}

struct Counted<F> {
    f: F,
    evaluations: usize,
}

impl<F> Counted<F> {
    fn eval<const N: usize>(&mut self, x: &[f64; N]) -> f64
    where
        F: FnMut(&[f64; N]) -> f64,
    {
        self.evaluations += 1;
        (self.f)(x)
    }
}

/// Minimises `f` starting from `x0`.
pub fn minimize<const N: usize, F>(f: F, x0: [f64; N], params: &SimplexParams) -> SimplexResult<N>
where
    F: FnMut(&[f64; N]) -> f64,
{
    let mut objective = Counted { f, evaluations: 0 };

    let mut simplex: Vec<([f64; N], f64)> = Vec::with_capacity(N + 1);
    let f0 = objective.eval(&x0);
    simplex.push((x0, f0));
    for k in 0..N {
        let mut vertex = x0;
        vertex[k] = if vertex[k] != 0.0 {
            (1.0 + NONZERO_DELTA) * vertex[k]
        } else {
            ZERO_DELTA
        };
        let fv = objective.eval(&vertex);
        simplex.push((vertex, fv));
    }
    sort_vertices(&mut simplex);

    if N == 0 {
        return SimplexResult {
            x: x0,
            fx: f0,
            iterations: 0,
            evaluations: objective.evaluations,
            converged: true,
        };
    }

    let mut iterations = 0usize;
    let mut converged = false;
    loop {
        if has_converged(&simplex, params) {
            converged = true;
            break;
        }
        if iterations >= params.max_iterations || objective.evaluations >= params.max_evaluations {
            break;
        }
        iterations += 1;

        let worst = simplex[N];
        let centroid = centroid(&simplex[..N]);
        let reflected = along(&centroid, &worst.0, REFLECT);
        let f_reflected = objective.eval(&reflected);

        if f_reflected < simplex[0].1 {
            let expanded = along(&centroid, &worst.0, REFLECT * EXPAND);
            let f_expanded = objective.eval(&expanded);
            simplex[N] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
        } else if f_reflected < simplex[N - 1].1 {
            simplex[N] = (reflected, f_reflected);
        } else {
            let accepted = if f_reflected < worst.1 {
                let outside = along(&centroid, &worst.0, REFLECT * CONTRACT);
                let f_outside = objective.eval(&outside);
                if f_outside <= f_reflected {
                    simplex[N] = (outside, f_outside);
                    true
                } else {
                    false
                }
            } else {
                let inside = along(&centroid, &worst.0, -CONTRACT);
                let f_inside = objective.eval(&inside);
                if f_inside < worst.1 {
                    simplex[N] = (inside, f_inside);
                    true
                } else {
                    false
                }
            };

            if !accepted {
                let best = simplex[0].0;
                for vertex in simplex.iter_mut().skip(1) {
                    for k in 0..N {
                        vertex.0[k] = best[k] + SHRINK * (vertex.0[k] - best[k]);
                    }
                    vertex.1 = objective.eval(&vertex.0);
                }
            }
        }

        sort_vertices(&mut simplex);
    }

    let (x, fx) = simplex[0];
    SimplexResult {
        x,
        fx,
        iterations,
        evaluations: objective.evaluations,
        converged,
    }
}

fn sort_vertices<const N: usize>(simplex: &mut [([f64; N], f64)]) {
    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
}

fn centroid<const N: usize>(vertices: &[([f64; N], f64)]) -> [f64; N] {
    let mut c = [0.0f64; N];
    for (v, _) in vertices {
        for k in 0..N {
            c[k] += v[k];
        }
    }
    let inv = 1.0 / vertices.len().max(1) as f64;
    for value in &mut c {
        *value *= inv;
    }
    c
}

/// `centroid + t·(centroid − worst)`.
fn along<const N: usize>(centroid: &[f64; N], worst: &[f64; N], t: f64) -> [f64; N] {
    let mut out = [0.0f64; N];
    for k in 0..N {
        out[k] = (1.0 + t) * centroid[k] - t * worst[k];
    }
    out
}

fn has_converged<const N: usize>(simplex: &[([f64; N], f64)], params: &SimplexParams) -> bool {
    let (best, f_best) = &simplex[0];
    let mut x_spread = 0.0f64;
    let mut f_spread = 0.0f64;
    for (v, fv) in &simplex[1..] {
        for k in 0..N {
            x_spread = x_spread.max((v[k] - best[k]).abs());
        }
        f_spread = f_spread.max((fv - f_best).abs());
    }
    // f64::max drops NaN, so non-finite costs are checked separately.
    x_spread <= params.xtol
        && f_spread <= params.ftol
        && simplex.iter().all(|(_, fv)| fv.is_finite())
}

use super::{LinearOperator, Preconditioner, SolverError};
use crate::math::Real;
use na::DVector;

/// Solves `A * x = b` with the preconditioned bi-conjugate gradient method.
///
/// The iterations start at `x0` and stop once the residual norm relative to
/// `‖b‖` is below `tolerance`. `A` does not need to be symmetric.
pub fn solve_bicg<A, P>(
    a: &A,
    b: &DVector<Real>,
    x0: DVector<Real>,
    max_iterations: usize,
    tolerance: Real,
    preconditioner: &P,
) -> Result<DVector<Real>, SolverError>
where
    A: LinearOperator + ?Sized,
    P: Preconditioner + ?Sized,
{
    let b_norm = b.norm();
    if b_norm == 0.0 {
        return Ok(DVector::zeros(b.len()));
    }

    let mut x = x0;
    let mut r = b - a.apply(&x);
    let mut r_shadow = r.clone();
    let mut residual = r.norm() / b_norm;

    if residual < tolerance {
        return Ok(x);
    }

    let mut p = DVector::zeros(b.len());
    let mut p_shadow = DVector::zeros(b.len());
    let mut rho_prev = 1.0;

    for iteration in 0..max_iterations {
        let z = preconditioner.apply(&r);
        let z_shadow = preconditioner.apply_transpose(&r_shadow);
        let rho = z.dot(&r_shadow);

        if rho == 0.0 || !rho.is_finite() {
            return Err(SolverError::Breakdown);
        }

        if iteration == 0 {
            p.copy_from(&z);
            p_shadow.copy_from(&z_shadow);
        } else {
            let beta = rho / rho_prev;
            p = z + p * beta;
            p_shadow = z_shadow + p_shadow * beta;
        }

        let q = a.apply(&p);
        let q_shadow = a.apply_transpose(&p_shadow);
        let denom = p_shadow.dot(&q);

        if denom == 0.0 || !denom.is_finite() {
            return Err(SolverError::Breakdown);
        }

        let alpha = rho / denom;
        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &q, 1.0);
        r_shadow.axpy(-alpha, &q_shadow, 1.0);

        residual = r.norm() / b_norm;
        if !residual.is_finite() {
            return Err(SolverError::Breakdown);
        }

        if residual < tolerance {
            return Ok(x);
        }

        rho_prev = rho;
    }

    Err(SolverError::NoConvergence {
        iterations: max_iterations,
        residual,
    })
}

use std::ops::{Add, Mul};

/// One classical fourth-order Runge-Kutta step.
///
/// `derivative(t, y)` returns dy/dt. It is called four times, at `t`, twice
/// at `t + dt/2` and at `t + dt`, and must not depend on anything but its
/// arguments for the step to be repeatable.
pub fn rk4_step<S, F>(state: S, t: f64, dt: f64, mut derivative: F) -> S
where
    S: Copy + Add<Output = S> + Mul<f64, Output = S>,
    F: FnMut(f64, &S) -> S,
{
    let half_dt = dt / 2.0;

    let k1 = derivative(t, &state);
    let k2 = derivative(t + half_dt, &(state + k1 * half_dt));
    let k3 = derivative(t + half_dt, &(state + k2 * half_dt));
    let k4 = derivative(t + dt, &(state + k3 * dt));

    state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::vector3d::Vector3D;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_exponential_decay() {
        let dt = 0.01;
        let mut y = 1.0_f64;
        let mut t = 0.0;

        for _ in 0..100 {
            y = rk4_step(y, t, dt, |_, y| -y);
            t += dt;
        }

        assert_abs_diff_eq!(y, (-1.0_f64).exp(), epsilon = 1e-8);
    }

    #[test]
    fn test_time_dependent_derivative() {
        // dy/dt = 3t², exact for a cubic: y(2) = 8
        let dt = 0.5;
        let mut y = 0.0_f64;
        let mut t = 0.0;

        for _ in 0..4 {
            y = rk4_step(y, t, dt, |t, _| 3.0 * t * t);
            t += dt;
        }

        assert_abs_diff_eq!(y, 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_harmonic_oscillator_conserves_energy() {
        // x'' = -x packed as (position, velocity) in the x and y components
        let dt = 0.01;
        let mut state = Vector3D::new(1.0, 0.0, 0.0);
        let mut t = 0.0;

        for _ in 0..628 {
            state = rk4_step(state, t, dt, |_, s| Vector3D::new(s.y, -s.x, 0.0));
            t += dt;
        }

        let energy = state.x.powi(2) + state.y.powi(2);
        assert_abs_diff_eq!(energy, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.x, t.cos(), epsilon = 1e-8);
    }

    #[test]
    fn test_evaluation_points() {
        let mut times = Vec::new();
        rk4_step(0.0_f64, 10.0, 2.0, |t, _| {
            times.push(t);
            0.0
        });
        assert_eq!(times, vec![10.0, 11.0, 11.0, 12.0]);
    }
}

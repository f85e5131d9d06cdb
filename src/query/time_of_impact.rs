use crate::dynamics::PhysicsState;
use crate::math::Real;
use crate::query::FeatureStatus;

/// Limits of a time-of-impact search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ToiOptions {
    /// The length of the last timestep.
    pub dt: Real,
    /// The maximum number of bisections.
    pub max_iterations: usize,
    /// The search stops once the time interval is narrower than this fraction of `dt`.
    pub min_interval: Real,
}

/// The result of a time-of-impact search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ToiSearch {
    /// The status of the last test performed.
    pub status: FeatureStatus,
    /// The number of bisections performed.
    pub iterations: usize,
    /// The fraction of the last timestep at which the last test was performed.
    pub fraction: Real,
}

/// Searches the last timestep for the moment two penetrating bodies started touching.
///
/// The fraction `f` of the last timestep is bisected over `[0, 1]`: the
/// bodies listed in `mobile` are moved to their pose at `f`, extrapolated
/// from the state saved by [`PhysicsState::save_last_state`], and `test`
/// is run. A penetration moves the search earlier, separated features move
/// it later, and a contact needing a response ends it.
///
/// Whatever the outcome, the mobile bodies are put back at the poses saved
/// by [`PhysicsState::backup_positions`].
pub fn time_of_impact<E>(
    state: &mut PhysicsState,
    mobile: &[usize],
    options: &ToiOptions,
    mut test: impl FnMut(&PhysicsState) -> Result<FeatureStatus, E>,
) -> Result<ToiSearch, E> {
    let mut lower = 0.0;
    let mut upper = 1.0;
    let mut search = ToiSearch {
        status: FeatureStatus::Penetration,
        iterations: 0,
        fraction: 1.0,
    };

    while search.status != FeatureStatus::AddedResponse
        && upper - lower >= options.min_interval
        && search.iterations < options.max_iterations
    {
        let fraction = lower + (upper - lower) / 2.0;
        for i in mobile {
            state.replay_pose(*i, fraction, options.dt);
        }

        let status = match test(state) {
            Ok(status) => status,
            Err(err) => {
                restore(state, mobile);
                return Err(err);
            }
        };

        match status {
            FeatureStatus::Penetration => upper = fraction,
            FeatureStatus::FoundFeatures => lower = fraction,
            FeatureStatus::AddedResponse => {}
        }

        search = ToiSearch {
            status,
            iterations: search.iterations + 1,
            fraction,
        };
    }

    restore(state, mobile);
    Ok(search)
}

fn restore(state: &mut PhysicsState, mobile: &[usize]) {
    for i in mobile {
        state.restore_pose(*i);
    }
}

#[cfg(test)]
mod test {
    use super::{time_of_impact, ToiOptions, ToiSearch};
    use crate::dynamics::PhysicsState;
    use crate::math::{Point, Vector};
    use crate::query::FeatureStatus;

    const OPTIONS: ToiOptions = ToiOptions {
        dt: 1.0,
        max_iterations: 6,
        min_interval: 1.0 / 32.0,
    };

    /// A body that moved from x = 0 to x = 1 during the last step.
    fn moved_body() -> PhysicsState {
        let mut state = PhysicsState::new();
        let _ = state.push_body(&Point::origin(), 0.0, &Vector::x(), 0.0, 1.0, 1.0);
        state.save_last_state();
        state.set_pose(0, &Point::new(1.0, 0.0), 0.0);
        state.backup_positions();
        state
    }

    #[test]
    fn unresolved_search_is_bounded_and_restores_poses() {
        let mut state = moved_body();
        let mut visited = Vec::new();
        let search = time_of_impact(&mut state, &[0], &OPTIONS, |s| {
            visited.push(s.position(0).x);
            Ok::<_, ()>(FeatureStatus::Penetration)
        })
        .unwrap();

        assert_eq!(search.iterations, 6);
        assert_eq!(search.status, FeatureStatus::Penetration);
        assert_eq!(visited, vec![0.5, 0.25, 0.125, 0.0625, 0.03125, 0.015625]);
        assert_eq!(state.position(0), Point::new(1.0, 0.0));
    }

    #[test]
    fn search_converges_on_the_contact() {
        let mut state = moved_body();
        // The bodies touch when x is in [0.6, 0.65) and overlap past it.
        let search = time_of_impact(&mut state, &[0], &OPTIONS, |s| {
            let x = s.position(0).x;
            Ok::<_, ()>(if x >= 0.65 {
                FeatureStatus::Penetration
            } else if x >= 0.6 {
                FeatureStatus::AddedResponse
            } else {
                FeatureStatus::FoundFeatures
            })
        })
        .unwrap();

        assert_eq!(search.status, FeatureStatus::AddedResponse);
        assert_eq!(search.fraction, 0.625);
        assert_eq!(search.iterations, 3);
        assert_eq!(state.position(0), Point::new(1.0, 0.0));
    }

    #[test]
    fn errors_restore_poses() {
        let mut state = moved_body();
        let result: Result<ToiSearch, &str> =
            time_of_impact(&mut state, &[0], &OPTIONS, |_| Err("unsupported"));
        assert_eq!(result, Err("unsupported"));
        assert_eq!(state.position(0), Point::new(1.0, 0.0));
    }
}

//! Outer phase loop of the dual solver
//!
//! Sweeps every commodity once per phase until the dual objective reaches 1.
//! The dual must strictly increase across phases; a stall means the length
//! updates have degenerated numerically and the run is aborted rather than
//! allowed to spin.

use super::{augment, grouping, SolveState};
use crate::Error;
use crate::Result;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

pub(crate) fn run<N>(state: &mut SolveState<'_, N>) -> Result<()>
where
    N: Clone + Eq + Hash + Debug,
{
    let mut old_dual = 0.0;

    loop {
        let dual = state.net.dual_objective();
        if dual >= 1.0 {
            debug!(phases = state.phases, dual, "dual objective reached 1");
            return Ok(());
        }
        if dual <= old_dual {
            return Err(Error::NonMonotonicDual {
                phase: state.phases,
                dual,
            });
        }
        old_dual = dual;
        state.phases += 1;

        if let Some(threshold) = state.scaling_threshold {
            if state.phases % threshold == 0 {
                for demand in &mut state.demands {
                    *demand *= 2.0;
                }
                debug!(phase = state.phases, "doubled demands on scaling schedule");
            }
        }

        if state.karakostas {
            grouping::sweep(state)?;
        } else {
            for commodity in 0..state.demands.len() {
                augment::route(state, commodity)?;
            }
        }
    }
}

//! Action-value table for the steering agent

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{action::Action, discretizer::StateKey};

/// Q-table mapping state keys to one value per action.
///
/// Rows are created on the first update of a state and never removed;
/// reads of unseen states return `q_init` without inserting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    rows: BTreeMap<StateKey, [f64; 2]>,
    q_init: f64,
}

impl QTable {
    pub fn new(q_init: f64) -> Self {
        Self {
            rows: BTreeMap::new(),
            q_init,
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &StateKey, action: Action) -> f64 {
        self.row(state)[action.index()]
    }

    /// Values of every action in a state, in canonical action order.
    pub fn row(&self, state: &StateKey) -> [f64; 2] {
        self.rows
            .get(state)
            .copied()
            .unwrap_or([self.q_init; 2])
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.visit(state)[action.index()] = value;
    }

    /// Highest-valued action; ties go to the lowest action index.
    pub fn greedy_action(&self, state: &StateKey) -> Action {
        let row = self.row(state);
        let mut best = Action::ALL[0];
        for action in Action::ALL.into_iter().skip(1) {
            if row[action.index()] > row[best.index()] {
                best = action;
            }
        }
        best
    }

    /// Value of the greedy action in a state.
    pub fn max_q(&self, state: &StateKey) -> f64 {
        self.get(state, self.greedy_action(state))
    }

    /// Temporal-difference update of one entry:
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(b, argmax_a' Q(b,a')) - Q(s,a)]
    ///
    /// where `b` is the bootstrap state. Returns the new value.
    pub fn td_update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        bootstrap: &StateKey,
        alpha: f64,
        gamma: f64,
    ) -> f64 {
        let bootstrap_q = self.max_q(bootstrap);
        let entry = &mut self.visit(state)[action.index()];
        let td_error = reward + gamma * bootstrap_q - *entry;
        *entry += alpha * td_error;
        *entry
    }

    /// Iterate rows in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &[f64; 2])> {
        self.rows.iter()
    }

    /// Number of states with a row.
    pub fn states(&self) -> usize {
        self.rows.len()
    }

    /// Number of stored state-action values.
    pub fn size(&self) -> usize {
        self.rows.len() * Action::ALL.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn reset(&mut self) {
        self.rows.clear();
    }

    fn visit(&mut self, state: StateKey) -> &mut [f64; 2] {
        self.rows.entry(state).or_insert([self.q_init; 2])
    }
}

//! ε-greedy Q-learning agent
//!
//! The agent keeps its own random source so a run is reproducible from a
//! seed, and so tests can substitute an instrumented generator.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use super::{
    action::Action,
    config::{AgentConfig, BootstrapMode, Hyperparameters},
    discretizer::StateDiscretizer,
    q_table::QTable,
};
use crate::{Error, Result};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Where the agent is in its choose/update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentPhase {
    /// No action has been chosen yet.
    Idle,
    /// An action was chosen and awaits its reward.
    ActionChosen,
    /// The last chosen action has been learned from.
    Updated,
}

/// Q-learning agent over the binary velocity-nudge action set.
#[derive(Debug, Clone)]
pub struct QLearningAgent<R = StdRng> {
    q_table: QTable,
    config: AgentConfig,
    epsilon: f64,
    alpha: f64,
    phase: AgentPhase,
    last_action: Option<Action>,
    last_explored: bool,
    updates: u64,
    rng: R,
    rng_seed: Option<u64>,
}

impl QLearningAgent<StdRng> {
    /// Create an agent with an entropy-seeded generator.
    ///
    /// Use [`with_seed`](Self::with_seed) for reproducible runs.
    pub fn new(config: AgentConfig) -> Result<Self> {
        Self::with_rng(config, build_rng(None))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Seed used for the generator, if one was given.
    pub fn seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Rebuild an agent from persisted learning state.
    pub(crate) fn restore(
        config: AgentConfig,
        q_table: QTable,
        epsilon: f64,
        alpha: f64,
        updates: u64,
        rng_seed: Option<u64>,
    ) -> Result<Self> {
        let hp = &config.hyperparameters;
        let schedule = [
            ("epsilon", epsilon, hp.min_epsilon, hp.initial_epsilon),
            ("alpha", alpha, hp.min_alpha, hp.initial_alpha),
        ];
        for (name, value, floor, start) in schedule {
            if !(value.is_finite() && (floor..=start).contains(&value)) {
                return Err(Error::config(format!(
                    "saved {name} {value} lies outside [{floor}, {start}]"
                )));
            }
        }

        let mut agent = Self::with_rng(config, build_rng(rng_seed))?;
        agent.q_table = q_table;
        agent.epsilon = epsilon;
        agent.alpha = alpha;
        agent.updates = updates;
        agent.rng_seed = rng_seed;
        Ok(agent)
    }
}

impl<R: Rng> QLearningAgent<R> {
    /// Create an agent drawing all randomness from `rng`.
    pub fn with_rng(config: AgentConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            q_table: QTable::new(config.q_init),
            epsilon: config.hyperparameters.initial_epsilon,
            alpha: config.hyperparameters.initial_alpha,
            config,
            phase: AgentPhase::Idle,
            last_action: None,
            last_explored: false,
            updates: 0,
            rng,
            rng_seed: None,
        })
    }

    /// ε-greedy action selection for a continuous state.
    ///
    /// With `epsilon == 0` the random source is not consulted at all.
    pub fn choose_action(&mut self, state: f64) -> Result<Action> {
        let key = self.config.discretizer.key(state)?;

        let explore = self.epsilon > 0.0 && self.rng.random::<f64>() < self.epsilon;
        let action = if explore {
            Action::ALL[self.rng.random_range(0..Action::ALL.len())]
        } else {
            self.q_table.greedy_action(&key)
        };

        if explore {
            debug!(state, %key, ?action, epsilon = self.epsilon, "exploring");
        }

        self.last_action = Some(action);
        self.last_explored = explore;
        self.phase = AgentPhase::ActionChosen;
        Ok(action)
    }

    /// The most recently chosen action.
    pub fn action(&self) -> Option<Action> {
        self.last_action
    }

    /// Learn from `reward`, bootstrapping on `state` itself.
    pub fn update(&mut self, state: f64, reward: f64) -> Result<()> {
        self.update_transition(state, reward, state)
    }

    /// Learn from the transition `state → next_state`.
    ///
    /// In [`BootstrapMode::SameState`] `next_state` is ignored and the
    /// bootstrap uses `state`. Both states and the reward are validated before
    /// anything is mutated. Epsilon and alpha decay after every successful
    /// update.
    ///
    /// Each chosen action is learned from exactly once: updating outside the
    /// `ActionChosen` phase fails with [`Error::NoActionChosen`].
    pub fn update_transition(&mut self, state: f64, reward: f64, next_state: f64) -> Result<()> {
        let action = match (self.phase, self.last_action) {
            (AgentPhase::ActionChosen, Some(action)) => action,
            _ => return Err(Error::NoActionChosen),
        };
        if !reward.is_finite() {
            return Err(Error::NonFiniteReward { reward });
        }
        let key = self.config.discretizer.key(state)?;
        let bootstrap = match self.config.bootstrap {
            BootstrapMode::SameState => key,
            BootstrapMode::NextState => self.config.discretizer.key(next_state)?,
        };

        let value = self.q_table.td_update(
            key,
            action,
            reward,
            &bootstrap,
            self.alpha,
            self.config.hyperparameters.initial_gamma,
        );

        self.decay();
        self.updates += 1;
        self.phase = AgentPhase::Updated;

        debug!(
            %key,
            ?action,
            reward,
            value,
            epsilon = self.epsilon,
            alpha = self.alpha,
            "q-value updated"
        );
        Ok(())
    }

    fn decay(&mut self) {
        let h = &self.config.hyperparameters;
        self.epsilon = (self.epsilon * h.decay_factor).max(h.min_epsilon);
        self.alpha = (self.alpha * h.decay_alpha).max(h.min_alpha);
    }

    /// Clear the table and restore the initial schedule.
    ///
    /// The random source keeps its current position.
    pub fn reset(&mut self) {
        self.q_table.reset();
        self.epsilon = self.config.hyperparameters.initial_epsilon;
        self.alpha = self.config.hyperparameters.initial_alpha;
        self.phase = AgentPhase::Idle;
        self.last_action = None;
        self.last_explored = false;
        self.updates = 0;
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.config.hyperparameters.initial_gamma
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    /// Whether the last chosen action came from the exploration branch.
    pub fn last_explored(&self) -> bool {
        self.last_explored
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.config.hyperparameters
    }

    pub fn discretizer(&self) -> &StateDiscretizer {
        &self.config.discretizer
    }

    pub fn bootstrap(&self) -> BootstrapMode {
        self.config.bootstrap
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

//! Kinematic vehicle driven by the hybrid controller
//!
//! Each tick combines two PID controllers, the fuzzy corrector and the
//! Q-learning agent into a velocity and turn rate, integrates the pose, and
//! feeds the resulting reward back to the agent.

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::{
    Error, Result,
    app::SimulationConfig,
    control::{FuzzyCorrector, PidController},
    q_learning::{Action, QLearningAgent},
    types::{ControlTargets, Pose, PoseRecord},
};

/// Reward given to the agent each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Heading errors with magnitude strictly below this count as on target.
    pub tolerance: f64,
    pub on_target: f64,
    pub off_target: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            on_target: 10.0,
            off_target: -1.0,
        }
    }
}

impl RewardConfig {
    pub fn is_on_target(&self, angle_error: f64) -> bool {
        angle_error.abs() < self.tolerance
    }

    pub fn evaluate(&self, angle_error: f64) -> f64 {
        if self.is_on_target(angle_error) {
            self.on_target
        } else {
            self.off_target
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(Error::config(format!(
                "reward tolerance must be non-negative and finite, got {}",
                self.tolerance
            )));
        }
        if !self.on_target.is_finite() || !self.off_target.is_finite() {
            return Err(Error::config("reward values must be finite"));
        }
        Ok(())
    }
}

/// Everything that happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Zero-based index of the tick within the simulator's lifetime.
    pub tick: u64,
    /// Pose after integration.
    pub pose: Pose,
    pub velocity: f64,
    pub angular_velocity: f64,
    pub velocity_error: f64,
    pub angle_error: f64,
    pub action: Action,
    pub explored: bool,
    /// Whether the pre-integration heading error was within the reward tolerance.
    pub on_target: bool,
    pub reward: f64,
}

/// Single vehicle with its own controllers and learning agent.
#[derive(Debug)]
pub struct VehicleSimulator<R = StdRng> {
    pose: Pose,
    velocity: f64,
    angular_velocity: f64,
    targets: ControlTargets,
    velocity_pid: PidController,
    heading_pid: PidController,
    fuzzy: FuzzyCorrector,
    agent: QLearningAgent<R>,
    reward: RewardConfig,
    ticks: u64,
}

impl VehicleSimulator<StdRng> {
    /// Build a simulator whose agent is seeded from `config.seed`.
    pub fn new(initial_pose: Pose, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let agent = QLearningAgent::new(config.agent)?;
        let agent = match config.seed {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        };
        Self::with_agent(initial_pose, config, agent)
    }
}

impl<R: Rng> VehicleSimulator<R> {
    /// Build a simulator around an existing agent.
    ///
    /// Controller gains, fuzzy thresholds and rewards come from `config`;
    /// the agent keeps its own table and schedule.
    pub fn with_agent(
        initial_pose: Pose,
        config: &SimulationConfig,
        agent: QLearningAgent<R>,
    ) -> Result<Self> {
        config.validate()?;
        if let Some(component) = initial_pose.non_finite_component() {
            return Err(Error::config(format!(
                "initial pose {component} must be finite"
            )));
        }

        Ok(Self {
            pose: initial_pose,
            velocity: 0.0,
            angular_velocity: 0.0,
            targets: ControlTargets::default(),
            velocity_pid: PidController::new(config.velocity_pid),
            heading_pid: PidController::new(config.heading_pid),
            fuzzy: FuzzyCorrector::new(config.fuzzy),
            agent,
            reward: config.reward,
            ticks: 0,
        })
    }

    /// Replace the set-points; takes effect from the next tick.
    pub fn set_controls(&mut self, targets: ControlTargets) -> Result<()> {
        if !targets.target_velocity.is_finite() || !targets.target_angle.is_finite() {
            return Err(Error::config(format!(
                "targets must be finite, got velocity {} angle {}",
                targets.target_velocity, targets.target_angle
            )));
        }
        self.targets = targets;
        Ok(())
    }

    /// Advance the vehicle by `dt` seconds.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTimeStep`] if `dt` is not positive and finite; nothing
    ///   is mutated.
    /// - [`Error::Divergence`] if a control output or the integrated pose is not
    ///   finite. Pose, velocities and PID state are left as they were before the
    ///   tick and the agent is not updated, though its random source has
    ///   advanced if an action was drawn.
    pub fn step(&mut self, dt: f64) -> Result<TickReport> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(Error::InvalidTimeStep { dt });
        }
        let tick = self.ticks;
        let mut velocity_pid = self.velocity_pid;
        let mut heading_pid = self.heading_pid;

        let velocity_error = self.targets.target_velocity - self.velocity;
        let mut velocity = self.velocity + velocity_pid.control(velocity_error, dt)?;

        let angle_error = self.targets.target_angle - self.pose.heading;
        let mut angular_velocity = heading_pid.control(angle_error, dt)?;
        angular_velocity += self.fuzzy.control(angle_error);

        self.check_finite(tick, "velocity", velocity)?;
        self.check_finite(tick, "angular velocity", angular_velocity)?;
        self.check_finite(tick, "heading error", angle_error)?;

        let action = self.agent.choose_action(angle_error)?;
        let explored = self.agent.last_explored();
        velocity += action.value();

        let heading = self.pose.heading;
        let pose = Pose {
            x: self.pose.x + velocity * heading.cos() * dt,
            y: self.pose.y + velocity * heading.sin() * dt,
            heading: heading + angular_velocity * dt,
        };
        if let Some(component) = pose.non_finite_component() {
            warn!(tick, component, "pose diverged");
            return Err(Error::Divergence {
                tick,
                quantity: component,
            });
        }

        let on_target = self.reward.is_on_target(angle_error);
        let reward = self.reward.evaluate(angle_error);
        let next_angle_error = self.targets.target_angle - pose.heading;
        self.agent
            .update_transition(angle_error, reward, next_angle_error)?;

        self.pose = pose;
        self.velocity = velocity;
        self.angular_velocity = angular_velocity;
        self.velocity_pid = velocity_pid;
        self.heading_pid = heading_pid;
        self.ticks += 1;

        trace!(
            tick,
            x = pose.x,
            y = pose.y,
            heading = pose.heading,
            velocity,
            angular_velocity,
            ?action,
            reward,
            "tick"
        );

        Ok(TickReport {
            tick,
            pose,
            velocity,
            angular_velocity,
            velocity_error,
            angle_error,
            action,
            explored,
            on_target,
            reward,
        })
    }

    fn check_finite(&self, tick: u64, quantity: &'static str, value: f64) -> Result<()> {
        if value.is_finite() {
            Ok(())
        } else {
            warn!(tick, quantity, value, "control signal diverged");
            Err(Error::Divergence { tick, quantity })
        }
    }

    /// Current pose as an export record.
    pub fn snapshot(&self) -> PoseRecord {
        PoseRecord::from_pose(self.ticks, &self.pose)
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    pub fn controls(&self) -> &ControlTargets {
        &self.targets
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn velocity_pid(&self) -> &PidController {
        &self.velocity_pid
    }

    pub fn heading_pid(&self) -> &PidController {
        &self.heading_pid
    }

    pub fn agent(&self) -> &QLearningAgent<R> {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut QLearningAgent<R> {
        &mut self.agent
    }

    pub fn into_agent(self) -> QLearningAgent<R> {
        self.agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        control::PidGains,
        q_learning::{AgentPhase, BootstrapMode, Hyperparameters},
    };

    fn seeded_config(seed: u64) -> SimulationConfig {
        SimulationConfig::default().with_seed(seed)
    }

    fn greedy_config() -> SimulationConfig {
        let mut config = seeded_config(0);
        config.agent.hyperparameters = Hyperparameters {
            initial_epsilon: 0.0,
            min_epsilon: 0.0,
            ..Hyperparameters::default()
        };
        config
    }

    #[test]
    fn test_reward_thresholds() {
        let reward = RewardConfig::default();
        assert_eq!(reward.evaluate(0.0), 10.0);
        assert_eq!(reward.evaluate(-0.05), 10.0);
        assert_eq!(reward.evaluate(0.1), -1.0);
        assert_eq!(reward.evaluate(-0.3), -1.0);
    }

    #[test]
    fn test_first_tick_matches_hand_computation() {
        let mut sim = VehicleSimulator::new(Pose::default(), &greedy_config()).unwrap();
        sim.set_controls(ControlTargets::new(1.0, 0.0)).unwrap();
        let report = sim.step(0.1).unwrap();

        // Velocity PID: 1.0*1 + 0.1*0.1 + 0.01*(1/0.1) = 1.11
        // Fresh table ties resolve to Decelerate, so velocity = 0.11.
        assert_eq!(report.action, Action::Decelerate);
        assert!(!report.explored);
        assert!((report.velocity - 0.11).abs() < 1e-12);
        assert_eq!(report.angular_velocity, 0.0);
        assert!((report.pose.x - 0.011).abs() < 1e-12);
        assert_eq!(report.pose.y, 0.0);
        assert_eq!(report.pose.heading, 0.0);
        assert!(report.on_target);
        assert_eq!(report.reward, 10.0);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_axes_keep_independent_pid_histories() {
        let mut sim = VehicleSimulator::new(Pose::default(), &greedy_config()).unwrap();
        sim.set_controls(ControlTargets::new(2.0, 0.5)).unwrap();
        sim.step(0.1).unwrap();

        assert!((sim.velocity_pid().integral() - 0.2).abs() < 1e-12);
        assert!((sim.heading_pid().integral() - 0.05).abs() < 1e-12);
        assert_eq!(sim.velocity_pid().previous_error(), 2.0);
        assert_eq!(sim.heading_pid().previous_error(), 0.5);
    }

    #[test]
    fn test_fuzzy_term_adds_to_turn_rate() {
        let mut config = greedy_config();
        config.heading_pid = PidGains::new(0.0, 0.0, 0.0);
        let mut sim = VehicleSimulator::new(Pose::default(), &config).unwrap();

        sim.set_controls(ControlTargets::new(0.0, 0.5)).unwrap();
        assert_eq!(sim.step(0.1).unwrap().angular_velocity, 1.0);

        let mut sim = VehicleSimulator::new(Pose::new(0.0, 0.0, 0.5), &config).unwrap();
        sim.set_controls(ControlTargets::new(0.0, 0.0)).unwrap();
        assert_eq!(sim.step(0.1).unwrap().angular_velocity, -1.0);
    }

    #[test]
    fn test_invalid_dt_is_atomic() {
        let mut sim = VehicleSimulator::new(Pose::new(1.0, 2.0, 0.3), &seeded_config(4)).unwrap();
        sim.set_controls(ControlTargets::new(1.0, 0.0)).unwrap();
        sim.step(0.1).unwrap();

        let pose = *sim.pose();
        let velocity = sim.velocity();
        let velocity_pid = *sim.velocity_pid();
        let epsilon = sim.agent().epsilon();

        for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(sim.step(dt), Err(Error::InvalidTimeStep { .. })));
        }
        assert_eq!(*sim.pose(), pose);
        assert_eq!(sim.velocity(), velocity);
        assert_eq!(*sim.velocity_pid(), velocity_pid);
        assert_eq!(sim.agent().epsilon(), epsilon);
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn test_divergence_is_reported_and_not_committed() {
        let mut config = greedy_config();
        config.velocity_pid = PidGains::new(f64::MAX, 0.0, 0.0);
        let mut sim = VehicleSimulator::new(Pose::default(), &config).unwrap();
        sim.set_controls(ControlTargets::new(10.0, 0.0)).unwrap();

        let err = sim.step(0.1).unwrap_err();
        assert!(matches!(
            err,
            Error::Divergence {
                tick: 0,
                quantity: "velocity"
            }
        ));
        assert_eq!(*sim.pose(), Pose::default());
        assert_eq!(sim.velocity(), 0.0);
        assert_eq!(sim.velocity_pid().integral(), 0.0);
        assert_eq!(sim.agent().phase(), AgentPhase::Idle);
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_targets_must_be_finite() {
        let mut sim = VehicleSimulator::new(Pose::default(), &seeded_config(1)).unwrap();
        assert!(sim.set_controls(ControlTargets::new(f64::NAN, 0.0)).is_err());
        assert_eq!(*sim.controls(), ControlTargets::default());
    }

    #[test]
    fn test_initial_pose_must_be_finite() {
        let err = VehicleSimulator::new(Pose::new(f64::INFINITY, 0.0, 0.0), &seeded_config(1))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_agent_learns_every_tick() {
        let mut sim = VehicleSimulator::new(Pose::default(), &seeded_config(3)).unwrap();
        sim.set_controls(ControlTargets::new(1.0, 0.2)).unwrap();
        for _ in 0..25 {
            sim.step(0.1).unwrap();
        }
        assert_eq!(sim.agent().updates(), 25);
        assert!(sim.agent().epsilon() < 1.0);
        assert!(!sim.agent().q_table().is_empty());
    }

    #[test]
    fn test_next_state_bootstrap_mode_runs() {
        let mut config = seeded_config(8);
        config.agent.bootstrap = BootstrapMode::NextState;
        let mut sim = VehicleSimulator::new(Pose::default(), &config).unwrap();
        sim.set_controls(ControlTargets::new(1.0, 0.4)).unwrap();
        for _ in 0..50 {
            sim.step(0.1).unwrap();
        }
        assert_eq!(sim.agent().bootstrap(), BootstrapMode::NextState);
        assert_eq!(sim.ticks(), 50);
    }

    #[test]
    fn test_snapshot_tracks_tick_count() {
        let mut sim = VehicleSimulator::new(Pose::default(), &seeded_config(2)).unwrap();
        sim.set_controls(ControlTargets::new(1.0, 0.0)).unwrap();
        sim.step(0.1).unwrap();
        sim.step(0.1).unwrap();
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.tick, 2);
        assert_eq!(snapshot.x, sim.pose().x);
        assert_eq!(snapshot.theta, sim.pose().heading);
    }
}

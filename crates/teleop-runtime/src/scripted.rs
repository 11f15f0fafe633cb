use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::collections::BTreeMap;

use teleop_core::{Action, Environment, Observation, Result, TeleopError, Value};

/// Field convention emitted by [`ScriptedEnv`].
pub const SCHEMA: &str = "scripted/v1";

const JOINT_COUNT: usize = 6;
const CAM_WIDTH: u32 = 8;
const CAM_HEIGHT: u32 = 8;

/// A small deterministic environment: a seeded joint-state integrator with a
/// synthetic camera field. It stands in for an out-of-scope simulator behind
/// the same trait, keeping the binary runnable end-to-end and runtime tests
/// independent of any physics stack.
///
/// Actions carry a `"joints"` vector interpreted as target deltas;
/// observations carry `"joints"` and a `"cam_high"` image derived from the
/// joint state.
pub struct ScriptedEnv {
    joints: Vec<f64>,
    step_count: usize,
    /// Report done after this many steps; `None` never terminates on its own.
    done_after: Option<usize>,
    rng: StdRng,
}

impl ScriptedEnv {
    pub fn new(done_after: Option<usize>) -> Self {
        Self {
            joints: vec![0.0; JOINT_COUNT],
            step_count: 0,
            done_after,
            rng: StdRng::seed_from_u64(0),
        }
    }

    fn observe(&self) -> Observation {
        let mut fields = BTreeMap::new();
        fields.insert("joints".to_string(), Value::vector(self.joints.clone()));
        fields.insert(
            "cam_high".to_string(),
            Value::image(CAM_WIDTH, CAM_HEIGHT, 3, self.render()),
        );
        fields.insert("step".to_string(), Value::scalar(self.step_count as f64));
        Observation::new(SCHEMA, fields)
    }

    /// A toy render: each joint tints a band of the frame.
    fn render(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity((CAM_WIDTH * CAM_HEIGHT * 3) as usize);
        for y in 0..CAM_HEIGHT {
            let joint = self.joints[(y as usize * JOINT_COUNT) / CAM_HEIGHT as usize];
            let level = ((joint.tanh() + 1.0) * 127.5) as u8;
            for _ in 0..CAM_WIDTH {
                data.extend_from_slice(&[level, level.wrapping_add(64), 255 - level]);
            }
        }
        data
    }
}

#[async_trait]
impl Environment for ScriptedEnv {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn reset(&mut self, seed: u64) -> Result<Observation> {
        self.rng = StdRng::seed_from_u64(seed);
        self.joints = (0..JOINT_COUNT)
            .map(|_| self.rng.random_range(-0.1..0.1))
            .collect();
        self.step_count = 0;
        Ok(self.observe())
    }

    async fn step(&mut self, action: &Action) -> Result<(Observation, bool)> {
        let deltas = action
            .get("joints")
            .and_then(Value::as_vector)
            .ok_or_else(|| {
                TeleopError::Environment(format!(
                    "action missing \"joints\" vector (schema {SCHEMA})"
                ))
            })?;
        if deltas.len() != JOINT_COUNT {
            return Err(TeleopError::Environment(format!(
                "expected {JOINT_COUNT} joint deltas, got {}",
                deltas.len()
            )));
        }

        for (joint, delta) in self.joints.iter_mut().zip(deltas) {
            *joint += delta;
        }
        self.step_count += 1;

        let done = self
            .done_after
            .is_some_and(|limit| self.step_count >= limit);
        Ok((self.observe(), done))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_action(value: f64) -> Action {
        Action::single("joints", Value::vector(vec![value; JOINT_COUNT]))
    }

    #[tokio::test]
    async fn test_reset_is_deterministic() {
        let mut a = ScriptedEnv::new(None);
        let mut b = ScriptedEnv::new(None);
        let obs_a = a.reset(42).await.unwrap();
        let obs_b = b.reset(42).await.unwrap();
        assert_eq!(obs_a, obs_b);

        let obs_c = b.reset(43).await.unwrap();
        assert_ne!(obs_a, obs_c);
    }

    #[tokio::test]
    async fn test_step_integrates_deltas() {
        let mut env = ScriptedEnv::new(None);
        let before = env.reset(0).await.unwrap();
        let (after, done) = env.step(&delta_action(0.5)).await.unwrap();
        assert!(!done);

        let joints_before = before.get("joints").and_then(Value::as_vector).unwrap();
        let joints_after = after.get("joints").and_then(Value::as_vector).unwrap();
        for (b, a) in joints_before.iter().zip(joints_after) {
            assert!((a - b - 0.5).abs() < 1e-9);
        }
        assert_eq!(after.get("step").and_then(Value::as_scalar), Some(1.0));
    }

    #[tokio::test]
    async fn test_done_after_limit() {
        let mut env = ScriptedEnv::new(Some(2));
        env.reset(0).await.unwrap();
        let (_, done) = env.step(&delta_action(0.0)).await.unwrap();
        assert!(!done);
        let (_, done) = env.step(&delta_action(0.0)).await.unwrap();
        assert!(done);
    }

    #[tokio::test]
    async fn test_rejects_malformed_action() {
        let mut env = ScriptedEnv::new(None);
        env.reset(0).await.unwrap();

        let err = env
            .step(&Action::single("grip", Value::scalar(1.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, TeleopError::Environment(_)));

        let short = Action::single("joints", Value::vector(vec![0.0; 2]));
        assert!(env.step(&short).await.is_err());
    }
}

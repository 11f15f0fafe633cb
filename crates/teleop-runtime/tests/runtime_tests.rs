#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use teleop_core::{Action, Observation, Result, Subscriber, TeleopError, Value};
    use teleop_policy::{ActionChunkBroker, MockPolicy, PolicyAgent};
    use teleop_runtime::{Runtime, RuntimeConfig, ScriptedEnv};

    // ── Test doubles ───────────────────────────────────────────

    /// Records every hook invocation into a log shared across subscribers,
    /// so ordering between subscribers is observable.
    struct ProbeSubscriber {
        name: String,
        log: Arc<Mutex<Vec<(String, String)>>>,
        /// Step index ("step" scalar) of each observation seen.
        seen_steps: Arc<Mutex<Vec<f64>>>,
    }

    impl ProbeSubscriber {
        fn new(name: &str, log: Arc<Mutex<Vec<(String, String)>>>) -> Self {
            Self {
                name: name.to_string(),
                log,
                seen_steps: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl Subscriber for ProbeSubscriber {
        fn name(&self) -> &str {
            &self.name
        }

        async fn on_episode_start(&mut self) -> Result<()> {
            self.log
                .lock()
                .unwrap()
                .push((self.name.clone(), "start".into()));
            Ok(())
        }

        async fn on_step(&mut self, observation: &Observation, _action: &Action) -> Result<()> {
            if let Some(step) = observation.get("step").and_then(Value::as_scalar) {
                self.seen_steps.lock().unwrap().push(step);
            }
            self.log
                .lock()
                .unwrap()
                .push((self.name.clone(), "step".into()));
            Ok(())
        }

        async fn on_episode_end(&mut self) -> Result<()> {
            self.log
                .lock()
                .unwrap()
                .push((self.name.clone(), "end".into()));
            Ok(())
        }
    }

    /// Fails its `on_step` hook after a set number of successful steps.
    struct FailingSubscriber {
        fail_at: usize,
        steps: usize,
    }

    #[async_trait]
    impl Subscriber for FailingSubscriber {
        fn name(&self) -> &str {
            "failing"
        }

        async fn on_episode_start(&mut self) -> Result<()> {
            Ok(())
        }

        async fn on_step(&mut self, _observation: &Observation, _action: &Action) -> Result<()> {
            if self.steps == self.fail_at {
                return Err(TeleopError::Io(std::io::Error::other("probe disk full")));
            }
            self.steps += 1;
            Ok(())
        }

        async fn on_episode_end(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn joint_delta_chunk(len: usize) -> Vec<Action> {
        (0..len)
            .map(|_| Action::single("joints", Value::vector(vec![0.01; 6])))
            .collect()
    }

    fn scripted_agent(policy: MockPolicy, horizon: usize) -> Box<PolicyAgent<MockPolicy>> {
        Box::new(PolicyAgent::new(
            ActionChunkBroker::new(policy, horizon).unwrap(),
        ))
    }

    fn config(num_episodes: usize, max_episode_steps: usize) -> RuntimeConfig {
        RuntimeConfig {
            num_episodes,
            max_episode_steps,
            max_hz: 200.0,
            seed: 0,
        }
    }

    // ── Episode accounting ─────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_two_episodes_three_steps_each() {
        // num_episodes=2, max_episode_steps=3, environment never done:
        // 6 on_step per subscriber, start/end twice each.
        let log = Arc::new(Mutex::new(Vec::new()));
        let probe = ProbeSubscriber::new("probe", log.clone());
        let policy = MockPolicy::new("mock").with_default_chunk(joint_delta_chunk(10));

        let mut runtime = Runtime::new(
            Box::new(ScriptedEnv::new(None)),
            scripted_agent(policy, 10),
            vec![Box::new(probe)],
            config(2, 3),
        )
        .unwrap();
        runtime.run().await.unwrap();

        let log = log.lock().unwrap();
        let count = |what: &str| log.iter().filter(|(_, w)| w == what).count();
        assert_eq!(count("start"), 2);
        assert_eq!(count("step"), 6);
        assert_eq!(count("end"), 2);

        // Starts and ends pair up 1:1 in order.
        let lifecycle: Vec<&str> = log
            .iter()
            .filter(|(_, w)| w != "step")
            .map(|(_, w)| w.as_str())
            .collect();
        assert_eq!(lifecycle, vec!["start", "end", "start", "end"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_flag_ends_episode_early() {
        // Environment reports done after 2 steps, far below the ceiling.
        let log = Arc::new(Mutex::new(Vec::new()));
        let probe = ProbeSubscriber::new("probe", log.clone());
        let policy = MockPolicy::new("mock").with_default_chunk(joint_delta_chunk(10));

        let mut runtime = Runtime::new(
            Box::new(ScriptedEnv::new(Some(2))),
            scripted_agent(policy, 10),
            vec![Box::new(probe)],
            config(1, 500),
        )
        .unwrap();
        runtime.run().await.unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.iter().filter(|(_, w)| w == "step").count(), 2);
        assert_eq!(log.iter().filter(|(_, w)| w == "end").count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_notified_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = ProbeSubscriber::new("first", log.clone());
        let second = ProbeSubscriber::new("second", log.clone());
        let policy = MockPolicy::new("mock").with_default_chunk(joint_delta_chunk(10));

        let mut runtime = Runtime::new(
            Box::new(ScriptedEnv::new(None)),
            scripted_agent(policy, 10),
            vec![Box::new(first), Box::new(second)],
            config(1, 3),
        )
        .unwrap();
        runtime.run().await.unwrap();

        // At every notification point, "first" precedes "second" and both
        // see the same events: the log strictly alternates.
        let log = log.lock().unwrap();
        assert_eq!(log.len() % 2, 0);
        for pair in log.chunks(2) {
            assert_eq!(pair[0].0, "first");
            assert_eq!(pair[1].0, "second");
            assert_eq!(pair[0].1, pair[1].1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_step_carries_pre_step_observation() {
        // The observation at step k is the one the action was computed from:
        // its "step" counter reads k, not k+1.
        let log = Arc::new(Mutex::new(Vec::new()));
        let probe = ProbeSubscriber::new("probe", log);
        let seen = probe.seen_steps.clone();
        let policy = MockPolicy::new("mock").with_default_chunk(joint_delta_chunk(10));

        let mut runtime = Runtime::new(
            Box::new(ScriptedEnv::new(None)),
            scripted_agent(policy, 10),
            vec![Box::new(probe)],
            config(1, 3),
        )
        .unwrap();
        runtime.run().await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![0.0, 1.0, 2.0]);
    }

    // ── Failure semantics ──────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_policy_failure_aborts_run() {
        // Horizon 1 forces one inference per step. Four good chunks, then a
        // transport failure on the 5th inference of a 3-episode run: the run
        // aborts with the failure, subscribers saw exactly the 4 preceding
        // steps, and the in-progress episode never got its end hook.
        let log = Arc::new(Mutex::new(Vec::new()));
        let probe = ProbeSubscriber::new("probe", log.clone());
        let mut policy = MockPolicy::new("mock");
        for _ in 0..4 {
            policy = policy.with_chunk(joint_delta_chunk(1));
        }
        let policy = policy.with_error("connection reset by peer");

        let mut runtime = Runtime::new(
            Box::new(ScriptedEnv::new(None)),
            scripted_agent(policy, 1),
            vec![Box::new(probe)],
            config(3, 2),
        )
        .unwrap();

        let err = runtime.run().await.unwrap_err();
        assert!(matches!(err, TeleopError::Transport(_)));

        let log = log.lock().unwrap();
        let count = |what: &str| log.iter().filter(|(_, w)| w == what).count();
        assert_eq!(count("step"), 4);
        assert_eq!(count("start"), 3); // third episode started...
        assert_eq!(count("end"), 2); // ...but never ended
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_failure_aborts_and_is_attributed() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let witness = ProbeSubscriber::new("witness", log.clone());
        let failing = FailingSubscriber {
            fail_at: 2,
            steps: 0,
        };
        let policy = MockPolicy::new("mock").with_default_chunk(joint_delta_chunk(10));

        // The failing subscriber is registered first: when it raises on the
        // third step, the witness behind it is not notified for that step.
        let mut runtime = Runtime::new(
            Box::new(ScriptedEnv::new(None)),
            scripted_agent(policy, 10),
            vec![Box::new(failing), Box::new(witness)],
            config(1, 10),
        )
        .unwrap();

        let err = runtime.run().await.unwrap_err();
        match err {
            TeleopError::Subscriber { name, reason } => {
                assert_eq!(name, "failing");
                assert!(reason.contains("probe disk full"));
            }
            other => panic!("expected subscriber error, got {other}"),
        }

        let log = log.lock().unwrap();
        assert_eq!(log.iter().filter(|(_, w)| w == "step").count(), 2);
        assert_eq!(log.iter().filter(|(_, w)| w == "end").count(), 0);
    }

    // ── Pacing ─────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_pacing_is_a_ceiling() {
        // 3 steps at 50 Hz: the pacer delays twice (between steps), never
        // before the first or after the last. Paused tokio time makes the
        // elapsed virtual time exact.
        let policy = MockPolicy::new("mock").with_default_chunk(joint_delta_chunk(10));
        let mut runtime = Runtime::new(
            Box::new(ScriptedEnv::new(None)),
            scripted_agent(policy, 10),
            vec![],
            RuntimeConfig {
                num_episodes: 1,
                max_episode_steps: 3,
                max_hz: 50.0,
                seed: 0,
            },
        )
        .unwrap();

        let before = tokio::time::Instant::now();
        runtime.run().await.unwrap();
        let elapsed = before.elapsed();

        assert!(elapsed >= Duration::from_millis(40), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(60), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn test_unusable_max_hz_rejected_at_construction() {
        // A pacer period of 1 / max_hz has no meaning for these; the
        // constructor rejects them instead of panicking inside run().
        for bad_hz in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let policy = MockPolicy::new("mock").with_default_chunk(joint_delta_chunk(10));
            let result = Runtime::new(
                Box::new(ScriptedEnv::new(None)),
                scripted_agent(policy, 10),
                vec![],
                RuntimeConfig {
                    num_episodes: 1,
                    max_episode_steps: 1,
                    max_hz: bad_hz,
                    seed: 0,
                },
            );
            let err = result
                .err()
                .unwrap_or_else(|| panic!("max_hz {bad_hz} accepted at construction"));
            match err {
                TeleopError::ConfigValidation { field, .. } => assert_eq!(field, "max_hz"),
                other => panic!("expected validation error for max_hz {bad_hz}, got {other}"),
            }
        }
    }

    // ── Determinism ────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_episode_seeds_derive_from_base_seed() {
        // Same base seed, same first observations per episode.
        async fn first_observations(seed: u64) -> Vec<Vec<f64>> {
            let mut out = Vec::new();
            for episode in 0..2u64 {
                let mut env = ScriptedEnv::new(None);
                let obs = teleop_core::Environment::reset(&mut env, seed + episode)
                    .await
                    .unwrap();
                out.push(
                    obs.get("joints")
                        .and_then(Value::as_vector)
                        .unwrap()
                        .to_vec(),
                );
            }
            out
        }

        assert_eq!(first_observations(7).await, first_observations(7).await);
        assert_ne!(first_observations(7).await, first_observations(8).await);
    }
}

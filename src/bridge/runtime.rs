//! # Bridge Runtime
//!
//! Single-consumer event loop driving the camera from controller input.
//!
//! ## Control Flow
//!
//! 1. Wait for the next batch of controller events (the only point where
//!    shutdown can interrupt the loop)
//! 2. Process the batch in arrival order: axis samples go through the
//!    motion state machine, button presses through the dispatcher
//! 3. Run the idle check against the latest axis sample
//! 4. On a recoverable error: log, pause, resume. On a fatal one: stop
//!
//! Commands are sent one after another and awaited, so a stop/start pair
//! always completes before the next event is looked at. Motion state is
//! updated before sending and is not rolled back when a send fails.

use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

use super::dispatcher::{Action, ButtonDispatcher};
use crate::camera::CommandSink;
use crate::config::Config;
use crate::controller::{Button, ControllerEvent, InputSource};
use crate::effects::light::LightSwitch;
use crate::effects::screenshot::FrameGrabber;
use crate::error::Result;
use crate::ptz::command::PtzCommand;
use crate::ptz::motion::{AxisSample, MotionState, MotionStateMachine};

/// Result of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Quit,
}

/// Event loop state and collaborators.
pub struct Bridge<I, C, G, L> {
    input: I,
    camera: C,
    grabber: G,
    light: L,
    motion: MotionStateMachine,
    dispatcher: ButtonDispatcher,
    last_sample: AxisSample,
    device_ready: bool,
    light_object: String,
    haptic_pulse: Duration,
    error_backoff: Duration,
}

impl<I, C, G, L> Bridge<I, C, G, L>
where
    I: InputSource,
    C: CommandSink,
    G: FrameGrabber,
    L: LightSwitch,
{
    /// Creates a bridge around already-connected collaborators.
    ///
    /// The controller is assumed ready; startup fails earlier if it is not.
    pub fn new(input: I, camera: C, grabber: G, light: L, config: &Config) -> Self {
        Self {
            input,
            camera,
            grabber,
            light,
            motion: MotionStateMachine::new(),
            dispatcher: ButtonDispatcher::new(),
            last_sample: AxisSample::default(),
            device_ready: true,
            light_object: config.light.object.clone(),
            haptic_pulse: config.runtime.haptic_pulse(),
            error_backoff: config.runtime.error_backoff(),
        }
    }

    pub fn motion_state(&self) -> MotionState {
        self.motion.state()
    }

    pub fn device_ready(&self) -> bool {
        self.device_ready
    }

    pub fn light_on(&self) -> bool {
        self.dispatcher.light_on()
    }

    /// Runs until `shutdown` resolves, a quit is requested, or a fatal
    /// error occurs.
    ///
    /// # Errors
    ///
    /// Returns the first error for which [`is_fatal`] holds. All other
    /// errors are logged and followed by a pause of `error_backoff_ms`.
    ///
    /// [`is_fatal`]: crate::error::PtzPadError::is_fatal
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let batch = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Received Ctrl+C, shutting down...");
                    return Ok(());
                }
                batch = self.input.next_batch() => batch,
            };

            let outcome = match batch {
                Ok(events) => self.process_batch(events).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(StepOutcome::Continue) => {}
                Ok(StepOutcome::Quit) => {
                    info!("Quit requested, exiting...");
                    return Ok(());
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("{}", e);
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => {
                            info!("Received Ctrl+C, shutting down...");
                            return Ok(());
                        }
                        _ = tokio::time::sleep(self.error_backoff) => {}
                    }
                    info!("restarting");
                }
            }
        }
    }

    /// One loop iteration: poll a batch and process it.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the input source, the camera or
    /// the light. Events after a failure in the same batch are dropped.
    pub async fn step(&mut self) -> Result<StepOutcome> {
        let events = self.input.next_batch().await?;
        self.process_batch(events).await
    }

    async fn process_batch(&mut self, events: Vec<ControllerEvent>) -> Result<StepOutcome> {
        for event in events {
            if self.handle_event(event).await? == StepOutcome::Quit {
                return Ok(StepOutcome::Quit);
            }
        }

        if let Some(stop) = self.motion.idle_check(&self.last_sample) {
            self.send(&stop).await?;
        }

        Ok(StepOutcome::Continue)
    }

    async fn handle_event(&mut self, event: ControllerEvent) -> Result<StepOutcome> {
        match event {
            ControllerEvent::Connected { name } => {
                info!("Joystick added: {}", name);
                self.device_ready = true;
            }
            ControllerEvent::Disconnected => {
                warn!("Joystick removed");
                self.device_ready = false;
                // Stale deflection must not keep the camera moving
                self.apply_sample(AxisSample::default()).await?;
            }
            ControllerEvent::Axis(sample) => {
                self.apply_sample(sample).await?;
            }
            ControllerEvent::ButtonPressed(button) => {
                return self.handle_press(button).await;
            }
            ControllerEvent::ButtonReleased(_) => {}
        }

        Ok(StepOutcome::Continue)
    }

    async fn apply_sample(&mut self, sample: AxisSample) -> Result<()> {
        self.last_sample = sample;
        for command in self.motion.transition(&sample) {
            self.send(&command).await?;
        }
        Ok(())
    }

    async fn handle_press(&mut self, button: Button) -> Result<StepOutcome> {
        let Some(action) = self.dispatcher.on_press(button) else {
            return Ok(StepOutcome::Continue);
        };

        match action {
            Action::PresetSave => {
                info!("Left shoulder button pressed, saving preset");
                self.send(&PtzCommand::preset_set()).await?;
            }
            Action::PresetRecall => {
                info!("Right shoulder button pressed, recalling preset");
                self.send(&PtzCommand::preset_call()).await?;
            }
            Action::Screenshot => {
                info!("Screenshot button pressed");
                self.take_screenshot().await;
            }
            Action::LightToggle(on) => {
                info!("Button A pressed, light {}", if on { "on" } else { "off" });
                self.light.set_state(&self.light_object, on).await?;
            }
            Action::Quit => return Ok(StepOutcome::Quit),
        }

        Ok(StepOutcome::Continue)
    }

    /// Rumble as feedback, then grab a frame. Failures are reported only.
    async fn take_screenshot(&mut self) {
        if self.device_ready {
            if let Err(e) = self.input.rumble(self.haptic_pulse).await {
                warn!("Rumble failed: {}", e);
            }
        }

        if let Err(e) = self.grabber.capture().await {
            error!("Screenshot failed: {}", e);
        }
    }

    async fn send(&mut self, command: &PtzCommand) -> Result<()> {
        self.camera.send(command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::mocks::RecordingSink;
    use crate::controller::mocks::ScriptedInput;
    use crate::effects::light::MockLightSwitch;
    use crate::effects::screenshot::mocks::CountingGrabber;
    use crate::error::PtzPadError;
    use crate::ptz::direction::Direction;
    use crate::ptz::speed::Speed;
    use crate::ptz::zoom::ZoomState;

    type TestBridge = Bridge<ScriptedInput, RecordingSink, CountingGrabber, MockLightSwitch>;

    struct Harness {
        input: ScriptedInput,
        sink: RecordingSink,
        grabber: CountingGrabber,
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.runtime.error_backoff_ms = 1;
        config.runtime.haptic_pulse_ms = 150;
        config
    }

    fn harness_with(grabber: CountingGrabber, light: MockLightSwitch) -> (Harness, TestBridge) {
        let input = ScriptedInput::new();
        let sink = RecordingSink::new();
        let bridge = Bridge::new(
            input.clone(),
            sink.clone(),
            grabber.clone(),
            light,
            &test_config(),
        );
        (Harness { input, sink, grabber }, bridge)
    }

    fn harness() -> (Harness, TestBridge) {
        harness_with(CountingGrabber::new(), MockLightSwitch::new())
    }

    fn axis(x: f32, y: f32) -> ControllerEvent {
        ControllerEvent::Axis(AxisSample::new(x, y, 0.0, -1.0))
    }

    fn press(button: Button) -> ControllerEvent {
        ControllerEvent::ButtonPressed(button)
    }

    // ==================== Motion Tests ====================

    #[tokio::test]
    async fn test_movement_scenario() {
        let (h, mut bridge) = harness();

        h.input.push_batch(vec![axis(1.0, 0.0)]);
        h.input.push_batch(vec![axis(0.0, 1.0)]);
        h.input.push_batch(vec![axis(0.0, 0.0)]);

        bridge.step().await.unwrap();
        assert_eq!(h.sink.get_sent(), vec![PtzCommand::new("right_start", Speed::new(50))]);

        bridge.step().await.unwrap();
        bridge.step().await.unwrap();
        assert_eq!(
            h.sink.sent_names(),
            vec!["right_start", "right_stop", "down_start", "down_stop"]
        );
        assert_eq!(bridge.motion_state().direction, Direction::Neutral);
    }

    #[tokio::test]
    async fn test_batch_processed_in_order() {
        let (h, mut bridge) = harness();

        h.input.push_batch(vec![
            axis(-1.0, 0.0),
            axis(-1.0, 0.0),
            axis(0.0, -1.0),
            ControllerEvent::ButtonReleased(Button::South),
        ]);

        assert_eq!(bridge.step().await.unwrap(), StepOutcome::Continue);
        assert_eq!(h.sink.sent_names(), vec!["left_start", "left_stop", "up_start"]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_quiet() {
        let (h, mut bridge) = harness();
        h.input.push_batch(Vec::new());

        assert_eq!(bridge.step().await.unwrap(), StepOutcome::Continue);
        assert!(h.sink.get_sent().is_empty());
    }

    #[tokio::test]
    async fn test_zoom_through_bridge() {
        let (h, mut bridge) = harness();
        let zoom = |z| ControllerEvent::Axis(AxisSample::new(0.0, 0.0, z, -1.0));

        h.input.push_batch(vec![zoom(-0.5)]);
        h.input.push_batch(vec![zoom(0.5)]);
        h.input.push_batch(vec![zoom(0.0)]);
        for _ in 0..3 {
            bridge.step().await.unwrap();
        }

        assert_eq!(
            h.sink.sent_names(),
            vec!["zoomadd_start", "zoomadd_stop", "zoomdec_start", "zoomdec_stop"]
        );
    }

    #[tokio::test]
    async fn test_send_failure_does_not_roll_back_state() {
        let (h, mut bridge) = harness();
        h.sink.set_failures(1);

        h.input.push_batch(vec![axis(1.0, 0.0)]);
        h.input.push_batch(vec![axis(1.0, 0.0)]);

        let result = bridge.step().await;
        assert!(matches!(result, Err(PtzPadError::Camera(_))));
        assert_eq!(bridge.motion_state().direction, Direction::Right);

        // Same sample again: the state already says "right", nothing is resent
        bridge.step().await.unwrap();
        assert!(h.sink.get_sent().is_empty());
    }

    #[tokio::test]
    async fn test_failure_drops_rest_of_batch() {
        let (h, mut bridge) = harness();
        h.sink.set_failures(1);

        h.input.push_batch(vec![axis(1.0, 0.0), press(Button::LeftShoulder)]);
        assert!(bridge.step().await.is_err());
        assert!(h.sink.get_sent().is_empty(), "Preset after the failure should not be sent");
    }

    // ==================== Device Tests ====================

    #[tokio::test]
    async fn test_disconnect_stops_motion() {
        let (h, mut bridge) = harness();

        h.input.push_batch(vec![ControllerEvent::Axis(AxisSample::new(1.0, 0.0, 0.9, 0.0))]);
        h.input.push_batch(vec![ControllerEvent::Disconnected]);

        bridge.step().await.unwrap();
        assert_eq!(h.sink.sent_names(), vec!["zoomdec_start", "right_start"]);

        bridge.step().await.unwrap();
        assert!(!bridge.device_ready());
        assert_eq!(
            h.sink.sent_names(),
            vec!["zoomdec_start", "right_start", "zoomdec_stop", "right_stop"]
        );
        let state = bridge.motion_state();
        assert_eq!(state.direction, Direction::Neutral);
        assert_eq!(state.zoom, ZoomState::Neutral);
    }

    #[tokio::test]
    async fn test_reconnect_marks_ready() {
        let (h, mut bridge) = harness();

        h.input.push_batch(vec![ControllerEvent::Disconnected]);
        h.input.push_batch(vec![ControllerEvent::Connected {
            name: "Xbox Wireless Controller".to_string(),
        }]);

        bridge.step().await.unwrap();
        assert!(!bridge.device_ready());
        bridge.step().await.unwrap();
        assert!(bridge.device_ready());
        assert!(h.sink.get_sent().is_empty());
    }

    #[tokio::test]
    async fn test_input_error_is_recoverable() {
        let (h, mut bridge) = harness();
        h.input.push_error(PtzPadError::Controller("read failed".to_string()));

        let err = bridge.step().await.unwrap_err();
        assert!(!err.is_fatal());
    }

    // ==================== Button Tests ====================

    #[tokio::test]
    async fn test_preset_buttons() {
        let (h, mut bridge) = harness();
        h.input.push_batch(vec![
            press(Button::LeftShoulder),
            ControllerEvent::ButtonReleased(Button::LeftShoulder),
            press(Button::RightShoulder),
        ]);

        bridge.step().await.unwrap();
        assert_eq!(
            h.sink.get_sent(),
            vec![
                PtzCommand::new("preset_set", Speed::new(254)),
                PtzCommand::new("preset_call", Speed::new(254)),
            ]
        );
    }

    #[tokio::test]
    async fn test_screenshot_rumbles_then_captures() {
        let (h, mut bridge) = harness();
        h.input.push_batch(vec![press(Button::North)]);

        bridge.step().await.unwrap();
        assert_eq!(h.input.get_rumbles(), vec![Duration::from_millis(150)]);
        assert_eq!(h.grabber.count(), 1);
        assert!(h.sink.get_sent().is_empty(), "Screenshots do not touch the camera");
    }

    #[tokio::test]
    async fn test_screenshot_without_controller_skips_rumble() {
        let (h, mut bridge) = harness();
        h.input.push_batch(vec![ControllerEvent::Disconnected, press(Button::North)]);

        bridge.step().await.unwrap();
        assert!(h.input.get_rumbles().is_empty());
        assert_eq!(h.grabber.count(), 1);
    }

    #[tokio::test]
    async fn test_screenshot_failure_is_not_an_error() {
        let (h, mut bridge) = harness_with(CountingGrabber::failing(), MockLightSwitch::new());
        h.input.push_batch(vec![press(Button::North), axis(0.0, 1.0)]);

        assert_eq!(bridge.step().await.unwrap(), StepOutcome::Continue);
        assert_eq!(h.grabber.count(), 1);
        assert_eq!(h.sink.sent_names(), vec!["down_start"]);
    }

    #[tokio::test]
    async fn test_light_toggle() {
        let mut light = MockLightSwitch::new();
        let mut seq = mockall::Sequence::new();
        light
            .expect_set_state()
            .withf(|object, on| object.to_string() == "black" && *on)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        light
            .expect_set_state()
            .withf(|object, on| object.to_string() == "black" && !*on)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let (h, mut bridge) = harness_with(CountingGrabber::new(), light);
        h.input.push_batch(vec![press(Button::South)]);
        h.input.push_batch(vec![press(Button::South)]);

        bridge.step().await.unwrap();
        assert!(bridge.light_on());
        bridge.step().await.unwrap();
        assert!(!bridge.light_on());
    }

    #[tokio::test]
    async fn test_light_failure_is_recoverable_error() {
        let mut light = MockLightSwitch::new();
        light
            .expect_set_state()
            .times(1)
            .returning(|_, _| Err(PtzPadError::Light("refused".to_string())));

        let (h, mut bridge) = harness_with(CountingGrabber::new(), light);
        h.input.push_batch(vec![press(Button::South)]);

        let err = bridge.step().await.unwrap_err();
        assert!(matches!(err, PtzPadError::Light(_)));
        assert!(!err.is_fatal());
        assert!(bridge.light_on(), "Light bit is flipped even when the call fails");
    }

    #[tokio::test]
    async fn test_quit_stops_batch() {
        let (h, mut bridge) = harness();
        h.input.push_batch(vec![press(Button::Mode), axis(1.0, 0.0)]);

        assert_eq!(bridge.step().await.unwrap(), StepOutcome::Quit);
        assert!(h.sink.get_sent().is_empty());
    }

    // ==================== Loop Tests ====================

    #[tokio::test]
    async fn test_run_exits_on_quit() {
        let (h, mut bridge) = harness();
        h.input.push_batch(vec![axis(0.0, -1.0)]);
        h.input.push_batch(vec![press(Button::Mode)]);

        let result = bridge.run(std::future::pending::<()>()).await;
        assert!(result.is_ok());
        assert_eq!(h.sink.sent_names(), vec!["up_start"]);
    }

    #[tokio::test]
    async fn test_run_recovers_from_errors() {
        let (h, mut bridge) = harness();
        h.sink.set_failures(1);

        h.input.push_error(PtzPadError::Controller("read failed".to_string()));
        h.input.push_batch(vec![axis(1.0, 0.0)]);
        h.input.push_batch(vec![axis(-1.0, 0.0)]);
        h.input.push_batch(vec![press(Button::Mode)]);

        let result = bridge.run(std::future::pending::<()>()).await;
        assert!(result.is_ok());
        // right_start failed; the stop for "right" and the next start still go out
        assert_eq!(h.sink.sent_names(), vec!["right_stop", "left_start"]);
    }

    #[tokio::test]
    async fn test_run_stops_on_fatal_error() {
        let (h, mut bridge) = harness();
        h.input.push_error(PtzPadError::ControllerNotFound);

        let result = bridge.run(std::future::pending::<()>()).await;
        assert!(matches!(result, Err(PtzPadError::ControllerNotFound)));
    }

    #[tokio::test]
    async fn test_run_honours_shutdown() {
        let (h, mut bridge) = harness();
        h.input.push_batch(vec![axis(1.0, 0.0)]);

        let result = bridge.run(std::future::ready(())).await;
        assert!(result.is_ok());
        assert!(h.sink.get_sent().is_empty(), "Shutdown wins over pending input");
    }

    #[test]
    fn test_step_outside_async_test() {
        let (h, mut bridge) = harness();
        h.input.push_batch(vec![axis(0.7, 0.7)]);

        let outcome = tokio_test::block_on(bridge.step()).unwrap();
        assert_eq!(outcome, StepOutcome::Continue);
        assert_eq!(h.sink.sent_names(), vec!["rightdown_start"]);
    }
}

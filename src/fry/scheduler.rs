use log::{debug, error, info};

use super::{jpeg_degrade, DegradeFn, FryPass, PassStatus};
use crate::canvas::Canvas;
use crate::renderer::Renderer;
use crate::scene::Scene;

/// Debounced, single-flight driver of [`FryPass`].
///
/// Every edit calls [`FryScheduler::request`], which pushes the deadline
/// back. Once the deadline has passed, the next [`FryScheduler::tick`] with
/// no drag in progress starts a pass, provided there is anything to apply.
/// A deadline that passes while a pass is running stays armed until that
/// pass is over.
#[derive(Debug)]
pub struct FryScheduler {
    delay: f64,
    deadline: Option<f64>,
    pass: Option<FryPass>,
    degrade: DegradeFn,
}

impl FryScheduler {
    pub fn new(delay_secs: f64) -> Self {
        Self::with_degrade(delay_secs, jpeg_degrade)
    }

    pub fn with_degrade(delay_secs: f64, degrade: DegradeFn) -> Self {
        Self {
            delay: delay_secs.max(0.0),
            deadline: None,
            pass: None,
            degrade,
        }
    }

    /// Restart the debounce window at `now` (seconds)
    pub fn request(&mut self, now: f64) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_busy(&self) -> bool {
        self.pass.is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Seconds until the armed deadline, if any
    pub fn time_until_deadline(&self, now: f64) -> Option<f64> {
        self.deadline.map(|deadline| (deadline - now).max(0.0))
    }

    /// Advance the running pass or start a due one. Returns true when the
    /// canvas changed.
    pub fn tick(
        &mut self,
        now: f64,
        scene: &Scene,
        canvas: &mut Canvas,
        renderer: &mut Renderer,
        dragging: bool,
    ) -> bool {
        if let Some(pass) = self.pass.as_mut() {
            match pass.step(canvas, renderer, dragging) {
                Ok(PassStatus::Running) => {}
                Ok(status) => {
                    info!(
                        "Fry pass {:?} after {} insertions",
                        status,
                        pass.insertions().len()
                    );
                    self.pass = None;
                }
                Err(e) => {
                    error!("Fry pass failed: {e}");
                    self.pass = None;
                }
            }
            return true;
        }

        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.deadline = None;

        if dragging {
            debug!("Skipping fry pass while dragging");
            return false;
        }
        if scene.fry_level() == 0 && scene.tint_level() == 0 {
            return false;
        }

        self.pass = Some(FryPass::start(scene, canvas, renderer).with_degrade(self.degrade));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FryConfig;
    use crate::error::{FryError, Result};
    use crate::renderer::test_renderer;

    fn failing_degrade(_: &mut Canvas, _: &FryConfig) -> Result<()> {
        Err(FryError::Encode("encoder unavailable".to_owned()))
    }

    fn setup() -> (Scene, Canvas, Renderer) {
        let config = FryConfig {
            frame_width: 27,
            frame_height: 48,
            ..FryConfig::default()
        };
        let scene = Scene::new(&config);
        let canvas = Canvas::new(27, 48).unwrap();
        (scene, canvas, test_renderer(config))
    }

    #[test]
    fn test_debounce_restarts() {
        let (scene, mut canvas, mut renderer) = setup();
        let mut scheduler = FryScheduler::new(0.4);

        scheduler.request(0.0);
        scheduler.request(0.3);
        assert!(!scheduler.tick(0.5, &scene, &mut canvas, &mut renderer, false));
        assert!(!scheduler.is_busy());
        assert!(scheduler.tick(0.71, &scene, &mut canvas, &mut renderer, false));
        assert!(scheduler.is_busy());
    }

    #[test]
    fn test_nothing_to_apply_skips_pass() {
        let (mut scene, mut canvas, mut renderer) = setup();
        scene.set_fry_level(0);
        scene.set_tint_level(0);
        let mut scheduler = FryScheduler::new(0.4);
        scheduler.request(0.0);
        assert!(!scheduler.tick(1.0, &scene, &mut canvas, &mut renderer, false));
        assert!(!scheduler.is_busy());
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn test_tint_only_still_runs() {
        let (mut scene, mut canvas, mut renderer) = setup();
        scene.set_fry_level(0);
        let mut scheduler = FryScheduler::new(0.0);
        scheduler.request(0.0);
        assert!(scheduler.tick(0.0, &scene, &mut canvas, &mut renderer, false));
        assert!(scheduler.tick(0.1, &scene, &mut canvas, &mut renderer, false));
        assert!(!scheduler.is_busy());
    }

    #[test]
    fn test_dragging_blocks_start() {
        let (scene, mut canvas, mut renderer) = setup();
        let mut scheduler = FryScheduler::new(0.4);
        scheduler.request(0.0);
        assert!(!scheduler.tick(1.0, &scene, &mut canvas, &mut renderer, true));
        assert!(!scheduler.is_busy());
    }

    #[test]
    fn test_single_flight_with_armed_deadline() {
        let (scene, mut canvas, mut renderer) = setup();
        let mut scheduler = FryScheduler::new(0.0);
        scheduler.request(0.0);
        assert!(scheduler.tick(0.0, &scene, &mut canvas, &mut renderer, false));
        assert!(scheduler.is_busy());

        // New request while the pass runs: kept armed, not started
        scheduler.request(0.0);
        let mut now = 0.0;
        while scheduler.is_busy() {
            now += 0.016;
            scheduler.tick(now, &scene, &mut canvas, &mut renderer, false);
            assert!(scheduler.is_armed() || !scheduler.is_busy());
        }
        assert!(scheduler.is_armed());
        assert!(scheduler.tick(now + 0.016, &scene, &mut canvas, &mut renderer, false));
        assert!(scheduler.is_busy());
    }

    #[test]
    fn test_failed_step_drops_pass_and_keeps_canvas() {
        let (scene, mut canvas, mut renderer) = setup();
        let mut scheduler = FryScheduler::with_degrade(0.0, failing_degrade);
        scheduler.request(0.0);
        assert!(scheduler.tick(0.0, &scene, &mut canvas, &mut renderer, false));
        // First iteration only inserts, nothing to degrade yet
        assert!(scheduler.tick(0.1, &scene, &mut canvas, &mut renderer, false));
        assert!(scheduler.is_busy());

        scheduler.request(0.1);
        let before = canvas.data().to_vec();
        assert!(scheduler.tick(0.2, &scene, &mut canvas, &mut renderer, false));
        assert!(!scheduler.is_busy());
        assert_eq!(canvas.data(), &before[..]);

        // The deadline armed during the failed pass still fires
        assert!(scheduler.is_armed());
        assert!(scheduler.tick(0.3, &scene, &mut canvas, &mut renderer, false));
        assert!(scheduler.is_busy());
    }
}

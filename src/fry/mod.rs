//! Progressive degradation ("deep fry") of the composed frame.
//!
//! A pass starts from the base image alone and alternates two phases: every
//! element whose insertion point matches the current iteration is drawn, then
//! the whole frame goes through a lossy JPEG round trip with a contrast and
//! saturation boost. Elements inserted early collect more artifacts than
//! elements inserted late. A violet tint is laid over the result once.
//!
//! The pass advances one iteration per [`FryPass::step`] so the UI thread can
//! paint between iterations, and it stops early when a drag starts.

use log::{debug, info};
use tiny_skia::Color;

use crate::canvas::Canvas;
use crate::codec;
use crate::config::FryConfig;
use crate::element::Element;
use crate::error::Result;
use crate::id_generator::ElementId;
use crate::renderer::Renderer;
use crate::scene::Scene;

mod scheduler;

pub use scheduler::FryScheduler;

/// Number of compress iterations for a fry level.
///
/// Grows as `(L - 1)^1.5` and reaches 20 at level 20.
pub fn total_iterations(level: u32) -> u32 {
    if level == 0 {
        return 0;
    }
    let n = f64::from(level - 1);
    // Same value as 1 + (L-1)^1.5 * 19 / 19^1.5
    (1.0 + (n * n * n / 19.0).sqrt()).floor() as u32
}

/// Iteration at which an element with `fry_score` is drawn
pub fn insertion_point(fry_score: f64, total: u32) -> u32 {
    ((1.0 - fry_score.clamp(0.0, 1.0)) * f64::from(total)).floor() as u32
}

pub fn tint_alpha(tint_level: u8, max_alpha: f32) -> f32 {
    f32::from(tint_level.min(100)) / 100.0 * max_alpha
}

/// Lossy step applied to the whole frame between iterations
pub type DegradeFn = fn(&mut Canvas, &FryConfig) -> Result<()>;

/// JPEG round trip followed by the contrast and saturation boost
pub fn jpeg_degrade(canvas: &mut Canvas, config: &FryConfig) -> Result<()> {
    codec::degrade_frame(
        canvas,
        config.degrade_quality,
        config.contrast,
        config.saturation,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    /// More iterations remain; call `step` again on the next frame
    Running,
    Finished,
    /// A drag interrupted the loop; artifacts so far are kept
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Insert,
    /// Compress the frame produced by the previous iteration, then insert
    CompressThenInsert,
    Done,
}

/// One run of the degradation loop over a snapshot of the scene
pub struct FryPass {
    total: u32,
    iteration: u32,
    phase: Phase,
    tint_level: u8,
    elements: Vec<(u32, Element)>,
    insertions: Vec<(u32, ElementId)>,
    degrade: DegradeFn,
}

impl std::fmt::Debug for FryPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FryPass")
            .field("total", &self.total)
            .field("iteration", &self.iteration)
            .field("phase", &self.phase)
            .finish()
    }
}

impl FryPass {
    /// Snapshot the scene and reset the canvas to the base image alone
    pub fn start(scene: &Scene, canvas: &mut Canvas, renderer: &mut Renderer) -> Self {
        let total = total_iterations(scene.fry_level());
        let elements = scene
            .elements()
            .iter()
            .map(|e| (insertion_point(e.fry_score, total), e.clone()))
            .collect();
        info!(
            "🔥 Fry pass: level {} → {} iterations, tint {}",
            scene.fry_level(),
            total,
            scene.tint_level()
        );
        renderer.draw_base(canvas, scene);
        Self {
            total,
            iteration: 0,
            phase: Phase::Insert,
            tint_level: scene.tint_level(),
            elements,
            insertions: Vec::new(),
            degrade: jpeg_degrade,
        }
    }

    /// Replace the lossy step run between iterations
    pub fn with_degrade(mut self, degrade: DegradeFn) -> Self {
        self.degrade = degrade;
        self
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// `(iteration, element)` in the order elements were drawn
    pub fn insertions(&self) -> &[(u32, ElementId)] {
        &self.insertions
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Advance by one iteration
    pub fn step(
        &mut self,
        canvas: &mut Canvas,
        renderer: &mut Renderer,
        dragging: bool,
    ) -> Result<PassStatus> {
        match self.phase {
            Phase::Done => return Ok(PassStatus::Finished),
            Phase::CompressThenInsert => (self.degrade)(canvas, renderer.config())?,
            Phase::Insert => {}
        }

        if dragging {
            debug!("Fry pass interrupted at iteration {}", self.iteration);
            self.finish(canvas, renderer);
            return Ok(PassStatus::Interrupted);
        }

        if self.total == 0 {
            for (_, element) in &self.elements {
                renderer.draw_element(canvas, element);
                self.insertions.push((0, element.id()));
            }
            self.finish(canvas, renderer);
            return Ok(PassStatus::Finished);
        }

        for (point, element) in &self.elements {
            if *point == self.iteration {
                renderer.draw_element(canvas, element);
                self.insertions.push((self.iteration, element.id()));
            }
        }

        if self.iteration == self.total {
            self.finish(canvas, renderer);
            return Ok(PassStatus::Finished);
        }

        self.iteration += 1;
        self.phase = Phase::CompressThenInsert;
        Ok(PassStatus::Running)
    }

    fn finish(&mut self, canvas: &mut Canvas, renderer: &Renderer) {
        self.phase = Phase::Done;
        if self.tint_level > 0 {
            let config = renderer.config();
            let [r, g, b] = config.tint_color;
            let alpha = tint_alpha(self.tint_level, config.tint_max_alpha);
            let mut tint = Color::from_rgba8(r, g, b, 255);
            tint.apply_opacity(alpha);
            canvas.fill(tint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FryConfig;
    use crate::element::image::solid_bitmap;
    use crate::renderer::test_renderer;

    #[test]
    fn test_iteration_curve() {
        assert_eq!(total_iterations(0), 0);
        assert_eq!(total_iterations(1), 1);
        assert_eq!(total_iterations(10), 7);
        assert_eq!(total_iterations(20), 20);
        let mut previous = 0;
        for level in 0..=30 {
            let total = total_iterations(level);
            assert!(total >= previous);
            previous = total;
        }
    }

    #[test]
    fn test_insertion_points() {
        for total in [0, 1, 7, 20] {
            assert_eq!(insertion_point(1.0, total), 0);
            assert_eq!(insertion_point(0.0, total), total);
        }
        assert_eq!(insertion_point(0.5, 7), 3);
        assert_eq!(insertion_point(0.3, 7), insertion_point(0.3, 7));
    }

    #[test]
    fn test_tint_alpha_is_monotonic_and_bounded() {
        let mut previous = 0.0;
        for level in 0..=100u8 {
            let alpha = tint_alpha(level, 0.6);
            assert!(alpha >= previous);
            assert!(alpha <= 0.6 + 1e-6);
            previous = alpha;
        }
        assert_eq!(tint_alpha(0, 0.6), 0.0);
    }

    fn small_setup() -> (Scene, Canvas, Renderer) {
        let config = FryConfig {
            frame_width: 54,
            frame_height: 96,
            ..FryConfig::default()
        };
        let mut scene = Scene::new(&config);
        scene.load_image(solid_bitmap(10, 10, [90, 120, 150, 255]));
        let canvas = Canvas::new(54, 96).unwrap();
        (scene, canvas, test_renderer(config))
    }

    fn run(pass: &mut FryPass, canvas: &mut Canvas, renderer: &mut Renderer) -> (PassStatus, usize) {
        let mut steps = 0;
        loop {
            steps += 1;
            let status = pass.step(canvas, renderer, false).unwrap();
            if status != PassStatus::Running {
                return (status, steps);
            }
        }
    }

    #[test]
    fn test_band_inserted_at_expected_iteration() {
        let (mut scene, mut canvas, mut renderer) = small_setup();
        let band = scene.add_band();
        let early = scene.add_band();
        scene.update_fry_score(early, 1.0);

        let mut pass = FryPass::start(&scene, &mut canvas, &mut renderer);
        assert_eq!(pass.total(), 7);
        let (status, steps) = run(&mut pass, &mut canvas, &mut renderer);

        assert_eq!(status, PassStatus::Finished);
        assert_eq!(steps, 8);
        assert_eq!(pass.insertions(), &[(0, early), (3, band)]);
    }

    #[test]
    fn test_equal_scores_share_iteration() {
        let (mut scene, mut canvas, mut renderer) = small_setup();
        let a = scene.add_free_text();
        let b = scene.add_band();
        scene.update_fry_score(a, 0.25);
        scene.update_fry_score(b, 0.25);

        let mut pass = FryPass::start(&scene, &mut canvas, &mut renderer);
        run(&mut pass, &mut canvas, &mut renderer);
        let iterations: Vec<u32> = pass.insertions().iter().map(|(i, _)| *i).collect();
        assert_eq!(iterations, vec![5, 5]);
    }

    #[test]
    fn test_level_zero_draws_everything_once() {
        let (mut scene, mut canvas, mut renderer) = small_setup();
        scene.set_fry_level(0);
        scene.set_tint_level(0);
        scene.add_band();
        scene.add_free_text();

        let mut pass = FryPass::start(&scene, &mut canvas, &mut renderer);
        let (status, steps) = run(&mut pass, &mut canvas, &mut renderer);
        assert_eq!((status, steps), (PassStatus::Finished, 1));
        assert_eq!(pass.insertions().len(), 2);

        // Without frying or tint the frame equals the undecorated clean draw
        let mut clean = Canvas::new(54, 96).unwrap();
        renderer.draw_base(&mut clean, &scene);
        renderer.draw_elements(&mut clean, &scene);
        assert_eq!(clean.data(), canvas.data());
    }

    #[test]
    fn test_drag_interrupts_and_still_tints() {
        let (mut scene, mut canvas, mut renderer) = small_setup();
        scene.set_tint_level(100);
        let band = scene.add_band();
        scene.update_fry_score(band, 0.0);

        let mut pass = FryPass::start(&scene, &mut canvas, &mut renderer);
        assert_eq!(pass.step(&mut canvas, &mut renderer, false).unwrap(), PassStatus::Running);
        let before = canvas.pixel(1, 1).unwrap();
        assert_eq!(
            pass.step(&mut canvas, &mut renderer, true).unwrap(),
            PassStatus::Interrupted
        );
        assert!(pass.is_done());
        assert!(pass.insertions().is_empty());

        // Violet pushes red and blue up relative to green
        let [r, g, b, _] = canvas.pixel(1, 1).unwrap();
        assert_ne!([r, g, b, 255], before);
        assert!(b > g && r > g);
    }
}

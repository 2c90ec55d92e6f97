//! The orchestrator: owns the GPU context, the quad, the active program,
//! and the current configuration.

use fractal::{formula_for, needs_recompile, view_transform, FractalConfig, FractalPatch};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, error, info, warn};

use crate::error::RendererError;
use crate::gpu::pipeline::PipelineShared;
use crate::gpu::{FractalPipeline, GpuContext};
use crate::quad;

/// Real-time escape-time fractal renderer.
///
/// Construction acquires the GPU context and uploads the quad; a failure
/// there is fatal to the instance and reported as
/// [`RendererError::ContextUnavailable`]. Once constructed, the renderer
/// accepts [`set_fractal`](Self::set_fractal), [`render`](Self::render) and
/// [`resize`](Self::resize) until dropped or [`destroy`](Self::destroy)ed.
///
/// Calls are applied strictly in the order received; a `render` between two
/// `set_fractal` calls observes the most recently completed configuration.
pub struct FractalRenderer {
    context: GpuContext,
    shared: PipelineShared,
    quad_buffer: wgpu::Buffer,
    pipeline: Option<FractalPipeline>,
    config: FractalConfig,
}

impl FractalRenderer {
    /// Builds a renderer for the given window target and compiles the
    /// default configuration's program. A shader failure at this point is
    /// logged but not fatal: the renderer stays usable and renders clear
    /// frames until a later `set_fractal` succeeds.
    pub fn new<T>(target: &T, width: u32, height: u32) -> Result<Self, RendererError>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        info!("initializing fractal renderer");

        let context = GpuContext::new(target, width, height)?;
        let shared = PipelineShared::new(&context.device);
        let quad_buffer = quad::create_quad_buffer(&context.device);

        let mut renderer = Self {
            context,
            shared,
            quad_buffer,
            pipeline: None,
            config: FractalConfig::default(),
        };

        // Compile up front: a first `set_fractal` carrying the defaults
        // would otherwise change nothing and leave the renderer programless.
        let initial = renderer.config.clone();
        if let Err(err) = renderer.rebuild_pipeline(&initial) {
            error!(%err, "initial shader build failed");
        }

        info!("fractal renderer ready");
        Ok(renderer)
    }

    /// The complete configuration currently in effect.
    pub fn config(&self) -> &FractalConfig {
        &self.config
    }

    /// Merges `patch` over the current configuration and recompiles the
    /// program only when a structural field or the fractal kind changed.
    ///
    /// On a compile or link failure the patch is not applied: the previous
    /// program and configuration both stay active and the error is
    /// returned, so rendering continues with the last good fractal.
    pub fn set_fractal(&mut self, patch: &FractalPatch) -> Result<(), RendererError> {
        let merged = self.config.merged(patch);

        if needs_recompile(&self.config, &merged) {
            debug!(kind = ?merged.kind, max_iterations = merged.max_iterations,
                "structural change, rebuilding shader program");
            self.rebuild_pipeline(&merged).inspect_err(|err| {
                error!(%err, "shader rebuild failed; keeping previous program");
            })?;
        }

        // Committed only once the program for it exists; a failed rebuild
        // must not leak the requested values into the surviving program.
        self.config = merged;
        Ok(())
    }

    /// Rebuilds the program for `config`'s kind. The previous program is
    /// released only after the replacement linked.
    fn rebuild_pipeline(&mut self, config: &FractalConfig) -> Result<(), RendererError> {
        let Some(formula) = formula_for(config.kind) else {
            debug!("no formula registered for the current kind; dropping program");
            self.pipeline = None;
            return Ok(());
        };

        let built = FractalPipeline::build(
            &self.context.device,
            &self.shared,
            self.context.surface_format,
            formula,
            config,
        )?;
        self.pipeline = Some(built);
        Ok(())
    }

    /// Draws one frame: clears, and if a program is active, refreshes the
    /// transform and formula uniforms and draws the quad. Without a program
    /// the frame is clear-only rather than an error.
    pub fn render(&mut self) -> Result<(), RendererError> {
        let frame = match self.context.acquire_frame() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface frame timed out; skipping frame");
                return Ok(());
            }
            Err(err) => {
                return Err(RendererError::ResourceCreation(format!(
                    "failed to acquire surface frame: {err}"
                )))
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(pipeline) = &mut self.pipeline {
            // The transform is a pure function of the configuration and is
            // recomputed every frame. Formula uniforms go through the
            // program's own formula, which always matches the committed
            // configuration's kind.
            let transform = view_transform(&self.config);
            pipeline.values.set_mat4("uTransform", &transform);
            pipeline
                .formula
                .push_uniforms(&mut pipeline.values, &self.config);
            self.context.queue.write_buffer(
                &pipeline.uniform_buffer,
                0,
                pipeline.values.bytes(),
            );
        }

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("fractal frame"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("fractal pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = &self.pipeline {
                pass.set_pipeline(&pipeline.pipeline);
                pass.set_bind_group(0, &pipeline.bind_group, &[]);
                pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
                pass.draw(0..quad::QUAD_VERTICES.len() as u32, 0..1);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Matches the GPU viewport to the host window. The configuration's own
    /// width and height are untouched; the host keeps those in sync for the
    /// aspect-ratio math.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }

    /// Tears the renderer down. Dropping has the same effect; this form
    /// exists for hosts that want the release to be explicit in their
    /// shutdown path.
    pub fn destroy(self) {
        drop(self);
    }
}

impl Drop for FractalRenderer {
    fn drop(&mut self) {
        // The quad buffer and active program are released by their own Drop
        // impls; this hook only marks the lifecycle in the log.
        info!("fractal renderer destroyed");
    }
}

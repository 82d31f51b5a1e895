//! Animated 32x32 field shown through a colormap.
//!
//! Keys: `1`-`3` switch colormap, `L` toggles linear LUT interpolation,
//! space toggles streaming, `Esc` quits.

use std::time::Instant;

use glimpse_engine::colormap::Colormap;
use glimpse_engine::coords::Rect;
use glimpse_engine::core::{App, AppControl, FrameCtx};
use glimpse_engine::device::GpuInit;
use glimpse_engine::logging::{init_logging, LoggingConfig};
use glimpse_engine::render::TextureRenderer;
use glimpse_engine::slice::{Slice, SliceShader};
use glimpse_engine::window::{Runtime, RuntimeConfig};
use glimpse_engine::{Array, InvalidInput};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

const SIZE: usize = 32;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "glimpse".to_string(),
        initial_size: LogicalSize::new(512.0, 512.0),
        resizable: true,
        continuous_redraw: true,
    };
    let gpu_init = GpuInit {
        prefer_srgb: false,
        ..GpuInit::default()
    };

    Runtime::run(config, gpu_init, Viewer::new())
}

/// Field value at cell `(row, col)` at time `t`, in `[-1, 1]`.
fn field(t: f32) -> Result<Array, InvalidInput> {
    Array::from_fn_2d(SIZE, SIZE, |row, col| {
        let x = col as f32 / SIZE as f32 * std::f32::consts::TAU;
        let y = row as f32 / SIZE as f32 * std::f32::consts::TAU;
        (x + t).sin() * (y - 0.5 * t).cos()
    })
}

#[derive(Debug, Copy, Clone)]
enum Command {
    Colormap(u8),
    ToggleShader,
    ToggleStreaming,
}

struct Viewer {
    start: Instant,
    slice: Option<Slice>,
    renderer: TextureRenderer,
    streaming: bool,
    pending: Vec<Command>,
}

impl Viewer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            slice: None,
            renderer: TextureRenderer::new(),
            streaming: true,
            pending: Vec::new(),
        }
    }

    fn update(&mut self, ctx: &FrameCtx<'_, '_>) -> Result<(), InvalidInput> {
        let rctx = ctx.render_ctx();
        let t = self.start.elapsed().as_secs_f32();

        let slice = match self.slice.take() {
            Some(slice) => slice,
            None => Slice::builder()
                .colormap(Colormap::viridis())
                .range(-1.0, 1.0)
                .build(&rctx, field(t)?)?,
        };
        let slice = self.slice.insert(slice);

        for cmd in self.pending.drain(..) {
            match cmd {
                Command::Colormap(n) => {
                    let map = match n {
                        1 => Colormap::default(),
                        2 => Colormap::heat(),
                        _ => Colormap::viridis(),
                    };
                    slice.set_colormap(&rctx, map)?;
                }
                Command::ToggleShader => {
                    let next = match slice.shader() {
                        SliceShader::Nearest => SliceShader::Linear,
                        SliceShader::Linear => SliceShader::Nearest,
                    };
                    log::info!("shader: {next:?}");
                    slice.set_shader(next);
                }
                Command::ToggleStreaming => {
                    self.streaming = !self.streaming;
                    log::info!("streaming: {}", self.streaming);
                }
            }
        }

        if self.streaming {
            slice.set_data(&rctx, field(t)?)?;
        }
        Ok(())
    }
}

impl App for Viewer {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } = event
        else {
            return AppControl::Continue;
        };

        let cmd = match code {
            KeyCode::Escape => return AppControl::Exit,
            KeyCode::Digit1 => Command::Colormap(1),
            KeyCode::Digit2 => Command::Colormap(2),
            KeyCode::Digit3 => Command::Colormap(3),
            KeyCode::KeyL => Command::ToggleShader,
            KeyCode::Space => Command::ToggleStreaming,
            _ => return AppControl::Continue,
        };
        self.pending.push(cmd);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Err(err) = self.update(ctx) {
            log::error!("cannot update slice: {err}");
            return AppControl::Exit;
        }

        let (w, h) = ctx.window.logical_size();
        let (Some(slice), renderer) = (&self.slice, &mut self.renderer) else {
            return AppControl::Continue;
        };

        ctx.render(wgpu::Color::BLACK, |rctx, target| {
            slice.draw(renderer, rctx, target, Rect::new(0.0, 0.0, w, h));
        })
    }
}

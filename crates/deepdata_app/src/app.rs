// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shell application setup and event loop.

use crate::chrome;
use crate::config::ShellConfig;
use crate::fonts;
use crate::pages::{PageContext, Pages, SettingsChange};
use crate::palette::PaletteView;
use crate::panels::console::TracingEvent;
use crate::panels::{ConsolePanel, DevTools, DevToolsWindow, Sidebar};
use crate::theme::{ShellTheme, ThemeStore};
use crate::window::WindowCommands;
use deepdata_core::timer::earliest;
use deepdata_core::{
    CommandRegistry, DebugFlagStore, HarmlessErrorFilter, LanguageStore, NavItem, Navigator, PaletteBus, PaletteHost,
    PrefStore, Translator, TriggerButton,
};
use egui_wgpu::wgpu;
use std::rc::Rc;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Shell application errors
#[derive(Debug, Error)]
pub enum ShellError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    /// Renderer initialization failed
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result type for shell operations
pub type Result<T> = std::result::Result<T, ShellError>;

const SIDEBAR_WIDTH: f32 = 220.0;

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| ShellError::RendererInit(format!("surface: {e}")))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| ShellError::RendererInit("no suitable GPU adapter".to_string()))?;

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("DeepData Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| ShellError::RendererInit(format!("device: {e}")))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| ShellError::RendererInit("surface has no formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
        clear: egui::Color32,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Shell Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        let [r, g, b, a] = clear.to_normalized_gamma_f32();
        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Shell Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: f64::from(r),
                                g: f64::from(g),
                                b: f64::from(b),
                                a: f64::from(a),
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Running state of the shell
struct ShellRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    shell: ShellInner,
    next_repaint: Option<Instant>,
}

/// Shell state and surfaces
struct ShellInner {
    config: ShellConfig,
    navigator: Navigator,
    palette: PaletteView,
    trigger: TriggerButton,
    debug: DebugFlagStore,
    dev_tools: DevToolsWindow,
    languages: LanguageStore,
    translator: Translator,
    themes: ThemeStore,
    theme: ShellTheme,
    theme_dirty: bool,
    sidebar: Sidebar,
    pages: Pages,
    window_commands: WindowCommands,
}

impl ShellInner {
    fn new(
        config: ShellConfig,
        prefs: Rc<dyn PrefStore>,
        filter: HarmlessErrorFilter,
        tracing_rx: Option<Receiver<TracingEvent>>,
    ) -> Self {
        let bus = PaletteBus::new();
        let navigator = Navigator::new(config.initial_route);

        let mut palette = PaletteView::new(PaletteHost::new(bus.clone()), CommandRegistry::build(&navigator));
        palette.mount();
        let trigger = TriggerButton::new(bus, config.palette_feedback());

        let dev_tools_state = Rc::new(DevTools::new());
        let debug = DebugFlagStore::new(prefs.clone(), filter, config.debug.timings()).with_host(dev_tools_state.clone());
        let dev_tools = DevToolsWindow::new(dev_tools_state, ConsolePanel::with_tracing_receiver(tracing_rx));
        let pages = Pages::new(&debug);

        let languages = LanguageStore::new(prefs.clone());
        let translator = Translator::new(languages.load());
        let themes = ThemeStore::new(prefs);
        let theme = ShellTheme::new(themes.load());

        Self {
            config,
            navigator,
            palette,
            trigger,
            debug,
            dev_tools,
            languages,
            translator,
            themes,
            theme,
            theme_dirty: true,
            sidebar: Sidebar::new(NavItem::tree()),
            pages,
            window_commands: WindowCommands::default(),
        }
    }

    fn update(&mut self, ctx: &egui::Context) {
        let now = Instant::now();

        if self.theme_dirty {
            self.theme.apply(ctx);
            self.theme_dirty = false;
        }

        self.palette.handle_chord(ctx);
        self.debug.tick(now);
        self.trigger.tick(now);

        let colors = self.theme.colors.clone();

        chrome::title_bar(
            ctx,
            &self.config.window.title,
            &self.translator,
            &colors,
            &mut self.trigger,
            now,
            &mut self.window_commands,
        );
        chrome::footer(ctx, &self.translator, &colors);

        egui::SidePanel::left("sidebar")
            .exact_width(SIDEBAR_WIDTH)
            .resizable(false)
            .frame(
                egui::Frame::none()
                    .fill(colors.bg_secondary)
                    .inner_margin(egui::Margin::symmetric(8.0, 0.0)),
            )
            .show(ctx, |ui| {
                self.sidebar.ui(ui, &self.navigator, &self.translator, &colors);
            });

        let page = PageContext {
            tr: &self.translator,
            colors: &colors,
            navigator: &self.navigator,
            theme: self.theme.mode,
        };
        let change = egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(colors.bg_primary)
                    .inner_margin(egui::Margin::symmetric(24.0, 8.0)),
            )
            .show(ctx, |ui| self.pages.ui(ui, self.navigator.current(), &page))
            .inner;

        if let Some(change) = change {
            self.apply_settings_change(change);
        }

        self.palette.ui(ctx, &self.translator, &colors);
        self.dev_tools.ui(ctx, &self.translator);

        if let Some(deadline) = earliest(self.debug.next_deadline(), self.trigger.next_deadline()) {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }

    fn apply_settings_change(&mut self, change: SettingsChange) {
        match change {
            SettingsChange::Theme(mode) => {
                tracing::info!("Theme changed to {}", mode.code());
                self.theme.set_mode(mode);
                self.themes.save(mode);
                self.theme_dirty = true;
            }
            SettingsChange::Language(language) => {
                tracing::info!("Language changed to {}", language.code());
                self.translator.set_language(language);
                self.languages.save(language);
            }
            SettingsChange::DebugMode(enabled) => self.debug.set_debug_mode(enabled),
        }
    }
}

/// Main shell application
pub struct ShellApp {
    shell: Option<ShellInner>,
    running: Option<ShellRunning>,
    error: Option<ShellError>,
}

impl ShellApp {
    /// Create the shell. The tracing receiver feeds the developer console.
    pub fn new(
        config: ShellConfig,
        prefs: Rc<dyn PrefStore>,
        filter: HarmlessErrorFilter,
        tracing_rx: Option<Receiver<TracingEvent>>,
    ) -> Self {
        Self {
            shell: Some(ShellInner::new(config, prefs, filter, tracing_rx)),
            running: None,
            error: None,
        }
    }

    /// Run the event loop until the window closes
    pub fn run(mut self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop.run_app(&mut self)?;

        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn start(event_loop: &ActiveEventLoop, shell: ShellInner) -> Result<ShellRunning> {
        tracing::info!("Creating shell window...");

        let window_config = &shell.config.window;
        let window_attrs = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_decorations(false)
            .with_inner_size(winit::dpi::LogicalSize::new(window_config.width, window_config.height))
            .with_min_inner_size(winit::dpi::LogicalSize::new(window_config.min_width, window_config.min_height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(window.clone())?;

        let egui_ctx = egui::Context::default();
        fonts::install_cjk_fallback(&egui_ctx, &shell.config.fonts.cjk_candidates);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        shell.debug.init();

        tracing::info!("Shell initialized, window size {:?}", window.inner_size());

        Ok(ShellRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            shell,
            next_repaint: None,
        })
    }
}

impl ApplicationHandler for ShellApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(shell) = self.shell.take() else {
            return;
        };

        match Self::start(event_loop, shell) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => {
                tracing::error!("Failed to start shell: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.repaint {
            running.window.request_redraw();
        }
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let full_output = running.egui_ctx.run(raw_input, |ctx| {
                    running.shell.update(ctx);
                });

                for command in running.shell.window_commands.drain() {
                    command.apply(&running.window, event_loop);
                }
                if event_loop.exiting() {
                    return;
                }

                running.next_repaint = full_output
                    .viewport_output
                    .get(&egui::ViewportId::ROOT)
                    .and_then(|viewport| Instant::now().checked_add(viewport.repaint_delay));

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                let clear = running.shell.theme.colors.bg_primary;
                match running.graphics.render(&running.egui_ctx, full_output, &running.window, clear) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                        running.window.request_redraw();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &mut self.running {
            running.shell.palette.unmount();
        }
        tracing::info!("Shell stopped");
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = &mut self.running else {
            return;
        };

        match running.next_repaint {
            Some(at) if at <= Instant::now() => {
                running.next_repaint = None;
                running.window.request_redraw();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

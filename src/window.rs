// ABOUTME: winit application host: one window, keyboard-driven toggle, and the two screens.
// ABOUTME: Routes key presses to the HUD controller and navigation, and renders the current scene.

use std::path::PathBuf;
use std::sync::Arc;

use hudtoggle_defaults::ShellRunner;
use hudtoggle_demo::{Renderer, Scene, SurfaceError};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::config::Config;
use crate::hud::HudController;
use crate::state::{Event, Screen};
use crate::timers::{AppEvent, TimerCommand, Timers};

type DynError = Box<dyn std::error::Error + Send + Sync>;

const APP_TITLE: &str = "Metal HUD Utility";

/// What a key press asks for on the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleHud,
    Navigate(Event),
}

pub fn action_for_key(key: &Key, screen: Screen) -> Option<Action> {
    match (screen, key) {
        (Screen::Main, Key::Named(NamedKey::Space)) => Some(Action::ToggleHud),
        (Screen::Main, Key::Named(NamedKey::Enter)) => Some(Action::Navigate(Event::OpenDemo)),
        (Screen::Main, Key::Character(c)) if c.eq_ignore_ascii_case("h") => Some(Action::ToggleHud),
        (Screen::Main, Key::Character(c)) if c.eq_ignore_ascii_case("t") => {
            Some(Action::Navigate(Event::OpenDemo))
        }
        (Screen::Demo, Key::Named(NamedKey::Escape | NamedKey::Backspace)) => {
            Some(Action::Navigate(Event::Back))
        }
        _ => None,
    }
}

pub fn window_title(screen: Screen, hud_enabled: bool, banner: Option<&str>) -> String {
    let mut title = match screen {
        Screen::Main => format!("{APP_TITLE} | HUD {}", if hud_enabled { "On" } else { "Off" }),
        Screen::Demo => "Metal HUD Demo | Esc to go back".to_string(),
    };
    if let Some(text) = banner {
        title.push_str(" | ");
        title.push_str(text);
    }
    title
}

pub fn scene_for(screen: Screen, hud_enabled: bool) -> Scene {
    match screen {
        Screen::Main => Scene::Backdrop { glow: hud_enabled },
        Screen::Demo => Scene::Cube { glow: hud_enabled },
    }
}

pub struct App {
    config: Config,
    runner: Arc<ShellRunner>,
    hud: HudController<ShellRunner>,
    screen: Screen,
    timers: Timers,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    fatal: Option<DynError>,
}

impl App {
    pub fn new(config: Config, timers: Timers, local_flag_path: PathBuf) -> Self {
        let runner = ShellRunner::new(&config.defaults.shell);
        let hud = HudController::new(runner.clone(), local_flag_path);
        Self {
            config,
            runner: Arc::new(runner),
            hud,
            screen: Screen::default(),
            timers,
            window: None,
            renderer: None,
            fatal: None,
        }
    }

    /// Error that stopped the event loop, if any.
    pub fn take_fatal(&mut self) -> Option<DynError> {
        self.fatal.take()
    }

    fn refresh_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&window_title(
                self.screen,
                self.hud.enabled(),
                self.hud.banner().text(),
            ));
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match action_for_key(&event.logical_key, self.screen) {
            Some(Action::ToggleHud) => self.toggle_hud(),
            Some(Action::Navigate(nav)) => self.navigate(nav),
            None => {}
        }
    }

    fn toggle_hud(&mut self) {
        if let Some(generation) = self.hud.toggle() {
            self.timers.send(TimerCommand::ExpireBanner {
                generation,
                after: self.config.ui.banner_duration(),
            });
        }
        self.refresh_title();
    }

    fn navigate(&mut self, event: Event) {
        let Some(next) = self.screen.transition(&event, self.hud.enabled()) else {
            tracing::debug!("Ignoring {event:?} on {} screen", self.screen);
            return;
        };
        tracing::info!("Screen {} -> {next}", self.screen);
        self.screen = next;

        if next == Screen::Demo {
            if let Some(renderer) = &mut self.renderer {
                renderer.reset_scene();
            }
            self.hud.reassert_on_demo_enter();
            if self.hud.should_schedule_reassert() {
                self.timers.send(TimerCommand::Reassert {
                    after: self.config.ui.reassert_delay(),
                    runner: self.runner.clone(),
                });
            }
            tracing::info!("Restart Metal HUD Utility if the HUD is not visible when it should be");
        }
        self.refresh_title();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: DynError) {
        self.fatal = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes()
            .with_title(window_title(self.screen, self.hud.enabled(), None))
            .with_inner_size(LogicalSize::new(
                self.config.ui.window_width,
                self.config.ui.window_height,
            ))
            .with_resizable(false);
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let settings = self.config.demo.settings();
        match pollster::block_on(Renderer::new(window.clone(), &settings)) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => return self.fail(event_loop, format!("renderer init failed: {e:#}").into()),
        }
        self.window = Some(window);
        tracing::info!("Window ready");
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::BannerExpired(generation) => {
                if self.hud.expire_banner(generation) {
                    self.refresh_title();
                }
            }
            AppEvent::ReassertFinished(ok) => {
                tracing::debug!("Delayed re-assert finished (ok: {ok})");
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if window.id() != window_id {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::RedrawRequested => {
                let scene = scene_for(self.screen, self.hud.enabled());
                let Some(renderer) = &mut self.renderer else {
                    return;
                };
                if let Err(err) = renderer.render(scene) {
                    match err {
                        SurfaceError::Lost | SurfaceError::Outdated => renderer.resize(window.inner_size()),
                        SurfaceError::OutOfMemory => {
                            self.fail(event_loop, "GPU out of memory".into());
                        }
                        e => tracing::warn!("Render error: {e:?}"),
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    fn char_key(c: &str) -> Key {
        Key::Character(SmolStr::new(c))
    }

    #[test]
    fn main_screen_keys() {
        assert_eq!(action_for_key(&Key::Named(NamedKey::Space), Screen::Main), Some(Action::ToggleHud));
        assert_eq!(action_for_key(&char_key("H"), Screen::Main), Some(Action::ToggleHud));
        assert_eq!(
            action_for_key(&Key::Named(NamedKey::Enter), Screen::Main),
            Some(Action::Navigate(Event::OpenDemo))
        );
        assert_eq!(action_for_key(&char_key("t"), Screen::Main), Some(Action::Navigate(Event::OpenDemo)));
        assert_eq!(action_for_key(&Key::Named(NamedKey::Escape), Screen::Main), None);
    }

    #[test]
    fn demo_screen_only_goes_back() {
        assert_eq!(
            action_for_key(&Key::Named(NamedKey::Escape), Screen::Demo),
            Some(Action::Navigate(Event::Back))
        );
        assert_eq!(
            action_for_key(&Key::Named(NamedKey::Backspace), Screen::Demo),
            Some(Action::Navigate(Event::Back))
        );
        assert_eq!(action_for_key(&Key::Named(NamedKey::Space), Screen::Demo), None);
        assert_eq!(action_for_key(&char_key("h"), Screen::Demo), None);
    }

    #[test]
    fn title_reflects_state_and_banner() {
        assert_eq!(window_title(Screen::Main, false, None), "Metal HUD Utility | HUD Off");
        assert_eq!(
            window_title(Screen::Main, true, Some("Restart apps to apply")),
            "Metal HUD Utility | HUD On | Restart apps to apply"
        );
        assert!(window_title(Screen::Demo, true, None).starts_with("Metal HUD Demo"));
    }

    #[test]
    fn scenes_per_screen() {
        assert_eq!(scene_for(Screen::Main, false), Scene::Backdrop { glow: false });
        assert_eq!(scene_for(Screen::Main, true), Scene::Backdrop { glow: true });
        assert_eq!(scene_for(Screen::Demo, true), Scene::Cube { glow: true });
    }
}

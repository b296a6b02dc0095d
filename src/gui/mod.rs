/// ICED GUI Application Module
///
/// Architecture:
/// - The window shows one project at a time and forwards key presses to the
///   launcher as logical actions
/// - While a project runs, a tick subscription polls for its exit
/// - All launcher state lives in [`Launcher`]; this module only renders it
mod project_view;

use crate::config::LauncherConfig;
use crate::error::LauncherError;
use crate::input::action_for_key;
use crate::launcher::{ActionOutcome, Launcher, LauncherAction};
use crate::supervisor::{ProcessSpawner, ProjectExited, SystemSpawner};
use iced::{
    executor,
    widget::{image, Column, Container, Space, Text},
    window, Alignment, Application, Command, Element, Length, Settings, Subscription, Theme,
};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Message {
    Action(LauncherAction),
    /// Exit check while a project is running
    Tick,
}

pub struct ProjectCarousel<S = SystemSpawner> {
    launcher: Launcher<S>,

    // Icon handle for the current presentation, rebuilt when it changes
    icon_handle: Option<image::Handle>,
    shown_render: u64,

    status_message: String,
    poll_interval: Duration,
    fullscreen: bool,
}

impl<S: ProcessSpawner> ProjectCarousel<S> {
    fn with_launcher(launcher: Launcher<S>, config: &LauncherConfig) -> Self {
        let mut app = ProjectCarousel {
            launcher,
            icon_handle: None,
            shown_render: 0,
            status_message: String::new(),
            poll_interval: config.poll_interval(),
            fullscreen: config.fullscreen,
        };
        app.sync_icon();
        app
    }

    /// Rebuild the icon handle if the presenter replaced the display
    fn sync_icon(&mut self) {
        if self.launcher.render_count() == self.shown_render {
            return;
        }
        self.shown_render = self.launcher.render_count();

        self.icon_handle = self.launcher.presentation().map(|presentation| {
            let icon = &presentation.icon;
            image::Handle::from_pixels(icon.width, icon.height, icon.rgba.to_vec())
        });
    }

    fn apply(&mut self, outcome: ActionOutcome) -> Command<Message> {
        match outcome {
            ActionOutcome::Quit => return window::close(window::Id::MAIN),
            ActionOutcome::Launched { project_name, pid } => {
                self.status_message = format!("▶ {} is running (pid {})", project_name, pid);
            }
            ActionOutcome::LaunchFailed(LauncherError::MissingExecutable { .. }) => {
                // Logged by the supervisor only
                self.status_message.clear();
            }
            ActionOutcome::LaunchFailed(e) => {
                self.status_message = format!("⚠️ {}", e);
            }
            ActionOutcome::StopRequested => {
                self.status_message = "Stopping project...".to_string();
            }
            ActionOutcome::Moved { .. } => {
                self.status_message.clear();
            }
            ActionOutcome::Ignored => {}
        }

        Command::none()
    }

    fn handle_message(&mut self, message: Message) -> Command<Message> {
        let cmd = match message {
            Message::Action(action) => {
                let outcome = self.launcher.handle(action);
                self.apply(outcome)
            }
            Message::Tick => {
                if let Some(exited) = self.launcher.tick() {
                    self.status_message = closed_status(&exited);
                }
                Command::none()
            }
        };

        self.sync_icon();
        cmd
    }
}

fn closed_status(exited: &ProjectExited) -> String {
    let runtime = exited.runtime.as_secs();
    match exited.exit.and_then(|e| e.code) {
        Some(code) => format!(
            "{} closed after {}s (exit code {})",
            exited.project_name, runtime, code
        ),
        None => format!("{} closed after {}s", exited.project_name, runtime),
    }
}

impl Application for ProjectCarousel {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = LauncherConfig;

    fn new(config: LauncherConfig) -> (Self, Command<Message>) {
        let app = ProjectCarousel::with_launcher(Launcher::from_config(&config), &config);

        tracing::info!(
            "Launcher window ready with {} projects",
            app.launcher.registry().len()
        );

        let cmd = if app.fullscreen {
            window::change_mode(window::Id::MAIN, window::Mode::Fullscreen)
        } else {
            Command::none()
        };

        (app, cmd)
    }

    fn title(&self) -> String {
        String::from("Project Carousel")
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        let keys = iced::keyboard::on_key_press(|key, modifiers| {
            action_for_key(&key, modifiers).map(Message::Action)
        });

        // Poll for the running project's exit
        struct ExitPoller;

        let exit_poll = if self.launcher.is_locked() {
            iced::subscription::unfold(
                std::any::TypeId::of::<ExitPoller>(),
                self.poll_interval,
                |interval| async move {
                    std::thread::sleep(interval);
                    (Message::Tick, interval)
                },
            )
        } else {
            Subscription::none()
        };

        Subscription::batch([keys, exit_poll])
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        self.handle_message(message)
    }

    fn view(&self) -> Element<Message> {
        let carousel = self.launcher.carousel();
        let body: Element<Message> = match self.launcher.presentation() {
            Some(presentation) if !carousel.is_empty() => {
                let index = carousel.current_index().unwrap_or(0);
                project_view::render_project(
                    presentation,
                    self.icon_handle.as_ref(),
                    (index, carousel.len()),
                )
            }
            _ => project_view::render_empty(self.launcher.registry().root()),
        };

        let hint = match self.launcher.running() {
            Some(run) => format!(
                "Waiting for {} to close (pid {})...",
                run.project_name(),
                run.pid()
            ),
            None => "← → browse   Enter launch   Esc quit".to_string(),
        };

        let content = Column::new()
            .align_items(Alignment::Center)
            .push(Space::new(Length::Fill, Length::FillPortion(1)))
            .push(body)
            .push(Space::new(Length::Fill, Length::FillPortion(1)))
            .push(Text::new(&self.status_message).size(16))
            .push(Text::new(hint).size(14))
            .padding(20);

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .into()
    }
}

/// Run the kiosk window until the user quits
pub fn run(config: LauncherConfig) -> iced::Result {
    let size = iced::Size::new(config.window_width, config.window_height);

    ProjectCarousel::run(Settings {
        window: window::Settings {
            size,
            min_size: Some(iced::Size::new(640.0, 480.0)),
            ..Default::default()
        },
        flags: config,
        ..Default::default()
    })
}

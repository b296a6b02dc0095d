//! Launcher state
//!
//! Ties the registry, carousel, presenter and supervisor together behind two
//! entry points the host loop drives: [`Launcher::handle`] for input actions
//! and [`Launcher::tick`] once per frame.

use crate::carousel::{CarouselState, Direction};
use crate::config::LauncherConfig;
use crate::error::LauncherError;
use crate::presenter::{Presentation, Presenter};
use crate::registry::ProjectRegistry;
use crate::supervisor::{
    LaunchOutcome, ProcessSpawner, ProcessSupervisor, ProjectExited, RunningProject, SystemSpawner,
};

/// Logical input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherAction {
    Next,
    Previous,
    Select,
    Quit,
    /// Kill the running project (only when enabled in config)
    ForceStop,
}

/// What an action did
#[derive(Debug)]
pub enum ActionOutcome {
    /// Nothing changed
    Ignored,
    /// The carousel moved and the new project is displayed
    Moved { index: usize },
    Launched { project_name: String, pid: u32 },
    LaunchFailed(LauncherError),
    /// The launcher itself should close
    Quit,
    StopRequested,
}

pub struct Launcher<S = SystemSpawner> {
    registry: ProjectRegistry,
    carousel: CarouselState,
    presenter: Presenter,
    supervisor: ProcessSupervisor<S>,
    allow_force_stop: bool,
}

impl Launcher<SystemSpawner> {
    /// Scan the configured projects directory and show the first project
    pub fn from_config(config: &LauncherConfig) -> Self {
        let root = config.resolve_projects_dir();

        let registry = match ProjectRegistry::load_non_empty(&root, config.sort_projects) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!("{}", e);
                ProjectRegistry::from_entries(root, Vec::new())
            }
        };

        let presenter = Presenter::new(config.default_icon.as_deref());
        let supervisor = ProcessSupervisor::new(config.poll_interval(), config.max_run_time());

        Self::new(registry, presenter, supervisor, config.allow_force_stop)
    }
}

impl<S: ProcessSpawner> Launcher<S> {
    pub fn new(
        registry: ProjectRegistry,
        presenter: Presenter,
        supervisor: ProcessSupervisor<S>,
        allow_force_stop: bool,
    ) -> Self {
        let mut launcher = Self {
            carousel: CarouselState::new(registry.len()),
            registry,
            presenter,
            supervisor,
            allow_force_stop,
        };
        launcher.present_current();
        launcher
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    pub fn carousel(&self) -> CarouselState {
        self.carousel
    }

    pub fn is_locked(&self) -> bool {
        self.carousel.is_locked()
    }

    pub fn presentation(&self) -> Option<&Presentation> {
        self.presenter.current()
    }

    pub fn render_count(&self) -> u64 {
        self.presenter.render_count()
    }

    pub fn running(&self) -> Option<&RunningProject> {
        self.supervisor.running()
    }

    pub fn handle(&mut self, action: LauncherAction) -> ActionOutcome {
        if self.is_locked() {
            // Only the escape hatch gets through while a project runs
            if action == LauncherAction::ForceStop
                && self.allow_force_stop
                && self.supervisor.force_stop()
            {
                return ActionOutcome::StopRequested;
            }
            tracing::trace!("Ignoring {:?} while a project is running", action);
            return ActionOutcome::Ignored;
        }

        match action {
            LauncherAction::Next => self.step(Direction::Next),
            LauncherAction::Previous => self.step(Direction::Previous),
            LauncherAction::Select => self.select(),
            LauncherAction::Quit => {
                tracing::info!("Quit requested");
                ActionOutcome::Quit
            }
            LauncherAction::ForceStop => ActionOutcome::Ignored,
        }
    }

    /// Per-frame exit check; unlocks navigation when the running project ends
    pub fn tick(&mut self) -> Option<ProjectExited> {
        let exited = self.supervisor.poll()?;
        self.carousel = self.carousel.unlocked();
        Some(exited)
    }

    fn step(&mut self, direction: Direction) -> ActionOutcome {
        let Some(moved) = self.carousel.step(direction) else {
            return ActionOutcome::Ignored;
        };

        self.carousel = moved;
        self.present_current();

        match moved.current_index() {
            Some(index) => ActionOutcome::Moved { index },
            None => ActionOutcome::Ignored,
        }
    }

    fn select(&mut self) -> ActionOutcome {
        let Some(entry) = self
            .carousel
            .current_index()
            .and_then(|i| self.registry.get(i))
        else {
            return ActionOutcome::Ignored;
        };

        match self.supervisor.launch(entry) {
            Ok(LaunchOutcome::Started { pid, .. }) => {
                self.carousel = self.carousel.locked();
                ActionOutcome::Launched {
                    project_name: entry.name().to_string(),
                    pid,
                }
            }
            Ok(LaunchOutcome::Busy) => ActionOutcome::Ignored,
            Err(e) => ActionOutcome::LaunchFailed(e),
        }
    }

    fn present_current(&mut self) {
        if let Some(entry) = self
            .carousel
            .current_index()
            .and_then(|i| self.registry.get(i))
        {
            self.presenter.show(entry);
        }
    }
}

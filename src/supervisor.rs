//! Process Supervisor
//!
//! Owns at most one launched project. Exit is observed two ways:
//! - an exit watcher thread posts an [`ExitNotice`] on a channel
//! - [`ProcessSupervisor::poll`] checks the child directly once per tick
//!
//! Both feed the same generation-guarded transition back to `Idle`, so a
//! run ends exactly once no matter which signal arrives first.

use crate::error::{LauncherError, Result};
use crate::registry::ProjectEntry;
use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a launched process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// Exit code, `None` when killed by a signal or unknown
    pub code: Option<i32>,
}

/// A spawned external process
pub trait ChildProcess: Send {
    fn id(&self) -> u32;
    /// Non-blocking exit check
    fn try_wait(&mut self) -> io::Result<Option<ProcessExit>>;
    fn kill(&mut self) -> io::Result<()>;
}

impl ChildProcess for Child {
    fn id(&self) -> u32 {
        Child::id(self)
    }

    fn try_wait(&mut self) -> io::Result<Option<ProcessExit>> {
        Ok(Child::try_wait(self)?.map(|status| ProcessExit {
            code: status.code(),
        }))
    }

    fn kill(&mut self) -> io::Result<()> {
        Child::kill(self)
    }
}

/// Starts project executables
pub trait ProcessSpawner {
    fn spawn(&self, executable: &Path) -> io::Result<Box<dyn ChildProcess>>;
}

/// Spawns real OS processes with no arguments and the inherited working directory
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, executable: &Path) -> io::Result<Box<dyn ChildProcess>> {
        let child = Command::new(executable).spawn()?;
        Ok(Box::new(child))
    }
}

type SharedChild = Arc<Mutex<Box<dyn ChildProcess>>>;

/// Exit signal posted by the watcher thread (or anything holding a notifier)
#[derive(Debug, Clone, Copy)]
pub struct ExitNotice {
    pub generation: u64,
    pub exit: Option<ProcessExit>,
}

/// Sending half of the exit notification channel
#[derive(Debug, Clone)]
pub struct ExitNotifier {
    tx: Sender<ExitNotice>,
}

impl ExitNotifier {
    pub fn notify(&self, generation: u64, exit: Option<ProcessExit>) {
        // Receiver lives as long as the supervisor; a send error only means it is gone
        let _ = self.tx.send(ExitNotice { generation, exit });
    }
}

/// The currently running project
pub struct RunningProject {
    project_name: String,
    executable: PathBuf,
    pid: u32,
    started_at: Instant,
    generation: u64,
    child: SharedChild,
    watcher_stop: Arc<AtomicBool>,
    kill_requested: bool,
}

impl RunningProject {
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Drop for RunningProject {
    fn drop(&mut self) {
        self.watcher_stop.store(true, Ordering::Release);
    }
}

impl std::fmt::Debug for RunningProject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningProject")
            .field("project_name", &self.project_name)
            .field("executable", &self.executable)
            .field("pid", &self.pid)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
enum SupervisorState {
    #[default]
    Idle,
    Running(RunningProject),
}

/// Result of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Started { executable: PathBuf, pid: u32 },
    /// A project is already running; the selection was dropped
    Busy,
}

/// Emitted when a run ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectExited {
    pub project_name: String,
    pub exit: Option<ProcessExit>,
    pub runtime: Duration,
}

/// Expected executable for a project: `<folder>/<folder name>.exe`
pub fn expected_executable(entry: &ProjectEntry) -> PathBuf {
    entry.folder_path().join(format!("{}.exe", entry.name()))
}

/// Executable paths tried in order for a project
///
/// On non-Windows hosts the bare folder name and the `.x86_64` suffix used by
/// Linux game builds are accepted after `.exe`.
pub fn executable_candidates(entry: &ProjectEntry) -> Vec<PathBuf> {
    let mut candidates = vec![expected_executable(entry)];

    if cfg!(not(windows)) {
        let folder = entry.folder_path();
        candidates.push(folder.join(entry.name()));
        candidates.push(folder.join(format!("{}.x86_64", entry.name())));
    }

    candidates
}

pub fn find_executable(entry: &ProjectEntry) -> Option<PathBuf> {
    executable_candidates(entry)
        .into_iter()
        .find(|path| path.is_file())
}

pub struct ProcessSupervisor<S = SystemSpawner> {
    spawner: S,
    state: SupervisorState,
    next_generation: u64,
    exit_tx: Sender<ExitNotice>,
    exit_rx: Receiver<ExitNotice>,
    poll_interval: Duration,
    max_run_time: Option<Duration>,
}

impl ProcessSupervisor<SystemSpawner> {
    pub fn new(poll_interval: Duration, max_run_time: Option<Duration>) -> Self {
        Self::with_spawner(SystemSpawner, poll_interval, max_run_time)
    }
}

impl<S: ProcessSpawner> ProcessSupervisor<S> {
    pub fn with_spawner(spawner: S, poll_interval: Duration, max_run_time: Option<Duration>) -> Self {
        let (exit_tx, exit_rx) = channel::unbounded();

        Self {
            spawner,
            state: SupervisorState::Idle,
            next_generation: 1,
            exit_tx,
            exit_rx,
            poll_interval,
            max_run_time,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SupervisorState::Running(_))
    }

    pub fn running(&self) -> Option<&RunningProject> {
        match &self.state {
            SupervisorState::Running(run) => Some(run),
            SupervisorState::Idle => None,
        }
    }

    /// Handle for posting exit notices into this supervisor
    pub fn notifier(&self) -> ExitNotifier {
        ExitNotifier {
            tx: self.exit_tx.clone(),
        }
    }

    /// Launch the executable of `entry`
    ///
    /// Stays `Idle` and returns `MissingExecutable` when the folder has no
    /// matching executable, or `Spawn` when the OS refuses to start it.
    pub fn launch(&mut self, entry: &ProjectEntry) -> Result<LaunchOutcome> {
        if self.is_running() {
            return Ok(LaunchOutcome::Busy);
        }

        let Some(executable) = find_executable(entry) else {
            let path = expected_executable(entry);
            tracing::warn!("Executable not found: {:?}", path);
            return Err(LauncherError::MissingExecutable { path });
        };

        let child = self.spawner.spawn(&executable).map_err(|source| {
            tracing::error!("Failed to launch {:?}: {}", executable, source);
            LauncherError::Spawn {
                path: executable.clone(),
                source,
            }
        })?;

        let pid = child.id();
        let generation = self.next_generation;
        self.next_generation += 1;

        let child: SharedChild = Arc::new(Mutex::new(child));
        let watcher_stop = Arc::new(AtomicBool::new(false));
        spawn_exit_watcher(
            child.clone(),
            generation,
            self.notifier(),
            watcher_stop.clone(),
            self.poll_interval,
        );

        tracing::info!(
            "Launched {:?} (pid {}), navigation locked",
            executable,
            pid
        );

        self.state = SupervisorState::Running(RunningProject {
            project_name: entry.name().to_string(),
            executable: executable.clone(),
            pid,
            started_at: Instant::now(),
            generation,
            child,
            watcher_stop,
            kill_requested: false,
        });

        Ok(LaunchOutcome::Started { executable, pid })
    }

    /// Per-tick exit check
    ///
    /// Drains pending exit notices, then checks the child directly and
    /// enforces the optional runtime limit. Returns the exit event when this
    /// call ended the run.
    pub fn poll(&mut self) -> Option<ProjectExited> {
        let mut exited = None;
        for notice in self.exit_rx.try_iter().collect::<Vec<_>>() {
            if let Some(event) = self.finish(notice.generation, notice.exit) {
                exited = Some(event);
            }
        }
        if exited.is_some() {
            return exited;
        }

        let (generation, status) = {
            let SupervisorState::Running(run) = &mut self.state else {
                return None;
            };

            if let Some(limit) = self.max_run_time {
                if !run.kill_requested && run.elapsed() >= limit {
                    tracing::warn!(
                        "{} exceeded {:?}, terminating pid {}",
                        run.project_name,
                        limit,
                        run.pid
                    );
                    request_kill(run);
                }
            }

            let status = run.child.lock().try_wait();
            (run.generation, status)
        };

        match status {
            Ok(Some(exit)) => self.finish(generation, Some(exit)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Lost track of running project: {}", e);
                self.finish(generation, None)
            }
        }
    }

    /// Kill the running project; its exit is observed on a later poll
    pub fn force_stop(&mut self) -> bool {
        match &mut self.state {
            SupervisorState::Running(run) => {
                tracing::warn!("Force-stopping {} (pid {})", run.project_name, run.pid);
                request_kill(run);
                true
            }
            SupervisorState::Idle => false,
        }
    }

    /// Transition `Running -> Idle` for `generation`
    ///
    /// Stale or duplicate signals return `None` and change nothing.
    fn finish(&mut self, generation: u64, exit: Option<ProcessExit>) -> Option<ProjectExited> {
        match &self.state {
            SupervisorState::Running(run) if run.generation == generation => {}
            _ => return None,
        }

        let SupervisorState::Running(run) = std::mem::take(&mut self.state) else {
            return None;
        };

        tracing::info!(
            "{} exited ({:?}), navigation unlocked",
            run.project_name,
            exit.and_then(|e| e.code)
        );

        Some(ProjectExited {
            project_name: run.project_name.clone(),
            exit,
            runtime: run.elapsed(),
        })
    }
}

fn request_kill(run: &mut RunningProject) {
    run.kill_requested = true;
    if let Err(e) = run.child.lock().kill() {
        tracing::warn!("Failed to kill pid {}: {}", run.pid, e);
    }
}

fn spawn_exit_watcher(
    child: SharedChild,
    generation: u64,
    notifier: ExitNotifier,
    stop: Arc<AtomicBool>,
    interval: Duration,
) {
    let spawned = std::thread::Builder::new()
        .name(format!("exit-watcher-{generation}"))
        .spawn(move || {
            while !stop.load(Ordering::Acquire) {
                let status = child.lock().try_wait();
                match status {
                    Ok(Some(exit)) => {
                        notifier.notify(generation, Some(exit));
                        break;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Exit watcher for generation {} failed: {}", generation, e);
                        notifier.notify(generation, None);
                        break;
                    }
                }
                std::thread::sleep(interval);
            }
        });

    if let Err(e) = spawned {
        // The per-tick poll still observes the exit
        tracing::warn!("Failed to start exit watcher: {}", e);
    }
}

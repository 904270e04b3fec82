use std::io;
use std::process::{Child, Command};
use std::time::{Duration, Instant};

use crate::error::DesktopError;

const DEFAULT_GRACE: Duration = Duration::from_secs(2);
const EXIT_POLL: Duration = Duration::from_millis(50);

/// A launched application.
///
/// Not `Clone`: closing an application consumes its handle, so a handle can
/// never be used again once the process has been terminated.
#[derive(Debug)]
pub struct AppHandle {
    id: u64,
    program: String,
}

impl AppHandle {
    /// Handle for a backend that does not spawn real processes
    pub fn detached(id: u64, program: impl Into<String>) -> Self {
        Self {
            id,
            program: program.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

/// Outcome of a cleanup sweep
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub terminated: usize,
    pub failed: usize,
    pub already_exited: usize,
}

impl CleanupReport {
    pub fn attempted(&self) -> usize {
        self.terminated + self.failed + self.already_exited
    }
}

/// What the tracker needs from a running process
pub trait ChildProcess {
    fn pid(&self) -> u32;

    /// True once the process has exited. Reaps it when it has.
    fn has_exited(&mut self) -> io::Result<bool>;

    /// Ask the process to shut down
    fn terminate(&mut self) -> io::Result<()>;

    fn kill(&mut self) -> io::Result<()>;

    fn wait(&mut self) -> io::Result<()>;
}

impl ChildProcess for Child {
    fn pid(&self) -> u32 {
        self.id()
    }

    fn has_exited(&mut self) -> io::Result<bool> {
        Ok(self.try_wait()?.is_some())
    }

    #[cfg(unix)]
    fn terminate(&mut self) -> io::Result<()> {
        let pid = libc::pid_t::try_from(self.id()).map_err(io::Error::other)?;
        // SAFETY: plain signal delivery; the child is not reaped yet, so the
        // pid still belongs to it
        if unsafe { libc::kill(pid, libc::SIGTERM) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) -> io::Result<()> {
        Child::kill(self)
    }

    fn kill(&mut self) -> io::Result<()> {
        Child::kill(self)
    }

    fn wait(&mut self) -> io::Result<()> {
        Child::wait(self).map(|_| ())
    }
}

enum Shutdown {
    AlreadyExited,
    Terminated,
}

/// Ask politely, then kill once `grace` runs out
fn shut_down<P: ChildProcess>(child: &mut P, grace: Duration) -> io::Result<Shutdown> {
    if child.has_exited()? {
        return Ok(Shutdown::AlreadyExited);
    }

    child.terminate()?;
    let deadline = Instant::now() + grace;
    loop {
        if child.has_exited()? {
            return Ok(Shutdown::Terminated);
        }
        if Instant::now() >= deadline {
            break;
        }
        std::thread::sleep(EXIT_POLL);
    }

    tracing::warn!("PID {} ignored the termination request, killing it", child.pid());
    child.kill()?;
    child.wait()?;
    Ok(Shutdown::Terminated)
}

struct Tracked<P> {
    id: u64,
    program: String,
    child: P,
}

/// Launches applications and makes sure none outlive the run
pub struct ProcessTracker<P: ChildProcess = Child> {
    startup_wait: Duration,
    grace: Duration,
    next_id: u64,
    tracked: Vec<Tracked<P>>,
}

impl<P: ChildProcess> ProcessTracker<P> {
    pub fn new(startup_wait: Duration) -> Self {
        Self {
            startup_wait,
            grace: DEFAULT_GRACE,
            next_id: 1,
            tracked: Vec::new(),
        }
    }

    /// How long a process gets between the termination request and a kill
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Take ownership of a running process until it is terminated
    pub fn track(&mut self, program: &str, child: P) -> AppHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.tracked.push(Tracked {
            id,
            program: program.to_string(),
            child,
        });
        AppHandle {
            id,
            program: program.to_string(),
        }
    }

    /// Stop the process behind `handle` if it is still running.
    ///
    /// A process that could not be stopped stays tracked for `cleanup`.
    pub fn terminate(&mut self, handle: AppHandle) -> Result<(), DesktopError> {
        let Some(pos) = self.tracked.iter().position(|t| t.id == handle.id) else {
            tracing::debug!("`{}` is not tracked, nothing to terminate", handle.program);
            return Ok(());
        };

        let tracked = &mut self.tracked[pos];
        tracing::info!("Terminating process: {}", tracked.child.pid());
        match shut_down(&mut tracked.child, self.grace) {
            Ok(_) => {
                self.tracked.remove(pos);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Error terminating `{}`: {e}", handle.program);
                Err(e.into())
            }
        }
    }

    /// Terminate every tracked process that is still running.
    ///
    /// Each process is tried once. Failures are logged and never stop the
    /// sweep.
    pub fn cleanup(&mut self) -> CleanupReport {
        let mut report = CleanupReport::default();
        if self.tracked.is_empty() {
            return report;
        }

        tracing::info!("Cleaning up launched processes...");
        for mut tracked in self.tracked.drain(..) {
            let pid = tracked.child.pid();
            match shut_down(&mut tracked.child, self.grace) {
                Ok(Shutdown::AlreadyExited) => {
                    tracing::debug!("PID {pid} ({}) already exited", tracked.program);
                    report.already_exited += 1;
                }
                Ok(Shutdown::Terminated) => {
                    tracing::info!("Terminated PID {pid}");
                    report.terminated += 1;
                }
                Err(e) => {
                    tracing::warn!("Error terminating PID {pid}: {e}");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

impl ProcessTracker<Child> {
    /// Start `program` and confirm it is still alive after the startup wait
    pub fn launch(&mut self, program: &str, args: &[String]) -> Result<AppHandle, DesktopError> {
        tracing::info!("Launching application: {program}");

        let launch_error = |reason: String| DesktopError::Launch {
            program: program.to_string(),
            reason,
        };

        let mut child = Command::new(program)
            .args(args)
            .spawn()
            .map_err(|e| launch_error(e.to_string()))?;
        let pid = child.id();

        std::thread::sleep(self.startup_wait);

        match child.try_wait() {
            Ok(None) => {
                tracing::info!("`{program}` is running (PID={pid})");
            }
            Ok(Some(status)) => {
                return Err(launch_error(format!("exited immediately ({status})")));
            }
            Err(e) => {
                let _ = Child::kill(&mut child);
                let _ = Child::wait(&mut child);
                return Err(launch_error(e.to_string()));
            }
        }

        Ok(self.track(program, child))
    }
}

impl<P: ChildProcess> Drop for ProcessTracker<P> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Copy)]
    enum Behavior {
        /// Exits on the termination request
        Complies,
        /// Only a kill stops it
        Ignores,
        /// Every signal fails
        Refuses,
    }

    /// Scripted process recording every signal it receives
    struct FakeChild {
        pid: u32,
        behavior: Behavior,
        exited: bool,
        signals: Arc<Mutex<Vec<(u32, &'static str)>>>,
    }

    impl FakeChild {
        fn denied() -> io::Error {
            io::Error::new(io::ErrorKind::PermissionDenied, "operation not permitted")
        }
    }

    impl ChildProcess for FakeChild {
        fn pid(&self) -> u32 {
            self.pid
        }

        fn has_exited(&mut self) -> io::Result<bool> {
            Ok(self.exited)
        }

        fn terminate(&mut self) -> io::Result<()> {
            self.signals.lock().unwrap().push((self.pid, "term"));
            match self.behavior {
                Behavior::Complies => {
                    self.exited = true;
                    Ok(())
                }
                Behavior::Ignores => Ok(()),
                Behavior::Refuses => Err(Self::denied()),
            }
        }

        fn kill(&mut self) -> io::Result<()> {
            self.signals.lock().unwrap().push((self.pid, "kill"));
            match self.behavior {
                Behavior::Refuses => Err(Self::denied()),
                _ => {
                    self.exited = true;
                    Ok(())
                }
            }
        }

        fn wait(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    type Signals = Arc<Mutex<Vec<(u32, &'static str)>>>;

    fn fake_tracker(behaviors: &[Behavior]) -> (ProcessTracker<FakeChild>, Vec<AppHandle>, Signals) {
        let signals = Signals::default();
        let mut processes =
            ProcessTracker::new(Duration::ZERO).with_grace(Duration::from_millis(20));
        let handles = behaviors
            .iter()
            .enumerate()
            .map(|(i, &behavior)| {
                let child = FakeChild {
                    pid: 100 + i as u32,
                    behavior,
                    exited: false,
                    signals: Arc::clone(&signals),
                };
                processes.track("editor", child)
            })
            .collect();
        (processes, handles, signals)
    }

    #[test]
    fn cleanup_survives_every_termination_failing() {
        let (mut processes, _handles, signals) =
            fake_tracker(&[Behavior::Refuses, Behavior::Refuses, Behavior::Refuses]);

        let report = processes.cleanup();
        assert_eq!(report.failed, 3);
        assert_eq!(report.attempted(), 3);
        assert_eq!(processes.tracked_count(), 0);
        assert_eq!(
            *signals.lock().unwrap(),
            vec![(100, "term"), (101, "term"), (102, "term")]
        );

        drop(processes);
        assert_eq!(signals.lock().unwrap().len(), 3);
    }

    #[test]
    fn failed_terminate_keeps_the_process_tracked() {
        let (mut processes, mut handles, signals) = fake_tracker(&[Behavior::Refuses]);

        let err = processes.terminate(handles.remove(0)).unwrap_err();
        assert!(matches!(err, DesktopError::Io(_)));
        assert_eq!(processes.tracked_count(), 1);

        let report = processes.cleanup();
        assert_eq!(report.failed, 1);
        assert_eq!(signals.lock().unwrap().len(), 2);
    }

    #[test]
    fn stubborn_process_is_killed_after_grace() {
        let (mut processes, mut handles, signals) =
            fake_tracker(&[Behavior::Ignores, Behavior::Complies]);

        processes.terminate(handles.remove(0)).unwrap();
        processes.terminate(handles.remove(0)).unwrap();

        assert_eq!(processes.tracked_count(), 0);
        assert_eq!(
            *signals.lock().unwrap(),
            vec![(100, "term"), (100, "kill"), (101, "term")]
        );
    }

    #[cfg(unix)]
    mod spawned {
        use super::super::*;

        fn tracker() -> ProcessTracker {
            ProcessTracker::new(Duration::from_millis(100))
        }

        fn sleeper(seconds: &str) -> Vec<String> {
            vec![seconds.to_string()]
        }

        #[test]
        fn cleanup_terminates_every_running_process_once() {
            let mut processes = tracker();
            let a = processes.launch("sleep", &sleeper("30")).unwrap();
            let b = processes.launch("sleep", &sleeper("30")).unwrap();
            assert_ne!(a.id(), b.id());
            assert_eq!(processes.tracked_count(), 2);

            let report = processes.cleanup();
            assert_eq!(report.terminated, 2);
            assert_eq!(report.attempted(), 2);
            assert_eq!(processes.tracked_count(), 0);

            // a second sweep has nothing left to do
            assert_eq!(processes.cleanup(), CleanupReport::default());
        }

        #[test]
        fn cleanup_skips_processes_that_already_exited() {
            let mut processes = tracker();
            let _short = processes.launch("sleep", &sleeper("0.3")).unwrap();
            let _long = processes.launch("sleep", &sleeper("30")).unwrap();
            std::thread::sleep(Duration::from_millis(600));

            let report = processes.cleanup();
            assert_eq!(report.already_exited, 1);
            assert_eq!(report.terminated, 1);
            assert_eq!(report.failed, 0);
        }

        #[test]
        fn immediate_exit_is_a_launch_failure() {
            let mut processes = tracker();
            let err = processes.launch("true", &[]).unwrap_err();
            assert!(matches!(err, DesktopError::Launch { .. }));
            assert_eq!(processes.tracked_count(), 0);
        }

        #[test]
        fn missing_program_is_a_launch_failure() {
            let mut processes = tracker();
            let err = processes
                .launch("quill-no-such-editor-binary", &[])
                .unwrap_err();
            assert!(err.to_string().contains("quill-no-such-editor-binary"));
        }

        #[test]
        fn terminate_sends_sigterm_and_untracks() {
            let mut processes = tracker();
            let handle = processes.launch("sleep", &sleeper("30")).unwrap();
            let started = Instant::now();
            processes.terminate(handle).unwrap();

            // sleep exits on SIGTERM well inside the grace period
            assert!(started.elapsed() < DEFAULT_GRACE);
            assert_eq!(processes.tracked_count(), 0);
            assert_eq!(processes.cleanup().attempted(), 0);
        }

        #[test]
        fn detached_handles_are_ignored() {
            let mut processes = tracker();
            processes
                .terminate(AppHandle::detached(99, "notepad.exe"))
                .unwrap();
        }
    }
}

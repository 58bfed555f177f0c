//! # Test Dispatch
//!
//! Builds the language-appropriate test command from the package's
//! [`LanguageProfile`](weekgate_core::LanguageProfile), runs it through a
//! [`TestRunner`], and folds the outcome into violations.
//!
//! [`ProcessRunner`] is the real implementation: it spawns the command
//! from the repository root in its own process group, drains stdout and
//! stderr on reader threads, and kills the whole group once the configured
//! timeout elapses. Tests swap in a stub runner.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use weekgate_core::{GateConfig, RunnerKind};

use crate::package::Package;
use crate::validation::{ValidationResult, ViolationKind};

/// Errors starting or supervising a test process.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("failed while waiting for {program}: {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },
}

/// A fully-resolved test command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInvocation {
    pub runner: RunnerKind,
    pub program: String,
    pub args: Vec<String>,
    /// Working directory (the repository root).
    pub cwd: PathBuf,
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl TestInvocation {
    /// Name used in the failure headline: `pytest` or `mvn test`.
    pub fn headline(&self) -> &'static str {
        match self.runner {
            RunnerKind::Pytest => "pytest",
            RunnerKind::Maven => "mvn test",
        }
    }

    /// Shell-like rendering for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a test process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    Failed {
        /// `None` when the process was ended by a signal.
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    TimedOut {
        after: Duration,
        stdout: String,
        stderr: String,
    },
}

/// Runs a test invocation to completion.
pub trait TestRunner {
    fn run(&self, invocation: &TestInvocation) -> Result<TestOutcome, RunnerError>;
}

// ---------------------------------------------------------------------------
// Process runner
// ---------------------------------------------------------------------------

/// Spawns the invocation as a child process.
///
/// On unix the child leads its own process group, so a timeout takes down
/// forked workers along with it.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    poll_interval: Duration,
    /// How long to keep reading output after the child has gone.
    drain_grace: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            drain_grace: Duration::from_secs(2),
        }
    }
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_drain_grace(mut self, grace: Duration) -> Self {
        self.drain_grace = grace;
        self
    }

    /// Wait for exit, killing the child's process tree once `timeout`
    /// elapses. Returns `None` when the child was killed.
    fn supervise(
        &self,
        child: &mut Child,
        program: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<ExitStatus>, RunnerError> {
        let wait_err = |source| RunnerError::Wait {
            program: program.to_string(),
            source,
        };
        let Some(limit) = timeout else {
            return child.wait().map(Some).map_err(wait_err);
        };

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(wait_err)? {
                return Ok(Some(status));
            }
            if started.elapsed() >= limit {
                tracing::warn!(program, ?limit, "test process timed out; killing");
                kill_tree(child);
                let _ = child.wait();
                return Ok(None);
            }
            thread::sleep(self.poll_interval);
        }
    }

    /// Wait up to the drain grace for a reader to hit end of stream, then
    /// take whatever it has buffered. Descendants that outlive the child
    /// keep the pipe open, so the reader thread is left detached.
    fn collect(&self, reader: Option<OutputReader>) -> String {
        let Some(reader) = reader else {
            return String::new();
        };
        let deadline = Instant::now() + self.drain_grace;
        while !reader.handle.is_finished() && Instant::now() < deadline {
            thread::sleep(self.poll_interval.min(Duration::from_millis(10)));
        }
        if reader.handle.is_finished() {
            let _ = reader.handle.join();
        } else {
            tracing::debug!("output pipe still held open; keeping partial output");
        }
        let buf = match reader.buf.lock() {
            Ok(buf) => buf.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(unix)]
fn isolate(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(not(unix))]
fn isolate(_command: &mut Command) {}

/// Kill the child and, on unix, every process in its group.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        let group = format!("-{}", child.id());
        let signalled = Command::new("kill")
            .args(["-KILL", "--", group.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        if !signalled {
            tracing::debug!(pid = child.id(), "group kill failed; killing child only");
        }
    }
    let _ = child.kill();
}

struct OutputReader {
    buf: Arc<Mutex<Vec<u8>>>,
    handle: JoinHandle<()>,
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> Option<OutputReader> {
    stream.map(|mut s| {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let handle = thread::spawn(move || {
            let mut chunk = [0u8; 8192];
            loop {
                match s.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => match sink.lock() {
                        Ok(mut out) => out.extend_from_slice(&chunk[..n]),
                        Err(poisoned) => poisoned.into_inner().extend_from_slice(&chunk[..n]),
                    },
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(_) => break,
                }
            }
        });
        OutputReader { buf, handle }
    })
}

impl TestRunner for ProcessRunner {
    fn run(&self, invocation: &TestInvocation) -> Result<TestOutcome, RunnerError> {
        let program = invocation.program.as_str();
        let mut command = Command::new(program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        isolate(&mut command);
        let mut child = command.spawn().map_err(|source| RunnerError::Spawn {
            program: program.to_string(),
            source,
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let status = self.supervise(&mut child, program, invocation.timeout)?;
        let stdout = self.collect(stdout);
        let stderr = self.collect(stderr);

        Ok(match status {
            Some(status) if status.success() => TestOutcome::Passed,
            Some(status) => TestOutcome::Failed {
                code: status.code(),
                stdout,
                stderr,
            },
            None => TestOutcome::TimedOut {
                after: invocation.timeout.unwrap_or_default(),
                stdout,
                stderr,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// What to do about tests for a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestPlan {
    Run(TestInvocation),
    /// Nothing to run; the reason was already reported elsewhere.
    Skip(String),
    /// Tests cannot be run; the message is a violation.
    Blocked(String),
}

/// Build the test plan from the package's profile and the configuration.
pub fn plan(pkg: &Package, config: &GateConfig) -> TestPlan {
    let profile = pkg.profile();
    let (program, args) = match profile.runner {
        RunnerKind::Pytest => {
            let tests = pkg.path(profile.test_source_dir);
            if !tests.is_dir() {
                return TestPlan::Skip(format!(
                    "{} missing; skipping test run",
                    pkg.display(&tests)
                ));
            }
            (
                config.python.clone(),
                vec![
                    "-m".to_string(),
                    "pytest".to_string(),
                    pkg.display(&tests),
                    "-q".to_string(),
                ],
            )
        }
        RunnerKind::Maven => {
            let pom = profile.build_descriptor.map(|rel| pkg.path(rel));
            let Some(pom) = pom.filter(|p| p.is_file()) else {
                return TestPlan::Blocked(format!(
                    "{} project missing pom.xml for running tests",
                    profile.display_name
                ));
            };
            (
                config.maven.clone(),
                vec![
                    "test".to_string(),
                    "-f".to_string(),
                    pkg.display(&pom),
                    "-q".to_string(),
                ],
            )
        }
    };

    TestPlan::Run(TestInvocation {
        runner: profile.runner,
        program,
        args,
        cwd: pkg.root.clone(),
        timeout: config.test_timeout(),
    })
}

fn add_streams(result: &mut ValidationResult, kind: ViolationKind, label: &str, stdout: &str, stderr: &str) {
    for (name, stream) in [("stdout", stdout), ("stderr", stderr)] {
        let trimmed = stream.trim_end();
        if !trimmed.is_empty() {
            result.add(kind, format!("{label} {name}:\n{trimmed}"));
        }
    }
}

/// Turn a runner outcome into violations.
pub fn fold_outcome(
    invocation: &TestInvocation,
    outcome: Result<TestOutcome, RunnerError>,
) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let headline = invocation.headline();
    let label = invocation.runner.label();
    match outcome {
        Ok(TestOutcome::Passed) => tracing::info!("OK: {headline} passed"),
        Ok(TestOutcome::Failed {
            code,
            stdout,
            stderr,
        }) => {
            tracing::debug!(?code, "{headline} exited unsuccessfully");
            result.add(ViolationKind::TestFailure, format!("{headline} failed"));
            add_streams(&mut result, ViolationKind::TestFailure, label, &stdout, &stderr);
        }
        Ok(TestOutcome::TimedOut {
            after,
            stdout,
            stderr,
        }) => {
            result.add(
                ViolationKind::TestTimeout,
                format!("{headline} timed out after {}s", after.as_secs()),
            );
            add_streams(&mut result, ViolationKind::TestTimeout, label, &stdout, &stderr);
        }
        Err(e) => result.add(ViolationKind::TestFailure, e.to_string()),
    }
    result
}

/// Plan, run and fold the package's test suite.
pub fn dispatch_tests(pkg: &Package, config: &GateConfig, runner: &dyn TestRunner) -> ValidationResult {
    match plan(pkg, config) {
        TestPlan::Skip(reason) => {
            tracing::info!("{reason}");
            ValidationResult::ok()
        }
        TestPlan::Blocked(message) => {
            let mut result = ValidationResult::ok();
            result.add(ViolationKind::TestFailure, message);
            result
        }
        TestPlan::Run(invocation) => {
            tracing::info!(cwd = %invocation.cwd.display(), "running: {}", invocation.command_line());
            let outcome = runner.run(&invocation);
            fold_outcome(&invocation, outcome)
        }
    }
}

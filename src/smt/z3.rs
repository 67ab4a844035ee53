//! External `z3` process backend.
//!
//! Frames are kept in memory; every [`Solver::check`] renders the live
//! assertions as one SMT-LIB2 script and runs a fresh `z3 -in` on it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, trace};

use crate::smt::smtlib;
use crate::smt::{CheckResult, Solver, SolverError, Term};

const COMMON_PATHS: &[&str] = &["/opt/homebrew/bin/z3", "/usr/local/bin/z3", "/usr/bin/z3"];

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SolverConfig {
    /// Path to the `z3` binary.
    pub z3_path: PathBuf,
    /// Per-check timeout in milliseconds, `0` for none.
    pub timeout_ms: u64,
}

impl SolverConfig {
    pub fn new(z3_path: impl Into<PathBuf>) -> Self {
        Self {
            z3_path: z3_path.into(),
            timeout_ms: 0,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Locate `z3` via `Z3_PATH`, then `PATH`, then common install locations.
    pub fn auto_detect() -> Result<Self, SolverError> {
        if let Some(path) = std::env::var_os("Z3_PATH") {
            let path = PathBuf::from(path);
            if path.is_file() {
                return Ok(Self::new(path));
            }
            return Err(SolverError::NotFound(path));
        }

        if let Some(paths) = std::env::var_os("PATH") {
            for dir in std::env::split_paths(&paths) {
                let candidate = dir.join("z3");
                if candidate.is_file() {
                    return Ok(Self::new(candidate));
                }
            }
        }

        COMMON_PATHS
            .iter()
            .map(Path::new)
            .find(|path| path.is_file())
            .map(Self::new)
            .ok_or_else(|| SolverError::NotFound(PathBuf::from("z3")))
    }

    fn args(&self) -> Vec<String> {
        let mut args = vec!["-in".to_string()];
        if self.timeout_ms > 0 {
            args.push(format!("-t:{}", self.timeout_ms));
        }
        args
    }
}

#[derive(Debug)]
pub struct Z3Solver {
    config: SolverConfig,
    frames: Vec<Vec<Term>>,
}

impl Z3Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            frames: vec![Vec::new()],
        }
    }

    /// Solver with an auto-detected `z3` binary.
    pub fn with_default_config() -> Result<Self, SolverError> {
        Ok(Self::new(SolverConfig::auto_detect()?))
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Script that the next [`Solver::check`] would run.
    pub fn script(&self) -> String {
        smtlib::script(self.frames.iter().flatten())
    }

    fn run(&self, script: &str) -> Result<String, SolverError> {
        let mut child = Command::new(&self.config.z3_path)
            .args(self.config.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(script.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.trim().is_empty() && !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SolverError::Backend(stderr.trim().to_string()));
        }
        Ok(stdout)
    }
}

/// Interpret the output of a script ending in a single `(check-sat)`.
pub(crate) fn parse_check_sat(stdout: &str) -> Result<CheckResult, SolverError> {
    let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());
    match lines.next() {
        Some("sat") => Ok(CheckResult::Sat),
        Some("unsat") => Ok(CheckResult::Unsat),
        Some("unknown") => Ok(CheckResult::Unknown("unknown".to_string())),
        Some("timeout") => Ok(CheckResult::Unknown("timeout".to_string())),
        Some(line) if line.starts_with("(error") => Err(SolverError::Backend(line.to_string())),
        _ => Err(SolverError::UnexpectedOutput(stdout.to_string())),
    }
}

impl Solver for Z3Solver {
    fn push(&mut self) {
        self.frames.push(Vec::new());
    }

    fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        } else {
            self.frames[0].clear();
        }
    }

    fn reset(&mut self) {
        self.frames.clear();
        self.frames.push(Vec::new());
    }

    fn add(&mut self, term: Term) {
        if let Some(frame) = self.frames.last_mut() {
            frame.push(term);
        }
    }

    fn check(&mut self) -> Result<CheckResult, SolverError> {
        let script = self.script();
        trace!("z3 script:\n{}", script);
        let stdout = self.run(&script)?;
        let result = parse_check_sat(&stdout)?;
        debug!("z3: {:?}", result);
        Ok(result)
    }
}

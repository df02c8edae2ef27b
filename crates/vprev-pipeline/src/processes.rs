//! Stale process cleanup.
//!
//! A crashed run can leave transcoder processes writing into the artifact
//! directories. At startup, matching processes are asked to terminate and
//! killed if they are still alive after a grace period.

use std::path::Path;
use std::time::{Duration, Instant};

use sysinfo::{Pid, Signal, System};
use tracing::{debug, info, warn};

/// Time a process gets to exit after the terminate signal.
pub const TERMINATE_GRACE: Duration = Duration::from_secs(3);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Counts from one cleanup pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessCleanupReport {
    pub terminated: usize,
    pub killed: usize,
    pub failed: usize,
}

/// Whether a process looks like a leftover of a previous run: a transcoder
/// writing under one of `markers`, or another instance of this binary.
pub fn is_stale(name: &str, cmd: &[String], markers: &[String], own_name: &str) -> bool {
    let name = name.to_lowercase();
    if name.contains("ffmpeg") {
        return cmd
            .iter()
            .any(|arg| markers.iter().any(|marker| arg.contains(marker.as_str())));
    }
    !own_name.is_empty() && name == own_name.to_lowercase()
}

/// Terminate stale processes. Best-effort: never fails.
pub async fn cleanup_stale_processes(artifact_dirs: &[&Path]) -> ProcessCleanupReport {
    info!("Checking for abandoned processes");

    let markers: Vec<String> = artifact_dirs
        .iter()
        .filter_map(|dir| {
            let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
            dir.to_str().map(str::to_string)
        })
        .filter(|s| !s.is_empty())
        .collect();
    let own_pid = sysinfo::get_current_pid().ok();
    let own_name = std::env::current_exe()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let mut system = System::new_all();
    let targets: Vec<(Pid, String)> = system
        .processes()
        .iter()
        .filter(|(pid, _)| Some(**pid) != own_pid)
        .filter(|(_, proc)| is_stale(proc.name(), proc.cmd(), &markers, &own_name))
        .map(|(pid, proc)| (*pid, proc.name().to_string()))
        .collect();

    let mut report = ProcessCleanupReport::default();
    for (pid, name) in targets {
        warn!(pid = %pid, name = %name, "Found abandoned process");
        let signalled = system
            .process(pid)
            .and_then(|proc| proc.kill_with(Signal::Term))
            .unwrap_or(false);

        if signalled && wait_for_exit(&mut system, pid, TERMINATE_GRACE).await {
            info!(pid = %pid, name = %name, "Terminated process");
            report.terminated += 1;
            continue;
        }

        warn!(pid = %pid, name = %name, "Process did not terminate, killing");
        let killed = system.process(pid).map(|proc| proc.kill()).unwrap_or(true);
        if killed {
            report.killed += 1;
        } else {
            warn!(pid = %pid, name = %name, "Failed to kill process");
            report.failed += 1;
        }
    }

    if report.terminated + report.killed > 0 {
        info!(
            terminated = report.terminated,
            killed = report.killed,
            "Cleaned up abandoned processes"
        );
    } else {
        debug!("No abandoned processes found");
    }
    report
}

/// Poll until the process is gone or `grace` elapses.
async fn wait_for_exit(system: &mut System, pid: Pid, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;
    while Instant::now() < deadline {
        if !system.refresh_process(pid) {
            return true;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    !system.refresh_process(pid)
}

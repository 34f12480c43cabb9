//! Best-effort browser launch in kiosk / full-screen mode.
//!
//! The launcher runs on a detached task once the server is listening. It
//! walks a per-platform list of browser invocations and stops at the
//! first one that starts. Nothing here can fail the process.

use std::time::Duration;

use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One way of opening the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    /// Short name used in log lines.
    pub label: &'static str,
    /// Executable to run.
    pub program: &'static str,
    /// Arguments, including the URL.
    pub args: Vec<String>,
    /// Wait for the program to exit and require a success status. Used for
    /// openers such as `start`, `open` and `xdg-open` that hand the URL
    /// off and return immediately.
    pub wait_for_exit: bool,
}

impl LaunchCommand {
    #[cfg_attr(any(windows, target_os = "macos"), allow(dead_code))]
    fn direct(label: &'static str, program: &'static str, args: &[&str], url: &str) -> Self {
        let mut args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
        args.push(url.to_owned());
        Self {
            label,
            program,
            args,
            wait_for_exit: false,
        }
    }

    #[cfg_attr(not(any(windows, target_os = "macos")), allow(dead_code))]
    fn opener(label: &'static str, program: &'static str, args: Vec<String>) -> Self {
        Self {
            label,
            program,
            args,
            wait_for_exit: true,
        }
    }
}

/// Launch candidates for this platform, most immersive first.
#[cfg(windows)]
pub fn candidates(url: &str) -> Vec<LaunchCommand> {
    let start = |label: &'static str, tail: &[String]| {
        let mut args = vec![String::from("/C"), String::from("start"), String::new()];
        args.extend_from_slice(tail);
        LaunchCommand::opener(label, "cmd", args)
    };
    vec![
        start(
            "chrome kiosk",
            &[String::from("chrome"), String::from("--kiosk"), String::from("--fullscreen"), url.to_owned()],
        ),
        start(
            "chrome app",
            &[String::from("chrome"), format!("--app={url}"), String::from("--start-fullscreen")],
        ),
        start("edge kiosk", &[String::from("msedge"), String::from("--kiosk"), url.to_owned()]),
        start("firefox kiosk", &[String::from("firefox"), String::from("--kiosk"), url.to_owned()]),
        start("default browser", &[url.to_owned()]),
    ]
}

/// Launch candidates for this platform, most immersive first.
#[cfg(target_os = "macos")]
pub fn candidates(url: &str) -> Vec<LaunchCommand> {
    let open_app = |label: &'static str, app: &str| {
        LaunchCommand::opener(
            label,
            "open",
            vec![
                String::from("-a"),
                app.to_owned(),
                String::from("--args"),
                String::from("--kiosk"),
                url.to_owned(),
            ],
        )
    };
    vec![
        open_app("chrome kiosk", "Google Chrome"),
        open_app("edge kiosk", "Microsoft Edge"),
        open_app("firefox kiosk", "Firefox"),
        LaunchCommand::opener("default browser", "open", vec![url.to_owned()]),
    ]
}

/// Launch candidates for this platform, most immersive first.
#[cfg(not(any(windows, target_os = "macos")))]
pub fn candidates(url: &str) -> Vec<LaunchCommand> {
    vec![
        LaunchCommand::direct("chrome kiosk", "google-chrome", &["--kiosk", "--start-fullscreen"], url),
        LaunchCommand::direct("chromium kiosk", "chromium", &["--kiosk", "--start-fullscreen"], url),
        LaunchCommand::direct("chromium-browser kiosk", "chromium-browser", &["--kiosk", "--start-fullscreen"], url),
        LaunchCommand::direct("firefox kiosk", "firefox", &["--kiosk"], url),
        LaunchCommand {
            wait_for_exit: true,
            ..LaunchCommand::direct("default browser", "xdg-open", &[], url)
        },
    ]
}

/// Try one candidate. Returns whether the browser was started.
async fn try_launch(candidate: &LaunchCommand) -> bool {
    let mut command = Command::new(candidate.program);
    command.args(&candidate.args);

    if candidate.wait_for_exit {
        match command.status().await {
            Ok(status) if status.success() => true,
            Ok(status) => {
                debug!(launcher = candidate.label, %status, "Browser launcher exited unsuccessfully");
                false
            }
            Err(e) => {
                debug!(launcher = candidate.label, error = %e, "Browser launcher unavailable");
                false
            }
        }
    } else {
        match command.spawn() {
            // The child keeps running; tokio reaps it when it exits.
            Ok(_child) => true,
            Err(e) => {
                debug!(launcher = candidate.label, error = %e, "Browser unavailable");
                false
            }
        }
    }
}

/// Open `url` with the first candidate that starts.
pub async fn launch(url: &str) -> bool {
    for candidate in candidates(url) {
        if try_launch(&candidate).await {
            info!(launcher = candidate.label, %url, "Browser opened");
            return true;
        }
    }
    warn!(%url, "Could not open a browser automatically; open the dashboard URL manually");
    false
}

/// Launch the browser on a detached task after `delay`.
pub fn spawn(url: String, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        launch(&url).await;
    })
}

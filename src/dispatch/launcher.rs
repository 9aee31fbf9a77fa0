//! Desktop application launcher
//!
//! Maps spoken application names to the platform's launch command.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

use crate::core::{ErrandError, Result};

/// How long a launch command may take to report failure
const LAUNCH_GRACE: Duration = Duration::from_secs(2);

const YOUTUBE_URL: &str = "https://www.youtube.com";

/// Opens desktop applications on request
#[async_trait]
pub trait AppLauncher: Send + Sync {
    /// Open the named application, returning a confirmation message
    async fn open(&self, app_name: &str) -> Result<String>;
}

/// What to run for a given application name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPlan {
    /// Open in the default web browser
    Url(String),
    /// Run a program
    Command { program: String, args: Vec<String> },
}

impl LaunchPlan {
    fn command(program: &str, args: &[&str]) -> Self {
        Self::Command {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Resolve the launch plan for `app_name` on `os` (as in `std::env::consts::OS`)
pub fn launch_plan(os: &str, app_name: &str) -> LaunchPlan {
    let name = app_name.trim();
    let key = name.to_lowercase();

    if key == "youtube" {
        return LaunchPlan::Url(YOUTUBE_URL.to_string());
    }

    match os {
        "windows" => {
            let target = match key.as_str() {
                "chrome" | "google chrome" => "chrome",
                "excel" | "microsoft excel" => "excel",
                "word" | "microsoft word" => "winword",
                "notepad" => "notepad",
                "file explorer" | "explorer" => "explorer",
                _ => name,
            };
            LaunchPlan::command("cmd", &["/C", "start", "", target])
        }
        "macos" => match key.as_str() {
            "chrome" | "google chrome" => LaunchPlan::command("open", &["-a", "Google Chrome"]),
            "excel" | "microsoft excel" => LaunchPlan::command("open", &["-a", "Microsoft Excel"]),
            "word" | "microsoft word" => LaunchPlan::command("open", &["-a", "Microsoft Word"]),
            "notes" | "textedit" => LaunchPlan::command("open", &["-a", "TextEdit"]),
            "finder" | "file explorer" => LaunchPlan::command("open", &["."]),
            _ => LaunchPlan::command("open", &["-a", name]),
        },
        _ => match key.as_str() {
            "chrome" | "google chrome" => LaunchPlan::command("google-chrome", &[]),
            "firefox" => LaunchPlan::command("firefox", &[]),
            "file explorer" | "files" => LaunchPlan::command("xdg-open", &["."]),
            _ => LaunchPlan::command(name, &[]),
        },
    }
}

/// Launches applications on the local machine
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl SystemLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AppLauncher for SystemLauncher {
    async fn open(&self, app_name: &str) -> Result<String> {
        let plan = launch_plan(std::env::consts::OS, app_name);
        debug!(app = app_name, ?plan, "Launching application");

        match plan {
            LaunchPlan::Url(url) => {
                webbrowser::open(&url).map_err(|e| ErrandError::launcher(app_name, e.to_string()))?;
            }
            LaunchPlan::Command { program, args } => {
                let mut child = Command::new(&program)
                    .args(&args)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()
                    .map_err(|e| ErrandError::launcher(app_name, e.to_string()))?;

                // GUI programs keep running; only an early non-zero exit is a failure
                if let Ok(status) = tokio::time::timeout(LAUNCH_GRACE, child.wait()).await {
                    let status = status.map_err(|e| ErrandError::launcher(app_name, e.to_string()))?;
                    if !status.success() {
                        return Err(ErrandError::launcher(
                            app_name,
                            format!("{} exited with {}", program, status),
                        ));
                    }
                }
            }
        }

        info!(app = app_name, "Application opened");
        Ok(format!("Successfully opened {}", app_name))
    }
}

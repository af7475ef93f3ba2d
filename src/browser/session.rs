//! Browser session - wraps the agent-browser CLI
//!
//! Each worker exclusively owns one named session; the browser itself runs
//! out-of-process in the agent-browser daemon, so a hung page cannot take
//! down sibling workers. The [`BrowserSession`] and [`SessionFactory`] traits
//! are the seam where tests substitute a scripted session.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use tokio::process::Command;

use crate::browser::vault::CookieRecord;
use crate::core::{BrowserConfig, MusterError, Result, ScrollDirection};

/// User agents sampled at session creation for a randomized client identity
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
];

/// Pick a random user agent string
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// An open browser session owned by exactly one worker
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to a URL and wait for network idle, bounded by the session's
    /// navigation timeout. Exceeding the timeout is an execution failure.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Scroll the page by a pixel delta in the given direction
    async fn scroll(&mut self, direction: ScrollDirection, pixels: u32) -> Result<()>;

    /// Load persisted cookies into the session
    async fn add_cookies(&mut self, cookies: &[CookieRecord]) -> Result<()>;

    /// Tear the session down. Called on Terminated and Crashed alike.
    async fn close(&mut self) -> Result<()>;
}

/// Opens sessions for workers; failure here is fatal to the worker
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open an isolated session under the given name
    async fn open(&self, session_name: &str) -> Result<Box<dyn BrowserSession>>;
}

/// Session over the agent-browser CLI
pub struct AgentBrowserSession {
    /// Session name for isolation
    session_name: String,
    /// Randomized client identity, fixed for the session's lifetime
    user_agent: String,
    /// Whether to run in headed mode
    headed: bool,
    /// Bound on a navigation's network-idle wait
    nav_timeout: Duration,
}

impl AgentBrowserSession {
    /// Run an agent-browser command against this session
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("agent-browser");
        cmd.args(["--session", &self.session_name]);
        cmd.args(["--user-agent", &self.user_agent]);

        if self.headed {
            cmd.arg("--headed");
        }

        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MusterError::AgentBrowserNotFound
            } else {
                MusterError::action(format!("Failed to run agent-browser: {}", e))
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(MusterError::action(format!(
                "agent-browser command failed: {}",
                stderr
            )))
        }
    }
}

#[async_trait]
impl BrowserSession for AgentBrowserSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.run_command(&["open", url]).await?;

        // Bounded network-idle wait; a stall past the timeout fails the
        // action, not the worker.
        let wait = self.run_command(&["wait", "--load", "networkidle"]);
        match tokio::time::timeout(self.nav_timeout, wait).await {
            Ok(result) => result.map(|_| ()),
            Err(_) => Err(MusterError::action(format!(
                "navigation to {} exceeded {}ms",
                url,
                self.nav_timeout.as_millis()
            ))),
        }
    }

    async fn scroll(&mut self, direction: ScrollDirection, pixels: u32) -> Result<()> {
        let px = pixels.to_string();
        let dir = direction.to_string();
        self.run_command(&["scroll", &dir, &px]).await?;
        Ok(())
    }

    async fn add_cookies(&mut self, cookies: &[CookieRecord]) -> Result<()> {
        for cookie in cookies {
            let mut args = vec![
                "cookie",
                "add",
                cookie.name.as_str(),
                cookie.value.as_str(),
                "--domain",
                cookie.domain.as_str(),
            ];
            if let Some(ref path) = cookie.path {
                args.push("--path");
                args.push(path);
            }
            if cookie.secure {
                args.push("--secure");
            }
            if cookie.http_only {
                args.push("--http-only");
            }
            self.run_command(&args).await?;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.run_command(&["close"]).await?;
        Ok(())
    }
}

/// Factory producing [`AgentBrowserSession`]s from the browser config
pub struct AgentBrowserFactory {
    headed: bool,
    nav_timeout: Duration,
}

impl AgentBrowserFactory {
    /// Create a factory from configuration
    pub fn new(config: &BrowserConfig) -> Self {
        Self {
            headed: config.headed,
            nav_timeout: Duration::from_millis(config.nav_timeout_ms),
        }
    }

    /// Check if agent-browser is installed
    pub async fn is_available() -> bool {
        Command::new("agent-browser")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl SessionFactory for AgentBrowserFactory {
    async fn open(&self, session_name: &str) -> Result<Box<dyn BrowserSession>> {
        if !Self::is_available().await {
            return Err(MusterError::AgentBrowserNotFound);
        }

        let session = AgentBrowserSession {
            session_name: session_name.to_string(),
            user_agent: random_user_agent().to_string(),
            headed: self.headed,
            nav_timeout: self.nav_timeout,
        };

        // Bring the session up before handing it to a worker; an unreachable
        // daemon surfaces here as a session init failure.
        session
            .run_command(&["open", "about:blank"])
            .await
            .map_err(|e| MusterError::session(e.to_string()))?;

        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_user_agent_is_known() {
        let ua = random_user_agent();
        assert!(USER_AGENTS.contains(&ua));
    }
}

use std::io::{self, Write};
use std::process::{Command, Stdio};

use scrape_logging::scrape_error;

pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> io::Result<()>;
}

/// Clipboard backed by an external program reading the text from stdin
/// (`pbcopy`, `clip`, `wl-copy`, `xclip`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The usual clipboard program for this platform.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", Vec::new())
        } else if cfg!(target_os = "windows") {
            Self::new("clip", Vec::new())
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::new("wl-copy", Vec::new())
        } else {
            Self::new(
                "xclip",
                vec!["-selection".to_string(), "clipboard".to_string()],
            )
        }
    }
}

impl Clipboard for CommandClipboard {
    fn set_text(&self, text: &str) -> io::Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        // stdin is dropped before waiting so the program sees end of input.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        if let Err(err) = written {
            let _ = child.kill();
            let _ = child.wait();
            return Err(err);
        }
        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("{} exited with {status}", self.program)))
        }
    }
}

/// Copies `text`; failures are logged and reported as `false`.
pub fn copy_to_clipboard(clipboard: &dyn Clipboard, text: &str) -> bool {
    match clipboard.set_text(text) {
        Ok(()) => true,
        Err(err) => {
            scrape_error!("Failed to copy: {}", err);
            false
        }
    }
}

use std::io::{self, Write};
use std::sync::Mutex;

/// Serialised destination for human-readable progress output
///
/// Workers hand over all lines for one item in a single [`emit`](Self::emit)
/// call; the lines are written under one lock so blocks from different
/// workers never interleave. Block order between workers is unspecified.
pub struct DiagnosticSink {
    out: Option<Mutex<Box<dyn Write + Send>>>,
}

impl DiagnosticSink {
    /// Write to an arbitrary writer
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            out: Some(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Discard all output
    pub fn silent() -> Self {
        Self { out: None }
    }

    pub fn is_silent(&self) -> bool {
        self.out.is_none()
    }

    /// Write `lines` as one uninterrupted block
    pub fn emit<S: AsRef<str>>(&self, lines: &[S]) {
        let Some(out) = &self.out else {
            return;
        };

        // A worker that panicked mid-write leaves at worst a torn block
        let mut out = out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let written = lines
            .iter()
            .try_for_each(|line| writeln!(out, "{}", line.as_ref()))
            .and_then(|_| out.flush());

        if let Err(e) = written {
            log::warn!("Failed to write diagnostics: {}", e);
        }
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticSink")
            .field("silent", &self.is_silent())
            .finish()
    }
}

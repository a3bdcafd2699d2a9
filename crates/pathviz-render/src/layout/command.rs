use super::{LayoutEngine, LayoutGraph};
use crate::{Error, Result};
use futures::future::BoxFuture;
use std::io::Write as _;
use std::process::{Command, Stdio};

/// Runs an external layout program (for example a small `node` wrapper around elkjs).
///
/// The request graph is written to the program's stdin as JSON; the laid-out graph is read back
/// from stdout.
#[derive(Debug, Clone)]
pub struct CommandLayoutEngine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLayoutEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn run(&self, graph: &LayoutGraph) -> Result<LayoutGraph> {
        let request = serde_json::to_vec(graph)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::LayoutEngine {
                message: format!("failed to spawn `{}`: {e}", self.program),
            })?;

        let Some(mut stdin) = child.stdin.take() else {
            return Err(Error::LayoutEngine {
                message: format!("`{}` has no stdin", self.program),
            });
        };
        // Feed stdin from a separate thread so a chatty engine cannot deadlock on a full pipe.
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(&request));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (output, written)
        });
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::LayoutEngine {
                message: format!(
                    "`{}` failed (exit={}): {}",
                    self.program,
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            });
        }
        if let Err(e) = written {
            return Err(Error::LayoutEngine {
                message: format!("failed to send layout request to `{}`: {e}", self.program),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| Error::LayoutEngine {
            message: format!("`{}` returned an unreadable layout: {e}", self.program),
        })
    }
}

impl LayoutEngine for CommandLayoutEngine {
    fn layout<'a>(&'a self, graph: LayoutGraph) -> BoxFuture<'a, Result<LayoutGraph>> {
        Box::pin(async move { self.run(&graph) })
    }
}

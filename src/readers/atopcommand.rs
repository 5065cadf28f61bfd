// src/readers/atopcommand.rs

//! Implements an [`AtopCommand`], which runs a command, typically `atop`,
//! for one raw log file and streams the lines printed to stdout.

use crate::common::FPath;
use crate::debug::printers::{de_err, de_wrn};

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Error, ErrorKind, Result};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

use ::shell_escape::escape;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Replaced with the shell-escaped raw log file path in a command template.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Default command template.
pub const COMMAND_TEMPLATE_DEFAULT: &str = "atop -f -r {path}";

/// The shell that runs a command line.
pub const SHELL: &str = "sh";

/// Runs a command template for a raw log file.
///
/// The template is a shell command line where [`PATH_PLACEHOLDER`] is
/// replaced with the file path, e.g. `atop -f -r {path}`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AtopCommand {
    template: String,
}

impl Default for AtopCommand {
    fn default() -> Self {
        AtopCommand::new(String::from(COMMAND_TEMPLATE_DEFAULT))
    }
}

impl AtopCommand {
    pub fn new(template: String) -> AtopCommand {
        defñ!("({:?})", template);
        if !template.contains(PATH_PLACEHOLDER) {
            de_wrn!("command template {:?} has no {}", template, PATH_PLACEHOLDER);
        }

        AtopCommand { template }
    }

    pub fn template(&self) -> &str {
        self.template.as_str()
    }

    /// The shell command line for `fpath`.
    pub fn command_line(
        &self,
        fpath: &FPath,
    ) -> String {
        let fpath_escaped: Cow<str> = escape(Cow::Borrowed(fpath.as_str()));

        self.template
            .replace(PATH_PLACEHOLDER, &fpath_escaped)
    }

    /// Start the command for `fpath` with stdout piped.
    fn spawn(
        &self,
        fpath: &FPath,
    ) -> Result<(Child, ChildStdout)> {
        let command_line = self.command_line(fpath);
        defo!("Command::new({:?}).arg(\"-c\").arg({:?}).spawn()", SHELL, command_line);
        let mut child: Child = match Command::new(SHELL)
            .arg("-c")
            .arg(command_line.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(val) => val,
            Err(err) => {
                return Err(Error::new(
                    err.kind(),
                    format!("failed to start {:?}; {}", command_line, err),
                ));
            }
        };
        let stdout: ChildStdout = match child.stdout.take() {
            Some(val) => val,
            None => {
                // the child cannot be used; reap it
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::new(
                    ErrorKind::BrokenPipe,
                    format!("no stdout for {:?}", command_line),
                ));
            }
        };

        Ok((child, stdout))
    }

    /// Run the command for `fpath`, calling `line_fn` for each line printed
    /// to stdout, in order. Lines are passed with the trailing newline.
    /// Invalid UTF-8 is replaced.
    ///
    /// Returns the `ExitStatus` of the command. A failed exit is not an
    /// `Err`; the lines already printed are still valid.
    pub fn run<F>(
        &self,
        fpath: &FPath,
        mut line_fn: F,
    ) -> Result<ExitStatus>
    where
        F: FnMut(&str),
    {
        defn!("({:?})", fpath);
        let (mut child, stdout) = self.spawn(fpath)?;
        let mut reader = BufReader::new(stdout);
        let mut buffer: Vec<u8> = Vec::with_capacity(1024);
        let mut count: usize = 0;
        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer) {
                Ok(0) => break,
                Ok(_) => {
                    count += 1;
                    line_fn(&String::from_utf8_lossy(&buffer));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    de_err!("read stdout of {:?}; {}", fpath, err);
                    let _ = child.kill();
                    let _ = child.wait();
                    defx!("return Err {}", err);
                    return Err(err);
                }
            }
        }
        let exit_status: ExitStatus = child.wait()?;
        if !exit_status.success() {
            de_wrn!("{:?} for {:?} exited {}", self.template, fpath, exit_status);
        }
        defx!("{} lines, return {:?}", count, exit_status);

        Ok(exit_status)
    }
}

use std::io;

use thiserror::Error;

use crate::model::Step;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not parse arguments")]
    ArgParse(#[source] clap::Error),

    #[error("`{}` failed", command_line(.command, .args))]
    ExecFailed {
        command: String,
        args: Vec<String>,
        #[source]
        cause: ExecCause,
    },

    #[error("no kubernetes {what} found")]
    EmptyResult { what: &'static str },

    #[error("prompt \"{prompt}\" was cancelled")]
    PromptCancelled {
        prompt: String,
        #[source]
        source: Option<dialoguer::Error>,
    },

    #[error("could not run action {step}")]
    Action {
        step: Step,
        #[source]
        source: Box<Error>,
    },
}

/// Why an external process did not complete successfully.
#[derive(Debug, Error)]
pub enum ExecCause {
    #[error("could not spawn process")]
    Spawn(#[source] io::Error),

    #[error("{}", describe_exit(.code))]
    Exit { code: Option<i32> },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn command_line(command: &str, args: &[String]) -> String {
    std::iter::once(command)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Error {
    /// The step an [`Error::Action`] wraps, if any.
    pub fn step(&self) -> Option<Step> {
        match self {
            Error::Action { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// The innermost pipeline error, with step wrappers removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Action { source, .. } => source.root(),
            other => other,
        }
    }

    /// The usage error behind a failed argument parse.
    pub fn usage(&self) -> Option<&clap::Error> {
        match self.root() {
            Error::ArgParse(e) => Some(e),
            _ => None,
        }
    }
}

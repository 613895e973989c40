use std::fmt;

use crate::error::{Error, Result};

/// The fixed order every run goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ParseArguments,
    ChooseContext,
    SetContext,
    ChooseNamespace,
    ChoosePod,
    ChooseContainer,
    ChooseImage,
    DebugContainer,
}

impl Step {
    pub const ALL: [Step; 8] = [
        Step::ParseArguments,
        Step::ChooseContext,
        Step::SetContext,
        Step::ChooseNamespace,
        Step::ChoosePod,
        Step::ChooseContainer,
        Step::ChooseImage,
        Step::DebugContainer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::ParseArguments => "parse-arguments",
            Step::ChooseContext => "choose-context",
            Step::SetContext => "set-context",
            Step::ChooseNamespace => "choose-namespace",
            Step::ChoosePod => "choose-pod",
            Step::ChooseContainer => "choose-container",
            Step::ChooseImage => "choose-image",
            Step::DebugContainer => "debug-container",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values chosen so far. Each field is written once, by its own step.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub context_name: String,
    pub namespace_name: String,
    pub pod_name: String,
    pub container_name: String,
    pub image_name: String,
}

/// Non-empty, ordered candidates parsed from a discovery command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionList(Vec<String>);

impl OptionList {
    /// Split command output on newlines, dropping blank lines.
    ///
    /// `what` names the resource for the [`Error::EmptyResult`] returned
    /// when nothing is left.
    pub fn parse(output: &str, what: &'static str) -> Result<Self> {
        let items: Vec<String> = output
            .trim()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if items.is_empty() {
            return Err(Error::EmptyResult { what });
        }
        Ok(Self(items))
    }

    /// The pre-selected entry: always the first one.
    pub fn default_choice(&self) -> &str {
        &self.0[0]
    }

    pub fn default_index(&self) -> usize {
        0
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// How a spawned process is wired to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Streams {
    /// stdin, stdout and stderr are the operator's terminal.
    Terminal,
    /// All three are connected to the null device.
    Detached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandInvocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kubectl<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("kubectl", args)
    }

    pub fn failed(&self, cause: crate::error::ExecCause) -> Error {
        Error::ExecFailed {
            command: self.program.clone(),
            args: self.args.clone(),
            cause,
        }
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_list_counts_non_empty_lines() {
        let list = OptionList::parse("\n dev\r\n\nprod \n\n", "contexts").unwrap();
        assert_eq!(list.as_slice(), ["dev", "prod"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn option_list_defaults_to_first_entry() {
        let list = OptionList::parse("kube-system\ndefault\n", "namespaces").unwrap();
        assert_eq!(list.default_choice(), "kube-system");
        assert_eq!(list.default_index(), 0);
    }

    #[test]
    fn blank_output_is_an_empty_result() {
        for output in ["", "   ", "\n\n", " \t\r\n "] {
            let err = OptionList::parse(output, "pods").unwrap_err();
            assert!(matches!(err, Error::EmptyResult { what: "pods" }));
        }
    }

    #[test]
    fn space_separated_names_stay_on_one_line() {
        // jsonpath output for multi-container pods is a single line.
        let list = OptionList::parse("app sidecar", "containers").unwrap();
        assert_eq!(list.as_slice(), ["app sidecar"]);
    }

    #[test]
    fn invocation_display_joins_args() {
        let cmd = CommandInvocation::kubectl(["config", "use-context", "dev"]);
        assert_eq!(cmd.program, "kubectl");
        assert_eq!(cmd.to_string(), "kubectl config use-context dev");
    }

    #[test]
    fn steps_run_in_fixed_order() {
        assert_eq!(Step::ALL.first(), Some(&Step::ParseArguments));
        assert_eq!(Step::ALL.last(), Some(&Step::DebugContainer));
        assert_eq!(Step::SetContext.to_string(), "set-context");
    }
}

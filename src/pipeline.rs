use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::executor::Commander;
use crate::model::{CommandInvocation, OptionList, SessionState, Step, Streams};
use crate::prompt::{Prompt, Prompter};
use tracing::{debug, info_span};

const CONTEXT_PROMPT: Prompt = Prompt {
    title: "Choose a Kubernetes Context",
    description: "In Kubernetes, contexts provide a mechanism to specify the namespace, user and cluster.",
};

const NAMESPACE_PROMPT: Prompt = Prompt {
    title: "Choose a Kubernetes Namespace",
    description: "In Kubernetes, namespaces provide a mechanism for isolating groups of resources within a single cluster.",
};

const POD_PROMPT: Prompt = Prompt {
    title: "Choose a Kubernetes Pod",
    description: "In Kubernetes, pods are similar to a set of containers with shared namespaces and shared filesystem volumes.",
};

const CONTAINER_PROMPT: Prompt = Prompt {
    title: "Choose a Kubernetes Container",
    description: "In Kubernetes, pods can contain a single container or multiple containers that form a single cohesive unit.",
};

const IMAGE_PROMPT: Prompt = Prompt {
    title: "Choose an Image",
    description: "The image to use for the debug container.",
};

/// Interactively runs `kubectl debug`.
///
/// Steps run in [`Step::ALL`] order and the first failure ends the run.
/// Nothing is undone on failure: a context switched by
/// [`Step::SetContext`] stays switched.
pub struct KubeDebug<C, P> {
    args: Vec<String>,
    commander: C,
    prompter: P,
}

impl<C: Commander, P: Prompter> KubeDebug<C, P> {
    pub fn new(args: Vec<String>, commander: C, prompter: P) -> Self {
        Self {
            args,
            commander,
            prompter,
        }
    }

    /// Run every step, returning the final state once the debug session ends.
    pub fn run(&mut self) -> Result<SessionState> {
        let mut state = SessionState::default();
        for step in Step::ALL {
            let _span = info_span!("step", %step).entered();
            debug!("running step");
            state = self.run_step(step, state).map_err(|source| {
                debug!(error = %source, "step failed");
                Error::Action {
                    step,
                    source: Box::new(source),
                }
            })?;
        }
        Ok(state)
    }

    fn run_step(&mut self, step: Step, state: SessionState) -> Result<SessionState> {
        match step {
            Step::ParseArguments => self.parse_args(state),
            Step::ChooseContext => self.choose_context(state),
            Step::SetContext => self.set_context(state),
            Step::ChooseNamespace => self.choose_namespace(state),
            Step::ChoosePod => self.choose_pod(state),
            Step::ChooseContainer => self.choose_container(state),
            Step::ChooseImage => self.choose_image(state),
            Step::DebugContainer => self.debug_container(state),
        }
    }

    fn parse_args(&mut self, mut state: SessionState) -> Result<SessionState> {
        let cli = Cli::parse_args(self.args.iter().cloned()).map_err(Error::ArgParse)?;
        if !cli.ignored.is_empty() {
            debug!(ignored = ?cli.ignored, "ignoring positional arguments");
        }
        state.image_name = cli.image_name;
        Ok(state)
    }

    /// Discover candidates with `cmd`, then let the operator pick one.
    /// The first candidate is the default.
    fn choose(
        &mut self,
        cmd: CommandInvocation,
        what: &'static str,
        prompt: &Prompt,
    ) -> Result<String> {
        let out = self.commander.output(&cmd)?;
        let options = OptionList::parse(&out, what)?;
        debug!(
            what,
            count = options.len(),
            default = options.default_choice(),
            "discovered options"
        );

        let chosen = self
            .prompter
            .select(prompt, options.as_slice(), options.default_index())?;
        debug!(what, %chosen, "chosen");
        Ok(chosen)
    }

    fn choose_context(&mut self, mut state: SessionState) -> Result<SessionState> {
        state.context_name = self.choose(
            CommandInvocation::kubectl(["config", "get-contexts", "--output=name"]),
            "contexts",
            &CONTEXT_PROMPT,
        )?;
        Ok(state)
    }

    fn set_context(&mut self, state: SessionState) -> Result<SessionState> {
        let cmd = CommandInvocation::kubectl([
            "config",
            "use-context",
            state.context_name.as_str(),
        ]);
        self.commander.run(Streams::Detached, &cmd)?;
        Ok(state)
    }

    fn choose_namespace(&mut self, mut state: SessionState) -> Result<SessionState> {
        state.namespace_name = self.choose(
            CommandInvocation::kubectl([
                "get",
                "ns",
                "--no-headers",
                "-o",
                "custom-columns=:metadata.name",
            ]),
            "namespaces",
            &NAMESPACE_PROMPT,
        )?;
        Ok(state)
    }

    fn choose_pod(&mut self, mut state: SessionState) -> Result<SessionState> {
        let cmd = CommandInvocation::kubectl([
            "-n",
            state.namespace_name.as_str(),
            "get",
            "pods",
            "-o",
            "custom-columns=:metadata.name",
        ]);
        state.pod_name = self.choose(cmd, "pods", &POD_PROMPT)?;
        Ok(state)
    }

    // The jsonpath query prints names space-separated on one line, so a
    // multi-container pod shows up as a single option.
    fn choose_container(&mut self, mut state: SessionState) -> Result<SessionState> {
        let cmd = CommandInvocation::kubectl([
            "-n",
            state.namespace_name.as_str(),
            "get",
            "pods",
            state.pod_name.as_str(),
            "-o",
            "jsonpath={.spec.containers[*].name}",
        ]);
        state.container_name = self.choose(cmd, "containers", &CONTAINER_PROMPT)?;
        Ok(state)
    }

    fn choose_image(&mut self, mut state: SessionState) -> Result<SessionState> {
        state.image_name = self
            .prompter
            .input(&IMAGE_PROMPT, &state.image_name, validate_image)?;
        Ok(state)
    }

    fn debug_container(&mut self, state: SessionState) -> Result<SessionState> {
        let cmd = CommandInvocation::kubectl([
            "-n".to_string(),
            state.namespace_name.clone(),
            "debug".to_string(),
            state.pod_name.clone(),
            "-it".to_string(),
            format!("--target={}", state.container_name),
            format!("--image={}", state.image_name),
        ]);
        self.commander.run(Streams::Terminal, &cmd)?;
        Ok(state)
    }
}

pub fn validate_image(image: &str) -> std::result::Result<(), String> {
    if image.is_empty() {
        return Err("the container image cannot be empty".to_string());
    }
    Ok(())
}

use clap::Parser;
use std::ffi::OsString;

pub const DEFAULT_IMAGE: &str = "busybox";

/// Interactively run "kubectl debug" against a chosen container.
#[derive(Debug, Parser)]
#[command(name = "kubedebug", version, args_override_self = true)]
pub struct Cli {
    /// image name for the debug container
    #[arg(short = 'i', long = "image_name", value_name = "NAME", default_value = DEFAULT_IMAGE)]
    pub image_name: String,

    /// Flag parsing stops at the first positional; it and everything after
    /// it are accepted and ignored.
    #[arg(hide = true, trailing_var_arg = true)]
    pub ignored: Vec<String>,
}

impl Cli {
    /// Parse a full argument vector, program name first.
    pub fn parse_args<I, S>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Cli::try_parse_from(normalize(args))
    }
}

/// Convert the raw argument vector, replacing invalid UTF-8 so a bad
/// argument surfaces as a usage error rather than a panic.
pub fn lossy_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Accept the single-dash long spelling (`-image_name`, `-image_name=x`)
/// by rewriting it to `--image_name`. Arguments after `--` are left alone.
fn normalize<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut rest = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if rest {
                return arg;
            }
            if arg == "--" {
                rest = true;
                return arg;
            }
            let is_long = arg
                .strip_prefix("-image_name")
                .is_some_and(|tail| tail.is_empty() || tail.starts_with('='));
            if is_long {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn image(args: &[&str]) -> String {
        let mut argv = vec!["kubedebug"];
        argv.extend_from_slice(args);
        Cli::parse_args(argv).unwrap().image_name
    }

    #[test]
    fn defaults_to_busybox() {
        assert_eq!(image(&[]), "busybox");
    }

    #[test]
    fn long_and_short_flags_agree() {
        let expected = "foo";
        for args in [
            &["-image_name=foo"][..],
            &["-image_name", "foo"],
            &["--image_name=foo"],
            &["-i=foo"],
            &["-i", "foo"],
        ] {
            assert_eq!(image(args), expected, "args: {args:?}");
        }
    }

    #[test]
    fn repeated_flag_keeps_last_value() {
        assert_eq!(image(&["-i", "a", "-i", "b"]), "b");
        assert_eq!(image(&["-image_name=a", "-i=b"]), "b");
        assert_eq!(image(&["--image_name", "a", "-image_name", "b"]), "b");
    }

    #[test]
    fn positional_arguments_end_flag_parsing() {
        let cli = Cli::parse_args(["kubedebug", "-i", "a", "pod", "-i", "b"]).unwrap();
        assert_eq!(cli.image_name, "a");
        assert_eq!(cli.ignored, ["pod", "-i", "b"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_argument_is_a_usage_error() {
        use std::os::unix::ffi::OsStringExt;

        let args = lossy_args([
            OsString::from("kubedebug"),
            OsString::from_vec(vec![b'-', 0xff]),
        ]);
        assert_eq!(args[1], "-\u{FFFD}");
        let err = Cli::parse_args(args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_image_is_kept_lossily() {
        use std::os::unix::ffi::OsStringExt;

        let args = lossy_args([
            OsString::from("kubedebug"),
            OsString::from("-i"),
            OsString::from_vec(vec![b'a', 0xff]),
        ]);
        assert_eq!(Cli::parse_args(args).unwrap().image_name, "a\u{FFFD}");
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = Cli::parse_args(["kubedebug", "-x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn missing_value_is_rejected() {
        assert!(Cli::parse_args(["kubedebug", "-i"]).is_err());
    }

    #[test]
    fn similar_prefixes_are_not_rewritten() {
        assert_eq!(
            normalize(["kubedebug", "-image_names", "-image_name"]),
            ["kubedebug", "-image_names", "--image_name"]
        );
    }
}

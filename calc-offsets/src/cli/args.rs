//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::domain::Pid;

#[derive(Parser, Debug)]
#[command(
    name = "calc-offsets",
    version,
    about = "Compute file offsets of managed methods in a crossgen-compiled native image, \
             for placing dynamic tracing probes (perf, bcc) on .NET Core on Linux",
    after_help = "\
EXAMPLES:
    calc-offsets 1234 sample-netcore-app.ni.exe              Read /tmp/sample-netcore-app.ni*map
    calc-offsets 1234 app.ni.exe --map-dir ./maps            Look for the symbol map elsewhere
    calc-offsets 1234 app.ni.exe --maps-file saved.maps      Use a saved copy of /proc/<pid>/maps"
)]
pub struct Args {
    /// The dotnet process id
    #[arg(value_name = "PID", value_parser = clap::value_parser!(u32).range(1..))]
    pub pid: u32,

    /// Name of the native image generated by crossgen
    #[arg(value_name = "NATIVE_IMAGE")]
    pub native_image: String,

    /// Directory searched for the <image stem>*map symbol map
    #[arg(long, value_name = "DIR", default_value = "/tmp")]
    pub map_dir: PathBuf,

    /// Read the mapping table from FILE instead of /proc/<PID>/maps
    #[arg(long, value_name = "FILE")]
    pub maps_file: Option<PathBuf>,

    /// Skip symbols outside every executable region instead of stopping
    #[arg(long)]
    pub keep_going: bool,

    /// Print one JSON object per line
    #[arg(long)]
    pub json: bool,
}

/// What to do when a symbol has no executable region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort on the first untranslatable symbol
    FailFast,
    /// Warn, skip the symbol and continue
    KeepGoing,
}

/// Output line format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `offset: <hex> : <symbol>`
    Text,
    /// `{"offset":"<hex>","symbol":"<symbol>"}`
    JsonLines,
}

/// Resolved run configuration, immutable once built
#[derive(Debug, Clone)]
pub struct Config {
    pub pid: Pid,
    pub native_image: String,
    pub map_dir: PathBuf,
    pub maps_file: Option<PathBuf>,
    pub failure_policy: FailurePolicy,
    pub output_format: OutputFormat,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            pid: Pid::from(args.pid),
            native_image: args.native_image,
            map_dir: args.map_dir,
            maps_file: args.maps_file,
            failure_policy: if args.keep_going {
                FailurePolicy::KeepGoing
            } else {
                FailurePolicy::FailFast
            },
            output_format: if args.json { OutputFormat::JsonLines } else { OutputFormat::Text },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_args() {
        let args = Args::try_parse_from(["calc-offsets", "1234", "app.ni.exe"]).unwrap();
        let config = Config::from(args);

        assert_eq!(config.pid, Pid(1234));
        assert_eq!(config.native_image, "app.ni.exe");
        assert_eq!(config.map_dir, PathBuf::from("/tmp"));
        assert!(config.maps_file.is_none());
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.output_format, OutputFormat::Text);
    }

    #[test]
    fn test_optional_flags() {
        let args = Args::try_parse_from([
            "calc-offsets",
            "42",
            "app.ni.exe",
            "--map-dir",
            "/var/maps",
            "--maps-file",
            "saved.maps",
            "--keep-going",
            "--json",
        ])
        .unwrap();
        let config = Config::from(args);

        assert_eq!(config.map_dir, PathBuf::from("/var/maps"));
        assert_eq!(config.maps_file, Some(PathBuf::from("saved.maps")));
        assert_eq!(config.failure_policy, FailurePolicy::KeepGoing);
        assert_eq!(config.output_format, OutputFormat::JsonLines);
    }

    #[test]
    fn test_non_numeric_pid_rejected() {
        assert!(Args::try_parse_from(["calc-offsets", "abc", "app.ni.exe"]).is_err());
        assert!(Args::try_parse_from(["calc-offsets", "0", "app.ni.exe"]).is_err());
    }

    #[test]
    fn test_missing_image_rejected() {
        assert!(Args::try_parse_from(["calc-offsets", "1234"]).is_err());
    }
}

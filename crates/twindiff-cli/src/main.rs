//! Command-line interface for twindiff.
//!
//! Compares two JSON (or YAML) documents and prints the result as a summary,
//! the raw delta encoding, a unified change list or the two annotated trees.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use twindiff_core::{
    render_rows, render_tree_text, render_unified, unified_changes, CanonicalizeError, Comparison,
    DiffOptions, DiffSession, Node, RenderConfig, SerializedIdentity, Side, UnifiedOptions,
    DEFAULT_MAX_CONTAINER_DEPTH,
};

const VERSION_BANNER: &str = concat!("twindiff version ", env!("CARGO_PKG_VERSION"));
const LOG_ENV: &str = "TWINDIFF_LOG";

const EXIT_SAME: i32 = 0;
const EXIT_DIFFERENT: i32 = 1;
const EXIT_ERROR: i32 = 2;

const HELP_TEXT: &str = r#"Usage: twindiff [OPTION]... FILE1 [FILE2]
Compare JSON and YAML documents structurally.

Prints the differences between FILE1 and FILE2 to STDOUT.
When FILE2 is omitted the second document is read from STDIN.
Array elements are matched by "_id", "id" or "name" before falling back
to their full value, so reordered elements are reported as moves.

Options:
  -f, --format=FORMAT    Output "unified" (default), "summary", "delta" or "tree".
      --side=SIDE        Tree panel to print: "left", "right" or "both" (default).
      --max-depth=N      Deepest container listed in unified output (default 2).
      --identity-keys=K  Comma separated fields identifying array elements.
      --by-value         Match array elements by their full value only.
      --no-moves         Report reordered elements as removal plus addition.
      --yaml             Read YAML instead of JSON.
      --color            Print ANSI color.
  -o, --output=FILE      Write to FILE instead of STDOUT.
  -v, --verbose          Log diagnostics to STDERR (see TWINDIFF_LOG).
  -h, --help             Show this help.
      --version          Show the version.

Exit status is 0 when the documents are equal, 1 when they differ and 2 on
error.

Examples:
  twindiff a.json b.json
  cat b.json | twindiff a.json
  twindiff -f tree --side left a.json b.json
  twindiff --identity-keys sku -f summary a.json b.json
"#;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    #[default]
    Unified,
    Summary,
    Delta,
    Tree,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
enum SideArg {
    Left,
    Right,
    #[default]
    Both,
}

impl SideArg {
    fn sides(self) -> &'static [Side] {
        match self {
            Self::Left => &[Side::Left],
            Self::Right => &[Side::Right],
            Self::Both => &Side::BOTH,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "twindiff",
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true,
    override_usage = "twindiff [OPTION]... FILE1 [FILE2]"
)]
struct Cli {
    #[arg(long = "help", short = 'h', action = ArgAction::SetTrue, hide = true)]
    help: bool,

    #[arg(long = "version", action = ArgAction::SetTrue, hide = true)]
    version: bool,

    /// Output format.
    #[arg(short = 'f', long = "format", value_enum, default_value = "unified")]
    format: OutputFormat,

    /// Tree panel(s) to print.
    #[arg(long = "side", value_enum, default_value = "both")]
    side: SideArg,

    /// Deepest container listed in unified output.
    #[arg(long = "max-depth", default_value_t = DEFAULT_MAX_CONTAINER_DEPTH)]
    max_depth: usize,

    /// Comma separated identity fields for array elements.
    #[arg(long = "identity-keys", conflicts_with = "by_value")]
    identity_keys: Option<String>,

    /// Match array elements by full value.
    #[arg(long = "by-value", action = ArgAction::SetTrue)]
    by_value: bool,

    /// Disable move detection.
    #[arg(long = "no-moves", action = ArgAction::SetTrue)]
    no_moves: bool,

    /// Read YAML instead of JSON.
    #[arg(long = "yaml", action = ArgAction::SetTrue)]
    yaml: bool,

    /// Render output using ANSI colors.
    #[arg(long = "color", action = ArgAction::SetTrue)]
    color: bool,

    /// Write output to FILE instead of STDOUT.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Raise the log level to debug.
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,

    /// Positional inputs (FILE1 \[FILE2]).
    #[arg()]
    inputs: Vec<OsString>,
}

fn main() {
    match try_main() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let _ = writeln!(io::stderr(), "{err:#}");
            std::process::exit(EXIT_ERROR);
        }
    }
}

fn try_main() -> Result<i32> {
    let args = canonicalize_args(std::env::args_os());
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return Ok(if err.use_stderr() { EXIT_ERROR } else { EXIT_SAME });
        }
    };

    if cli.help {
        print!("{HELP_TEXT}");
        return Ok(EXIT_SAME);
    }

    if cli.version {
        println!("{VERSION_BANNER}");
        return Ok(EXIT_SAME);
    }

    init_tracing(cli.verbose);
    run_diff(&cli)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run_diff(cli: &Cli) -> Result<i32> {
    let (first, second) = match cli.inputs.len() {
        1 => (InputSource::File(path_from(&cli.inputs[0])?), InputSource::Stdin),
        2 => (
            InputSource::File(path_from(&cli.inputs[0])?),
            InputSource::File(path_from(&cli.inputs[1])?),
        ),
        _ => bail!("{HELP_TEXT}"),
    };

    let before = parse_document(&read_input(&first)?, cli.yaml)
        .with_context(|| format!("failed to parse {first}"))?;
    let after = parse_document(&read_input(&second)?, cli.yaml)
        .with_context(|| format!("failed to parse {second}"))?;

    let mut session = DiffSession::new(build_options(cli)?);
    let comparison = session.load(before, after)?;
    tracing::debug!(key = %comparison.key(), summary = %comparison.summary(), "compared documents");

    let config = RenderConfig::color(cli.color);
    let rendered = render(cli, comparison, &config)?;

    if let Some(path) = &cli.output {
        fs::write(path, rendered.as_bytes())
            .with_context(|| format!("failed to write output to {}", path.display()))?;
    } else {
        print!("{rendered}");
        io::stdout().flush().ok();
    }

    Ok(if comparison.delta().is_some() { EXIT_DIFFERENT } else { EXIT_SAME })
}

fn render(cli: &Cli, comparison: &Comparison, config: &RenderConfig) -> Result<String> {
    let rendered = match cli.format {
        OutputFormat::Summary => format!("{}\n", comparison.summary()),
        OutputFormat::Delta => match comparison.delta() {
            Some(delta) => {
                let mut text =
                    serde_json::to_string(delta).context("failed to serialize delta")?;
                text.push('\n');
                text
            }
            None => String::new(),
        },
        OutputFormat::Unified => {
            let options = UnifiedOptions::default().with_max_container_depth(cli.max_depth);
            let lines = unified_changes(
                comparison.before(),
                comparison.after(),
                comparison.delta(),
                &options,
            );
            render_unified(&lines, config)
        }
        OutputFormat::Tree => {
            let sides = cli.side.sides();
            let mut text = String::new();
            for side in sides {
                if sides.len() > 1 {
                    text.push_str(&format!("{} {side}\n", side_banner(*side)));
                }
                let rows = render_rows(
                    comparison.delta(),
                    *side,
                    comparison.document(*side),
                    comparison.expand(),
                );
                text.push_str(&render_tree_text(&rows, config));
            }
            text
        }
    };
    Ok(rendered)
}

fn side_banner(side: Side) -> &'static str {
    match side {
        Side::Left => "---",
        Side::Right => "+++",
    }
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("STDIN"),
        }
    }
}

fn path_from(input: &OsString) -> Result<PathBuf> {
    let path = PathBuf::from(input);
    if path.as_os_str().is_empty() {
        bail!("expected file path; got empty string");
    }
    Ok(path)
}

fn read_input(source: &InputSource) -> Result<String> {
    match source {
        InputSource::File(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("failed to read STDIN")?;
            Ok(buffer)
        }
    }
}

/// Parses one document; blank input yields `None` so that the session can
/// report which panel is missing.
fn parse_document(input: &str, yaml: bool) -> Result<Option<Node>> {
    let parsed = if yaml { Node::from_yaml_str(input) } else { Node::from_json_str(input) };
    match parsed {
        Ok(node) => Ok(Some(node)),
        Err(CanonicalizeError::Empty) => Ok(None),
        Err(err) => Err(anyhow!(err)),
    }
}

fn build_options(cli: &Cli) -> Result<DiffOptions> {
    let mut options = DiffOptions::default().with_detect_moves(!cli.no_moves);

    if cli.by_value {
        options = options.with_identity(SerializedIdentity);
    }

    if let Some(raw) = &cli.identity_keys {
        let keys = parse_identity_keys(raw)?;
        options = options.with_identity_keys(keys).map_err(|err| anyhow!(err))?;
    }

    Ok(options)
}

fn parse_identity_keys(raw: &str) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    for segment in raw.split(',') {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            bail!("invalid identity key: {segment:?}");
        }
        keys.push(trimmed.to_string());
    }
    Ok(keys)
}

fn canonicalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut canonicalized = Vec::new();
    for (idx, arg) in args.into_iter().enumerate() {
        if idx == 0 {
            canonicalized.push(arg);
            continue;
        }
        match arg.to_str() {
            Some("-help") => canonicalized.push(OsString::from("--help")),
            Some("-version") => canonicalized.push(OsString::from("--version")),
            Some("-color") => canonicalized.push(OsString::from("--color")),
            Some("-yaml") => canonicalized.push(OsString::from("--yaml")),
            Some(other) if other.starts_with("-f=") => {
                canonicalized.push(OsString::from("-f"));
                canonicalized.push(OsString::from(other.trim_start_matches("-f=")));
            }
            Some(other) if other.starts_with("-o=") => {
                canonicalized.push(OsString::from("-o"));
                canonicalized.push(OsString::from(other.trim_start_matches("-o=")));
            }
            _ => canonicalized.push(arg),
        }
    }
    canonicalized
}

#[cfg(test)]
mod tests {
    use super::{canonicalize_args, parse_document, parse_identity_keys, OutputFormat, SideArg};
    use std::ffi::OsString;

    #[test]
    fn canonicalizes_single_dash_variants() {
        let input = vec![
            OsString::from("twindiff"),
            OsString::from("-help"),
            OsString::from("-version"),
            OsString::from("-color"),
            OsString::from("-yaml"),
            OsString::from("--other"),
        ];
        let canonicalized = canonicalize_args(input);
        assert_eq!(
            canonicalized,
            vec!["twindiff", "--help", "--version", "--color", "--yaml", "--other"]
        );
    }

    #[test]
    fn canonicalizes_inline_short_flags() {
        let input = vec![
            OsString::from("twindiff"),
            OsString::from("-f=tree"),
            OsString::from("-o=out.txt"),
        ];
        assert_eq!(canonicalize_args(input), vec!["twindiff", "-f", "tree", "-o", "out.txt"]);
    }

    #[test]
    fn identity_keys_are_trimmed_and_validated() {
        assert_eq!(parse_identity_keys(" sku , code").unwrap(), vec!["sku", "code"]);
        assert!(parse_identity_keys("sku,,code").is_err());
    }

    #[test]
    fn blank_document_is_missing_not_malformed() {
        assert!(parse_document("  \n", false).unwrap().is_none());
        assert!(parse_document("{", false).is_err());
        assert!(parse_document("a: 1", true).unwrap().is_some());
    }

    #[test]
    fn defaults() {
        assert_eq!(OutputFormat::default(), OutputFormat::Unified);
        assert_eq!(SideArg::default().sides().len(), 2);
    }
}

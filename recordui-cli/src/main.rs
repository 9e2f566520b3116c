//! `recordui`: compose record schemas, derive defaults, and render, summarize
//! or edit JSON records from the command line.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use recordui::io::{
    DocumentFormat, OutputDestination, OutputOptions, emit, emit_text, load_catalog,
    load_declarations, parse_document_str,
};
use recordui::presentation::{Theme, diagnostic_lines, render_form, to_plain_text};
use recordui::schema::{catalog_schema, declarations_schema};
use recordui::summary::{identity_line, summary_lines};
use recordui::{
    EngineOptions, FieldCatalog, FieldDefinition, FieldPath, FormStateStore, Mode,
    RecursiveFieldRenderer, SchemaComposer,
};

#[derive(Debug, Parser)]
#[command(
    name = "recordui",
    version,
    about = "Compose record schemas and render JSON records"
)]
struct Cli {
    #[command(flatten)]
    inputs: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Catalog spec: file path, inline payload, or "-" for stdin (builtin catalog when omitted)
    #[arg(long = "catalog", value_name = "SPEC", global = true)]
    catalog: Option<String>,

    /// Declarations spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'd', long = "declarations", value_name = "SPEC", global = true)]
    declarations: Option<String>,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append, global = true)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty", global = true)]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes", global = true)]
    force: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the resolved field definitions
    Compose {
        /// Fail when any declaration could not be resolved cleanly
        #[arg(long)]
        strict: bool,
    },
    /// Print the default record a new (add mode) session starts from
    Defaults,
    /// Render a record as text
    Render {
        /// Record spec: file path, inline payload, or "-" for stdin
        #[arg(short = 'r', long = "record", value_name = "SPEC")]
        record: Option<String>,

        #[arg(short = 'm', long = "mode", value_enum, default_value_t = ModeArg::Read)]
        mode: ModeArg,

        /// Wrap values to this many columns
        #[arg(long = "width", default_value_t = 80)]
        width: u16,

        /// Placeholder shown for empty values in read mode
        #[arg(long = "placeholder", value_name = "TEXT")]
        placeholder: Option<String>,
    },
    /// Print list-view summary lines for a record
    Summary {
        #[arg(short = 'r', long = "record", value_name = "SPEC")]
        record: String,
    },
    /// Apply PATH=VALUE assignments to a record and print the result
    Set {
        /// Record spec; the default record is used when omitted
        #[arg(short = 'r', long = "record", value_name = "SPEC")]
        record: Option<String>,

        /// Assignment such as `links.0.value="https://example.com"` or `address.city=Oslo`
        #[arg(short = 'a', long = "assign", value_name = "PATH=VALUE", required = true, action = ArgAction::Append)]
        assignments: Vec<String>,
    },
    /// Print the JSON Schema of declaration or catalog documents
    Schema {
        #[arg(value_enum, default_value_t = SchemaKind::Declarations)]
        kind: SchemaKind,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Add,
    Edit,
    Read,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Add => Mode::Add,
            ModeArg::Edit => Mode::Edit,
            ModeArg::Read => Mode::Read,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SchemaKind {
    Declarations,
    Catalog,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    let cli = Cli::parse();

    let mut diagnostics = DiagnosticCollector::default();
    let output = build_output_options(&cli.output, &mut diagnostics);
    ensure_output_paths_available(&output, cli.output.force, &mut diagnostics);
    check_stdin_usage(&cli, &mut diagnostics);
    diagnostics.into_result()?;

    match &cli.command {
        Command::Schema { kind } => {
            let schema = match kind {
                SchemaKind::Declarations => declarations_schema(),
                SchemaKind::Catalog => catalog_schema(),
            };
            emit_value(&schema, &output)
        }
        Command::Compose { strict } => {
            let catalog = load_catalog_arg(&cli.inputs)?;
            let declarations = load_declarations_arg(&cli.inputs)?;
            let composition = SchemaComposer::new(&catalog).compose_report(&declarations);
            let fields = if *strict {
                composition.into_strict().map_err(Report::new)?
            } else {
                composition.fields
            };
            let value = serde_json::to_value(&fields).wrap_err("failed to serialize definitions")?;
            emit_value(&value, &output)
        }
        Command::Defaults => {
            let fields = compose_fields(&cli.inputs)?;
            let store = FormStateStore::new(fields, Mode::Add, None);
            emit_value(store.draft(), &output)
        }
        Command::Render {
            record,
            mode,
            width,
            placeholder,
        } => {
            let fields = compose_fields(&cli.inputs)?;
            let record = record
                .as_deref()
                .map(|spec| load_value(spec, "record"))
                .transpose()?;
            let mode = Mode::from(*mode);
            let store = FormStateStore::new(fields, mode, record.as_ref());

            let mut options = EngineOptions::default();
            if let Some(placeholder) = placeholder {
                options = options.with_empty_placeholder(placeholder.clone());
            }
            let renderer = RecursiveFieldRenderer::default().with_options(options.clone());
            let form = renderer.render_store(&store);
            let theme = Theme::plain();
            let mut lines = render_form(&form, &theme, &options, *width);
            lines.extend(diagnostic_lines(&form.diagnostics, &theme));
            emit_plain(&to_plain_text(&lines), &output)
        }
        Command::Summary { record } => {
            let fields = compose_fields(&cli.inputs)?;
            let record = load_value(record, "record")?;
            let mut lines = Vec::new();
            lines.extend(identity_line(&record));
            lines.extend(summary_lines(&fields, &record, &EngineOptions::default()));
            emit_plain(&lines.join("\n"), &output)
        }
        Command::Set {
            record,
            assignments,
        } => {
            let fields = compose_fields(&cli.inputs)?;
            let record = record
                .as_deref()
                .map(|spec| load_value(spec, "record"))
                .transpose()?;
            let mode = if record.is_some() { Mode::Edit } else { Mode::Add };
            let mut store = FormStateStore::new(fields, mode, record.as_ref());
            for raw in assignments {
                let (path, value) = parse_assignment(raw, store.fields())?;
                store = store
                    .try_set_at(&path, value)
                    .map_err(|err| eyre!("cannot assign '{raw}': {err}"))?;
            }
            emit_value(store.draft(), &output)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn compose_fields(inputs: &InputArgs) -> Result<Vec<FieldDefinition>> {
    let catalog = load_catalog_arg(inputs)?;
    let declarations = load_declarations_arg(inputs)?;
    Ok(SchemaComposer::new(&catalog).compose(&declarations))
}

fn load_catalog_arg(inputs: &InputArgs) -> Result<FieldCatalog> {
    match inputs.catalog.as_deref() {
        Some(spec) => {
            let value = load_value(spec, "catalog")?;
            load_catalog(&value).map_err(|err| eyre!("{err:#}"))
        }
        None => Ok(FieldCatalog::builtin()),
    }
}

fn load_declarations_arg(inputs: &InputArgs) -> Result<Vec<recordui::AppFieldDeclaration>> {
    let spec = inputs
        .declarations
        .as_deref()
        .ok_or_else(|| eyre!("provide --declarations"))?;
    let value = load_value(spec, "declarations")?;
    load_declarations(&value).map_err(|err| eyre!("{err:#}"))
}

/// `PATH=VALUE`. VALUE is taken as JSON when it parses, otherwise it goes
/// through the capability of the addressed field (so `price=12` on a
/// currency field stores a number and `name=Ada` stores a string).
fn parse_assignment(raw: &str, fields: &[FieldDefinition]) -> Result<(FieldPath, Value)> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| eyre!("assignment '{raw}' must look like PATH=VALUE"))?;
    let path = FieldPath::parse(path.trim());
    if path.is_empty() {
        return Err(eyre!("assignment '{raw}' has an empty path"));
    }
    if let Ok(json) = serde_json::from_str::<Value>(value) {
        return Ok((path, json));
    }
    let renderer = RecursiveFieldRenderer::default();
    let capability = recordui::form::definition_at(fields, &path)
        .and_then(|definition| definition.kind.input())
        .and_then(|input| renderer.capability(input))
        .unwrap_or_else(|| renderer.fallback_capability());
    Ok((path, capability.parse(value)))
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn load_value(spec: &str, label: &str) -> Result<Value> {
    if spec == "-" {
        let contents = read_from_source(&InputSource::Stdin)?;
        return parse_contents(&contents, DocumentFormat::default(), label);
    }

    let path = PathBuf::from(spec);
    debug!(%label, path = %path.display(), "loading input");
    let format = DocumentFormat::from_path(&path).unwrap_or_default();
    match read_from_source(&InputSource::File(path.clone())) {
        Ok(contents) => parse_contents(&contents, format, label),
        Err(err) => {
            if is_not_found(&err) {
                let inline_label = format!("inline {label}");
                return parse_contents(spec, DocumentFormat::default(), &inline_label);
            }
            Err(err.wrap_err(format!("failed to load {label} from {}", path.display())))
        }
    }
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

fn is_not_found(err: &Report) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    match parse_document_str(contents, format) {
        Ok(value) => Ok(value),
        Err(primary) => {
            for candidate in DocumentFormat::available() {
                if *candidate == format {
                    continue;
                }
                if let Ok(value) = parse_document_str(contents, *candidate) {
                    return Ok(value);
                }
            }
            Err(eyre!(
                "failed to parse {label}: tried {} (first error: {primary:#})",
                format_list()
            ))
        }
    }
}

fn format_list() -> String {
    DocumentFormat::available()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn emit_value(value: &Value, options: &OutputOptions) -> Result<()> {
    emit(value, options).map_err(|err| eyre!("{err:#}"))
}

fn emit_plain(text: &str, options: &OutputOptions) -> Result<()> {
    emit_text(text, options).map_err(|err| eyre!("{err:#}"))
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

fn check_stdin_usage(cli: &Cli, diagnostics: &mut DiagnosticCollector) {
    let record = match &cli.command {
        Command::Render { record, .. } | Command::Set { record, .. } => record.as_deref(),
        Command::Summary { record } => Some(record.as_str()),
        _ => None,
    };
    let from_stdin = [
        ("catalog", cli.inputs.catalog.as_deref()),
        ("declarations", cli.inputs.declarations.as_deref()),
        ("record", record),
    ]
    .into_iter()
    .filter(|(_, spec)| *spec == Some("-"))
    .map(|(label, _)| label)
    .collect::<Vec<_>>();
    if from_stdin.len() > 1 {
        diagnostics.push_input(
            &from_stdin.join("/"),
            "only one input can be read from stdin; provide the others inline or as files",
        );
    }
}

fn build_output_options(args: &OutputArgs, diagnostics: &mut DiagnosticCollector) -> OutputOptions {
    let mut destinations = Vec::new();
    for raw in &args.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        destinations.push(OutputDestination::parse(raw));
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let format = infer_format_from_files(&destinations, diagnostics).unwrap_or_default();
    OutputOptions::new(format)
        .with_pretty(!args.no_pretty)
        .with_destinations(destinations)
}

fn infer_format_from_files(
    destinations: &[OutputDestination],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for destination in destinations {
        let OutputDestination::File(path) = destination else {
            continue;
        };
        match probe_format_from_extension(path) {
            ExtensionFormat::Known(format) => match detected {
                Some(existing) if existing != format => diagnostics.push_output(format!(
                    "output file {} uses {format} but other destinations use {existing}; align extensions",
                    path.display()
                )),
                Some(_) => {}
                None => detected = Some(format),
            },
            ExtensionFormat::UnsupportedFeature {
                format_name,
                feature_flag,
            } => diagnostics.push_output(format!(
                "output file {} requires {format_name} support, but this build was compiled without the '{feature_flag}' feature",
                path.display()
            )),
            ExtensionFormat::Unknown => {}
        }
    }
    detected
}

fn probe_format_from_extension(path: &Path) -> ExtensionFormat {
    let Some(ext) = path.extension() else {
        return ExtensionFormat::Unknown;
    };
    let normalized = ext.to_string_lossy().to_ascii_lowercase();
    match normalized.as_str() {
        "json" => ExtensionFormat::Known(DocumentFormat::Json),
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => ExtensionFormat::Known(DocumentFormat::Yaml),
        #[cfg(not(feature = "yaml"))]
        "yaml" | "yml" => ExtensionFormat::UnsupportedFeature {
            format_name: "yaml",
            feature_flag: "yaml",
        },
        #[cfg(feature = "toml")]
        "toml" => ExtensionFormat::Known(DocumentFormat::Toml),
        #[cfg(not(feature = "toml"))]
        "toml" => ExtensionFormat::UnsupportedFeature {
            format_name: "toml",
            feature_flag: "toml",
        },
        _ => ExtensionFormat::Unknown,
    }
}

#[derive(Debug)]
enum ExtensionFormat {
    Known(DocumentFormat),
    #[allow(dead_code)]
    UnsupportedFeature {
        format_name: &'static str,
        feature_flag: &'static str,
    },
    Unknown,
}

fn ensure_output_paths_available(
    options: &OutputOptions,
    force: bool,
    diagnostics: &mut DiagnosticCollector,
) {
    if force {
        return;
    }
    for destination in &options.destinations {
        if let OutputDestination::File(path) = destination
            && path.exists()
        {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}

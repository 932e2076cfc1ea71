use causeway::case::{builtin_cases, find_builtin_case};
use causeway::chat::ScriptedChallenger;
use causeway::gateway::FsStore;
use causeway::render::SvgRenderOptions;
use causeway::session::EditorSession;
use futures::executor::block_on;
use serde::Serialize;
use std::io::Read;

mod script;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(causeway::Error),
    Json(serde_json::Error),
    Script(script::ScriptError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Script(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<causeway::Error> for CliError {
    fn from(value: causeway::Error) -> Self {
        Self::Core(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<script::ScriptError> for CliError {
    fn from(value: script::ScriptError) -> Self {
        Self::Script(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Cases,
    Show,
    Apply,
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    case_id: Option<String>,
    store: Option<String>,
    script: Option<String>,
    pretty: bool,
    summary: bool,
    selected: Option<String>,
    background: Option<String>,
    no_axis: bool,
    no_guides: bool,
    out: Option<String>,
}

fn usage() -> &'static str {
    "causeway-cli\n\
\n\
USAGE:\n\
  causeway-cli cases [--pretty]\n\
  causeway-cli show <case-id> [--store <dir>] [--pretty]\n\
  causeway-cli apply <case-id> --script <path>|- [--store <dir>] [--summary] [--pretty]\n\
  causeway-cli render <case-id> [--store <dir>] [--selected <node>] [--background <css-color>] [--no-axis] [--no-guides] [--out <path>]\n\
\n\
NOTES:\n\
  - The store is a directory of one JSON document per case (default ./causeway-store).\n\
  - A case with no stored document starts as a fresh outcome-only map.\n\
  - apply replays a JSON array of tagged ops (drop/provideYear/press/move/release/\n\
    click/link/delete/retimeline/retagYear/chat); '-' reads the script from stdin.\n\
  - Node references in scripts and --selected accept a node id, 'outcome', or a\n\
    case-insensitive label substring.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut command_seen = false;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "cases" | "show" | "apply" | "render" if !command_seen => {
                command_seen = true;
                args.command = match a.as_str() {
                    "cases" => Command::Cases,
                    "show" => Command::Show,
                    "apply" => Command::Apply,
                    _ => Command::Render,
                };
            }
            "--pretty" => args.pretty = true,
            "--summary" => args.summary = true,
            "--no-axis" => args.no_axis = true,
            "--no-guides" => args.no_guides = true,
            "--store" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.store = Some(dir.clone());
            }
            "--script" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.script = Some(path.clone());
            }
            "--selected" => {
                let Some(node) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.selected = Some(node.clone());
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            case_id => {
                if !command_seen || args.case_id.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.case_id = Some(case_id.to_string());
            }
        }
    }

    if !command_seen {
        return Err(CliError::Usage(usage()));
    }
    match args.command {
        Command::Cases => {}
        Command::Apply => {
            if args.case_id.is_none() || args.script.is_none() {
                return Err(CliError::Usage(usage()));
            }
        }
        Command::Show | Command::Render => {
            if args.case_id.is_none() {
                return Err(CliError::Usage(usage()));
            }
        }
    }
    Ok(args)
}

fn read_script(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn lookup_case(id: &str) -> Result<causeway::Case, CliError> {
    find_builtin_case(id).ok_or(CliError::Core(causeway::Error::UnknownCase {
        case_id: id.to_string(),
    }))
}

fn open_session(
    args: &Args,
    case_id: &str,
) -> Result<EditorSession<FsStore, ScriptedChallenger>, CliError> {
    let case = lookup_case(case_id)?;
    let store = FsStore::new(args.store.as_deref().unwrap_or("./causeway-store"));
    Ok(block_on(EditorSession::open(
        store,
        ScriptedChallenger::new(),
        case,
    )))
}

fn resolve_selected(
    session: &EditorSession<FsStore, ScriptedChallenger>,
    needle: &str,
) -> Option<String> {
    let map = session.state().map();
    if map.node(needle).is_some() {
        return Some(needle.to_string());
    }
    let lower = needle.to_lowercase();
    map.nodes
        .values()
        .find(|n| n.text.to_lowercase().contains(&lower))
        .map(|n| n.id.clone())
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Cases => write_json(&builtin_cases(), args.pretty),
        Command::Show => {
            let Some(case_id) = args.case_id.clone() else {
                return Err(CliError::Usage(usage()));
            };
            let session = open_session(&args, &case_id)?;
            write_json(&session.state().document(), args.pretty)
        }
        Command::Apply => {
            let (Some(case_id), Some(script_path)) = (args.case_id.clone(), args.script.clone())
            else {
                return Err(CliError::Usage(usage()));
            };
            let ops: Vec<script::ScriptOp> = serde_json::from_str(&read_script(&script_path)?)?;

            let mut session = open_session(&args, &case_id)?;
            block_on(script::replay(&mut session, ops))?;

            if args.summary {
                let r = session.readiness();
                write_json(
                    &serde_json::json!({
                        "caseId": case_id,
                        "causeCount": r.cause_count,
                        "linkCount": r.link_count,
                        "causesNeeded": r.causes_needed,
                        "linksNeeded": r.links_needed,
                        "canFinalize": r.can_finalize,
                        "chatMessages": session.transcript().len(),
                    }),
                    args.pretty,
                )
            } else {
                write_json(&session.state().document(), args.pretty)
            }
        }
        Command::Render => {
            let Some(case_id) = args.case_id.clone() else {
                return Err(CliError::Usage(usage()));
            };
            let session = open_session(&args, &case_id)?;
            let selected = args
                .selected
                .as_deref()
                .and_then(|needle| resolve_selected(&session, needle));

            let mut options = SvgRenderOptions {
                include_axis: !args.no_axis,
                include_guides: !args.no_guides,
                ..Default::default()
            };
            if args.background.is_some() {
                options.background = args.background.clone();
            }

            let svg = causeway::render::render_state_svg(
                session.state(),
                selected.as_deref(),
                &options,
            );
            write_text(&svg, args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

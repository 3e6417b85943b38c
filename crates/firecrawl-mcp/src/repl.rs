//! Interactive REPL for the Firecrawl MCP server.
//!
//! Launch with `firecrawl-mcp repl` to enter interactive mode.
//! Type `/help` for available commands, Tab for completion.

use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde_json::{json, Value};

use firecrawl_core::FirecrawlClient;

use crate::tools::ToolRegistry;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/info", "Show server capabilities and tools"),
    ("/tools", "List available MCP tools"),
    ("/call", "Call a tool: /call <tool> <json args>"),
    ("/scrape", "Scrape a page: /scrape <url>"),
    ("/search", "Search the web: /search <query>"),
    ("/status", "Check a job: /status <crawl|batch|extract> <id>"),
    ("/cancel", "Cancel a crawl: /cancel <id>"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

const JOB_KINDS: &[&str] = &["crawl", "batch", "extract"];

/// REPL helper for tab completion.
#[derive(Default)]
struct FirecrawlHelper {
    tool_names: Vec<String>,
}

impl Completer for FirecrawlHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        let parts: Vec<&str> = input.splitn(2, ' ').collect();
        let cmd = parts[0];
        let args = if parts.len() > 1 { parts[1] } else { "" };

        // Only the first argument is completed.
        if args.contains(' ') {
            return Ok((pos, Vec::new()));
        }

        let candidates: Vec<&str> = match cmd {
            "/call" => self.tool_names.iter().map(String::as_str).collect(),
            "/status" => JOB_KINDS.to_vec(),
            _ => return Ok((pos, Vec::new())),
        };

        let prefix_start = input.len() - args.len();
        let matches: Vec<Pair> = candidates
            .into_iter()
            .filter(|c| c.starts_with(args))
            .map(|c| Pair {
                display: c.to_string(),
                replacement: format!("{c} "),
            })
            .collect();
        Ok((prefix_start, matches))
    }
}

impl Hinter for FirecrawlHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for FirecrawlHelper {}
impl Validator for FirecrawlHelper {}
impl Helper for FirecrawlHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Run the interactive REPL.
///
/// Without a client only the local commands work.
pub async fn run(client: Option<Arc<FirecrawlClient>>) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mfirecrawl-mcp v{}\x1b[0m \x1b[90m\u{2014} Web data for AI agents\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    match &client {
        Some(c) => eprintln!("    API: \x1b[36m{}\x1b[0m", c.api_url()),
        None => eprintln!("    \x1b[33mNo API key configured.\x1b[0m Remote commands are disabled."),
    }
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<FirecrawlHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(FirecrawlHelper {
        tool_names: ToolRegistry::list_tools().into_iter().map(|t| t.name).collect(),
    }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".firecrawl_mcp_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let prompt = " \x1b[36mfirecrawl>\x1b[0m ";

    loop {
        let read = tokio::task::block_in_place(|| rl.readline(prompt));
        match read {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(client.as_deref()),
                    "tools" => cmd_tools(),
                    "call" | "scrape" | "search" | "status" | "cancel" => {
                        match remote_call(cmd, args) {
                            Ok((tool, tool_args)) => {
                                call_tool(client.as_ref(), &tool, tool_args).await
                            }
                            Err(usage) => eprintln!("  {usage}"),
                        }
                    }
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = std::fs::create_dir_all(hist_path.parent().unwrap_or(std::path::Path::new(".")));
    let _ = rl.save_history(&hist_path);

    Ok(())
}

/// Map a remote REPL command to a tool name and its arguments.
fn remote_call(cmd: &str, args: &str) -> Result<(String, Value), String> {
    match cmd {
        "call" => {
            let mut parts = args.splitn(2, ' ');
            let tool = parts.next().filter(|t| !t.is_empty()).ok_or("Usage: /call <tool> <json args>")?;
            let raw = parts.next().unwrap_or("{}").trim();
            let value: Value =
                serde_json::from_str(raw).map_err(|e| format!("Invalid JSON arguments: {e}"))?;
            Ok((tool.to_string(), value))
        }
        "scrape" if !args.is_empty() => Ok(("scrape_url".to_string(), json!({ "url": args }))),
        "scrape" => Err("Usage: /scrape <url>".to_string()),
        "search" if !args.is_empty() => Ok(("search".to_string(), json!({ "query": args }))),
        "search" => Err("Usage: /search <query>".to_string()),
        "status" => {
            let mut parts = args.split_whitespace();
            let (kind, id) = match (parts.next(), parts.next()) {
                (Some(kind), Some(id)) => (kind, id),
                _ => return Err("Usage: /status <crawl|batch|extract> <id>".to_string()),
            };
            let tool = match kind {
                "crawl" => "check_crawl_status",
                "batch" => "check_batch_scrape_status",
                "extract" => "check_extract_status",
                other => return Err(format!("Unknown job kind '{other}'. Use crawl, batch or extract.")),
            };
            Ok((tool.to_string(), json!({ "job_id": id })))
        }
        "cancel" if !args.is_empty() => Ok(("cancel_crawl".to_string(), json!({ "job_id": args }))),
        "cancel" => Err("Usage: /cancel <id>".to_string()),
        _ => Err(format!("Unknown command '/{cmd}'")),
    }
}

async fn call_tool(client: Option<&Arc<FirecrawlClient>>, tool: &str, args: Value) {
    let Some(client) = client else {
        eprintln!("  No API key configured. Restart with --api-key or set FIRECRAWL_API_KEY.");
        return;
    };

    match ToolRegistry::call(tool, Some(args), client).await {
        Ok(result) if result.is_error() => {
            eprintln!("  \x1b[31m{}\x1b[0m", result.text_content());
        }
        Ok(result) => println!("{}", result.text_content()),
        Err(e) => eprintln!("  Error: {e}"),
    }
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: Tab completes commands, tool names after /call, and job kinds after /status.");
    eprintln!();
}

fn cmd_info(client: Option<&FirecrawlClient>) {
    let capabilities = crate::types::InitializeResult::default_result();
    let tools = ToolRegistry::list_tools();
    eprintln!();
    eprintln!(
        "  Server:   {} v{}",
        capabilities.server_info.name, capabilities.server_info.version
    );
    eprintln!("  Protocol: {}", capabilities.protocol_version);
    eprintln!("  Tools:    {}", tools.len());
    if let Some(client) = client {
        eprintln!("  API:      {}", client.api_url());
        eprintln!("  Timeout:  {}s", client.timeout().as_secs());
    }
    eprintln!();
}

fn cmd_tools() {
    let tools = ToolRegistry::list_tools();
    eprintln!();
    eprintln!("  {} MCP tools available:", tools.len());
    eprintln!();
    for tool in &tools {
        eprintln!(
            "    {:<28} {}",
            tool.name,
            tool.description.as_deref().unwrap_or("")
        );
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_kind_to_tool() {
        let (tool, args) = remote_call("status", "batch job_123").unwrap();
        assert_eq!(tool, "check_batch_scrape_status");
        assert_eq!(args["job_id"], "job_123");
    }

    #[test]
    fn test_call_parses_json() {
        let (tool, args) = remote_call("call", "search {\"query\": \"rust\", \"limit\": 2}").unwrap();
        assert_eq!(tool, "search");
        assert_eq!(args["limit"], 2);

        let (_, args) = remote_call("call", "scrape_url").unwrap();
        assert!(args.as_object().unwrap().is_empty());

        assert!(remote_call("call", "search {oops").is_err());
    }

    #[test]
    fn test_usage_errors() {
        assert!(remote_call("scrape", "").is_err());
        assert!(remote_call("status", "crawl").is_err());
        assert!(remote_call("status", "map abc").is_err());
    }
}

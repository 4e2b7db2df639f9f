use anyhow::Result;
use charidx_core::{
    count_chars, delete_range, extract_between_markers, extract_substrings, find_all_char_indices,
    find_all_substring_indices, find_nth_char, find_nth_substring, find_regex_matches,
    insert_at_index, replace_range, split_at_indices, OpError, RangeSpec,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::OnceLock;

// ============ MCP stdio framing ============

fn dbg_enabled() -> bool {
    std::env::var("CHARIDX_DEBUG").ok().as_deref() == Some("1")
}

fn charidx_home() -> PathBuf {
    if let Ok(p) = std::env::var("CHARIDX_DIR") {
        return PathBuf::from(p);
    }
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".charidx")
}

fn dbg_log(msg: &str) {
    if !dbg_enabled() {
        return;
    }
    let home = charidx_home();
    let _ = std::fs::create_dir_all(&home);
    let path = home.join("charidx-mcp.log");
    if let Ok(mut f) = std::fs::OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(f, "{}", msg);
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FramingMode {
    Lsp,
    Lines,
}

static MODE: OnceLock<FramingMode> = OnceLock::new();

fn set_mode(m: FramingMode) {
    let _ = MODE.set(m);
}
fn get_mode() -> FramingMode {
    *MODE.get().unwrap_or(&FramingMode::Lsp)
}

/// Read one logical message. Two framings are supported: LSP-style headers
/// with Content-Length and a blank line, or newline-delimited JSON. The
/// first byte of the first line decides, and replies reuse the same mode.
fn read_message(stdin: &mut impl BufRead) -> Result<Option<serde_json::Value>> {
    let mut line = String::new();
    let n = stdin.read_line(&mut line)?;
    if n == 0 {
        return Ok(None);
    }

    let trimmed = line.trim_start();
    if trimmed.starts_with('{') {
        set_mode(FramingMode::Lines);
        dbg_log(&format!("[lines] {}", line.trim_end()));
        let v: serde_json::Value = serde_json::from_str(line.trim_end())?;
        return Ok(Some(v));
    }

    // collect headers until the blank line, including the line already read
    let mut headers = String::new();
    headers.push_str(&line);
    loop {
        if line == "\n" || line == "\r\n" || line.trim().is_empty() {
            break;
        }
        line.clear();
        let n = stdin.read_line(&mut line)?;
        if n == 0 {
            break;
        }
        headers.push_str(&line);
        if line == "\n" || line == "\r\n" || line.trim().is_empty() {
            break;
        }
    }
    set_mode(FramingMode::Lsp);

    let mut content_length = 0usize;
    for hline in headers.lines() {
        let h = hline.trim();
        if h.to_lowercase().starts_with("content-length:") {
            if let Some(v) = h.split(':').nth(1) {
                content_length = v.trim().parse().unwrap_or(0);
            }
        }
    }
    if content_length == 0 {
        dbg_log("[body] skip len=0");
        return Ok(Some(serde_json::Value::Null));
    }
    let mut content = vec![0u8; content_length];
    stdin.read_exact(&mut content)?;
    let v: serde_json::Value = serde_json::from_slice(&content)?;
    Ok(Some(v))
}

fn write_message(stdout: &mut impl Write, v: &serde_json::Value) -> Result<()> {
    match get_mode() {
        FramingMode::Lines => {
            let body = serde_json::to_string(v)?;
            writeln!(stdout, "{}", body)?;
            stdout.flush()?;
        }
        FramingMode::Lsp => {
            let body = serde_json::to_vec(v)?;
            write!(
                stdout,
                "Content-Length: {}\r\nContent-Type: application/vscode-jsonrpc; charset=utf-8\r\n\r\n",
                body.len()
            )?;
            stdout.write_all(&body)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[derive(Deserialize)]
struct Request {
    id: serde_json::Value,
    method: String,
    #[serde(default)]
    params: serde_json::Value,
}

// ============ Tool registry ============

fn handle_initialize(id: serde_json::Value) -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": {
            "protocolVersion": "2024-11-05",
            "capabilities": { "tools": {} },
            "serverInfo": { "name": "charidx-mcp", "version": env!("CARGO_PKG_VERSION") }
        }
    })
}

fn tool(name: &str, description: &str, input_schema: serde_json::Value) -> serde_json::Value {
    json!({"name": name, "description": description, "inputSchema": input_schema })
}

fn tools_list() -> Vec<serde_json::Value> {
    let text = |desc: &str| json!({"type": "string", "description": desc});
    vec![
        tool(
            "find_nth_char",
            "Find index of nth occurrence of a character",
            json!({"type":"object","properties":{
                "text": text("Text to search in"),
                "char": text("Single character to find"),
                "n": {"type":"integer","description":"Which occurrence to find (1-based)","default":1}
            },"required":["text","char"]}),
        ),
        tool(
            "find_all_char_indices",
            "Find all indices where a character appears",
            json!({"type":"object","properties":{
                "text": text("Text to search in"),
                "char": text("Single character to find")
            },"required":["text","char"]}),
        ),
        tool(
            "find_nth_substring",
            "Find starting index of nth occurrence of a substring (non-overlapping)",
            json!({"type":"object","properties":{
                "text": text("Text to search in"),
                "substring": text("Substring to find"),
                "n": {"type":"integer","description":"Which occurrence to find (1-based)","default":1}
            },"required":["text","substring"]}),
        ),
        tool(
            "find_all_substring_indices",
            "Find all starting indices where a substring appears (non-overlapping)",
            json!({"type":"object","properties":{
                "text": text("Text to search in"),
                "substring": text("Substring to find")
            },"required":["text","substring"]}),
        ),
        tool(
            "split_at_indices",
            "Split text at exact index positions (auto-sorted & deduplicated)",
            json!({"type":"object","properties":{
                "text": text("Text to split"),
                "indices": {"type":"array","items":{"type":"integer"},"description":"Split positions"}
            },"required":["text","indices"]}),
        ),
        tool(
            "insert_at_index",
            "Insert text at index position without replacing",
            json!({"type":"object","properties":{
                "text": text("Original text"),
                "index": {"type":"integer","description":"Position to insert at (negative = from end)"},
                "insertion": text("Text to insert")
            },"required":["text","index","insertion"]}),
        ),
        tool(
            "delete_range",
            "Delete characters in range [start, end)",
            json!({"type":"object","properties":{
                "text": text("Original text"),
                "start": {"type":"integer","description":"Starting index (inclusive)"},
                "end": {"type":"integer","description":"Ending index (exclusive)"}
            },"required":["text","start","end"]}),
        ),
        tool(
            "replace_range",
            "Replace characters in range [start, end) with new text",
            json!({"type":"object","properties":{
                "text": text("Original text"),
                "start": {"type":"integer","description":"Starting index (inclusive)"},
                "end": {"type":"integer","description":"Ending index (exclusive)"},
                "replacement": text("Text to replace with")
            },"required":["text","start","end","replacement"]}),
        ),
        tool(
            "find_regex_matches",
            "Find all regex matches with positions",
            json!({"type":"object","properties":{
                "text": text("Text to search in"),
                "pattern": text("Regular expression pattern")
            },"required":["text","pattern"]}),
        ),
        tool(
            "extract_between_markers",
            "Extract content between markers with positions",
            json!({"type":"object","properties":{
                "text": text("Text to search in"),
                "start_marker": text("Opening marker"),
                "end_marker": text("Closing marker (empty = content runs to end of text)"),
                "occurrence": {"type":"integer","description":"Which occurrence to extract (1-based)","default":1}
            },"required":["text","start_marker","end_marker"]}),
        ),
        tool(
            "extract_substrings",
            "Extract substrings by index ranges (batch, atomic)",
            json!({"type":"object","properties":{
                "text": text("Text to extract from"),
                "ranges": {"type":"array","items":{"type":"object","properties":{
                    "start":{"type":"integer"},"end":{"type":"integer"}
                }},"description":"List of ranges with optional 'start' and 'end'. Negative indices supported"}
            },"required":["text","ranges"]}),
        ),
        tool(
            "count_chars",
            "Count character statistics (letters, digits, whitespace, other)",
            json!({"type":"object","properties":{
                "text": text("Text to analyze")
            },"required":["text"]}),
        ),
    ]
}

fn handle_tools_list(id: serde_json::Value) -> serde_json::Value {
    json!({"jsonrpc":"2.0","id":id,"result": {"tools": tools_list()}})
}

// ============ Request structs ============
// One typed struct per tool; validation happens here at the boundary, the
// engine then only sees well-formed shapes (value-level checks like "n >= 1"
// stay in the engine where the semantics live).

fn default_ordinal() -> i64 {
    1
}

#[derive(Deserialize)]
struct FindNthCharArgs {
    text: String,
    #[serde(rename = "char")]
    ch: String,
    #[serde(default = "default_ordinal")]
    n: i64,
}

#[derive(Deserialize)]
struct FindAllCharArgs {
    text: String,
    #[serde(rename = "char")]
    ch: String,
}

#[derive(Deserialize)]
struct FindNthSubstringArgs {
    text: String,
    substring: String,
    #[serde(default = "default_ordinal")]
    n: i64,
}

#[derive(Deserialize)]
struct FindAllSubstringArgs {
    text: String,
    substring: String,
}

#[derive(Deserialize)]
struct SplitArgs {
    text: String,
    indices: Vec<i64>,
}

#[derive(Deserialize)]
struct InsertArgs {
    text: String,
    index: i64,
    insertion: String,
}

#[derive(Deserialize)]
struct DeleteArgs {
    text: String,
    start: i64,
    end: i64,
}

#[derive(Deserialize)]
struct ReplaceArgs {
    text: String,
    start: i64,
    end: i64,
    replacement: String,
}

#[derive(Deserialize)]
struct RegexArgs {
    text: String,
    pattern: String,
}

#[derive(Deserialize)]
struct MarkersArgs {
    text: String,
    start_marker: String,
    end_marker: String,
    #[serde(default = "default_ordinal")]
    occurrence: i64,
}

#[derive(Deserialize)]
struct ExtractArgs {
    text: String,
    ranges: Vec<RangeSpec>,
}

#[derive(Deserialize)]
struct CountArgs {
    text: String,
}

// ============ Dispatch ============

fn parse_args<T: serde::de::DeserializeOwned>(args: serde_json::Value) -> Result<T, OpError> {
    serde_json::from_value(args).map_err(|e| OpError::InvalidArgument(e.to_string()))
}

/// Render an engine result as a tool response. Success carries the value
/// JSON-encoded in a text content block; failure sets isError and tags the
/// message with the error kind so callers can tell the failures apart.
fn respond<T: Serialize>(
    id: serde_json::Value,
    res: Result<T, OpError>,
) -> serde_json::Value {
    match res {
        Ok(v) => {
            let text = serde_json::to_string(&v).unwrap_or_default();
            json!({"jsonrpc":"2.0","id":id,"result":{"content":[{"type":"text","text":text}]}})
        }
        Err(e) => {
            dbg_log(&format!("[error] {}: {}", e.kind(), e));
            json!({"jsonrpc":"2.0","id":id,"result":{
                "content":[{"type":"text","text":format!("{}: {}", e.kind(), e)}],
                "isError": true
            }})
        }
    }
}

fn handle_call(id: serde_json::Value, params: &serde_json::Value) -> serde_json::Value {
    let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
    let args = params.get("arguments").cloned().unwrap_or(json!({}));
    dbg_log(&format!("[call] {}", name));
    match name {
        "find_nth_char" => respond(
            id,
            parse_args::<FindNthCharArgs>(args).and_then(|a| find_nth_char(&a.text, &a.ch, a.n)),
        ),
        "find_all_char_indices" => respond(
            id,
            parse_args::<FindAllCharArgs>(args).and_then(|a| find_all_char_indices(&a.text, &a.ch)),
        ),
        "find_nth_substring" => respond(
            id,
            parse_args::<FindNthSubstringArgs>(args)
                .and_then(|a| find_nth_substring(&a.text, &a.substring, a.n)),
        ),
        "find_all_substring_indices" => respond(
            id,
            parse_args::<FindAllSubstringArgs>(args)
                .and_then(|a| find_all_substring_indices(&a.text, &a.substring)),
        ),
        "split_at_indices" => respond(
            id,
            parse_args::<SplitArgs>(args).and_then(|a| split_at_indices(&a.text, &a.indices)),
        ),
        "insert_at_index" => respond(
            id,
            parse_args::<InsertArgs>(args)
                .and_then(|a| insert_at_index(&a.text, a.index, &a.insertion)),
        ),
        "delete_range" => respond(
            id,
            parse_args::<DeleteArgs>(args).and_then(|a| delete_range(&a.text, a.start, a.end)),
        ),
        "replace_range" => respond(
            id,
            parse_args::<ReplaceArgs>(args)
                .and_then(|a| replace_range(&a.text, a.start, a.end, &a.replacement)),
        ),
        "find_regex_matches" => respond(
            id,
            parse_args::<RegexArgs>(args).and_then(|a| find_regex_matches(&a.text, &a.pattern)),
        ),
        "extract_between_markers" => respond(
            id,
            parse_args::<MarkersArgs>(args).and_then(|a| {
                extract_between_markers(&a.text, &a.start_marker, &a.end_marker, a.occurrence)
            }),
        ),
        "extract_substrings" => respond(
            id,
            parse_args::<ExtractArgs>(args).and_then(|a| extract_substrings(&a.text, &a.ranges)),
        ),
        "count_chars" => respond(
            id,
            parse_args::<CountArgs>(args).map(|a| count_chars(&a.text)),
        ),
        _ => json!({"jsonrpc":"2.0","id":id,"result":{
            "content":[{"type":"text","text":format!("unknown tool: {}", name)}],
            "isError": true
        }}),
    }
}

fn main() -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdin = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout();
    loop {
        let Some(msg) = read_message(&mut stdin)? else { break };
        if let Ok(req) = serde_json::from_value::<Request>(msg.clone()) {
            dbg_log(&format!("[recv] method={} id={}", req.method, req.id));
            let resp = match req.method.as_str() {
                "initialize" => handle_initialize(req.id),
                "tools/list" => handle_tools_list(req.id),
                "tools/call" => handle_call(req.id, &req.params),
                _ => json!({"jsonrpc":"2.0","id":req.id,"error":{"code": -32601, "message":"Method not found"}}),
            };
            write_message(&mut stdout, &resp)?;
        } else {
            // notifications and other non-requests need no reply
            dbg_log("[recv] non-request/ignored");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: serde_json::Value) -> serde_json::Value {
        handle_call(json!(1), &json!({"name": name, "arguments": args}))
    }

    fn content_text(resp: &serde_json::Value) -> &str {
        resp["result"]["content"][0]["text"].as_str().unwrap()
    }

    #[test]
    fn lists_all_twelve_tools() {
        let tools = tools_list();
        assert_eq!(tools.len(), 12);
        for t in &tools {
            assert!(t["name"].is_string());
            assert!(t["description"].is_string());
            assert_eq!(t["inputSchema"]["type"], "object");
        }
    }

    #[test]
    fn call_returns_json_encoded_value() {
        let resp = call("find_nth_char", json!({"text":"hello","char":"l","n":2}));
        assert_eq!(content_text(&resp), "3");
        assert!(resp["result"].get("isError").is_none());
    }

    #[test]
    fn ordinal_defaults_to_one() {
        let resp = call("find_nth_char", json!({"text":"hello","char":"l"}));
        assert_eq!(content_text(&resp), "2");
        let resp = call(
            "extract_between_markers",
            json!({"text":"[a][b]","start_marker":"[","end_marker":"]"}),
        );
        let span: serde_json::Value = serde_json::from_str(content_text(&resp)).unwrap();
        assert_eq!(span["content"], "a");
    }

    #[test]
    fn engine_failure_sets_is_error_with_kind_tag() {
        let resp = call("find_nth_char", json!({"text":"hello","char":"z","n":1}));
        assert_eq!(resp["result"]["isError"], true);
        assert!(content_text(&resp).starts_with("NotFound:"));

        let resp = call("split_at_indices", json!({"text":"abc","indices":[7]}));
        assert!(content_text(&resp).starts_with("IndexOutOfRange:"));
    }

    #[test]
    fn malformed_arguments_are_invalid_argument() {
        let resp = call("find_nth_char", json!({"char":"z"}));
        assert_eq!(resp["result"]["isError"], true);
        assert!(content_text(&resp).starts_with("InvalidArgument:"));
    }

    #[test]
    fn structured_results_round_trip_as_json() {
        let resp = call("count_chars", json!({"text":"ab 12!"}));
        let stats: serde_json::Value = serde_json::from_str(content_text(&resp)).unwrap();
        assert_eq!(stats["total"], 6);
        assert_eq!(stats["letters"], 2);
        assert_eq!(stats["digits"], 2);
        assert_eq!(stats["whitespace"], 1);
        assert_eq!(stats["other"], 1);

        let resp = call(
            "extract_substrings",
            json!({"text":"hello","ranges":[{"start":-1}]}),
        );
        let out: serde_json::Value = serde_json::from_str(content_text(&resp)).unwrap();
        assert_eq!(out[0]["substring"], "o");
        assert_eq!(out[0]["length"], 1);
    }

    #[test]
    fn regex_match_objects_use_match_key() {
        let resp = call("find_regex_matches", json!({"text":"test123abc456","pattern":"\\d+"}));
        let out: serde_json::Value = serde_json::from_str(content_text(&resp)).unwrap();
        assert_eq!(out[0], json!({"start":4,"end":7,"match":"123"}));
        assert_eq!(out[1], json!({"start":10,"end":13,"match":"456"}));
    }

    #[test]
    fn unknown_tool_is_an_error_result() {
        let resp = call("no_such_tool", json!({}));
        assert_eq!(resp["result"]["isError"], true);
    }

    #[test]
    fn initialize_reports_server_info() {
        let resp = handle_initialize(json!(0));
        assert_eq!(resp["result"]["serverInfo"]["name"], "charidx-mcp");
        assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
    }
}

use anyhow::Result;
use charidx_core::{
    count_chars, delete_range, extract_between_markers, extract_substrings, find_all_char_indices,
    find_all_substring_indices, find_nth_char, find_nth_substring, find_regex_matches,
    insert_at_index, replace_range, split_at_indices, RangeSpec,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Read};

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\nBuilt: ",
        env!("BUILD_DATE"),
        "\nCommit: ",
        env!("GIT_HASH")
    )
}

#[derive(Parser, Debug)]
#[command(
    name = "charidx",
    about = "Character-position-aware string operations",
    version = env!("CARGO_PKG_VERSION"),
    long_version = long_version()
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find the index of the nth occurrence of a character
    FindNthChar {
        /// Text to search in ("-" reads stdin)
        text: String,
        /// Single character to find
        #[arg(value_name = "CHAR")]
        ch: String,
        /// Which occurrence (1-based)
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        n: i64,
    },
    /// List every index where a character appears
    FindAllChars {
        /// Text to search in ("-" reads stdin)
        text: String,
        /// Single character to find
        #[arg(value_name = "CHAR")]
        ch: String,
    },
    /// Find the start index of the nth occurrence of a substring
    FindNthSubstring {
        /// Text to search in ("-" reads stdin)
        text: String,
        /// Substring to find
        substring: String,
        /// Which occurrence (1-based)
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        n: i64,
    },
    /// List every start index of a substring (non-overlapping)
    FindAllSubstrings {
        /// Text to search in ("-" reads stdin)
        text: String,
        /// Substring to find
        substring: String,
    },
    /// Split text at the given cut points
    SplitAtIndices {
        /// Text to split ("-" reads stdin)
        text: String,
        /// Comma-separated cut points, negative counts from the end
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        indices: Vec<i64>,
    },
    /// Insert text before the code point at an index
    InsertAtIndex {
        /// Original text ("-" reads stdin)
        text: String,
        /// Position to insert at (negative = from end)
        #[arg(allow_negative_numbers = true)]
        index: i64,
        /// Text to insert
        insertion: String,
    },
    /// Delete the code points in [start, end)
    DeleteRange {
        /// Original text ("-" reads stdin)
        text: String,
        /// Starting index (inclusive)
        #[arg(allow_negative_numbers = true)]
        start: i64,
        /// Ending index (exclusive)
        #[arg(allow_negative_numbers = true)]
        end: i64,
    },
    /// Replace the code points in [start, end) with new text
    ReplaceRange {
        /// Original text ("-" reads stdin)
        text: String,
        /// Starting index (inclusive)
        #[arg(allow_negative_numbers = true)]
        start: i64,
        /// Ending index (exclusive)
        #[arg(allow_negative_numbers = true)]
        end: i64,
        /// Replacement text
        replacement: String,
    },
    /// List all regex matches with their spans
    RegexMatches {
        /// Text to search in ("-" reads stdin)
        text: String,
        /// Regular expression pattern
        pattern: String,
    },
    /// Extract the nth region between a start and end marker
    ExtractBetweenMarkers {
        /// Text to search in ("-" reads stdin)
        text: String,
        /// Opening marker
        start_marker: String,
        /// Closing marker (empty = content runs to end of text)
        end_marker: String,
        /// Which occurrence to extract (1-based)
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        occurrence: i64,
    },
    /// Extract several ranges in one atomic call
    ExtractSubstrings {
        /// Text to extract from ("-" reads stdin)
        text: String,
        /// Ranges as JSON, e.g. '[{"start":0,"end":5},{"start":-3}]'
        ranges: String,
    },
    /// Count letters, digits, whitespace and other code points
    CountChars {
        /// Text to analyze ("-" reads stdin)
        text: String,
    },
}

fn read_text(text: String) -> Result<String> {
    if text == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(text)
    }
}

fn print_json<T: Serialize>(v: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::FindNthChar { text, ch, n } => {
            let text = read_text(text)?;
            println!("{}", find_nth_char(&text, &ch, n)?);
        }
        Commands::FindAllChars { text, ch } => {
            let text = read_text(text)?;
            print_json(&find_all_char_indices(&text, &ch)?)?;
        }
        Commands::FindNthSubstring { text, substring, n } => {
            let text = read_text(text)?;
            println!("{}", find_nth_substring(&text, &substring, n)?);
        }
        Commands::FindAllSubstrings { text, substring } => {
            let text = read_text(text)?;
            print_json(&find_all_substring_indices(&text, &substring)?)?;
        }
        Commands::SplitAtIndices { text, indices } => {
            let text = read_text(text)?;
            print_json(&split_at_indices(&text, &indices)?)?;
        }
        Commands::InsertAtIndex { text, index, insertion } => {
            let text = read_text(text)?;
            println!("{}", insert_at_index(&text, index, &insertion)?);
        }
        Commands::DeleteRange { text, start, end } => {
            let text = read_text(text)?;
            println!("{}", delete_range(&text, start, end)?);
        }
        Commands::ReplaceRange { text, start, end, replacement } => {
            let text = read_text(text)?;
            println!("{}", replace_range(&text, start, end, &replacement)?);
        }
        Commands::RegexMatches { text, pattern } => {
            let text = read_text(text)?;
            print_json(&find_regex_matches(&text, &pattern)?)?;
        }
        Commands::ExtractBetweenMarkers { text, start_marker, end_marker, occurrence } => {
            let text = read_text(text)?;
            print_json(&extract_between_markers(&text, &start_marker, &end_marker, occurrence)?)?;
        }
        Commands::ExtractSubstrings { text, ranges } => {
            let text = read_text(text)?;
            let ranges: Vec<RangeSpec> = serde_json::from_str(&ranges)?;
            print_json(&extract_substrings(&text, &ranges)?)?;
        }
        Commands::CountChars { text } => {
            let text = read_text(text)?;
            print_json(&count_chars(&text))?;
        }
    }
    Ok(())
}

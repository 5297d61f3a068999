//! The interactive REPL.
//!
//! Lines are lexed as they are read to drive two things: the brace
//! balancer (an unclosed `{`/`[`/`(`, or a line ending in a label or
//! object-literal key, keeps prompting for more input) and the live
//! syntax highlighter. A piece is parsed and run once the nesting level
//! returns to zero.

use crate::console::ReplConsoleClient;
use crate::error::{CliError, CliResult};
use crate::run::{parse_and_run, strip_shebang, RunOptions};
use core_types::Value;
use parser::{Lexer, TokenCategory, TokenType};
use runtime::{Interpreter, JsResult};
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    // Everything typed this session, for save().
    static REPL_STATEMENTS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// REPL configuration from the CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct ReplOptions {
    /// Dump the AST of each piece
    pub dump_ast: bool,
    /// Live syntax highlighting
    pub syntax_highlight: bool,
    /// Install the test harness globals
    pub test_mode: bool,
}

/// Runs the interactive session until EOF or `exit()`.
pub fn run_repl(interpreter: &mut Interpreter, options: ReplOptions) -> CliResult<()> {
    interpreter.set_console_client(Rc::new(ReplConsoleClient));
    install_repl_globals(interpreter);
    if options.test_mode {
        enable_test_mode(interpreter);
    }

    let mut editor: Editor<ReplHelper, DefaultHistory> = Editor::new()
        .map_err(|error| CliError::ReplError(format!("Failed to initialize editor: {}", error)))?;
    editor.set_helper(Some(ReplHelper {
        syntax_highlight: options.syntax_highlight,
    }));

    let run_options = RunOptions {
        dump_ast: options.dump_ast,
        // The REPL always echoes results.
        print_last_result: true,
    };
    let mut line_level = 0;
    loop {
        match read_next_piece(&mut editor, &mut line_level) {
            PieceOutcome::Piece(piece) => {
                if piece.trim().is_empty() {
                    continue;
                }
                REPL_STATEMENTS.with(|statements| {
                    statements.borrow_mut().push(piece.clone());
                });
                parse_and_run(interpreter, &piece, run_options);
            }
            PieceOutcome::Interrupted => {
                line_level = 0;
            }
            PieceOutcome::Eof => break,
            PieceOutcome::Failed(message) => {
                return Err(CliError::ReplError(message));
            }
        }
    }
    Ok(())
}

enum PieceOutcome {
    Piece(String),
    Interrupted,
    Eof,
    Failed(String),
}

/// The continuation prompt grows four spaces per open nesting level.
fn prompt_for_level(level: i32) -> String {
    let mut prompt = String::from("> ");
    for _ in 0..level.max(0) {
        prompt.push_str("    ");
    }
    prompt
}

fn read_next_piece(
    editor: &mut Editor<ReplHelper, DefaultHistory>,
    line_level: &mut i32,
) -> PieceOutcome {
    let mut piece = String::new();
    loop {
        let prompt = prompt_for_level(*line_level);
        match editor.readline(&prompt) {
            Ok(line) => {
                let _ = editor.add_history_entry(&line);
                piece.push_str(&line);
                piece.push('\n');
                let ends_in_label = update_line_level(&line, line_level);
                if *line_level + i32::from(ends_in_label) <= 0 {
                    *line_level = (*line_level).max(0);
                    return PieceOutcome::Piece(piece);
                }
            }
            Err(ReadlineError::Interrupted) => return PieceOutcome::Interrupted,
            Err(ReadlineError::Eof) => return PieceOutcome::Eof,
            Err(error) => return PieceOutcome::Failed(error.to_string()),
        }
    }
}

#[derive(PartialEq)]
enum LabelState {
    NotInLabelOrObjectKey,
    InLabelOrObjectKeyIdentifier,
    InLabelOrObjectKey,
}

/// Adjusts the nesting level by the line's bracket tokens. Returns true
/// when the line ends inside a label or object-literal key, which
/// continues input without changing the level.
fn update_line_level(line: &str, line_level: &mut i32) -> bool {
    let mut label_state = LabelState::NotInLabelOrObjectKey;
    for token in Lexer::new(line).tokenize() {
        match token.token_type {
            TokenType::BracketOpen | TokenType::CurlyOpen | TokenType::ParenOpen => {
                label_state = LabelState::NotInLabelOrObjectKey;
                *line_level += 1;
            }
            TokenType::BracketClose | TokenType::CurlyClose | TokenType::ParenClose => {
                label_state = LabelState::NotInLabelOrObjectKey;
                *line_level -= 1;
            }
            TokenType::Identifier | TokenType::StringLiteral => {
                label_state = if label_state == LabelState::NotInLabelOrObjectKey {
                    LabelState::InLabelOrObjectKeyIdentifier
                } else {
                    LabelState::NotInLabelOrObjectKey
                };
            }
            TokenType::Colon => {
                label_state = if label_state == LabelState::InLabelOrObjectKeyIdentifier {
                    LabelState::InLabelOrObjectKey
                } else {
                    LabelState::NotInLabelOrObjectKey
                };
            }
            _ => {
                label_state = LabelState::NotInLabelOrObjectKey;
            }
        }
    }
    label_state == LabelState::InLabelOrObjectKey
}

// -- REPL globals ------------------------------------------------------

fn install_repl_globals(interpreter: &mut Interpreter) {
    let global = interpreter.global_object();
    let attr = core_types::PropertyAttributes::WRITABLE | core_types::PropertyAttributes::CONFIGURABLE;
    interpreter.define_native_function(global, "exit", exit_interpreter, 0, attr);
    interpreter.define_native_function(global, "help", repl_help, 0, attr);
    interpreter.define_native_function(global, "load", load_file, 1, attr);
    interpreter.define_native_function(global, "save", save_to_file, 1, attr);
}

/// Installs the test harness globals, used by `--test-mode` in both
/// REPL and script mode.
pub fn enable_test_mode(interpreter: &mut Interpreter) {
    let global = interpreter.global_object();
    let attr = core_types::PropertyAttributes::WRITABLE | core_types::PropertyAttributes::CONFIGURABLE;
    interpreter.define_native_function(global, "load", load_file, 1, attr);
    interpreter.define_native_function(global, "isStrictMode", is_strict_mode, 0, attr);
}

fn exit_interpreter(interpreter: &mut Interpreter) -> JsResult<Value> {
    if interpreter.argument_count() == 0 {
        std::process::exit(0);
    }
    let code = interpreter.to_number(interpreter.argument(0))?;
    std::process::exit(code as i32);
}

fn repl_help(_interpreter: &mut Interpreter) -> JsResult<Value> {
    println!("REPL commands:");
    println!("    exit(code): exit the REPL with the specified code, 0 by default");
    println!("    help(): display this menu");
    println!("    load(files): load files into the running session, e.g. load(\"a.js\", \"b.js\")");
    println!("    save(file): write this session's input history to a file");
    Ok(Value::Undefined)
}

fn load_file(interpreter: &mut Interpreter) -> JsResult<Value> {
    if interpreter.argument_count() == 0 {
        return Ok(Value::Boolean(false));
    }
    let arguments = interpreter.arguments().to_vec();
    for argument in arguments {
        let path = interpreter.to_string(argument)?;
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) => {
                eprintln!("Failed to open {}: {}", path, error);
                continue;
            }
        };
        parse_and_run(interpreter, strip_shebang(&contents), RunOptions::default());
    }
    Ok(Value::Boolean(true))
}

fn save_to_file(interpreter: &mut Interpreter) -> JsResult<Value> {
    if interpreter.argument_count() == 0 {
        return Ok(Value::Boolean(false));
    }
    let path = interpreter.to_string(interpreter.argument(0))?;
    let contents = REPL_STATEMENTS.with(|statements| statements.borrow().join(""));
    match std::fs::write(&path, contents) {
        Ok(()) => Ok(Value::Boolean(true)),
        Err(_) => Ok(Value::Boolean(false)),
    }
}

fn is_strict_mode(interpreter: &mut Interpreter) -> JsResult<Value> {
    Ok(Value::Boolean(interpreter.in_strict_mode()))
}

// -- Syntax highlighting -----------------------------------------------

/// Rustyline helper providing token-based syntax highlighting.
pub struct ReplHelper {
    /// Highlighting enabled (`--no-syntax-highlight` clears it)
    pub syntax_highlight: bool,
}

impl Completer for ReplHelper {
    type Candidate = String;
}

impl Hinter for ReplHelper {
    type Hint = String;
}

impl Validator for ReplHelper {}

impl Helper for ReplHelper {}

fn category_color(category: TokenCategory) -> Option<&'static str> {
    match category {
        TokenCategory::Invalid => Some("\x1b[31;4m"),
        TokenCategory::Number => Some("\x1b[35m"),
        TokenCategory::String => Some("\x1b[32;1m"),
        TokenCategory::Literal => Some("\x1b[33;1m"),
        TokenCategory::Keyword => Some("\x1b[34;1m"),
        TokenCategory::ControlKeyword => Some("\x1b[36;3m"),
        TokenCategory::Identifier => Some("\x1b[37;1m"),
        TokenCategory::Punctuation => None,
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !self.syntax_highlight || line.is_empty() || !line.is_ascii() {
            return Cow::Borrowed(line);
        }
        let tokens = Lexer::new(line).tokenize();
        if tokens.is_empty() {
            return Cow::Borrowed(line);
        }
        let mut output = String::with_capacity(line.len() * 2);
        let mut regions: Vec<(usize, TokenCategory)> = tokens
            .iter()
            .map(|token| (token.position.column.saturating_sub(1), token.token_type.category()))
            .collect();
        regions.sort_by_key(|(start, _)| *start);

        output.push_str(&line[..regions[0].0]);
        for (index, (start, category)) in regions.iter().enumerate() {
            let end = regions
                .get(index + 1)
                .map(|(next_start, _)| *next_start)
                .unwrap_or(line.len());
            let text = &line[*start..end];
            match category_color(*category) {
                Some(color) => {
                    output.push_str(color);
                    output.push_str(text);
                    output.push_str("\x1b[0m");
                }
                None => output.push_str(text),
            }
        }
        Cow::Owned(output)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.syntax_highlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_for_level() {
        assert_eq!(prompt_for_level(0), "> ");
        assert_eq!(prompt_for_level(2), format!("> {}", " ".repeat(8)));
        assert_eq!(prompt_for_level(-1), "> ");
    }

    #[test]
    fn test_balanced_line_completes() {
        let mut level = 0;
        assert!(!update_line_level("let x = 42;", &mut level));
        assert_eq!(level, 0);
    }

    #[test]
    fn test_open_brace_continues() {
        let mut level = 0;
        update_line_level("function f() {", &mut level);
        assert_eq!(level, 1);
        update_line_level("return 1;", &mut level);
        assert_eq!(level, 1);
        update_line_level("}", &mut level);
        assert_eq!(level, 0);
    }

    #[test]
    fn test_object_literal_over_two_lines() {
        let mut level = 0;
        assert!(!update_line_level("{", &mut level));
        assert_eq!(level, 1);
        assert!(!update_line_level("\"a\": 1 }", &mut level));
        assert_eq!(level, 0);
    }

    #[test]
    fn test_trailing_object_key_continues_input() {
        let mut level = 0;
        update_line_level("let o = {", &mut level);
        assert_eq!(level, 1);
        // A line ending in `"key":` keeps prompting without changing
        // the level.
        assert!(update_line_level("\"a\":", &mut level));
        assert_eq!(level, 1);
        assert!(!update_line_level("1 }", &mut level));
        assert_eq!(level, 0);
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let mut level = 0;
        update_line_level("let s = \"{[(\";", &mut level);
        assert_eq!(level, 0);
    }

    #[test]
    fn test_label_state_resets_after_value() {
        let mut level = 0;
        assert!(!update_line_level("let o = { a: 1,", &mut level));
        assert_eq!(level, 1);
    }

    #[test]
    fn test_highlighting_preserves_text() {
        let helper = ReplHelper {
            syntax_highlight: true,
        };
        let line = "let x = \"hi\" + 42;";
        let highlighted = helper.highlight(line, 0);
        let mut stripped = String::new();
        let mut in_escape = false;
        for character in highlighted.chars() {
            if in_escape {
                if character == 'm' {
                    in_escape = false;
                }
            } else if character == '\x1b' {
                in_escape = true;
            } else {
                stripped.push(character);
            }
        }
        assert_eq!(stripped, line);
    }

    #[test]
    fn test_highlighting_disabled_is_borrowed() {
        let helper = ReplHelper {
            syntax_highlight: false,
        };
        assert!(matches!(helper.highlight("let x = 1;", 0), Cow::Borrowed(_)));
    }
}

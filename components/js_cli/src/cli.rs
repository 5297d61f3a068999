//! Command line argument definitions.

use clap::Parser;

/// The `kestrel-js` command line.
#[derive(Debug, Parser)]
#[command(name = "kestrel-js", version, about = "Kestrel JavaScript runtime")]
pub struct Cli {
    /// Path to script file; omit to start the REPL
    pub script: Option<String>,

    /// Dump the AST before execution
    #[arg(short = 'A', long)]
    pub dump_ast: bool,

    /// Print the value of the last statement
    #[arg(short = 'l', long)]
    pub print_last_result: bool,

    /// Collect garbage on every allocation
    #[arg(short = 'g', long)]
    pub gc_on_every_allocation: bool,

    /// Disable live syntax highlighting in the REPL
    #[arg(short = 's', long)]
    pub no_syntax_highlight: bool,

    /// Install the test harness globals (load, isStrictMode)
    #[arg(short = 't', long)]
    pub test_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["kestrel-js"]);
        assert!(cli.script.is_none());
        assert!(!cli.dump_ast);
        assert!(!cli.print_last_result);
        assert!(!cli.gc_on_every_allocation);
        assert!(!cli.no_syntax_highlight);
        assert!(!cli.test_mode);
    }

    #[test]
    fn test_script_and_flags() {
        let cli = Cli::parse_from(["kestrel-js", "-A", "-l", "-g", "script.js"]);
        assert_eq!(cli.script.as_deref(), Some("script.js"));
        assert!(cli.dump_ast);
        assert!(cli.print_last_result);
        assert!(cli.gc_on_every_allocation);
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::parse_from([
            "kestrel-js",
            "--no-syntax-highlight",
            "--test-mode",
            "--dump-ast",
        ]);
        assert!(cli.no_syntax_highlight);
        assert!(cli.test_mode);
        assert!(cli.dump_ast);
    }
}

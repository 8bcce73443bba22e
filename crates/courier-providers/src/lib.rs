//! # courier-providers
//!
//! External process backends for Courier: the Claude Code CLI and a plain
//! shell runner.

pub mod claude_code;
mod output;
pub mod shell;

pub use claude_code::ClaudeCodeProvider;
pub use shell::ShellRunner;

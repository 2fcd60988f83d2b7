// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Modal dialog primitives.
//!
//! Every dialog presents one set of affordances and resolves exactly once.
//! Feature code talks to the [`Dialogs`] trait so the core stays independent
//! of the rendering technology; the terminal implementation maps a blank
//! line to cancel.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Modal dialog primitives.
pub trait Dialogs: Send + Sync {
    /// Show a message and wait for acknowledgement.
    fn alert(&self, message: &str, title: &str, icon: &str);

    /// Ask a yes/no question; `false` on cancel or close.
    fn confirm(&self, message: &str, title: &str, icon: &str) -> bool;

    /// Ask for one line of text; `None` when cancelled.
    fn prompt_text(&self, message: &str, title: &str, icon: &str) -> Option<String>;
}

/// Ask for a build name.
///
/// Re-prompts in place while the user submits an empty or whitespace-only
/// name; resolves with the trimmed name, or `None` when cancelled. Never
/// resolves with an empty string.
pub fn prompt_build_name(dialogs: &dyn Dialogs) -> Option<String> {
    loop {
        let entered = dialogs.prompt_text("Enter a name for your build:", "Save Build", "\u{1f4be}")?;
        let name = entered.trim();
        if name.is_empty() {
            dialogs.alert("Please enter a name for your build.", "Missing Name", "\u{26a0}");
            continue;
        }
        return Some(name.to_string());
    }
}

/// Dialogs over stdin/stdout.
pub struct TerminalDialogs;

impl TerminalDialogs {
    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        io::stdout().flush().ok();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None, // EOF
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(_) => None,
        }
    }
}

impl Dialogs for TerminalDialogs {
    fn alert(&self, message: &str, title: &str, icon: &str) {
        println!("\n{} {}: {}", icon, title, message);
        print!("[press Enter] ");
        self.read_line();
    }

    fn confirm(&self, message: &str, title: &str, icon: &str) -> bool {
        println!("\n{} {}: {}", icon, title, message);
        print!("[y/N] ");
        matches!(
            self.read_line().as_deref().map(str::trim),
            Some("y") | Some("Y") | Some("yes")
        )
    }

    fn prompt_text(&self, message: &str, title: &str, icon: &str) -> Option<String> {
        println!("\n{} {}: {}", icon, title, message);
        print!("(blank to cancel) > ");
        let entered = self.read_line()?;
        if entered.is_empty() {
            return None;
        }
        Some(entered)
    }
}

/// Scripted dialogs for tests: answers are popped from queues, and every
/// alert message is recorded.
#[derive(Default)]
pub struct ScriptedDialogs {
    prompts: Mutex<VecDeque<Option<String>>>,
    confirms: Mutex<VecDeque<bool>>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answers upcoming `prompt_text` calls will resolve with.
    pub fn with_prompts<I>(self, answers: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        self.prompts.lock().unwrap().extend(answers);
        self
    }

    /// Queue the answers upcoming `confirm` calls will resolve with.
    pub fn with_confirms<I>(self, answers: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        self.confirms.lock().unwrap().extend(answers);
        self
    }

    /// All alert messages shown so far.
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Dialogs for ScriptedDialogs {
    fn alert(&self, message: &str, _title: &str, _icon: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, _message: &str, _title: &str, _icon: &str) -> bool {
        self.confirms.lock().unwrap().pop_front().unwrap_or(false)
    }

    fn prompt_text(&self, _message: &str, _title: &str, _icon: &str) -> Option<String> {
        self.prompts.lock().unwrap().pop_front().unwrap_or(None)
    }
}

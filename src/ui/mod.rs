// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-interface layer: modal dialogs and plain-text panel rendering.

pub mod dialogs;
pub mod render;

pub use dialogs::{prompt_build_name, Dialogs, ScriptedDialogs, TerminalDialogs};

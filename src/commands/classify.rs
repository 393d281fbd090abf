//! `schedb classify`: the interactive classification loop.
//!
//! The loop walks the user through the vendor's questions, then shows the
//! Schedule B hierarchy under the resolved code and lets them pick a leaf:
//!
//! - while questioning: a letter toggles an option, `submit` sends it,
//!   `reset` starts over, `quit` leaves;
//! - once complete: `<n>` expands or collapses row `n`, `s <n>` selects it,
//!   `new` classifies another product, `quit` leaves.

use std::io::{BufRead, Write};

use tracing::{info, warn};

use super::lookup::write_rows;
use super::write_err;
use crate::classify::{
    AnswerSelection, ClassificationSession, Interaction, KnownCharacteristic, SessionState,
};
use crate::config::VendorConfig;
use crate::context::ServiceContext;
use crate::schedule::{format_code, Row, ScheduleTree, SelectedCode, TreeNode};

/// A command typed while a question is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionInput {
    /// Toggle the option at this zero-based position.
    Toggle(usize),
    /// Send the selected option.
    Submit,
    /// Abandon the dialogue and ask for a new description.
    Reset,
    /// Leave.
    Quit,
    /// Anything else.
    Unknown(String),
}

/// A command typed while the Schedule B tree is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeInput {
    /// Expand or collapse the row with this one-based number.
    Toggle(usize),
    /// Select the row with this one-based number.
    Select(usize),
    /// Classify another product.
    New,
    /// Leave.
    Quit,
    /// Anything else.
    Unknown(String),
}

/// Interactive loop state.
pub struct ClassifyLoop<R: BufRead, W: Write> {
    session: ClassificationSession,
    selection: AnswerSelection,
    tree: Option<ScheduleTree>,
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ClassifyLoop<R, W> {
    /// Creates a loop whose requests use `vendor`'s language and profile.
    pub fn new(vendor: &VendorConfig, reader: R, writer: W) -> Self {
        Self {
            session: ClassificationSession::new(vendor.lang.clone(), vendor.profile.clone()),
            selection: AnswerSelection::new(),
            tree: None,
            reader,
            writer,
        }
    }

    /// Runs until the user selects a code, quits, or input ends.
    ///
    /// Returns the selected code, if any. The host is notified of a
    /// selection; a failed notification is logged and does not undo it.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub async fn run(
        mut self,
        ctx: &ServiceContext,
        description: Option<&str>,
    ) -> Result<Option<SelectedCode>, String> {
        match description.map(str::trim).filter(|d| !d.is_empty()) {
            Some(description) => self.start(ctx, description).await?,
            None => {
                if !self.ask_description(ctx).await? {
                    return Ok(None);
                }
            }
        }

        loop {
            let keep_going = match self.session.state().clone() {
                SessionState::Idle => self.ask_description(ctx).await?,
                SessionState::Loading => {
                    return Err("classification request did not complete".into());
                }
                SessionState::Questioning { question, known } => {
                    self.question_turn(ctx, &question, &known).await?
                }
                SessionState::Complete { hs_code, known, .. } => {
                    match self.tree_turn(ctx, &hs_code, &known).await? {
                        TreeOutcome::Continue => true,
                        TreeOutcome::Quit => false,
                        TreeOutcome::Selected(selected) => return Ok(Some(selected)),
                    }
                }
                SessionState::Errored(err) => self.error_turn(&err.to_string())?,
            };
            if !keep_going {
                return Ok(None);
            }
        }
    }

    async fn start(&mut self, ctx: &ServiceContext, description: &str) -> Result<(), String> {
        writeln!(self.writer, "\nClassifying \"{description}\"...").map_err(write_err)?;
        self.selection.clear();
        self.tree = None;
        self.session.start(ctx.classifier.as_ref(), description).await;
        Ok(())
    }

    /// Prompts for a description and starts on it. `false` when input ended.
    async fn ask_description(&mut self, ctx: &ServiceContext) -> Result<bool, String> {
        loop {
            let Some(line) = self.prompt("\nDescribe the product (or 'quit'): ")? else {
                return Ok(false);
            };
            match line.as_str() {
                "" => {}
                "quit" | "exit" => return Ok(false),
                description => {
                    self.start(ctx, description).await?;
                    return Ok(true);
                }
            }
        }
    }

    async fn question_turn(
        &mut self,
        ctx: &ServiceContext,
        question: &Interaction,
        known: &[KnownCharacteristic],
    ) -> Result<bool, String> {
        self.write_known(known)?;
        writeln!(self.writer, "\n{}", question.prompt()).map_err(write_err)?;
        for (i, option) in question.options.iter().enumerate() {
            let mark = if self.selection.is_selected(option) { 'x' } else { ' ' };
            writeln!(self.writer, "  [{mark}] {}) {}", option_label(i), option.name)
                .map_err(write_err)?;
        }

        let Some(line) = self.prompt("letter to choose, 'submit', 'reset' or 'quit' > ")? else {
            return Ok(false);
        };
        match parse_question_input(&line) {
            QuestionInput::Quit => return Ok(false),
            QuestionInput::Reset => {
                self.session.reset();
                self.selection.clear();
            }
            QuestionInput::Submit => match self.selection.take() {
                Some(option) => {
                    self.session.submit_answer(ctx.classifier.as_ref(), &option).await;
                }
                None => writeln!(self.writer, "Choose an option first.").map_err(write_err)?,
            },
            QuestionInput::Toggle(i) => match question.options.get(i) {
                Some(option) => self.selection.toggle(option),
                None => writeln!(self.writer, "No option {}.", option_label(i)).map_err(write_err)?,
            },
            QuestionInput::Unknown(text) => {
                writeln!(self.writer, "Unrecognized input: {text}").map_err(write_err)?;
            }
        }
        Ok(true)
    }

    async fn tree_turn(
        &mut self,
        ctx: &ServiceContext,
        hs_code: &str,
        known: &[KnownCharacteristic],
    ) -> Result<TreeOutcome, String> {
        let mut tree = match self.tree.take() {
            Some(tree) => tree,
            None => {
                self.write_known(known)?;
                writeln!(self.writer, "\nHS code: {hs_code}").map_err(write_err)?;
                self.load_tree(ctx, hs_code).await?
            }
        };

        let rows = tree.visible_rows();
        if rows.is_empty() {
            writeln!(self.writer, "No Schedule B entries found.").map_err(write_err)?;
        } else {
            write_rows(&mut self.writer, &tree, &rows, true)?;
        }

        let prompt = "'<n>' to expand, 's <n>' to select, 'new' or 'quit' > ";
        let Some(line) = self.prompt(prompt)? else {
            return Ok(TreeOutcome::Quit);
        };
        let outcome = match parse_tree_input(&line) {
            TreeInput::Quit => TreeOutcome::Quit,
            TreeInput::New => {
                self.session.reset();
                return Ok(TreeOutcome::Continue);
            }
            TreeInput::Toggle(n) => {
                match row_at(&rows, n) {
                    Some(index) if tree.get(index).is_some_and(TreeNode::has_children) => {
                        tree.toggle(index);
                    }
                    Some(_) => {
                        writeln!(self.writer, "Row {n} has nothing to expand.").map_err(write_err)?;
                    }
                    None => writeln!(self.writer, "No row {n}.").map_err(write_err)?,
                }
                TreeOutcome::Continue
            }
            TreeInput::Select(n) => {
                let picked = row_at(&rows, n)
                    .and_then(|index| tree.select(index).map(|selected| (index, selected)));
                match picked {
                    Some((index, selected)) => {
                        self.announce(ctx, &selected, &tree.full_description(index)).await?;
                        TreeOutcome::Selected(selected)
                    }
                    None => {
                        writeln!(self.writer, "Row {n} is not a selectable code.")
                            .map_err(write_err)?;
                        TreeOutcome::Continue
                    }
                }
            }
            TreeInput::Unknown(text) => {
                writeln!(self.writer, "Unrecognized input: {text}").map_err(write_err)?;
                TreeOutcome::Continue
            }
        };
        self.tree = Some(tree);
        Ok(outcome)
    }

    async fn load_tree(&mut self, ctx: &ServiceContext, hs_code: &str) -> Result<ScheduleTree, String> {
        match ctx.schedule.find(hs_code).await {
            Ok(response) => Ok(ScheduleTree::from_response(response)),
            Err(err) => {
                warn!(hs_code, error = %err, "schedule b lookup failed");
                writeln!(self.writer, "Schedule B lookup failed: {err}").map_err(write_err)?;
                Ok(ScheduleTree::default())
            }
        }
    }

    /// Prints the selection with its full ancestor description, then
    /// notifies the host with the leaf's own description.
    async fn announce(
        &mut self,
        ctx: &ServiceContext,
        selected: &SelectedCode,
        full_description: &str,
    ) -> Result<(), String> {
        writeln!(self.writer, "\nSelected {}", format_code(&selected.code)).map_err(write_err)?;
        writeln!(self.writer, "  {full_description}").map_err(write_err)?;
        if let Some(uom) = selected.unit_of_measure.as_deref().filter(|u| !u.is_empty()) {
            writeln!(self.writer, "  Unit of measure: {uom}").map_err(write_err)?;
        }
        self.writer.flush().map_err(write_err)?;

        info!(code = %selected.code, "schedule b code selected");
        if let Err(err) = ctx.notifier.notify(selected).await {
            warn!(code = %selected.code, error = %err, "host notification failed");
        }
        Ok(())
    }

    fn error_turn(&mut self, message: &str) -> Result<bool, String> {
        writeln!(self.writer, "\nError: {message}").map_err(write_err)?;
        loop {
            let Some(line) = self.prompt("'reset' to start over or 'quit' > ")? else {
                return Ok(false);
            };
            match line.to_ascii_lowercase().as_str() {
                "reset" | "new" => {
                    self.session.reset();
                    self.selection.clear();
                    return Ok(true);
                }
                "quit" | "exit" => return Ok(false),
                _ => {}
            }
        }
    }

    fn write_known(&mut self, known: &[KnownCharacteristic]) -> Result<(), String> {
        if known.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "\nKnown characteristics:").map_err(write_err)?;
        for characteristic in known {
            writeln!(
                self.writer,
                "  {}: {}",
                characteristic.prompt(),
                characteristic.answered_names().join(", ")
            )
            .map_err(write_err)?;
        }
        Ok(())
    }

    /// Writes `text` and reads one trimmed line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>, String> {
        write!(self.writer, "{text}").map_err(write_err)?;
        self.writer.flush().map_err(write_err)?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(|e| format!("read error: {e}"))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

enum TreeOutcome {
    Continue,
    Quit,
    Selected(SelectedCode),
}

/// `a`..`z` for the first 26 options, then one-based numbers.
fn option_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'a' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

/// Parses input typed while a question is open.
#[must_use]
pub fn parse_question_input(input: &str) -> QuestionInput {
    let lower = input.trim().to_ascii_lowercase();
    match lower.as_str() {
        "submit" | "ok" => QuestionInput::Submit,
        "reset" => QuestionInput::Reset,
        "quit" | "exit" => QuestionInput::Quit,
        _ => {
            let bytes = lower.as_bytes();
            if let [letter @ b'a'..=b'z'] = bytes {
                return QuestionInput::Toggle(usize::from(letter - b'a'));
            }
            match lower.parse::<usize>() {
                Ok(n) if n > 26 => QuestionInput::Toggle(n - 1),
                _ => QuestionInput::Unknown(input.trim().to_string()),
            }
        }
    }
}

/// Parses input typed while the Schedule B tree is shown.
#[must_use]
pub fn parse_tree_input(input: &str) -> TreeInput {
    let lower = input.trim().to_ascii_lowercase();
    match lower.as_str() {
        "new" => TreeInput::New,
        "quit" | "exit" => TreeInput::Quit,
        _ => {
            if let Some(rest) = lower.strip_prefix('s') {
                if let Ok(n) = rest.trim().parse::<usize>() {
                    return TreeInput::Select(n);
                }
            }
            match lower.parse::<usize>() {
                Ok(n) => TreeInput::Toggle(n),
                Err(_) => TreeInput::Unknown(input.trim().to_string()),
            }
        }
    }
}

fn row_at(rows: &[Row], n: usize) -> Option<generational_arena::Index> {
    n.checked_sub(1).and_then(|i| rows.get(i)).map(|row| row.index)
}

use crate::render::{self, HELP, History, Screen};
use anyhow::Context;
use raidmeter_core::{
    SAMPLE_LEN,
    error::Error,
    prelude::*,
    store::EntryStore,
    submit::{SubmissionFlow, user_message},
    view::{DamageForm, Dashboard, NameGate},
};
use rustyline::{DefaultEditor, error::ReadlineError};
use std::{str::FromStr, sync::Arc, time::Duration};
use tokio::runtime::Runtime;

///
/// Command
/// One dashboard REPL line.
///

#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Set { round: usize, text: String },
    Fill(Vec<String>),
    Clear,
    Submit,
    Show,
    History,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err("empty command".to_string());
        };
        let rest: Vec<&str> = words.collect();

        let command = match (head, rest.as_slice()) {
            ("set", [round, text]) => {
                let round = round
                    .parse::<usize>()
                    .ok()
                    .filter(|r| (1..=SAMPLE_LEN).contains(r))
                    .ok_or_else(|| format!("round must be 1 to {SAMPLE_LEN}, got '{round}'"))?;
                Self::Set {
                    round,
                    text: (*text).to_string(),
                }
            }
            ("set", _) => return Err("usage: set <round> <value>".to_string()),
            ("fill", values) if values.len() == SAMPLE_LEN => {
                Self::Fill(values.iter().map(ToString::to_string).collect())
            }
            ("fill", values) => {
                return Err(format!(
                    "fill takes exactly {SAMPLE_LEN} values, got {}",
                    values.len()
                ));
            }
            ("clear", []) => Self::Clear,
            ("submit", []) => Self::Submit,
            ("show", []) => Self::Show,
            ("history", []) => Self::History,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            _ => return Err(format!("unknown command '{line}'; type 'help'")),
        };

        Ok(command)
    }
}

///
/// Shell
/// Name prompt followed by the dashboard loop.
///

pub(crate) struct Shell {
    runtime: Runtime,
    editor: DefaultEditor,
    store: Arc<dyn EntryStore>,
    timeout: Duration,
}

impl Shell {
    pub(crate) fn new(
        runtime: Runtime,
        store: Arc<dyn EntryStore>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let editor = DefaultEditor::new().context("opening line editor")?;

        Ok(Self {
            runtime,
            editor,
            store,
            timeout,
        })
    }

    pub(crate) fn run(mut self) -> anyhow::Result<()> {
        println!("{}", render::WELCOME);
        let Some(name) = self.ask_name()? else {
            return Ok(());
        };

        let mut flow = SubmissionFlow::new(self.store.clone(), name).with_timeout(self.timeout);
        if let Err(err) = self.runtime.block_on(flow.load_population()) {
            println!("{}", user_message(&err));
        }

        let mut form = DamageForm::new();
        println!("{}", Screen(&Dashboard::compose(&flow, &form)));

        while let Some(line) = self.read_line("raidmeter> ")? {
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(msg) => {
                    println!("{msg}");
                    continue;
                }
            };

            match command {
                Command::Set { round, text } => {
                    if let Err(err) = form.set(round - 1, &text) {
                        println!("{err}");
                    }
                }
                Command::Fill(values) => fill(&mut form, &values),
                Command::Clear => {
                    form.clear();
                    println!("form cleared");
                }
                Command::Submit => self.submit(&mut flow, &mut form),
                Command::Show => println!("{}", Screen(&Dashboard::compose(&flow, &form))),
                Command::History => self.history(&flow),
                Command::Help => println!("{HELP}"),
                Command::Quit => break,
            }
        }

        Ok(())
    }

    fn ask_name(&mut self) -> anyhow::Result<Option<PlayerName>> {
        let mut gate = NameGate::new();

        while let Some(line) = self.read_line("name> ")? {
            match gate.submit(&line) {
                Ok(name) => return Ok(Some(name)),
                Err(err) => println!("{err}"),
            }
        }

        Ok(None)
    }

    /// Next non-empty line; `None` on ctrl-c or end of input.
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(line)?;

                    return Ok(Some(line.to_string()));
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn submit(&self, flow: &mut SubmissionFlow<dyn EntryStore>, form: &mut DamageForm) {
        if !form.can_submit() {
            println!("fill in all {SAMPLE_LEN} rounds first");
            return;
        }
        let values = match form.checked_values() {
            Ok(values) => values,
            Err(err) => {
                println!("{err}");
                return;
            }
        };

        if self.runtime.block_on(flow.submit(values)).is_ok() {
            form.clear();
        }
        println!("{}", Screen(&Dashboard::compose(flow, form)));
        flow.clear_success();
    }

    fn history(&self, flow: &SubmissionFlow<dyn EntryStore>) {
        let lookup = tokio::time::timeout(
            self.timeout,
            flow.store().list_by_owner(flow.owner_id()),
        );
        let result = self
            .runtime
            .block_on(lookup)
            .unwrap_or_else(|_| Err(Error::timeout("listing entries", self.timeout)));

        match result {
            Ok(entries) => println!("{}", History(&entries)),
            Err(err) => println!("{}", user_message(&err)),
        }
    }
}

/// Set every field or none of them.
fn fill(form: &mut DamageForm, values: &[String]) {
    let mut draft = form.clone();
    for (index, text) in values.iter().enumerate() {
        if let Err(err) = draft.set(index, text) {
            println!("round {}: {err}", index + 1);
            return;
        }
    }

    *form = draft;
}

///
/// TESTS
///

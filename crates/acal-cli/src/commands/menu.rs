//! Interactive menu
//!
//! Usage: acal menu
//!
//! Reads one selection per line until `0` or end of input. Any error raised
//! by a command is printed and the loop carries on.

use super::{io_error, query, Session};
use crate::render::write_workflow_outcome;
use acal_core::{ExError, ExErrorKind, Result, SchedulePatch};
use acal_engine::{apply_schedule_edit, apply_workflow_command, WorkflowCommand};
use acal_store::{QueryId, WorkflowOutcome};
use std::io::{BufRead, Write};

const ORIGIN: &str = "menu";

enum Flow {
    Continue,
    Exit,
}

/// Line-oriented menu over any input and output
pub struct Menu<'s, R, W> {
    session: &'s mut Session,
    input: R,
    out: W,
}

impl<'s, R: BufRead, W: Write> Menu<'s, R, W> {
    pub fn new(session: &'s mut Session, input: R, out: W) -> Self {
        Self {
            session,
            input,
            out,
        }
    }

    /// Run until the user exits or input ends
    ///
    /// # Errors
    /// `Io` only when the terminal itself fails between commands.
    pub fn run(mut self) -> Result<()> {
        loop {
            self.print_menu().map_err(io_error)?;
            let choice = match read_line(&mut self.input, &mut self.out, "Select>> ")? {
                Some(choice) => choice,
                None => break,
            };

            match self.dispatch(choice.trim()) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => {
                    tracing::debug!(
                        selection = choice.trim(),
                        err_code = e.code(),
                        "Menu command failed"
                    );
                    writeln!(self.out, "Error: {}", e).map_err(io_error)?;
                }
            }
            writeln!(self.out).map_err(io_error)?;
        }

        writeln!(self.out, "Bye.").map_err(io_error)
    }

    fn dispatch(&mut self, choice: &str) -> Result<Flow> {
        match choice {
            "0" => return Ok(Flow::Exit),
            "14" => self.schedule_menu()?,
            "15" => self.group_menu()?,
            other => match other.parse::<u8>().ok().filter(|n| (1..=13).contains(n)) {
                Some(number) => match QueryId::from_number(number) {
                    Some(id) => self.catalog_query(id)?,
                    None => self.invalid(other)?,
                },
                None => self.invalid(other)?,
            },
        }
        Ok(Flow::Continue)
    }

    fn catalog_query(&mut self, id: QueryId) -> Result<()> {
        let entry = id.entry();
        writeln!(self.out, "--- [{}] {} ---", id.number(), entry.title).map_err(io_error)?;

        let mut raw = Vec::with_capacity(entry.params.len() + 1);
        for spec in entry.params {
            raw.push(self.ask(&format!("{} ({}): ", spec.name, spec.kind))?);
        }
        if let Some(optional) = entry.optional {
            let label = format!("{} (Enter for all): ", optional.param.name);
            raw.push(self.ask(&label)?);
        }

        let raw: Vec<&str> = raw.iter().map(String::as_str).collect();
        query::run(&*self.session, id, &raw, ORIGIN, &mut self.out)
    }

    fn schedule_menu(&mut self) -> Result<()> {
        writeln!(self.out, "--- Personal schedule ---").map_err(io_error)?;
        writeln!(self.out, "1. Add  2. Edit  3. Delete  4. List").map_err(io_error)?;
        let choice = self.ask("Select>> ")?;

        match choice.trim() {
            "1" => {
                let cmd = WorkflowCommand::CreateSchedule {
                    student_id: self.ask("student_id: ")?,
                    title: self.ask("title: ")?,
                    start_time: self.ask("start (YYYY-MM-DD HH:MM): ")?,
                    end_time: self.ask("end (YYYY-MM-DD HH:MM): ")?,
                };
                self.apply(cmd)
            }
            "2" => self.edit_schedule(),
            "3" => {
                let cmd = WorkflowCommand::DeleteSchedule {
                    schedule_id: self.ask("schedule_id: ")?,
                };
                self.apply(cmd)
            }
            "4" => {
                let student_id = self.ask("student_id: ")?;
                query::run(
                    &*self.session,
                    QueryId::StudentSchedules,
                    &[student_id.as_str()],
                    ORIGIN,
                    &mut self.out,
                )
            }
            other => self.invalid(other),
        }
    }

    /// Show each current value and keep it when the reply is blank
    fn edit_schedule(&mut self) -> Result<()> {
        let schedule_id = self.ask("schedule_id: ")?;
        let ctx = self.session.request(ORIGIN);
        let Self {
            session,
            input,
            out,
        } = self;

        let outcome = apply_schedule_edit(
            &mut session.handle,
            &schedule_id,
            |current| {
                writeln!(out, "Press Enter to keep the value in brackets.").map_err(io_error)?;
                let title = ask(input, out, &format!("title [{}]: ", current.title))?;
                let start = ask(input, out, &format!("start [{}]: ", current.start_time))?;
                let end = ask(input, out, &format!("end [{}]: ", current.end_time))?;
                Ok(SchedulePatch::new(title, start, end))
            },
            &ctx,
        )?;
        self.report(&outcome)
    }

    fn group_menu(&mut self) -> Result<()> {
        writeln!(self.out, "--- Study groups ---").map_err(io_error)?;
        writeln!(self.out, "1. Create  2. Change leader  3. Delete").map_err(io_error)?;
        let choice = self.ask("Select>> ")?;

        let cmd = match choice.trim() {
            "1" => WorkflowCommand::CreateGroup {
                group_name: self.ask("group name: ")?,
                purpose: self.ask("purpose: ")?,
                leader_student_id: self.ask("leader student_id: ")?,
            },
            "2" => WorkflowCommand::ChangeGroupLeader {
                group_id: self.ask("group_id: ")?,
                new_leader_student_id: self.ask("new leader student_id: ")?,
            },
            "3" => WorkflowCommand::DeleteGroup {
                group_id: self.ask("group_id: ")?,
            },
            other => return self.invalid(other),
        };
        self.apply(cmd)
    }

    fn apply(&mut self, cmd: WorkflowCommand) -> Result<()> {
        let ctx = self.session.request(ORIGIN);
        let outcome = apply_workflow_command(&mut self.session.handle, cmd, &ctx)?;
        self.report(&outcome)
    }

    fn report(&mut self, outcome: &WorkflowOutcome) -> Result<()> {
        write_workflow_outcome(&mut self.out, outcome).map_err(io_error)
    }

    fn invalid(&mut self, choice: &str) -> Result<()> {
        writeln!(self.out, "Invalid selection '{}', try again.", choice).map_err(io_error)
    }

    fn ask(&mut self, label: &str) -> Result<String> {
        ask(&mut self.input, &mut self.out, label)
    }

    fn print_menu(&mut self) -> std::io::Result<()> {
        let out = &mut self.out;
        writeln!(out, "=======================================================")?;
        writeln!(out, "  Academic calendar")?;
        writeln!(out, "=======================================================")?;
        writeln!(out, " [Queries]")?;
        for id in QueryId::ALL.iter().filter(|id| id.number() <= 13) {
            writeln!(out, "{:>2}. {}", id.number(), id.entry().title)?;
        }
        writeln!(out, "-------------------------------------------------------")?;
        writeln!(out, " [Changes]")?;
        writeln!(out, "14. Personal schedule (add/edit/delete/list)")?;
        writeln!(out, "15. Study groups (create/change leader/delete)")?;
        writeln!(out, "-------------------------------------------------------")?;
        writeln!(out, " 0. Exit")?;
        writeln!(out, "=======================================================")
    }
}

/// Prompt and read one line without its line ending; `None` at end of input
fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(out, "{}", label).map_err(io_error)?;
    out.flush().map_err(io_error)?;

    let mut line = String::new();
    if input.read_line(&mut line).map_err(io_error)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// As [`read_line`], but end of input aborts the current command
fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<String> {
    read_line(input, out, label)?.ok_or_else(|| {
        ExError::new(ExErrorKind::Io)
            .with_op("prompt")
            .with_message("input closed")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_line_strips_line_ending() {
        let mut input = Cursor::new("2025-03-01 09:00\r\nnext\n");
        let mut out = Vec::new();

        let first = read_line(&mut input, &mut out, "start: ").unwrap();
        assert_eq!(first.as_deref(), Some("2025-03-01 09:00"));
        let second = read_line(&mut input, &mut out, "again: ").unwrap();
        assert_eq!(second.as_deref(), Some("next"));
        assert_eq!(read_line(&mut input, &mut out, "end: ").unwrap(), None);
        assert_eq!(String::from_utf8(out).unwrap(), "start: again: end: ");
    }

    #[test]
    fn test_blank_line_is_not_end_of_input() {
        let mut input = Cursor::new("\n");
        let mut out = Vec::new();
        assert_eq!(read_line(&mut input, &mut out, "").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_ask_at_end_of_input_is_io_error() {
        let mut input = Cursor::new("");
        let mut out = Vec::new();
        let err = ask(&mut input, &mut out, "title: ").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
    }
}

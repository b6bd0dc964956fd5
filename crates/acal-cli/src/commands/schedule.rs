//! Personal schedule commands
//!
//! Usage: acal schedule <add|edit|delete|list> ...

use super::{io_error, query, Session};
use crate::render::write_workflow_outcome;
use acal_core::{Result, SchedulePatch};
use acal_engine::{apply_workflow_command, WorkflowCommand};
use acal_store::QueryId;
use clap::{Args, Subcommand};
use std::io::Write;

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    pub command: ScheduleCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommand {
    /// Add a schedule entry for a student
    Add(AddArgs),
    /// Replace some fields of an entry; omitted fields keep their value
    Edit(EditArgs),
    /// Delete an entry
    Delete(DeleteArgs),
    /// List a student's entries
    List(ListArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub student_id: String,
    pub title: String,
    /// Start, `YYYY-MM-DD HH:MM`
    pub start_time: String,
    /// End, `YYYY-MM-DD HH:MM`
    pub end_time: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub schedule_id: String,

    #[arg(long)]
    pub title: Option<String>,

    /// New start, `YYYY-MM-DD HH:MM`
    #[arg(long)]
    pub start: Option<String>,

    /// New end, `YYYY-MM-DD HH:MM`
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub schedule_id: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    pub student_id: String,
}

/// Execute schedule command
pub fn execute<W: Write>(args: ScheduleArgs, session: &mut Session, out: &mut W) -> Result<()> {
    let cmd = match args.command {
        ScheduleCommand::Add(add) => WorkflowCommand::CreateSchedule {
            student_id: add.student_id,
            title: add.title,
            start_time: add.start_time,
            end_time: add.end_time,
        },
        ScheduleCommand::Edit(edit) => WorkflowCommand::UpdateSchedule {
            schedule_id: edit.schedule_id,
            patch: SchedulePatch::new(
                edit.title.unwrap_or_default(),
                edit.start.unwrap_or_default(),
                edit.end.unwrap_or_default(),
            ),
        },
        ScheduleCommand::Delete(delete) => WorkflowCommand::DeleteSchedule {
            schedule_id: delete.schedule_id,
        },
        ScheduleCommand::List(list) => {
            return query::run(
                session,
                QueryId::StudentSchedules,
                &[list.student_id.as_str()],
                "cli:schedule",
                out,
            );
        }
    };

    let ctx = session.request("cli:schedule");
    let outcome = apply_workflow_command(&mut session.handle, cmd, &ctx)?;
    write_workflow_outcome(out, &outcome).map_err(io_error)
}

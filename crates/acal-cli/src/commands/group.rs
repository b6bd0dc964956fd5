//! Study group commands
//!
//! Usage: acal group <create|leader|delete> ...

use super::{io_error, Session};
use crate::render::write_workflow_outcome;
use acal_core::Result;
use acal_engine::{apply_workflow_command, WorkflowCommand};
use clap::{Args, Subcommand};
use std::io::Write;

#[derive(Debug, Args)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// Create a group led by an existing student
    Create(CreateArgs),
    /// Hand a group to a new leader
    Leader(LeaderArgs),
    /// Remove a group
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub group_name: String,
    pub purpose: String,
    pub leader_student_id: String,
}

#[derive(Debug, Args)]
pub struct LeaderArgs {
    pub group_id: String,
    pub new_leader_student_id: String,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub group_id: String,
}

/// Execute group command
pub fn execute<W: Write>(args: GroupArgs, session: &mut Session, out: &mut W) -> Result<()> {
    let cmd = match args.command {
        GroupCommand::Create(create) => WorkflowCommand::CreateGroup {
            group_name: create.group_name,
            purpose: create.purpose,
            leader_student_id: create.leader_student_id,
        },
        GroupCommand::Leader(leader) => WorkflowCommand::ChangeGroupLeader {
            group_id: leader.group_id,
            new_leader_student_id: leader.new_leader_student_id,
        },
        GroupCommand::Delete(delete) => WorkflowCommand::DeleteGroup {
            group_id: delete.group_id,
        },
    };

    let ctx = session.request("cli:group");
    let outcome = apply_workflow_command(&mut session.handle, cmd, &ctx)?;
    write_workflow_outcome(out, &outcome).map_err(io_error)
}

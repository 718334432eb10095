use super::{AlreadyReported, AppContext};
use crate::ui;
use clap::Subcommand;
use dialoguer::Confirm;
use luckydraw_core::LuckyDrawError;
use luckydraw_lottery::Roster;

#[derive(Subcommand)]
pub enum ParticipantCommands {
    /// List participants, newest first
    List,
    /// Add a participant
    Add {
        /// Display name
        name: String,
        /// Student ID (duplicates are allowed)
        student_id: String,
    },
    /// Delete a participant by id
    Delete {
        /// Participant id as shown by `participant list`
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_participant_command(
    cmd: ParticipantCommands,
    context: &AppContext,
) -> anyhow::Result<()> {
    let mut roster = Roster::new(context.backend.clone(), context.notifier.clone());

    match cmd {
        ParticipantCommands::List => {
            if !roster.refresh().await {
                return Err(AlreadyReported.into());
            }
            print_roster(&roster);
        }

        ParticipantCommands::Add { name, student_id } => match roster.add(&name, &student_id).await {
            Ok(created) => {
                println!("  Name: {}", created.name);
                println!("  Student ID: {}", created.student_id);
                println!("  ID: {}", created.id);
            }
            // the notifier has already told the user what to fix
            Err(e) if e.is_validation() => return Ok(()),
            Err(e) => {
                tracing::debug!("Add failed: {}", e);
                return Err(AlreadyReported.into());
            }
        },

        ParticipantCommands::Delete { id, force } => {
            roster.refresh().await;
            let label = roster
                .find(&id)
                .map(|p| format!("{} ({})", p.name, p.student_id))
                .unwrap_or_else(|| id.clone());

            if !force && !confirm_delete(&label)? {
                println!("Deletion cancelled.");
                return Ok(());
            }

            if let Err(e) = roster.remove(&id).await {
                tracing::debug!("Delete failed: {}", e);
                return Err(AlreadyReported.into());
            }
        }
    }

    Ok(())
}

pub fn print_roster(roster: &Roster) {
    if roster.is_empty() {
        println!("No participants yet.");
        println!("Add one with: luckydraw participant add <NAME> <STUDENT_ID>");
        return;
    }

    println!("{}", ui::participants_table(roster.participants()));
    println!("{} participant(s)", roster.len());
}

pub fn confirm_delete(label: &str) -> anyhow::Result<bool> {
    Ok(Confirm::new()
        .with_prompt(format!("Remove {} from the draw?", label))
        .default(false)
        .interact()
        .map_err(LuckyDrawError::from)?)
}

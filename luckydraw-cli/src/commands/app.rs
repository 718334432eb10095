//! Interactive mode: a small page loop over the three routes.

use super::draw::{prompt_count, run_draw, DrawOutcome};
use super::participant::{confirm_delete, print_roster};
use super::AppContext;
use crate::routes::Route;
use dialoguer::{Input, Select};
use luckydraw_core::LuckyDrawError;
use luckydraw_lottery::{DrawSession, Roster};

fn choose(prompt: &str, items: &[&str]) -> anyhow::Result<usize> {
    Ok(Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact()
        .map_err(LuckyDrawError::from)?)
}

fn ask(prompt: &str) -> anyhow::Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(LuckyDrawError::from)?)
}

fn heading(route: &Route) {
    println!();
    println!("== {} ==", route.title());
}

pub async fn run_interactive(start: Route, context: &AppContext) -> anyhow::Result<()> {
    let mut route = start;

    loop {
        tracing::debug!("Navigating to {}", route);
        heading(&route);

        let next = match &route {
            Route::Landing => landing()?,
            Route::Manage => manage(context).await?,
            Route::Lottery => lottery(context).await?,
            Route::NotFound(path) => not_found(path)?,
        };

        match next {
            Some(next) => route = next,
            None => return Ok(()),
        }
    }
}

fn landing() -> anyhow::Result<Option<Route>> {
    println!("Pick random winners from your participant list.");

    let next = match choose("Where to?", &["Manage participants", "Start the lottery", "Quit"])? {
        0 => Some(Route::Manage),
        1 => Some(Route::Lottery),
        _ => None,
    };
    Ok(next)
}

async fn manage(context: &AppContext) -> anyhow::Result<Option<Route>> {
    let mut roster = Roster::new(context.backend.clone(), context.notifier.clone());
    roster.refresh().await;

    loop {
        print_roster(&roster);

        match choose(
            "Participants",
            &["Add participant", "Delete participant", "Refresh", "Back to home"],
        )? {
            0 => {
                let name = ask("Name")?;
                let student_id = ask("Student ID")?;
                // failures are shown by the notifier; stay on the page either way
                if let Err(e) = roster.add(&name, &student_id).await {
                    tracing::debug!("Add failed: {}", e);
                }
            }
            1 => {
                if roster.is_empty() {
                    println!("Nobody to delete.");
                    continue;
                }

                let labels: Vec<String> = roster
                    .participants()
                    .iter()
                    .map(|p| format!("{} ({})", p.name, p.student_id))
                    .collect();
                let index = Select::new()
                    .with_prompt("Delete whom?")
                    .items(&labels)
                    .default(0)
                    .interact_opt()
                    .map_err(LuckyDrawError::from)?;

                if let Some(index) = index {
                    let id = roster.participants()[index].id.clone();
                    if confirm_delete(&labels[index])? {
                        if let Err(e) = roster.remove(&id).await {
                            tracing::debug!("Delete failed: {}", e);
                        }
                    }
                }
            }
            2 => {
                roster.refresh().await;
            }
            _ => return Ok(Some(Route::Landing)),
        }
    }
}

async fn lottery(context: &AppContext) -> anyhow::Result<Option<Route>> {
    let mut session = DrawSession::new(context.backend.clone(), context.notifier.clone());

    loop {
        session.refresh().await;
        println!("{} participant(s) in the pool", session.participants().len());

        if session.participants().is_empty() {
            println!("Add participants on the manage page first.");
            return Ok(match choose("Next", &["Manage participants", "Back to home"])? {
                0 => Some(Route::Manage),
                _ => Some(Route::Landing),
            });
        }

        let count = prompt_count(session.participants().len())?;
        session.set_count(count);

        let saving = match run_draw(&mut session, &context.animation, true).await? {
            DrawOutcome::Revealed(saving) => Some(saving),
            DrawOutcome::Refused | DrawOutcome::Cancelled => None,
        };
        let items: &[&str] = if saving.is_some() {
            &["Draw again", "Back to home"]
        } else {
            &["Try again", "Back to home"]
        };

        let next = choose("Next", items)?;
        if let Some(saving) = saving {
            saving.finish().await;
        }
        match next {
            0 => session.reset(),
            _ => return Ok(Some(Route::Landing)),
        }
    }
}

fn not_found(path: &str) -> anyhow::Result<Option<Route>> {
    println!("404: nothing lives at '{}'.", path);

    let next = match choose("Next", &["Back to home", "Quit"])? {
        0 => Some(Route::Landing),
        _ => None,
    };
    Ok(next)
}

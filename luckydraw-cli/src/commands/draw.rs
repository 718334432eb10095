use super::{AlreadyReported, AppContext};
use crate::ui;
use dialoguer::Input;
use luckydraw_core::LuckyDrawError;
use luckydraw_lottery::{
    burst, AnimationConfig, AnimationPresenter, Draw, DrawSession, HistoryWrite, WinnerSet,
    PARTICLE_COUNT,
};
use tokio::sync::{mpsc, oneshot};

pub enum DrawOutcome {
    /// Winners are on screen; their history row may still be on its way.
    Revealed(HistoryWrite),
    /// Bad count or empty pool; the user has been told why.
    Refused,
    Cancelled,
}

pub async fn handle_draw_command(
    count: Option<usize>,
    no_animation: bool,
    context: &AppContext,
) -> anyhow::Result<()> {
    let mut session = DrawSession::new(context.backend.clone(), context.notifier.clone());
    if !session.refresh().await {
        return Err(AlreadyReported.into());
    }

    println!("{} participant(s) in the pool", session.participants().len());

    let count = match count {
        Some(count) => count,
        None => prompt_count(session.participants().len())?,
    };
    session.set_count(count);

    if let DrawOutcome::Revealed(saving) =
        run_draw(&mut session, &context.animation, !no_animation).await?
    {
        saving.finish().await;
    }
    Ok(())
}

pub fn prompt_count(available: usize) -> anyhow::Result<usize> {
    Ok(Input::<usize>::new()
        .with_prompt(format!("How many winners? (1-{})", available.max(1)))
        .default(1)
        .interact_text()
        .map_err(LuckyDrawError::from)?)
}

/// Start a draw on `session`, optionally play the reveal, then show the
/// winners. Saving them to the history is left running in the returned outcome.
pub async fn run_draw(
    session: &mut DrawSession,
    animation: &AnimationConfig,
    animate: bool,
) -> anyhow::Result<DrawOutcome> {
    let draw = match session.start_draw() {
        Ok(draw) => draw,
        Err(e) if e.is_validation() => return Ok(DrawOutcome::Refused),
        Err(e) => return Err(e.into()),
    };

    if animate && !play_reveal(&draw, animation).await? {
        session.cancel();
        return Ok(DrawOutcome::Cancelled);
    }

    let saving = session.reveal()?;
    if let Some(winners) = session.winners() {
        show_winners(winners);
    }

    Ok(DrawOutcome::Revealed(saving))
}

/// Play the tile animation to the end. `false` if Ctrl-C cut it short.
async fn play_reveal(draw: &Draw, config: &AnimationConfig) -> anyhow::Result<bool> {
    let mut presenter = AnimationPresenter::new(config.clone())?;
    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
    let (done_tx, mut done_rx) = oneshot::channel();

    presenter.start(
        &draw.snapshot,
        draw.winners.clone(),
        Some(frame_tx),
        move |winners| {
            let _ = done_tx.send(winners);
        },
    )?;

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            Some(frame) = frame_rx.recv() => ui::render_frame(&frame),
            revealed = &mut done_rx => {
                ui::clear_screen();
                return Ok(revealed.is_ok());
            }
            _ = &mut interrupt => {
                presenter.stop();
                ui::clear_screen();
                return Ok(false);
            }
        }
    }
}

pub fn show_winners(winners: &WinnerSet) {
    let particles = burst(&mut rand::thread_rng(), PARTICLE_COUNT);

    println!("{}", ui::particle_line(&particles));
    println!("Congratulations!");
    println!("{}", ui::winners_table(winners));
}

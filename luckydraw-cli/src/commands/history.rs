use super::AppContext;
use crate::ui;

pub async fn handle_history_command(limit: usize, context: &AppContext) -> anyhow::Result<()> {
    let entries = context.backend.list_history(limit).await?;

    if entries.is_empty() {
        println!("No winners recorded yet.");
        println!("Run a draw with: luckydraw draw");
        return Ok(());
    }

    println!("{}", ui::history_table(&entries));
    Ok(())
}

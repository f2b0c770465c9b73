use rc_domain::config::Config;

use crate::bootstrap::build_ledger;

/// One-shot header resync against the configured ledger store.
pub async fn resync_headers(config: &Config) -> anyhow::Result<()> {
    let ledger = build_ledger(config)?;
    let rewritten = ledger
        .sync_headers()
        .await
        .map_err(|e| anyhow::anyhow!("resyncing headers of {}: {e}", config.ledger.sheet_title))?;

    if rewritten {
        println!("Headers of '{}' rewritten", config.ledger.sheet_title);
    } else {
        println!("Headers of '{}' already up to date", config.ledger.sheet_title);
    }
    Ok(())
}

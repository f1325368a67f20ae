//! Reference-data seeding for local backends.

use rv_core::catalog;
use rv_core::error::Result;
use rv_core::query::{Query, Table};
use rv_core::traits::Gateway;

use crate::Logged;

/// Inserts the historical poets when the directory is empty. Returns the
/// number of rows written.
pub async fn ensure_poets_seeded(gateway: &dyn Gateway) -> Result<usize> {
    let existing = gateway
        .select(&Query::table(Table::AncientPoets).columns(&["id"]).limit(1))
        .await
        .logged("check poets")?;
    if !existing.is_empty() {
        tracing::debug!("poet directory already populated");
        return Ok(0);
    }

    let poets = catalog::ancient_poets();
    let count = poets.len();
    for poet in poets {
        let record = serde_json::to_value(&poet).map_err(rv_core::error::GatewayError::from)?;
        gateway
            .insert(Table::AncientPoets, record)
            .await
            .logged("seed poet")?;
    }
    tracing::info!(count, "seeded poet directory");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit;

    #[tokio::test]
    async fn seeds_once() {
        let gateway = testkit::memory();
        assert_eq!(ensure_poets_seeded(gateway.as_ref()).await.unwrap(), 6);
        assert_eq!(ensure_poets_seeded(gateway.as_ref()).await.unwrap(), 0);
        assert_eq!(gateway.row_count(Table::AncientPoets), 6);
    }
}

//! Merge CSV files

use crate::args::MergeArgs;
use crate::commands::upload_file;
use crate::console::CliConsole;
use tabletalk_core::{
    ColumnMapping, MergeRequest, MergeStrategy, Registry, Table, TabletalkConfig, TabletalkError,
    TabletalkResult, WebhookNotifier, WebhookOutcome, export_csv, suggested_merge_name,
};

/// Upload every file, merge, write the CSV and notify the webhook
pub async fn merge(args: MergeArgs, config: &TabletalkConfig, verbose: bool) -> TabletalkResult<()> {
    let console = CliConsole::new(verbose);

    let mut registry = Registry::new();
    let mut table_ids = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let id = upload_file(&mut registry, file).await?;
        console.info(&format!("Loaded {} as {}", file.display(), id));
        table_ids.push(id);
    }
    if table_ids.len() < 2 {
        return Err(TabletalkError::InsufficientTables {
            found: table_ids.len(),
        });
    }

    let request = build_request(&registry, &table_ids, &args)?;
    let merged_id = registry.merge(&request)?;
    let merged = registry
        .table(&merged_id)
        .ok_or_else(|| TabletalkError::table_not_found(merged_id.clone()))?;

    console.success(&format!(
        "Merged {} tables into '{}' ({} rows, {} columns)",
        table_ids.len(),
        merged.name,
        merged.row_count,
        merged.columns.len()
    ));

    let csv = export_csv(merged);
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, csv).await.map_err(|e| {
                TabletalkError::Io(format!("Failed to write '{}': {}", path.display(), e))
            })?;
            console.success(&format!("Wrote {}", path.display()));
        }
        None => println!("{}", csv),
    }

    if args.no_webhook {
        console.info("Webhook notification disabled");
        return Ok(());
    }

    let Some(notifier) = usable_notifier(WebhookNotifier::new(&config.webhook), &console) else {
        return Ok(());
    };

    let sources: Vec<&Table> = table_ids.iter().filter_map(|id| registry.table(id)).collect();
    let payload = notifier.payload(merged, &sources);
    // the merge already succeeded; a failed notification is only a warning
    match notifier.spawn_notify(payload).await {
        Ok(Ok(WebhookOutcome::Sent { status })) => {
            console.success(&format!("Webhook notified ({})", status));
        }
        Ok(Ok(WebhookOutcome::Skipped)) => {}
        Ok(Err(e)) => console.warn(&format!("Webhook notification failed: {}", e)),
        Err(e) => console.warn(&format!("Webhook task failed: {}", e)),
    }

    Ok(())
}

/// Keep a notifier only when it built and has an endpoint
///
/// The merge has already been written by the time this runs, so a notifier
/// that failed to build only produces a warning.
fn usable_notifier(
    notifier: TabletalkResult<WebhookNotifier>,
    console: &CliConsole,
) -> Option<WebhookNotifier> {
    match notifier {
        Ok(notifier) if notifier.is_enabled() => Some(notifier),
        Ok(_) => {
            console.info("No webhook configured");
            None
        }
        Err(e) => {
            console.warn(&format!("Webhook notification skipped: {}", e));
            None
        }
    }
}

/// Turn CLI arguments into a merge request over the uploaded tables
fn build_request(
    registry: &Registry,
    table_ids: &[String],
    args: &MergeArgs,
) -> TabletalkResult<MergeRequest> {
    let first = registry
        .table(&table_ids[0])
        .ok_or_else(|| TabletalkError::table_not_found(table_ids[0].clone()))?;
    let second = registry
        .table(&table_ids[1])
        .ok_or_else(|| TabletalkError::table_not_found(table_ids[1].clone()))?;

    let name = args
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| suggested_merge_name(&first.name, &second.name));

    if args.by_columns {
        return Ok(MergeRequest::new(table_ids.iter().cloned(), name)
            .with_strategy(MergeStrategy::ByColumns));
    }

    let mut mapping = ColumnMapping::new();
    for pair in &args.on {
        let (base, other) = ColumnMapping::parse_pair(pair)?;
        if !first.has_column(&base) {
            return Err(TabletalkError::invalid_input(format!(
                "'{}' has no column '{}' (columns: {})",
                first.name,
                base,
                first.accessors().join(", ")
            )));
        }
        if !second.has_column(&other) {
            return Err(TabletalkError::invalid_input(format!(
                "'{}' has no column '{}' (columns: {})",
                second.name,
                other,
                second.accessors().join(", ")
            )));
        }
        mapping.insert(base, other);
    }
    if mapping.is_empty() {
        return Err(TabletalkError::invalid_input(
            "A join needs at least one --on BASE=SECOND pair (or use --by-columns)",
        ));
    }

    Ok(MergeRequest::new(table_ids.iter().cloned(), name)
        .with_join_kind(args.join_kind)
        .with_mapping(mapping))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tabletalk_core::{JoinKind, parse_csv};
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    fn args(files: Vec<PathBuf>) -> MergeArgs {
        MergeArgs {
            files,
            join_kind: JoinKind::Inner,
            on: vec![],
            by_columns: false,
            name: None,
            output: None,
            no_webhook: true,
        }
    }

    #[tokio::test]
    async fn test_merge_writes_output() {
        let dir = TempDir::new().unwrap();
        let customers = write(&dir, "customers.csv", "id,name\n1,Alice\n2,Bob\n3,Cara");
        let orders = write(&dir, "orders.csv", "customer_id,amount\n1,100\n1,50\n3,20");
        let out = dir.path().join("merged.csv");

        let mut merge_args = args(vec![customers, orders]);
        merge_args.on = vec!["id=customer_id".to_string()];
        merge_args.join_kind = JoinKind::Left;
        merge_args.output = Some(out.clone());

        merge(merge_args, &TabletalkConfig::default(), false).await.unwrap();

        let parsed = parse_csv(&std::fs::read_to_string(&out).unwrap());
        let headers: Vec<_> = parsed.columns.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, vec!["id", "name", "amount"]);
        // Alice twice, Bob unmatched, Cara once
        assert_eq!(parsed.rows.len(), 4);
    }

    #[tokio::test]
    async fn test_join_requires_mapping() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.csv", "id\n1");
        let b = write(&dir, "b.csv", "id\n1");

        let err = merge(args(vec![a, b]), &TabletalkConfig::default(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, TabletalkError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unknown_key_column_is_rejected() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.csv", "id\n1");
        let b = write(&dir, "b.csv", "id\n1");
        let mut merge_args = args(vec![a, b]);
        merge_args.on = vec!["missing=id".to_string()];

        let err = merge(merge_args, &TabletalkConfig::default(), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn test_by_columns_with_unreachable_webhook_still_succeeds() {
        let dir = TempDir::new().unwrap();
        let jan = write(&dir, "jan.csv", "id,amount\n1,10");
        let feb = write(&dir, "feb.csv", "id,amount\n2,20");
        let out = dir.path().join("q1.csv");

        let mut merge_args = args(vec![jan, feb]);
        merge_args.by_columns = true;
        merge_args.output = Some(out.clone());
        merge_args.no_webhook = false;

        let mut config = TabletalkConfig::default();
        config.webhook.url = Some("http://127.0.0.1:9/unreachable".to_string());
        config.webhook.timeout_secs = 2;

        merge(merge_args, &config, false).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "id,amount\n1,10\n2,20"
        );
    }

    #[tokio::test]
    async fn test_unknown_second_key_column_is_rejected() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.csv", "id\n1");
        let b = write(&dir, "b.csv", "id\n1");
        let mut merge_args = args(vec![a, b]);
        merge_args.on = vec!["id=nope".to_string()];

        let err = merge(merge_args, &TabletalkConfig::default(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, TabletalkError::InvalidInput(_)));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_broken_notifier_is_only_a_warning() {
        let console = CliConsole::new(false);
        let broken = Err(TabletalkError::Http("builder error".to_string()));
        assert!(usable_notifier(broken, &console).is_none());

        let disabled = WebhookNotifier::new(&TabletalkConfig::default().webhook);
        assert!(usable_notifier(disabled, &console).is_none());

        let mut config = TabletalkConfig::default();
        config.webhook.url = Some("http://127.0.0.1:9/hook".to_string());
        let enabled = WebhookNotifier::new(&config.webhook);
        assert!(usable_notifier(enabled, &console).is_some());
    }

    #[test]
    fn test_default_name_is_suggested() {
        let mut registry = Registry::new();
        let a = registry.upload("id\n1", "orders.csv");
        let b = registry.upload("id\n1", "customers.csv");
        let mut merge_args = args(vec![]);
        merge_args.on = vec!["id=id".to_string()];

        let request = build_request(&registry, &[a, b], &merge_args).unwrap();
        assert_eq!(request.name, "orders + customers");
        assert_eq!(request.column_mappings.second_for("id"), Some("id"));
    }
}

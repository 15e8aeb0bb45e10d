//! Moving transactions in and out: CSV export and JSON import.

use crate::args::{ExportArgs, ImportArgs};
use crate::commands::{open_ledger, plural, Out};
use crate::error::{ErrorType, IntoResult};
use crate::export::{export_csv, export_filename};
use crate::import::read_import;
use crate::{utils, Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ExportOut {
    /// `None` when there was nothing to export and no file was written.
    pub path: Option<PathBuf>,
    pub count: usize,
}

/// Writes the transactions selected by the filters, newest first, to a CSV file. Without `--out`
/// the file is `finance-export-<today>.csv` in the configured export directory.
pub async fn export(config: Config, args: ExportArgs, today: NaiveDate) -> Result<Out<ExportOut>> {
    let ledger = open_ledger(&config).await?;
    let selected = args.filters().apply(ledger.transactions());
    if selected.is_empty() {
        return Ok(Out::new(
            "There are no transactions to export",
            ExportOut {
                path: None,
                count: 0,
            },
        ));
    }

    let path = match args.out() {
        Some(p) => p.to_path_buf(),
        None => {
            let dir = config.export_dir();
            utils::make_dir(&dir).await.pub_result(ErrorType::Export)?;
            dir.join(export_filename(today))
        }
    };
    let count = export_csv(&selected, &path)
        .await
        .pub_result(ErrorType::Export)?;
    Ok(Out::new(
        format!(
            "Exported {} to {}",
            plural(count, "transaction", "transactions"),
            path.display()
        ),
        ExportOut {
            path: Some(path),
            count,
        },
    ))
}

/// Reads a JSON array of transactions and puts them in front of the existing ones. Nothing is
/// imported if any element of the file cannot be read.
pub async fn import(config: Config, args: ImportArgs) -> Result<Out<usize>> {
    let records = read_import(args.file())
        .await
        .pub_result(ErrorType::Import)?;
    let mut ledger = open_ledger(&config).await?;
    let count = ledger.import(records).await?;
    Ok(Out::new(
        format!("Imported {}", plural(count, "transaction", "transactions")),
        count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{AddArgs, FilterArgs};
    use crate::engine::{
        filter_by_type, group_by_category, group_by_month, total_by_type, CategoryTotal,
        DashboardSummary, MonthlyOverview, Selection,
    };
    use crate::error::error_type;
    use crate::import::parse_import;
    use crate::model::{parse_date, Amount, Transaction, TransactionType};
    use crate::test::TestEnv;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_export_filtered() {
        let env = TestEnv::new().await;
        env.add_sample().await;
        let path = env.scratch().join("food.csv");
        let filters = FilterArgs::new(
            Selection::Only(TransactionType::Expense),
            Selection::All,
            Selection::Only("food".to_string()),
        );
        let today = parse_date("2024-03-01").unwrap();

        let out = export(env.config(), ExportArgs::new(filters, Some(path.clone())), today)
            .await
            .unwrap();

        assert_eq!(out.structure().unwrap().count, 2);
        let csv = utils::read(&path).await.unwrap();
        assert_eq!(
            csv,
            "Date,Type,Category,Amount,Note,Recurring\n\
             2024-02-03,expense,food,80,,No\n\
             2024-01-10,expense,food,120,,No\n"
        );
    }

    #[tokio::test]
    async fn test_export_default_path() {
        let env = TestEnv::new().await;
        tokio::fs::write(
            env.config().config_path(),
            r#"{"app_name": "fin", "config_version": 1, "export_dir": "exports"}"#,
        )
        .await
        .unwrap();
        let config = Config::load(env.config().root()).await.unwrap();
        env.add_sample().await;
        let today = parse_date("2024-03-01").unwrap();

        let out = export(config.clone(), ExportArgs::new(FilterArgs::default(), None), today)
            .await
            .unwrap();

        let expected = config.root().join("exports/finance-export-2024-03-01.csv");
        assert_eq!(out.structure().unwrap().path.as_ref(), Some(&expected));
        assert!(expected.is_file());
    }

    #[tokio::test]
    async fn test_export_nothing() {
        let env = TestEnv::new().await;
        let path = env.scratch().join("empty.csv");
        let today = parse_date("2024-03-01").unwrap();
        let out = export(
            env.config(),
            ExportArgs::new(FilterArgs::default(), Some(path.clone())),
            today,
        )
        .await
        .unwrap();
        assert_eq!(out.message(), "There are no transactions to export");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_import() {
        let env = TestEnv::new().await;
        let existing = env
            .add(TransactionType::Expense, "10", "food", "2024-03-01")
            .await;
        let path = env.scratch().join("import.json");
        tokio::fs::write(
            &path,
            r#"[{"type": "income", "amount": 50, "category": "gift", "date": "2024-02-01"}]"#,
        )
        .await
        .unwrap();

        let out = import(env.config(), ImportArgs::new(&path)).await.unwrap();
        assert_eq!(out.message(), "Imported 1 transaction");

        let ledger = env.ledger().await;
        assert_eq!(ledger.transactions().len(), 2);
        assert_eq!(ledger.transactions()[0].category(), "gift");
        assert_eq!(&ledger.transactions()[1], &existing);
    }

    #[tokio::test]
    async fn test_import_bad_file_changes_nothing() {
        let env = TestEnv::new().await;
        env.add_sample().await;
        let path = env.scratch().join("import.json");
        tokio::fs::write(&path, r#"{"transactions": []}"#).await.unwrap();

        let err = import(env.config(), ImportArgs::new(&path)).await.unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::Import));
        assert_eq!(env.ledger().await.transactions().len(), 4);

        let missing = env.scratch().join("missing.json");
        let err = import(env.config(), ImportArgs::new(&missing)).await.unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::Import));
    }

    #[tokio::test]
    async fn test_saved_data_imports_with_the_same_statistics() {
        let source = TestEnv::new().await;
        source.add_sample().await;
        let saved = source.config().store_dir().join("transactions.json");

        let target = TestEnv::new().await;
        import(target.config(), ImportArgs::new(&saved)).await.unwrap();

        let today = parse_date("2024-02-15").unwrap();
        let before = source.ledger().await;
        let after = target.ledger().await;
        assert_eq!(after.transactions(), before.transactions());
        assert_eq!(
            DashboardSummary::compute(after.transactions(), today),
            DashboardSummary::compute(before.transactions(), today)
        );
        assert_eq!(
            MonthlyOverview::compute(after.transactions()),
            MonthlyOverview::compute(before.transactions())
        );
    }

    /// Reads an exported CSV back into the JSON array an import file would hold.
    fn csv_to_import_json(csv: &str) -> String {
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), crate::export::EXPORT_HEADER);
        let items: Vec<serde_json::Value> = reader
            .records()
            .map(|row| {
                let row = row.unwrap();
                let note = match &row[4] {
                    "" => serde_json::Value::Null,
                    note => note.into(),
                };
                serde_json::json!({
                    "date": &row[0],
                    "type": &row[1],
                    "category": &row[2],
                    "amount": serde_json::Number::from_str(&row[3]).unwrap(),
                    "note": note,
                    "recurring": &row[5] == "Yes",
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    fn by_category(transactions: &[Transaction], t: TransactionType) -> Vec<CategoryTotal> {
        let mut groups = group_by_category(&filter_by_type(transactions, &Selection::Only(t)));
        groups.sort_by(|a, b| a.category.cmp(&b.category));
        groups
    }

    #[tokio::test]
    async fn test_exported_csv_imports_with_the_same_statistics() {
        let source = TestEnv::new().await;
        source.add_sample().await;
        let extra = AddArgs::new(TransactionType::Expense, Amount::from_str("1234.5678").unwrap())
            .with_category("bills")
            .with_date(parse_date("2024-02-20").unwrap())
            .with_note("Rent, \"February\"")
            .with_recurring(true);
        crate::commands::add(source.config(), extra, parse_date("2024-02-20").unwrap())
            .await
            .unwrap();

        let csv_path = source.scratch().join("export.csv");
        let today = parse_date("2024-02-25").unwrap();
        export(
            source.config(),
            ExportArgs::new(FilterArgs::default(), Some(csv_path.clone())),
            today,
        )
        .await
        .unwrap();
        let csv = utils::read(&csv_path).await.unwrap();
        assert!(csv.contains(",1234.5678,"));
        assert!(csv.contains(",45.5,"));

        let json = csv_to_import_json(&csv);
        let records = parse_import(&json).unwrap();
        assert_eq!(records.len(), 5);
        let json_path = source.scratch().join("import.json");
        tokio::fs::write(&json_path, &json).await.unwrap();
        let target = TestEnv::new().await;
        import(target.config(), ImportArgs::new(&json_path)).await.unwrap();

        let before = source.ledger().await;
        let after = target.ledger().await;
        let (before, after) = (before.transactions(), after.transactions());
        for t in [TransactionType::Income, TransactionType::Expense] {
            assert_eq!(total_by_type(after, t), total_by_type(before, t));
            assert_eq!(by_category(after, t), by_category(before, t));
        }
        assert_eq!(group_by_month(after), group_by_month(before));
        assert_eq!(
            DashboardSummary::compute(after, today),
            DashboardSummary::compute(before, today)
        );
        let rent = after.iter().find(|t| t.category() == "bills").unwrap();
        assert_eq!(rent.note(), Some("Rent, \"February\""));
        assert!(rent.recurring());
    }
}

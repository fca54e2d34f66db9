use super::args::{Cli, Command, ListArgs, PageArgs, UpdateArgs};
use anyhow::{Context, Result, bail};
use backoffice::resource::MutationClient;
use backoffice::{
    ColumnSpec, Dashboard, DashboardConfig, DataTable, DynamicRecord, FieldSchema,
    FieldSchemaEntry, LoadState, PageWindow, Record, ResourcePage, TableHandlers,
};
use serde_json::{Map, Value as Json};
use std::sync::Arc;
use tracing::info;

type DynamicPage = Arc<ResourcePage<DynamicRecord, Map<String, Json>>>;

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = DashboardConfig::from_env().context("invalid configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.base_url(url);
    }
    let dashboard = Dashboard::connect(config)?;

    match cli.command {
        Command::List(args) => list(&dashboard, args).await,
        Command::Update(args) => update(&dashboard, args).await,
        Command::Delete { resource, id } => {
            dashboard.client().delete(&resource, &id).await?;
            info!("deleted {} {}", resource, id);
            Ok(())
        }
    }
}

/// Loads the requested window and fails if the fetch did.
async fn load_page(
    dashboard: &Dashboard,
    args: &PageArgs,
) -> Result<(DynamicPage, Vec<DynamicRecord>)> {
    let page: DynamicPage = dashboard.page(&args.resource);
    let size = args
        .page_size
        .unwrap_or(dashboard.config().default_page_size);
    let window = PageWindow::new(args.page.saturating_sub(1), size)?;
    page.on_pagination_change(window).await;

    match page.list().state().await {
        LoadState::Loaded(loaded) => Ok((page, loaded.items)),
        LoadState::Error(message) => bail!("could not load {}: {}", args.resource, message),
        _ => bail!("{} did not load", args.resource),
    }
}

fn keys_of(items: &[DynamicRecord]) -> Vec<String> {
    items
        .first()
        .map(|r| r.keys().map(str::to_string).collect())
        .unwrap_or_default()
}

fn columns_for(keys: &[String]) -> Vec<ColumnSpec<DynamicRecord>> {
    keys.iter()
        .map(|key| {
            let column = ColumnSpec::field(key.as_str(), key.as_str());
            if key == "id" {
                column.always_visible()
            } else {
                column
            }
        })
        .collect()
}

async fn list(dashboard: &Dashboard, args: ListArgs) -> Result<()> {
    let (page, items) = load_page(dashboard, &args.page).await?;
    let mut table: DataTable<DynamicRecord, Map<String, Json>> =
        dashboard.table(&page, columns_for(&keys_of(&items)), FieldSchema::default())?;
    page.sync_table(&mut table).await;

    let view = table.view_mut();
    for (column, value) in &args.filters {
        view.set_filter(column, value.as_str());
    }
    for column in &args.hidden {
        view.set_visibility(column, false);
    }
    if let Some(column) = &args.sort {
        view.toggle_sort(column);
        if args.desc {
            view.toggle_sort(column);
        }
    }

    print!("{}", table.render());
    Ok(())
}

/// Each edited field keeps the JSON type it has on the record, so a
/// digit-only text value is still sent as a string.
fn schema_for(record: &DynamicRecord, fields: &[(String, String)]) -> Result<FieldSchema> {
    let mut entries = Vec::with_capacity(fields.len());
    for (key, _) in fields {
        let entry = match record.0.get(key) {
            None => bail!("record {} has no field '{}'", record.id(), key),
            Some(Json::Number(_)) => FieldSchemaEntry::number(key.as_str(), key.as_str()),
            Some(Json::String(_)) | Some(Json::Null) => {
                FieldSchemaEntry::text(key.as_str(), key.as_str())
            }
            Some(other) => bail!(
                "field '{}' holds {} and cannot be set from the command line",
                key,
                match other {
                    Json::Bool(_) => "a boolean",
                    Json::Array(_) => "a list",
                    _ => "an object",
                }
            ),
        };
        entries.push(entry);
    }
    Ok(FieldSchema::new(entries)?)
}

async fn update(dashboard: &Dashboard, args: UpdateArgs) -> Result<()> {
    let (page, items) = load_page(dashboard, &args.page).await?;
    let record = items
        .iter()
        .find(|r| r.id() == args.id)
        .with_context(|| format!("{} {} is not on this page", args.page.resource, args.id))?;
    let schema = schema_for(record, &args.fields)?;
    let mut table = dashboard.table(&page, columns_for(&keys_of(&items)), schema)?;
    page.sync_table(&mut table).await;

    table.open_editor(&args.id)?;
    for (key, value) in &args.fields {
        table.edit_field(key, value)?;
    }
    table.save().await?;

    page.sync_table(&mut table).await;
    print!("{}", table.render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice::DrawerEditor;

    fn customer() -> DynamicRecord {
        DynamicRecord::from_json(serde_json::json!({
            "id": 7, "phone": "11999999999", "limit": 300, "active": true
        }))
        .unwrap()
    }

    #[test]
    fn test_schema_for_follows_record_types() {
        let record = customer();
        let fields = vec![
            ("phone".to_string(), "11988887777".to_string()),
            ("limit".to_string(), "450".to_string()),
        ];
        let schema = schema_for(&record, &fields).unwrap();
        assert_eq!(schema.get("phone").unwrap().kind.input_type(), "text");
        assert_eq!(schema.get("limit").unwrap().kind.input_type(), "number");

        let mut editor = DrawerEditor::open(record, schema).unwrap();
        for (key, value) in &fields {
            editor.set_input(key, value).unwrap();
        }
        assert_eq!(
            editor.payload().to_json(),
            serde_json::json!({"id": 7, "phone": "11988887777", "limit": 450})
        );
    }

    #[test]
    fn test_schema_for_rejects_unknown_and_boolean_fields() {
        let record = customer();
        assert!(schema_for(&record, &[("email".to_string(), "a@b.c".to_string())]).is_err());
        assert!(schema_for(&record, &[("active".to_string(), "false".to_string())]).is_err());
    }

    #[test]
    fn test_columns_for_pins_id() {
        let columns = columns_for(&["id".to_string(), "nome".to_string()]);
        assert!(!columns[0].can_hide);
        assert!(columns[1].can_hide);
    }
}

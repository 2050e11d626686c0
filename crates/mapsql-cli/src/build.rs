use crate::cli::{BuildArgs, Operation};
use crate::config::ProjectConfig;
use anyhow::Context as _;
use mapsql::{
    CountRequest, DeleteRequest, GetRequest, InsertRequest, Mapping, QueryRequest, SqlFormatter,
    SqlMapper, UpdateRequest,
};
use serde::de::DeserializeOwned;
use std::io::Read as _;
use std::path::Path;

pub fn run(args: BuildArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(args.config)?;
    let mapping = project.mapping(&args.table)?.clone();
    let raw = read_request(args.request.as_deref())?;

    let mapper = SqlMapper::new().with_config(project.file.builder);
    let sql = build(&mapper, args.operation, &raw, &args.table, mapping)?;
    println!("{sql}");
    Ok(())
}

fn read_request(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read request from stdin")?;
            Ok(raw)
        }
    }
}

/// Parse `raw` as the request of `operation`, fill in table and mapping, and
/// build the statement.
pub fn build<F: SqlFormatter>(
    mapper: &SqlMapper<F>,
    operation: Operation,
    raw: &str,
    table: &str,
    mapping: Mapping,
) -> anyhow::Result<String> {
    let table = Some(table.to_string());
    let mapping = Some(mapping);

    let sql = match operation {
        Operation::Insert | Operation::Replace => {
            let mut request: InsertRequest = parse(raw)?;
            request.table_name = table;
            request.mapping = mapping;
            if operation == Operation::Insert {
                mapper.insert(&request)
            } else {
                mapper.replace(&request)
            }
        }
        Operation::Update | Operation::AdvancedUpdate => {
            let mut request: UpdateRequest = parse(raw)?;
            request.table_name = table;
            request.mapping = mapping;
            if operation == Operation::Update {
                mapper.update(&request)
            } else {
                mapper.advanced_update(&request)
            }
        }
        Operation::Delete | Operation::AdvancedDelete => {
            let mut request: DeleteRequest = parse(raw)?;
            request.table_name = table;
            request.mapping = mapping;
            if operation == Operation::Delete {
                mapper.remove(&request)
            } else {
                mapper.advanced_remove(&request)
            }
        }
        Operation::Get => {
            let mut request: GetRequest = parse(raw)?;
            request.table_name = table;
            request.mapping = mapping;
            mapper.get(&request)
        }
        Operation::Query => {
            let mut request: QueryRequest = parse(raw)?;
            request.table_name = table;
            request.mapping = mapping;
            mapper.query(&request)
        }
        Operation::Count => {
            let mut request: CountRequest = parse(raw)?;
            request.table_name = table;
            request.mapping = mapping;
            mapper.count(&request)
        }
    };

    sql.with_context(|| format!("failed to build {} statement", operation.name()))
}

/// Blank input reads as an empty request object.
fn parse<T: DeserializeOwned>(raw: &str) -> anyhow::Result<T> {
    let raw = if raw.trim().is_empty() { "{}" } else { raw };
    serde_json::from_str(raw).context("failed to parse request JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsql::{BuilderConfig, FieldType};

    fn mapping() -> Mapping {
        Mapping::new()
            .field("user_id", FieldType::Number)
            .field("name", FieldType::String)
            .field("location", FieldType::Point)
    }

    #[test]
    fn build_insert_from_json() {
        let sql = build(
            &SqlMapper::new(),
            Operation::Insert,
            r#"{"data": {"location": {"x": 1.5, "y": 2}, "name": "Ann", "user_id": 3}}"#,
            "users",
            mapping(),
        )
        .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO users SET location = POINT(1.5,2),`name` = 'Ann', `user_id` = 3"
        );
    }

    #[test]
    fn build_count_accepts_as() {
        let sql = build(
            &SqlMapper::new(),
            Operation::Count,
            r#"{"as": "n", "where": {"and": {"user_id": {"in": [1, 2]}}}}"#,
            "users",
            mapping(),
        )
        .unwrap();
        assert_eq!(sql, "SELECT COUNT(*) AS `n` FROM users WHERE `user_id` IN(1,2)");
    }

    #[test]
    fn build_delete_blank_request_targets_all_rows() {
        let sql = build(&SqlMapper::new(), Operation::Delete, "  \n", "users", mapping()).unwrap();
        assert_eq!(sql, "DELETE FROM users ");
    }

    #[test]
    fn build_uses_mapper_config() {
        let mapper = SqlMapper::new().with_config(BuilderConfig::lenient());
        let sql = build(&mapper, Operation::Get, r#"{"offset": [1]}"#, "users", mapping()).unwrap();
        assert_eq!(sql, "SELECT * FROM users");

        let err = build(&SqlMapper::new(), Operation::Get, r#"{"offset": [1]}"#, "users", mapping())
            .unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "failed to build get statement: offset must be an array of [index,limit]"
        );
    }

    #[test]
    fn build_reports_missing_data() {
        let err = build(&SqlMapper::new(), Operation::Update, "{}", "users", mapping()).unwrap_err();
        assert!(format!("{err:#}").ends_with("Unexpected data value null or undefined"));
    }

    #[test]
    fn build_rejects_invalid_json() {
        let err = build(&SqlMapper::new(), Operation::Get, "[", "users", mapping()).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse request JSON"));
    }
}

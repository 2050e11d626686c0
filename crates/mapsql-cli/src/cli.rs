use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Operation(Operation),
}

/// Statement-building subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Replace,
    Update,
    AdvancedUpdate,
    Delete,
    AdvancedDelete,
    Get,
    Query,
    Count,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Insert,
        Operation::Replace,
        Operation::Update,
        Operation::AdvancedUpdate,
        Operation::Delete,
        Operation::AdvancedDelete,
        Operation::Get,
        Operation::Query,
        Operation::Count,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Replace => "replace",
            Operation::Update => "update",
            Operation::AdvancedUpdate => "advanced-update",
            Operation::Delete => "delete",
            Operation::AdvancedDelete => "advanced-delete",
            Operation::Get => "get",
            Operation::Query => "query",
            Operation::Count => "count",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Request keys read by this operation, for help output.
    fn request_keys(self) -> &'static str {
        match self {
            Operation::Insert | Operation::Replace => "data",
            Operation::Update => "data, where (field: value)",
            Operation::AdvancedUpdate => "data, where ({and, or})",
            Operation::Delete => "where (field: value, optional)",
            Operation::AdvancedDelete => "where ({and, or}, optional)",
            Operation::Get => "select, where (field: value), order, offset",
            Operation::Query => "select, where ({and, or}), order, offset, count",
            Operation::Count => "as, where ({and, or})",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Build(BuildArgs),
}

#[derive(Debug, Clone)]
pub struct BuildArgs {
    pub operation: Operation,
    pub config: PathBuf,
    pub table: String,
    /// `None` reads the request from stdin.
    pub request: Option<PathBuf>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        name => match Operation::from_name(name) {
            Some(operation) => parse_build(operation, it.map(|s| s.as_str())),
            None => anyhow::bail!("unknown command: {first}"),
        },
    }
}

fn parse_build<'a>(
    operation: Operation,
    mut it: impl Iterator<Item = &'a str>,
) -> anyhow::Result<Command> {
    let mut config = PathBuf::from("mapsql.toml");
    let mut table: Option<String> = None;
    let mut request: Option<PathBuf> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Operation(operation))),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--table" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--table requires a value");
                };
                table = Some(v.to_string());
            }
            _ if token.starts_with("--table=") => {
                table = Some(token.trim_start_matches("--table=").to_string());
            }
            "--request" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--request requires a value");
                };
                request = request_path(v);
            }
            _ if token.starts_with("--request=") => {
                request = request_path(token.trim_start_matches("--request="));
            }
            other => anyhow::bail!("unexpected argument: {other}"),
        }
    }

    let Some(table) = table else {
        anyhow::bail!("--table is required (see `mapsql {} --help`)", operation.name());
    };

    Ok(Command::Build(BuildArgs {
        operation,
        config,
        table,
        request,
    }))
}

fn request_path(v: &str) -> Option<PathBuf> {
    (v != "-").then(|| PathBuf::from(v))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
mapsql - build SQL statements from a table mapping and a JSON request

USAGE:
  mapsql <COMMAND> --table <NAME> [OPTIONS]

COMMANDS:
  insert            INSERT INTO ... SET
  replace           REPLACE INTO ... SET
  update            UPDATE with an equality where object
  advanced-update   UPDATE with an and/or filter
  delete            DELETE with an equality where object
  advanced-delete   DELETE with an and/or filter
  get               SELECT with an equality where object
  query             SELECT with an and/or filter, optional COUNT
  count             SELECT COUNT(*) with an and/or filter

Run `mapsql <command> --help` for more."
            );
        }
        HelpTopic::Operation(op) => {
            println!(
                "\
USAGE:
  mapsql {name} --table <NAME> [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: mapsql.toml)
  --table <NAME>        Table whose mapping is used (from [tables.<NAME>])
  --request <FILE>      JSON request file; `-` or absent reads stdin
  -h, --help            Print help

REQUEST KEYS:
  {keys}",
                name = op.name(),
                keys = op.request_keys(),
            );
        }
    }
}

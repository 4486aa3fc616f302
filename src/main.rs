// ==========================================
// 学校管理门户 - 名册导入命令行入口
// ==========================================
// 用法:
//   school-roster import <teacher|student> <file> [db_path]
//   school-roster list <teacher|student> [db_path]
//   school-roster template <teacher|student> <out.csv>
// 输出: stdout 为 JSON，日志写 stderr
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use school_roster::db::get_default_db_path;
use school_roster::{i18n, logging, RosterImportApi, RosterKind};

const USAGE: &str = "usage:
  school-roster import <teacher|student> <file> [db_path]
  school-roster list <teacher|student> [db_path]
  school-roster template <teacher|student> <out.csv>";

fn parse_kind(value: Option<String>) -> Result<RosterKind> {
    let value = value.ok_or_else(|| anyhow!("missing roster kind\n{}", USAGE))?;
    value.parse::<RosterKind>().map_err(|e| anyhow!(e))
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    i18n::init_from_env();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_default();

    match command.as_str() {
        "import" => {
            let kind = parse_kind(args.next())?;
            let file = args
                .next()
                .ok_or_else(|| anyhow!("missing file path\n{}", USAGE))?;
            let db_path = args.next().unwrap_or_else(get_default_db_path);
            tracing::info!(db_path = %db_path, "使用数据库");

            let api = RosterImportApi::new(db_path);
            let response = api.import_roster_file(&file, kind).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "list" => {
            let kind = parse_kind(args.next())?;
            let db_path = args.next().unwrap_or_else(get_default_db_path);

            let api = RosterImportApi::new(db_path);
            let entities = api.list_roster(kind)?;
            println!("{}", serde_json::to_string_pretty(&entities)?);
        }
        "template" => {
            let kind = parse_kind(args.next())?;
            let out = args
                .next()
                .ok_or_else(|| anyhow!("missing output path\n{}", USAGE))?;

            let api = RosterImportApi::new(get_default_db_path());
            let headers = api
                .write_template(kind, &out)
                .await
                .with_context(|| format!("writing template to {}", out))?;
            println!("{}", serde_json::to_string(&headers)?);
            eprintln!("{}", i18n::t_with_args("template.written", &[("path", out.as_str())]));
        }
        "" | "help" | "--help" | "-h" => {
            println!("{} {}\n{}", school_roster::APP_NAME, school_roster::VERSION, USAGE);
        }
        other => bail!("unknown command: {}\n{}", other, USAGE),
    }

    Ok(())
}

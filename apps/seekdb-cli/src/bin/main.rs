use std::env;
use std::path::PathBuf;

use indicatif::ProgressBar;
use serde_json::Value;
use tantivy::schema::{Schema, FAST, INDEXED, STORED, STRING, TEXT};
use tantivy::Index;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use seekdb_core::{Directive, Document, Driver, DriverKind, NullDriver, SearchConfig};
use seekdb_tantivy::TantivyDriver;

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {prog} <ingest|search|page> [args...]");
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = SearchConfig::load()?;
    let (cmd, args) = parse_args();

    // The only place that knows which driver exists; everything below is
    // generic over the contract.
    match config.driver {
        DriverKind::Null => run(&NullDriver::new(), &config, &cmd, &args),
        DriverKind::Tantivy => {
            let driver = TantivyDriver::new(ensure_index(&config)?, &config)?;
            run(&driver, &config, &cmd, &args)
        }
    }
}

fn run<D: Driver>(
    driver: &D,
    config: &SearchConfig,
    cmd: &str,
    args: &[String],
) -> anyhow::Result<()> {
    match cmd {
        "ingest" => {
            let data_dir = args.first().map(PathBuf::from).unwrap_or_else(|| {
                eprintln!("Usage: seekdb ingest <dir> [doc_type]");
                std::process::exit(1)
            });
            let doc_type = args.get(1).map_or("doc", String::as_str);
            ingest(driver, &data_dir, doc_type)
        }
        "search" => {
            let (doc_type, query) = search_args(args);
            let directives: Vec<Directive> =
                driver.query_string(&query, None).into_iter().collect();
            let results = driver.get(&[doc_type.as_str()], directives)?;
            println!(
                "{} of {} hits in {} ms",
                results.len(),
                results.total_hits(),
                results.total_time_ms()
            );
            for hit in &results {
                println!(
                    "{:>8.3}  {:<12}  {}",
                    hit.score,
                    first_str(hit, &config.id_field),
                    first_str(hit, "title")
                );
            }
            Ok(())
        }
        "page" => {
            let (page, rest) = match args.first().and_then(|p| p.parse::<usize>().ok()) {
                Some(page) => (page, &args[1..]),
                None => (1, args),
            };
            let (doc_type, query) = search_args(rest);
            let directives: Vec<Directive> =
                driver.query_string(&query, None).into_iter().collect();
            let paged =
                driver.paginate(&[doc_type.as_str()], directives, page, config.per_page, 0)?;
            println!(
                "page {}/{} ({} total)",
                paged.current_page(),
                paged.last_page(),
                paged.total()
            );
            for hit in paged.items() {
                println!("{:>8.3}  {}", hit.score, first_str(hit, &config.id_field));
            }
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {cmd}");
            std::process::exit(1);
        }
    }
}

fn search_args(args: &[String]) -> (String, String) {
    if args.len() < 2 {
        eprintln!("Usage: seekdb search <doc_type> <query...>");
        std::process::exit(1);
    }
    (args[0].clone(), args[1..].join(" "))
}

fn ingest<D: Driver>(driver: &D, data_dir: &std::path::Path, doc_type: &str) -> anyhow::Result<()> {
    let files: Vec<PathBuf> = WalkDir::new(data_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
        .map(|entry| entry.into_path())
        .collect();

    let progress = ProgressBar::new(files.len() as u64);
    let mut documents: Vec<(String, Document)> = Vec::with_capacity(files.len());
    for path in &files {
        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(fields)) => {
                let id = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("doc")
                    .to_string();
                documents.push((id, fields));
            }
            Ok(_) | Err(_) => eprintln!("Skipping {} (not a JSON object)", path.display()),
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    let count = documents.len();
    driver.add_multiple(doc_type, documents)?;
    println!("Ingested {count} documents as `{doc_type}`");
    Ok(())
}

fn first_str<'a>(hit: &'a seekdb_core::SearchHit, field: &str) -> &'a str {
    hit.first(field).and_then(Value::as_str).unwrap_or("-")
}

fn ensure_index(config: &SearchConfig) -> anyhow::Result<Index> {
    let dir = config.index_path();
    if dir.join("meta.json").exists() {
        return Ok(Index::open_in_dir(&dir)?);
    }
    std::fs::create_dir_all(&dir)?;
    Ok(Index::create_in_dir(&dir, demo_schema(config))?)
}

// The index schema belongs to the host application, not to the search layer;
// this is the one this demo ships.
fn demo_schema(config: &SearchConfig) -> Schema {
    let mut builder = Schema::builder();
    builder.add_text_field(&config.id_field, STRING | STORED);
    builder.add_text_field(&config.doc_type_field, STRING | STORED);
    builder.add_text_field("title", TEXT | STORED);
    builder.add_text_field("body", TEXT | STORED);
    builder.add_text_field("status", STRING | STORED);
    builder.add_u64_field("views", INDEXED | FAST | STORED);
    builder.build()
}

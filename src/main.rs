//! Posterkit - HTML Poster Editor Core
//!
//! CLI entry point: import a poster HTML file, report what was ingested, and
//! export the self-contained artifact. Without arguments the built-in
//! placeholder poster is exported, which exercises the full pipeline.

use posterkit::{EditorStore, FsDeliver, NAME, VERSION, export_and_deliver, io};
use std::env;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: {NAME} [input.html] [output-dir]");
        return;
    }

    let mut store = EditorStore::new();

    if let Some(input) = args.get(1) {
        match io::read_import_file(Path::new(input)).await {
            Ok(raw) => store.import(&raw),
            Err(e) => {
                eprintln!("{NAME}: {e}");
                process::exit(1);
            }
        }
    }

    let doc = store.document();
    println!("{NAME} v{VERSION}");
    println!(
        "working document: {} nodes, {} bytes of stylesheet text",
        doc.live_count(),
        doc.style_text().len()
    );

    let out_dir = args.get(2).map(String::as_str).unwrap_or(".");
    let deliver = FsDeliver::new(out_dir);
    if let Err(e) = export_and_deliver(doc, &deliver) {
        eprintln!("{NAME}: {e}");
        process::exit(1);
    }
    println!("exported poster to {out_dir}");
}
